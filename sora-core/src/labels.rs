//! Display labels for the text regions

/// Language for labels and for the API's `lang` parameter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    /// Value sent as the API `lang` query parameter
    pub fn code(self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Some(Language::Ja),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }

    pub fn labels(self) -> Labels {
        match self {
            Language::Ja => Labels {
                locating: "位置情報を取得中...",
                picked: "選択した地点",
                loading: "天気情報を読み込み中...",
                error: "エラーが発生しました",
                humidity: "湿度",
                wind: "風速",
            },
            Language::En => Labels {
                locating: "Getting your location...",
                picked: "Selected point",
                loading: "Loading weather...",
                error: "An error occurred",
                humidity: "Humidity",
                wind: "Wind",
            },
        }
    }
}

/// Fixed strings written into the display regions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    pub locating: &'static str,
    /// Location placeholder for a point picked on the map
    pub picked: &'static str,
    pub loading: &'static str,
    pub error: &'static str,
    pub humidity: &'static str,
    pub wind: &'static str,
}

impl Labels {
    pub fn humidity_text(&self, humidity: f64) -> String {
        format!("{}: {}%", self.humidity, humidity)
    }

    pub fn wind_text(&self, wind_speed: f64) -> String {
        format!("{}: {} m/s", self.wind, wind_speed)
    }
}
