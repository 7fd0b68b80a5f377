//! Error types for weather fetches and location lookups

use std::fmt;

use crate::labels::Language;

/// Failure of a single weather fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeatherError {
    /// HTTP 401: key invalid or not yet active
    Unauthorized,
    /// HTTP 403: key lacks permission
    Forbidden,
    /// HTTP 429: call limit reached
    RateLimited,
    /// Any other non-success status
    Http { status: u16 },
    /// Request never produced a response
    Network(String),
    /// Response body did not match the expected shape
    Parse(String),
}

impl WeatherError {
    /// Map a non-success HTTP status to its error.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => WeatherError::Unauthorized,
            403 => WeatherError::Forbidden,
            429 => WeatherError::RateLimited,
            status => WeatherError::Http { status },
        }
    }

    /// Message shown in the description region when a fetch fails
    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (WeatherError::Unauthorized, Language::Ja) => {
                "APIキーが無効または未認証です。APIキーの有効化をお待ちください（最大2時間）".into()
            }
            (WeatherError::Unauthorized, Language::En) => {
                "API key is invalid or not yet active. Activation can take up to 2 hours".into()
            }
            (WeatherError::Forbidden, Language::Ja) => "APIキーのアクセス権限がありません".into(),
            (WeatherError::Forbidden, Language::En) => {
                "API key does not have access to this endpoint".into()
            }
            (WeatherError::RateLimited, Language::Ja) => {
                "API呼び出し制限に達しました。しばらく待ってから再試行してください".into()
            }
            (WeatherError::RateLimited, Language::En) => {
                "API call limit reached. Wait a while and try again".into()
            }
            (WeatherError::Http { status }, _) => format!("HTTP error! status: {status}"),
            (WeatherError::Network(_) | WeatherError::Parse(_), Language::Ja) => {
                "天気情報を取得できませんでした".into()
            }
            (WeatherError::Network(_) | WeatherError::Parse(_), Language::En) => {
                "Could not load weather data".into()
            }
        }
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::Unauthorized => {
                write!(f, "unauthorized (401): API key invalid or inactive")
            }
            WeatherError::Forbidden => write!(f, "forbidden (403): API key lacks permission"),
            WeatherError::RateLimited => write!(f, "rate limited (429)"),
            WeatherError::Http { status } => write!(f, "HTTP error! status: {}", status),
            WeatherError::Network(e) => write!(f, "weather request failed: {}", e),
            WeatherError::Parse(e) => write!(f, "malformed weather response: {}", e),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Parse(e.to_string())
    }
}

/// Device location could not be determined. Always absorbed by the provider.
#[derive(Debug)]
pub enum LocationError {
    /// No geolocation capability configured
    Unsupported,
    /// Capability present but the lookup failed or was refused
    Unavailable(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Unsupported => write!(f, "geolocation is not supported"),
            LocationError::Unavailable(reason) => write!(f, "geolocation unavailable: {}", reason),
        }
    }
}

impl std::error::Error for LocationError {}

impl From<reqwest::Error> for LocationError {
    fn from(e: reqwest::Error) -> Self {
        LocationError::Unavailable(e.to_string())
    }
}
