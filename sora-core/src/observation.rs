//! Weather observation and coordinates

use std::fmt;

use crate::effects::EffectKind;

/// A geographic coordinate in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// A single weather reading, immutable once received
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherObservation {
    pub location_name: String,
    /// Categorical condition ("Clear", "Clouds", "Rain", ...)
    pub condition_main: String,
    /// Free text, display only
    pub condition_description: String,
    pub temperature_celsius: f64,
    /// 0-100
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
}

impl WeatherObservation {
    /// The effect this observation's condition drives, if any.
    pub fn effect_kind(&self) -> Option<EffectKind> {
        EffectKind::for_condition(&self.condition_main)
    }

    /// Temperature rounded half-up, e.g. 18.5 -> 19 and -2.5 -> -2
    pub fn rounded_temperature(&self) -> i64 {
        (self.temperature_celsius + 0.5).floor() as i64
    }
}
