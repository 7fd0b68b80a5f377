//! Side effects returned by the reducer and run by the effect handler

use sora_core::{Coordinate, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Resolve the device location, answering with `LocationDidResolve`
    ResolveLocation { request: RequestId },

    /// Fetch weather, answering with `WeatherDidLoad` or `WeatherDidError`
    FetchWeather {
        request: RequestId,
        coordinate: Coordinate,
    },
}

impl Effect {
    /// Task slot the effect runs in. A newer effect replaces an older one.
    pub fn task_key(&self) -> &'static str {
        match self {
            Effect::ResolveLocation { .. } => "location",
            Effect::FetchWeather { .. } => "weather",
        }
    }
}
