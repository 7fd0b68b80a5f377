//! Actions
//!
//! Naming follows the loop's flow: intents (`WeatherRefresh`), async results
//! with a `Did` infix (`WeatherDidLoad`), UI changes prefixed `Ui`.
//! Categories group them by prefix for the dispatch log.

use std::time::Duration;

use sora_core::{Coordinate, RequestId, WeatherError, WeatherObservation};
use tui_dispatch::ActionSummary;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum Action {
    /// Intent: refresh from the device location
    #[action(category = "weather")]
    WeatherRefresh,

    /// Intent: fetch weather for a point picked on the map
    #[action(category = "weather")]
    WeatherFetchAt(Coordinate),

    /// Result: the location step finished (possibly with the fallback)
    #[action(category = "location")]
    LocationDidResolve {
        request: RequestId,
        coordinate: Coordinate,
    },

    /// Result: observation received
    #[action(category = "weather")]
    WeatherDidLoad {
        request: RequestId,
        observation: WeatherObservation,
    },

    /// Result: the weather request failed
    #[action(category = "weather")]
    WeatherDidError {
        request: RequestId,
        error: WeatherError,
    },

    #[action(category = "ui")]
    UiToggleMap,

    #[action(category = "ui")]
    UiTerminalResize(u16, u16),

    /// Frame tick carrying the real time elapsed since the previous one
    #[action(skip_category)]
    Tick(Duration),

    #[action(skip_category)]
    Quit,
}

impl ActionSummary for Action {
    /// One-line description for the log
    fn summary(&self) -> String {
        match self {
            Action::WeatherFetchAt(coordinate) => format!("WeatherFetchAt({})", coordinate),
            Action::LocationDidResolve {
                request,
                coordinate,
            } => format!(
                "LocationDidResolve {{ request: {}, at: {} }}",
                request.value(),
                coordinate
            ),
            Action::WeatherDidLoad {
                request,
                observation,
            } => format!(
                "WeatherDidLoad {{ request: {}, {}: {} {:.1}°C }}",
                request.value(),
                observation.location_name,
                observation.condition_main,
                observation.temperature_celsius
            ),
            Action::WeatherDidError { request, error } => {
                format!("WeatherDidError {{ request: {}, {} }}", request.value(), error)
            }
            Action::Tick(elapsed) => format!("Tick({}ms)", elapsed.as_millis()),
            _ => format!("{:?}", self),
        }
    }
}

impl Action {
    /// Ticks fire every frame and would drown the log
    pub fn is_noisy(&self) -> bool {
        matches!(self, Action::Tick(_))
    }
}
