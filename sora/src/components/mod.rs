//! Render components
//!
//! A component receives read-only props borrowed from `AppState`, turns
//! events into actions, and renders. It never mutates application state.

pub mod help_bar;
pub mod sky;
pub mod sora_view;
pub mod weather_panel;
pub mod world_map;

pub use help_bar::{HelpBar, HelpBarProps};
pub use sky::{Sky, SkyProps};
pub use sora_view::{SoraView, SoraViewProps, SPINNERS};
pub use weather_panel::{WeatherPanel, WeatherPanelProps};
pub use world_map::{cell_to_coordinate, WorldMap, WorldMapProps};

pub use tui_dispatch::Component;
