//! Core types and logic for sora
//!
//! This crate holds everything that does not touch the terminal:
//!
//! - **Observation**: a weather reading and the coordinate it belongs to
//! - **Classify**: pure mapping from humidity/wind/temperature to intensity tiers
//! - **Scheduler**: virtual-time timer queue with cancellable handles
//! - **EffectEngine**: rain, cloud and sunshine particle generators
//! - **WeatherSource**: OpenWeatherMap client and an offline demo generator
//! - **LocationProvider**: device location with a fixed fallback
//! - **WeatherController**: the locate -> fetch -> render flow
//!
//! # Example
//!
//! ```ignore
//! use sora_core::prelude::*;
//!
//! let mut engine = EffectEngine::new(7);
//! let mut controller = WeatherController::new(Language::Ja);
//!
//! let source = WeatherBackend::from_credential(
//!     &Credential::none(),
//!     ApiConfig::default(),
//!     DemoMode::Seeded,
//! );
//! let locator = LocationProvider::new(DeviceLocator::Disabled);
//!
//! controller.refresh(&locator, &source, &mut engine).await;
//! engine.advance(Duration::from_millis(500));
//! ```

pub mod classify;
pub mod controller;
pub mod effects;
pub mod error;
pub mod labels;
pub mod location;
pub mod observation;
pub mod particle;
pub mod scheduler;
pub mod source;

pub use classify::{
    cloud_density, cloud_speed, rain_intensity, sun_intensity, CloudDensity, CloudSpeed,
    RainIntensity, SunIntensity,
};
pub use controller::{DisplayText, Phase, RequestId, WeatherController};
pub use effects::{ActiveEffects, EffectEngine, EffectKind, EffectState, EffectTier};
pub use error::{LocationError, WeatherError};
pub use labels::{Labels, Language};
pub use location::{
    DeviceLocator, Geolocator, IpGeolocator, LocationProvider, DEFAULT_COORDINATE,
};
pub use observation::{Coordinate, WeatherObservation};
pub use particle::{Container, Particle, Surface};
pub use scheduler::{Scheduler, TimerHandle};
pub use source::{
    ApiConfig, Credential, DemoMode, DemoSource, OpenWeatherClient, WeatherBackend, WeatherSource,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::*;
    pub use crate::controller::{DisplayText, Phase, RequestId, WeatherController};
    pub use crate::effects::{ActiveEffects, EffectEngine, EffectKind, EffectTier};
    pub use crate::error::{LocationError, WeatherError};
    pub use crate::labels::{Labels, Language};
    pub use crate::location::{DeviceLocator, Geolocator, LocationProvider, DEFAULT_COORDINATE};
    pub use crate::observation::{Coordinate, WeatherObservation};
    pub use crate::source::{ApiConfig, Credential, DemoMode, WeatherBackend, WeatherSource};
    pub use std::time::Duration;
}
