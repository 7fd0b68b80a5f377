//! sora - terminal weather with particle effects
//!
//! The app follows an action / reducer / effect loop:
//!
//! 1. Terminal events go through [`components::SoraView`] and become [`Action`]s
//! 2. [`reducer::reducer`] updates [`AppState`] and returns [`Effect`]s
//! 3. [`Services`] runs location and weather lookups as keyed tasks
//! 4. Task results come back as `Did` actions
//! 5. Frame ticks advance the particle engine; changed state is re-rendered
//!
//! The loop itself is `tui_dispatch`'s `EffectRuntime`.
//!
//! All weather and effect logic lives in `sora-core`.

pub mod action;
pub mod components;
pub mod config;
pub mod effect;
pub mod middleware;
pub mod reducer;
pub mod services;
pub mod state;

pub use action::Action;
pub use effect::Effect;
pub use services::Services;
pub use state::AppState;
pub use tui_dispatch::DispatchResult;
