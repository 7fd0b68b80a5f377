//! Application state
//!
//! Components read `&AppState` through their props; only the reducer
//! mutates it.

use sora_core::{Coordinate, EffectEngine, EffectTier, Language, WeatherController};

/// Clicked map points kept for display
pub const MAX_MARKERS: usize = 8;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Locate -> fetch -> render flow and the text regions
    pub controller: WeatherController,

    /// Particle effects, advanced by frame ticks
    pub engine: EffectEngine,

    /// Effect forced from the command line. Fetching is disabled while set.
    pub preview: Option<EffectTier>,

    /// Serving offline demo data
    pub demo: bool,

    pub show_map: bool,

    /// Points picked on the map, newest last
    pub markers: Vec<Coordinate>,

    pub tick_count: u32,

    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(language: Language, seed: u64) -> Self {
        Self {
            controller: WeatherController::new(language),
            engine: EffectEngine::new(seed),
            preview: None,
            demo: false,
            show_map: true,
            markers: Vec::new(),
            tick_count: 0,
            terminal_size: (80, 24),
        }
    }

    /// Start a forced effect and keep it running.
    pub fn with_preview(mut self, tier: EffectTier) -> Self {
        self.engine.stop_all();
        self.engine.start(tier);
        self.preview = Some(tier);
        self
    }

    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub fn add_marker(&mut self, coordinate: Coordinate) {
        if self.markers.len() == MAX_MARKERS {
            self.markers.remove(0);
        }
        self.markers.push(coordinate);
    }

    /// Particles on screen or effects still scheduling work
    pub fn is_animating(&self) -> bool {
        self.engine.surface().total() > 0 || self.engine.pending_timers() > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Language::default(), 0)
    }
}
