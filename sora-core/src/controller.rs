//! The locate -> fetch -> render flow
//!
//! [`WeatherController`] is a small state machine:
//!
//! ```text
//! Idle -> Locating -> Fetching -> Rendering -> Done
//!                        \-----------------> Failed
//! ```
//!
//! It can be driven step by step (the terminal app does this from its
//! reducer, with the async work running in spawned tasks) or in one go with
//! [`WeatherController::refresh`].
//!
//! Each invocation takes a [`RequestId`]. Only the most recent one may move
//! the machine forward, so a slow response from an older refresh cannot
//! overwrite a newer one.

use tracing::{debug, info, warn};

use crate::classify::RainIntensity;
use crate::effects::{EffectEngine, EffectTier};
use crate::error::WeatherError;
use crate::labels::{Labels, Language};
use crate::location::{Geolocator, LocationProvider};
use crate::observation::{Coordinate, WeatherObservation};
use crate::source::WeatherSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Locating,
    Fetching,
    Rendering,
    Done,
    Failed,
}

/// Generation number of one refresh invocation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Text written to the named display regions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayText {
    pub location: String,
    pub description: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

#[derive(Clone, Debug)]
pub struct WeatherController {
    phase: Phase,
    language: Language,
    display: DisplayText,
    latest: RequestId,
    coordinate: Option<Coordinate>,
    observation: Option<WeatherObservation>,
    error: Option<WeatherError>,
    effect: Option<EffectTier>,
}

impl Default for WeatherController {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl WeatherController {
    pub fn new(language: Language) -> Self {
        Self {
            phase: Phase::Idle,
            language,
            display: DisplayText::default(),
            latest: RequestId::default(),
            coordinate: None,
            observation: None,
            error: None,
            effect: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Locating or fetching
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Locating | Phase::Fetching)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn labels(&self) -> Labels {
        self.language.labels()
    }

    pub fn display(&self) -> &DisplayText {
        &self.display
    }

    /// Coordinate of the current or last fetch
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub fn observation(&self) -> Option<&WeatherObservation> {
        self.observation.as_ref()
    }

    pub fn error(&self) -> Option<&WeatherError> {
        self.error.as_ref()
    }

    /// Effect started by the last render or failure
    pub fn effect(&self) -> Option<EffectTier> {
        self.effect
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest
    }

    pub fn is_current(&self, request: RequestId) -> bool {
        request == self.latest
    }

    fn next_request(&mut self) -> RequestId {
        self.latest = RequestId(self.latest.0 + 1);
        self.latest
    }

    fn show_placeholders(&mut self, location: String) {
        self.display.location = location;
        self.display.description = self.labels().loading.into();
    }

    /// Start a refresh from the device location.
    pub fn begin_locating(&mut self) -> RequestId {
        let request = self.next_request();
        self.phase = Phase::Locating;
        self.show_placeholders(self.labels().locating.into());
        info!(request = request.0, "locating");
        request
    }

    /// Location resolved; move on to fetching. `false` if the request is stale.
    pub fn begin_fetching(&mut self, request: RequestId, coordinate: Coordinate) -> bool {
        if !self.is_current(request) {
            debug!(request = request.0, latest = self.latest.0, "ignoring stale location");
            return false;
        }
        self.phase = Phase::Fetching;
        self.coordinate = Some(coordinate);
        info!(request = request.0, %coordinate, "fetching weather");
        true
    }

    /// Start a refresh for a chosen coordinate, skipping the location step.
    pub fn begin_fetching_at(&mut self, coordinate: Coordinate) -> RequestId {
        let request = self.next_request();
        self.show_placeholders(format!("{} {}", self.labels().picked, coordinate));
        self.begin_fetching(request, coordinate);
        request
    }

    /// Apply a fetch result. `false` if the request is stale.
    pub fn complete(
        &mut self,
        request: RequestId,
        result: Result<WeatherObservation, WeatherError>,
        engine: &mut EffectEngine,
    ) -> bool {
        if !self.is_current(request) {
            debug!(request = request.0, latest = self.latest.0, "ignoring stale weather result");
            return false;
        }
        match result {
            Ok(observation) => self.display_weather(observation, engine),
            Err(error) => self.fail(error, engine),
        }
        true
    }

    /// Write every text region, then run the one effect the observation drives.
    pub fn display_weather(&mut self, observation: WeatherObservation, engine: &mut EffectEngine) {
        self.phase = Phase::Rendering;
        let labels = self.labels();

        self.display = DisplayText {
            location: observation.location_name.clone(),
            description: observation.condition_description.clone(),
            temperature: format!("{}°C", observation.rounded_temperature()),
            humidity: labels.humidity_text(observation.humidity_percent),
            wind: labels.wind_text(observation.wind_speed_mps),
        };

        self.effect = engine.apply(&observation);
        let effect = self.effect.map(EffectTier::label).unwrap_or_default();
        info!(
            location = %observation.location_name,
            condition = %observation.condition_main,
            effect = %effect,
            "weather displayed"
        );

        self.observation = Some(observation);
        self.error = None;
        self.phase = Phase::Done;
    }

    /// Show the error and fall back to medium rain so the sky is never blank.
    pub fn fail(&mut self, error: WeatherError, engine: &mut EffectEngine) {
        warn!(error = %error, "weather update failed");
        self.display = DisplayText {
            location: self.labels().error.into(),
            description: error.user_message(self.language),
            ..DisplayText::default()
        };

        engine.stop_all();
        let fallback = EffectTier::Rain(RainIntensity::Medium);
        engine.start(fallback);
        self.effect = Some(fallback);

        self.observation = None;
        self.error = Some(error);
        self.phase = Phase::Failed;
    }

    /// Run the whole flow from the device location.
    pub async fn refresh<G, S>(
        &mut self,
        locator: &LocationProvider<G>,
        source: &S,
        engine: &mut EffectEngine,
    ) -> Phase
    where
        G: Geolocator,
        S: WeatherSource,
    {
        let request = self.begin_locating();
        let coordinate = locator.resolve().await;
        if self.begin_fetching(request, coordinate) {
            let result = source.fetch(coordinate).await;
            self.complete(request, result, engine);
        }
        self.phase
    }

    /// Run the flow for a chosen coordinate, e.g. a map click.
    pub async fn refresh_at<S: WeatherSource>(
        &mut self,
        coordinate: Coordinate,
        source: &S,
        engine: &mut EffectEngine,
    ) -> Phase {
        let request = self.begin_fetching_at(coordinate);
        let result = source.fetch(coordinate).await;
        self.complete(request, result, engine);
        self.phase
    }
}
