//! Rain, cloud and sunshine particle generators
//!
//! The engine owns one [`EffectState`] per kind, the particle [`Surface`],
//! and a [`Scheduler`] that drives everything:
//!
//! - `start(tier)` arms a repeating spawn tick. Each tick schedules a burst of
//!   particles staggered a few milliseconds apart.
//! - Every particle schedules its own expiry when it spawns.
//! - `stop(kind)` cancels the tick and any staggered spawns of the current
//!   burst, then schedules a bulk clear after the kind's grace delay.
//!
//! The engine only keeps each kind idempotent. Keeping a single effect on
//! screen is the caller's job: call [`EffectEngine::stop_all`] first, or use
//! [`EffectEngine::apply`] which does exactly that.

use std::ops::RangeInclusive;
use std::time::Duration;

use bitflags::bitflags;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::classify::{
    cloud_density, cloud_speed, rain_intensity, sun_intensity, CloudDensity, CloudSpeed,
    RainIntensity, SunIntensity,
};
use crate::observation::WeatherObservation;
use crate::particle::{Container, Particle, Surface};
use crate::scheduler::{Scheduler, TimerHandle};

bitflags! {
    /// Set of effects with a live spawn tick.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActiveEffects: u8 {
        const RAIN = 1 << 0;
        const CLOUD = 1 << 1;
        const SUNSHINE = 1 << 2;
    }
}

/// The three mutually exclusive effect categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Rain,
    Cloud,
    Sunshine,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Rain, EffectKind::Cloud, EffectKind::Sunshine];

    /// Map a condition to its effect: case-insensitive substring match.
    pub fn for_condition(condition: &str) -> Option<Self> {
        let condition = condition.to_lowercase();
        if condition.contains("rain") || condition.contains("drizzle") {
            Some(EffectKind::Rain)
        } else if condition.contains("cloud") {
            Some(EffectKind::Cloud)
        } else if condition.contains("clear") || condition.contains("sun") {
            Some(EffectKind::Sunshine)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Rain => "rain",
            EffectKind::Cloud => "cloud",
            EffectKind::Sunshine => "sunshine",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "rain" => Some(EffectKind::Rain),
            "cloud" | "clouds" => Some(EffectKind::Cloud),
            "sun" | "sunshine" => Some(EffectKind::Sunshine),
            _ => None,
        }
    }

    /// Delay between stopping the spawn tick and clearing the container
    pub fn grace_delay(self) -> Duration {
        match self {
            EffectKind::Rain => Duration::from_secs(2),
            EffectKind::Cloud => Duration::from_secs(5),
            EffectKind::Sunshine => Duration::from_secs(3),
        }
    }

    /// Gap between consecutive particles of one burst
    pub fn stagger(self) -> Duration {
        match self {
            EffectKind::Rain => Duration::from_millis(50),
            EffectKind::Cloud => Duration::from_millis(300),
            EffectKind::Sunshine => Duration::from_millis(100),
        }
    }

    pub fn flag(self) -> ActiveEffects {
        match self {
            EffectKind::Rain => ActiveEffects::RAIN,
            EffectKind::Cloud => ActiveEffects::CLOUD,
            EffectKind::Sunshine => ActiveEffects::SUNSHINE,
        }
    }
}

/// Tier parameters an effect is started with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectTier {
    Rain(RainIntensity),
    Cloud {
        density: CloudDensity,
        speed: CloudSpeed,
    },
    Sunshine(SunIntensity),
}

/// Spawn rate and particle lifetime for one tier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnPlan {
    pub burst: u32,
    pub interval: Duration,
    /// Per-particle lifetime range in milliseconds
    pub lifetime_ms: RangeInclusive<u64>,
}

impl EffectTier {
    pub fn kind(self) -> EffectKind {
        match self {
            EffectTier::Rain(_) => EffectKind::Rain,
            EffectTier::Cloud { .. } => EffectKind::Cloud,
            EffectTier::Sunshine(_) => EffectKind::Sunshine,
        }
    }

    /// Classify an observation into the single tier it drives, if any.
    pub fn for_observation(observation: &WeatherObservation) -> Option<Self> {
        let tier = match observation.effect_kind()? {
            EffectKind::Rain => EffectTier::Rain(rain_intensity(
                observation.humidity_percent,
                observation.wind_speed_mps,
            )),
            EffectKind::Cloud => EffectTier::Cloud {
                density: cloud_density(observation.humidity_percent),
                speed: cloud_speed(observation.wind_speed_mps),
            },
            EffectKind::Sunshine => {
                EffectTier::Sunshine(sun_intensity(observation.temperature_celsius))
            }
        };
        Some(tier)
    }

    /// Middle tier for a kind
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Rain => EffectTier::Rain(RainIntensity::Medium),
            EffectKind::Cloud => EffectTier::Cloud {
                density: CloudDensity::Medium,
                speed: CloudSpeed::Medium,
            },
            EffectKind::Sunshine => EffectTier::Sunshine(SunIntensity::Medium),
        }
    }

    /// Parse `kind[:tier[:speed]]`, e.g. `rain:heavy` or `cloud:dense:fast`.
    ///
    /// Unknown tier names fall back to medium. Returns `None` for an unknown kind.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split(':');
        let kind = EffectKind::from_name(parts.next()?)?;
        let first = parts.next().unwrap_or_default();
        let second = parts.next().unwrap_or_default();

        let tier = match kind {
            EffectKind::Rain => EffectTier::Rain(RainIntensity::from_name(first)),
            EffectKind::Cloud => EffectTier::Cloud {
                density: CloudDensity::from_name(first),
                speed: CloudSpeed::from_name(second),
            },
            EffectKind::Sunshine => EffectTier::Sunshine(SunIntensity::from_name(first)),
        };
        Some(tier)
    }

    /// Burst count, tick interval and particle lifetime for this tier
    pub fn spawn_plan(self) -> SpawnPlan {
        match self {
            EffectTier::Rain(intensity) => match intensity {
                RainIntensity::Light => SpawnPlan {
                    burst: 2,
                    interval: Duration::from_millis(200),
                    lifetime_ms: 1000..=1500,
                },
                RainIntensity::Medium => SpawnPlan {
                    burst: 3,
                    interval: Duration::from_millis(150),
                    lifetime_ms: 800..=1300,
                },
                RainIntensity::Heavy => SpawnPlan {
                    burst: 5,
                    interval: Duration::from_millis(80),
                    lifetime_ms: 500..=900,
                },
            },
            EffectTier::Cloud { density, speed } => {
                let (burst, interval_ms) = match density {
                    CloudDensity::Light => (1, 4000),
                    CloudDensity::Medium => (2, 3000),
                    CloudDensity::Dense => (3, 2000),
                };
                let lifetime_ms = match speed {
                    CloudSpeed::Slow => 20_000..=30_000,
                    CloudSpeed::Medium => 12_000..=18_000,
                    CloudSpeed::Fast => 6_000..=10_000,
                };
                SpawnPlan {
                    burst,
                    interval: Duration::from_millis(interval_ms),
                    lifetime_ms,
                }
            }
            EffectTier::Sunshine(intensity) => match intensity {
                SunIntensity::Gentle => SpawnPlan {
                    burst: 1,
                    interval: Duration::from_millis(1200),
                    lifetime_ms: 2500..=3500,
                },
                SunIntensity::Medium => SpawnPlan {
                    burst: 2,
                    interval: Duration::from_millis(800),
                    lifetime_ms: 2000..=3000,
                },
                SunIntensity::Strong => SpawnPlan {
                    burst: 3,
                    interval: Duration::from_millis(500),
                    lifetime_ms: 1500..=2500,
                },
            },
        }
    }

    /// Short label like `rain (heavy)` or `cloud (dense, fast)`
    pub fn label(self) -> String {
        match self {
            EffectTier::Rain(intensity) => format!("rain ({intensity})"),
            EffectTier::Cloud { density, speed } => format!("cloud ({density}, {speed})"),
            EffectTier::Sunshine(intensity) => format!("sunshine ({intensity})"),
        }
    }
}

/// Lifecycle bookkeeping for one effect kind
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectState {
    active: bool,
    tier: Option<EffectTier>,
    spawn_timer: Option<TimerHandle>,
    /// Staggered spawns of the current burst that have not fired yet
    pending_spawns: Vec<TimerHandle>,
    pending_clear: Option<TimerHandle>,
}

impl EffectState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tier the effect was started with, `None` while inactive
    pub fn tier(&self) -> Option<EffectTier> {
        self.tier
    }

    pub fn spawn_timer(&self) -> Option<TimerHandle> {
        self.spawn_timer
    }

    pub fn is_clear_pending(&self) -> bool {
        self.pending_clear.is_some()
    }
}

#[derive(Clone, Debug)]
enum EffectTimer {
    Tick(EffectKind),
    Spawn(EffectTier),
    Expire { kind: EffectKind, id: u64 },
    Clear(EffectKind),
}

/// Owns the three effect generators and their particles
#[derive(Clone, Debug)]
pub struct EffectEngine {
    timers: Scheduler<EffectTimer>,
    rain: EffectState,
    cloud: EffectState,
    sunshine: EffectState,
    surface: Surface,
    rng: ChaCha8Rng,
    next_particle: u64,
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl EffectEngine {
    /// Create an engine with all effects inactive. `seed` fixes particle placement.
    pub fn new(seed: u64) -> Self {
        Self {
            timers: Scheduler::new(),
            rain: EffectState::default(),
            cloud: EffectState::default(),
            sunshine: EffectState::default(),
            surface: Surface::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_particle: 0,
        }
    }

    /// Current engine time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn state(&self, kind: EffectKind) -> &EffectState {
        match kind {
            EffectKind::Rain => &self.rain,
            EffectKind::Cloud => &self.cloud,
            EffectKind::Sunshine => &self.sunshine,
        }
    }

    fn state_mut(&mut self, kind: EffectKind) -> &mut EffectState {
        match kind {
            EffectKind::Rain => &mut self.rain,
            EffectKind::Cloud => &mut self.cloud,
            EffectKind::Sunshine => &mut self.sunshine,
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.state(kind).active
    }

    pub fn active(&self) -> ActiveEffects {
        EffectKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .fold(ActiveEffects::empty(), |set, kind| set | kind.flag())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn container(&self, kind: EffectKind) -> &Container {
        self.surface.container(kind)
    }

    /// Total particles spawned since the engine was created
    pub fn spawned_total(&self) -> u64 {
        self.next_particle
    }

    /// Number of timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Start an effect. No-op if that kind is already running.
    ///
    /// Returns `true` if the effect was started.
    pub fn start(&mut self, tier: EffectTier) -> bool {
        let kind = tier.kind();
        if self.state(kind).active {
            debug!(effect = kind.name(), "effect already active");
            return false;
        }

        let plan = tier.spawn_plan();
        if let Some(clear) = self.state_mut(kind).pending_clear.take() {
            self.timers.cancel(clear);
        }
        let tick = self.timers.schedule_repeating(plan.interval, EffectTimer::Tick(kind));

        let state = self.state_mut(kind);
        state.active = true;
        state.tier = Some(tier);
        state.spawn_timer = Some(tick);

        debug!(
            effect = kind.name(),
            tier = %tier.label(),
            burst = plan.burst,
            interval_ms = plan.interval.as_millis() as u64,
            "effect started"
        );
        true
    }

    pub fn start_rain(&mut self, intensity: RainIntensity) -> bool {
        self.start(EffectTier::Rain(intensity))
    }

    pub fn start_cloud(&mut self, density: CloudDensity, speed: CloudSpeed) -> bool {
        self.start(EffectTier::Cloud { density, speed })
    }

    pub fn start_sunshine(&mut self, intensity: SunIntensity) -> bool {
        self.start(EffectTier::Sunshine(intensity))
    }

    /// Stop an effect. No-op if it is not running.
    ///
    /// No particle spawns after this call. Particles already on screen stay
    /// until they expire or the grace-delayed clear empties the container.
    pub fn stop(&mut self, kind: EffectKind) -> bool {
        if !self.state(kind).active {
            return false;
        }

        let state = self.state_mut(kind);
        state.active = false;
        state.tier = None;
        let tick = state.spawn_timer.take();
        let pending: Vec<TimerHandle> = state.pending_spawns.drain(..).collect();

        for handle in tick.into_iter().chain(pending) {
            self.timers.cancel(handle);
        }
        let clear = self
            .timers
            .schedule_once(kind.grace_delay(), EffectTimer::Clear(kind));
        self.state_mut(kind).pending_clear = Some(clear);

        debug!(effect = kind.name(), "effect stopped");
        true
    }

    /// Stop all three effects.
    pub fn stop_all(&mut self) {
        for kind in EffectKind::ALL {
            self.stop(kind);
        }
    }

    /// Stop everything, then start the one effect the observation drives.
    pub fn apply(&mut self, observation: &WeatherObservation) -> Option<EffectTier> {
        self.stop_all();
        let tier = EffectTier::for_observation(observation)?;
        self.start(tier);
        Some(tier)
    }

    /// Move engine time forward, firing every timer that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timers.now() + elapsed;
        while let Some((handle, timer)) = self.timers.next_due(until) {
            self.fire(handle, timer);
        }
        self.timers.settle(until);
    }

    fn fire(&mut self, handle: TimerHandle, timer: EffectTimer) {
        match timer {
            EffectTimer::Tick(kind) => self.spawn_burst(kind),
            EffectTimer::Spawn(tier) => {
                self.state_mut(tier.kind())
                    .pending_spawns
                    .retain(|pending| *pending != handle);
                self.spawn_one(tier);
            }
            EffectTimer::Expire { kind, id } => {
                self.surface.container_mut(kind).remove(id);
            }
            EffectTimer::Clear(kind) => {
                self.state_mut(kind).pending_clear = None;
                self.surface.container_mut(kind).clear();
                debug!(effect = kind.name(), "container cleared");
            }
        }
    }

    fn spawn_burst(&mut self, kind: EffectKind) {
        let Some(tier) = self.state(kind).tier else {
            return;
        };
        let plan = tier.spawn_plan();
        let handles: Vec<TimerHandle> = (0..plan.burst)
            .map(|i| {
                self.timers
                    .schedule_once(kind.stagger() * i, EffectTimer::Spawn(tier))
            })
            .collect();
        self.state_mut(kind).pending_spawns.extend(handles);
    }

    fn spawn_one(&mut self, tier: EffectTier) {
        let kind = tier.kind();
        let plan = tier.spawn_plan();
        let lifetime = Duration::from_millis(self.rng.gen_range(plan.lifetime_ms));

        let (x, y, size): (f32, f32, f32) = match tier {
            EffectTier::Rain(_) => (
                self.rng.gen_range(0.0..1.0),
                0.0,
                self.rng.gen_range(15.0..35.0),
            ),
            EffectTier::Cloud { density, .. } => {
                let width = match density {
                    CloudDensity::Light => 6.0..10.0,
                    CloudDensity::Medium => 8.0..14.0,
                    CloudDensity::Dense => 12.0..20.0,
                };
                (0.0, self.rng.gen_range(0.0..1.0), self.rng.gen_range(width))
            }
            EffectTier::Sunshine(intensity) => {
                let base = match intensity {
                    SunIntensity::Gentle => 1.0,
                    SunIntensity::Medium => 2.0,
                    SunIntensity::Strong => 3.0,
                };
                (
                    self.rng.gen_range(0.0..1.0),
                    self.rng.gen_range(0.0..1.0),
                    self.rng.gen_range(base..base + 1.0),
                )
            }
        };

        let id = self.next_particle;
        self.next_particle += 1;
        self.surface.container_mut(kind).insert(Particle {
            id,
            kind,
            tier,
            x,
            y,
            size,
            born: self.timers.now(),
            lifetime,
        });
        self.timers
            .schedule_once(lifetime, EffectTimer::Expire { kind, id });
    }
}
