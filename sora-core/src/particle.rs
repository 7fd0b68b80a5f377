//! Particles and the containers that own them

use std::time::Duration;

use crate::effects::{EffectKind, EffectTier};

/// One transient rain drop, cloud or sun ray.
///
/// Placement is stored as fractions of the container area so the renderer
/// can map it onto whatever size the terminal currently has.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub kind: EffectKind,
    pub tier: EffectTier,
    /// Horizontal placement in [0, 1)
    pub x: f32,
    /// Vertical placement in [0, 1)
    pub y: f32,
    /// Drop length, cloud width or ray size, in tier-specific units
    pub size: f32,
    pub born: Duration,
    pub lifetime: Duration,
}

impl Particle {
    /// Animation progress in [0, 1] at time `now`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.lifetime.is_zero() {
            return 1.0;
        }
        let age = now.saturating_sub(self.born);
        (age.as_secs_f32() / self.lifetime.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Particle region for one effect kind. Particles live here from spawn to removal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
    particles: Vec<Particle>,
}

impl Container {
    pub fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Remove a particle by id. Removing one that is already gone is a no-op.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.particles.iter().position(|p| p.id == id) {
            Some(index) => {
                self.particles.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

/// The three particle containers the effect engine draws into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surface {
    pub rain: Container,
    pub cloud: Container,
    pub sunshine: Container,
}

impl Surface {
    pub fn container(&self, kind: EffectKind) -> &Container {
        match kind {
            EffectKind::Rain => &self.rain,
            EffectKind::Cloud => &self.cloud,
            EffectKind::Sunshine => &self.sunshine,
        }
    }

    pub fn container_mut(&mut self, kind: EffectKind) -> &mut Container {
        match kind {
            EffectKind::Rain => &mut self.rain,
            EffectKind::Cloud => &mut self.cloud,
            EffectKind::Sunshine => &mut self.sunshine,
        }
    }

    pub fn total(&self) -> usize {
        self.rain.len() + self.cloud.len() + self.sunshine.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RainIntensity;

    fn drop_at(id: u64, born_ms: u64, lifetime_ms: u64) -> Particle {
        Particle {
            id,
            kind: EffectKind::Rain,
            tier: EffectTier::Rain(RainIntensity::Medium),
            x: 0.5,
            y: 0.0,
            size: 20.0,
            born: Duration::from_millis(born_ms),
            lifetime: Duration::from_millis(lifetime_ms),
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let p = drop_at(1, 100, 1000);
        assert_eq!(p.progress(Duration::from_millis(0)), 0.0);
        assert!((p.progress(Duration::from_millis(600)) - 0.5).abs() < 1e-6);
        assert_eq!(p.progress(Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut container = Container::default();
        container.insert(drop_at(1, 0, 100));
        container.insert(drop_at(2, 0, 100));

        assert!(container.remove(1));
        assert!(!container.remove(1));
        assert_eq!(container.len(), 1);

        container.clear();
        assert!(!container.remove(2));
        assert!(container.is_empty());
    }

    #[test]
    fn test_surface_routes_by_kind() {
        let mut surface = Surface::default();
        surface
            .container_mut(EffectKind::Rain)
            .insert(drop_at(1, 0, 100));

        assert_eq!(surface.container(EffectKind::Rain).len(), 1);
        assert!(surface.container(EffectKind::Cloud).is_empty());
        assert_eq!(surface.total(), 1);
    }
}
