//! Turrets: fire cadence plus seeded aim jitter.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use revenant_core::{Placement, PrototypeId, Quat, Vec3};

use crate::config::TurretConfig;

/// Most shots a single [`Turret::update`] hands out. Any backlog beyond
/// this is dropped.
pub const MAX_BURST: u32 = 256;

/// A firing position with its own cooldown and RNG stream.
#[derive(Debug, Clone)]
pub struct Turret {
    config: TurretConfig,
    /// Seconds until the next shot; kept in f64 so tiny intervals still
    /// move it.
    cooldown: f64,
    rng: ChaCha8Rng,
    shots_fired: u64,
}

impl Turret {
    /// Builds a turret. The same `seed` always yields the same volley.
    #[must_use]
    pub fn new(config: TurretConfig, seed: u64) -> Self {
        Self {
            config,
            cooldown: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            shots_fired: 0,
        }
    }

    /// Prototype this turret fires.
    #[must_use]
    pub fn prototype(&self) -> &PrototypeId {
        &self.config.prototype
    }

    /// Total shots handed out by [`Turret::update`].
    #[must_use]
    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }

    /// Advances the cooldown by `dt` and returns how many shots are due,
    /// at most [`MAX_BURST`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn update(&mut self, dt: f32) -> u32 {
        let interval = 1.0 / f64::from(self.config.rounds_per_second);
        self.cooldown -= f64::from(dt);
        if self.cooldown > 0.0 {
            return 0;
        }

        let due = (-self.cooldown / interval).floor() + 1.0;
        let shots = due.min(f64::from(MAX_BURST)) as u32;
        self.cooldown += f64::from(shots) * interval;
        if self.cooldown <= 0.0 {
            self.cooldown = interval;
        }
        self.shots_fired += u64::from(shots);
        shots
    }

    /// Muzzle placement and launch velocity for the next shot.
    pub fn aim(&mut self) -> (Placement, Vec3) {
        let spread = self.config.spread_degrees.abs();
        let jitter = if spread > 0.0 {
            self.rng.gen_range(-spread..=spread)
        } else {
            0.0
        };
        let rotation = Quat::from_yaw((self.config.heading_degrees + jitter).to_radians());
        let velocity = rotation.forward() * self.config.muzzle_speed;
        let placement = Placement::at(self.config.position).with_rotation(rotation);
        (placement, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_matches_rate() {
        let mut turret = Turret::new(TurretConfig::new("bullet", 10.0), 1);
        let total: u32 = (0..60).map(|_| turret.update(1.0 / 60.0)).sum();
        // First shot fires immediately, then one per 0.1s.
        assert!((10..=11).contains(&total), "fired {total}");
        assert_eq!(turret.shots_fired(), u64::from(total));
    }

    #[test]
    fn test_large_step_fires_backlog() {
        let mut turret = Turret::new(TurretConfig::new("bullet", 4.0), 1);
        // The opening shot plus one per elapsed interval.
        assert_eq!(turret.update(1.0), 5);
        assert_eq!(turret.update(0.25), 1);
    }

    #[test]
    fn test_extreme_rate_is_capped() {
        let mut turret = Turret::new(TurretConfig::new("bolt", 1.0e10), 1);
        assert_eq!(turret.update(1.0 / 60.0), MAX_BURST);
        assert_eq!(turret.update(1.0 / 60.0), MAX_BURST);
        assert_eq!(turret.shots_fired(), 2 * u64::from(MAX_BURST));
    }

    #[test]
    fn test_aim_is_deterministic_per_seed() {
        let config = TurretConfig::new("bullet", 1.0).with_spread(10.0);
        let mut a = Turret::new(config.clone(), 99);
        let mut b = Turret::new(config, 99);
        for _ in 0..8 {
            assert_eq!(a.aim(), b.aim());
        }
    }

    #[test]
    fn test_no_spread_fires_straight() {
        let mut turret = Turret::new(TurretConfig::new("bullet", 1.0), 3);
        let (placement, velocity) = turret.aim();
        assert_eq!(placement.rotation, Quat::IDENTITY);
        assert!((velocity.z - 50.0).abs() < 1e-4);
        assert!(velocity.x.abs() < 1e-4);
    }
}
