//! # Demo Configuration
//!
//! One TOML file describes the whole run: timing, the prototype catalog,
//! the pools and the turrets.
//!
//! ```toml
//! tick_rate_hz = 60
//! duration_secs = 10.0
//! seed = 7
//!
//! [prototypes.bullet]
//! lifetime_secs = 1.5
//!
//! [[pools]]
//! prototype = "bullet"
//! default_size = 32
//!
//! [[turrets]]
//! prototype = "bullet"
//! rounds_per_second = 20.0
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use revenant_core::{PoolConfig, PrototypeId, RegistryConfig, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, DemoResult};
use crate::scene::ProjectileSpec;

fn default_tick_rate() -> u32 {
    60
}

fn default_duration() -> f32 {
    5.0
}

fn default_seed() -> u64 {
    42
}

fn default_muzzle_speed() -> f32 {
    50.0
}

/// One firing position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretConfig {
    /// What it fires.
    pub prototype: PrototypeId,
    /// Muzzle position.
    #[serde(default)]
    pub position: Vec3,
    /// Heading in degrees around the vertical axis.
    #[serde(default)]
    pub heading_degrees: f32,
    /// Shots per second.
    pub rounds_per_second: f32,
    /// Launch speed in units per second.
    #[serde(default = "default_muzzle_speed")]
    pub muzzle_speed: f32,
    /// Maximum random deviation from the heading, in degrees.
    #[serde(default)]
    pub spread_degrees: f32,
}

impl TurretConfig {
    /// A turret firing `prototype` at `rounds_per_second` from the origin.
    #[must_use]
    pub fn new(prototype: impl Into<PrototypeId>, rounds_per_second: f32) -> Self {
        Self {
            prototype: prototype.into(),
            position: Vec3::ZERO,
            heading_degrees: 0.0,
            rounds_per_second,
            muzzle_speed: default_muzzle_speed(),
            spread_degrees: 0.0,
        }
    }

    /// Sets the random spread.
    #[must_use]
    pub fn with_spread(mut self, spread_degrees: f32) -> Self {
        self.spread_degrees = spread_degrees;
        self
    }
}

/// Settings for a demo run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Fixed simulation steps per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
    /// Simulated seconds to run.
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Base seed for turret jitter.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Projectile catalog keyed by prototype.
    #[serde(default)]
    pub prototypes: BTreeMap<PrototypeId, ProjectileSpec>,
    /// Pools to build. Prototypes without one spawn unpooled.
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
    /// Firing positions.
    #[serde(default)]
    pub turrets: Vec<TurretConfig>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            duration_secs: default_duration(),
            seed: default_seed(),
            prototypes: BTreeMap::new(),
            pools: Vec::new(),
            turrets: Vec::new(),
        }
    }
}

impl DemoConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Parse`] for malformed TOML and
    /// [`DemoError::InvalidConfig`] or [`DemoError::Pool`] for bad values.
    pub fn from_toml_str(text: &str) -> DemoResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// As [`DemoConfig::from_toml_str`], plus [`DemoError::Io`].
    pub fn load(path: impl AsRef<Path>) -> DemoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks timing, turrets and pools.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> DemoResult<()> {
        if self.tick_rate_hz == 0 {
            return Err(DemoError::InvalidConfig("tick_rate_hz must be positive".into()));
        }
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(DemoError::InvalidConfig(format!(
                "duration_secs must be a non-negative number, got {}",
                self.duration_secs
            )));
        }
        for turret in &self.turrets {
            if !(turret.rounds_per_second.is_finite() && turret.rounds_per_second > 0.0) {
                return Err(DemoError::InvalidConfig(format!(
                    "turret for '{}' needs a positive rounds_per_second",
                    turret.prototype
                )));
            }
        }
        for (prototype, spec) in &self.prototypes {
            if !(spec.lifetime_secs.is_finite() && spec.lifetime_secs > 0.0) {
                return Err(DemoError::InvalidConfig(format!(
                    "prototype '{prototype}' needs a positive lifetime_secs"
                )));
            }
        }
        self.registry_config().validate()?;
        Ok(())
    }

    /// Pool settings for the registry.
    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            pools: self.pools.clone(),
        }
    }

    /// Seconds per simulation step.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step_secs(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Steps needed to cover `duration_secs`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs * self.tick_rate_hz as f32).ceil() as u64
    }
}
