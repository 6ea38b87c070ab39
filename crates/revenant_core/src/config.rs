//! # Pool Configuration
//!
//! One [`PoolConfig`] per prototype, collected into a [`RegistryConfig`] and
//! loaded once at startup, usually from TOML:
//!
//! ```toml
//! [[pools]]
//! prototype = "bullet"
//! default_size = 64
//! dry_behavior = "ReuseOldest"
//! hibernation_style = "Inactive"
//! safe_placement = { x = 0.0, y = -10000.0, z = 0.0 }
//! ```
//!
//! Configurations are immutable once a pool is built from them.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};
use crate::math::Vec3;

/// Initial capacity used when a config omits it.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Off-stage parking spot used when a config omits it.
pub const DEFAULT_SAFE_PLACEMENT: Vec3 = Vec3::new(0.0, -10_000.0, 0.0);

/// Stable key identifying a prototype, and therefore a pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrototypeId(String);

impl PrototypeId {
    /// Creates a prototype key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrototypeId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PrototypeId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// What a pool does when asked for an instance while none are idle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    /// Create one more instance; capacity grows permanently.
    #[default]
    Expand,
    /// Force-release the instance that has been active the longest and hand
    /// it out again. Capacity never changes.
    ReuseOldest,
}

/// How idle instances are kept while parked in the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HibernationStyle {
    /// Idle instances are deactivated and reactivated on acquire.
    #[default]
    #[serde(alias = "Inactive")]
    Deactivate,
    /// Idle instances stay active; they are only moved off-stage.
    #[serde(alias = "Active")]
    KeepActive,
}

/// Configuration of a single-prototype pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The prototype this pool serves.
    pub prototype: PrototypeId,
    /// Instances created eagerly at construction (at least 1).
    #[serde(alias = "default_size", default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Behaviour when the pool runs dry.
    #[serde(alias = "dry_behavior", default)]
    pub exhaustion: ExhaustionPolicy,
    /// How idle instances are parked.
    #[serde(alias = "hibernation_style", default)]
    pub hibernation: HibernationStyle,
    /// Off-stage position idle instances are moved to.
    #[serde(alias = "safe_placement_coordinate", default = "default_safe_placement")]
    pub safe_placement: Vec3,
}

fn default_initial_capacity() -> usize {
    DEFAULT_INITIAL_CAPACITY
}

fn default_safe_placement() -> Vec3 {
    DEFAULT_SAFE_PLACEMENT
}

impl PoolConfig {
    /// Creates a config with the default policy (`Expand`), hibernation
    /// style (`Deactivate`) and safe placement.
    #[must_use]
    pub fn new(prototype: impl Into<PrototypeId>, initial_capacity: usize) -> Self {
        Self {
            prototype: prototype.into(),
            initial_capacity,
            exhaustion: ExhaustionPolicy::default(),
            hibernation: HibernationStyle::default(),
            safe_placement: DEFAULT_SAFE_PLACEMENT,
        }
    }

    /// Sets the exhaustion policy.
    #[must_use]
    pub fn with_exhaustion(mut self, exhaustion: ExhaustionPolicy) -> Self {
        self.exhaustion = exhaustion;
        self
    }

    /// Sets the hibernation style.
    #[must_use]
    pub fn with_hibernation(mut self, hibernation: HibernationStyle) -> Self {
        self.hibernation = hibernation;
        self
    }

    /// Sets the off-stage parking position.
    #[must_use]
    pub fn with_safe_placement(mut self, safe_placement: Vec3) -> Self {
        self.safe_placement = safe_placement;
        self
    }

    /// Checks the config can back a pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] for an empty prototype key, a zero
    /// initial capacity or a non-finite safe placement.
    pub fn validate(&self) -> PoolResult<()> {
        if self.prototype.as_str().is_empty() {
            return Err(PoolError::InvalidConfig(
                "prototype key must not be empty".to_string(),
            ));
        }
        if self.initial_capacity == 0 {
            return Err(PoolError::InvalidConfig(format!(
                "pool for '{}' must start with at least one instance",
                self.prototype
            )));
        }
        if !self.safe_placement.is_finite() {
            return Err(PoolError::InvalidConfig(format!(
                "safe placement for '{}' is not finite",
                self.prototype
            )));
        }
        Ok(())
    }
}

/// The full set of pools a registry is built from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// One entry per pooled prototype.
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
}

impl RegistryConfig {
    /// Creates an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pool.
    #[must_use]
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pools.push(pool);
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ConfigParse`] for malformed TOML, or any error
    /// from [`RegistryConfig::validate`].
    pub fn from_toml_str(text: &str) -> PoolResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Io`] if the file cannot be read, otherwise as
    /// [`RegistryConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> PoolResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validates every pool and rejects prototypes configured twice.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, or
    /// [`PoolError::DuplicatePrototype`].
    pub fn validate(&self) -> PoolResult<()> {
        let mut seen = HashSet::with_capacity(self.pools.len());
        for pool in &self.pools {
            pool.validate()?;
            if !seen.insert(&pool.prototype) {
                return Err(PoolError::DuplicatePrototype(pool.prototype.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_external_spellings() {
        let config = RegistryConfig::from_toml_str(
            r#"
            [[pools]]
            prototype = "bullet"
            default_size = 5
            dry_behavior = "ReuseOldest"
            hibernation_style = "Active"
            safe_placement_coordinate = { x = 1.0, y = -50.0, z = 2.0 }

            [[pools]]
            prototype = "spark"
            "#,
        )
        .unwrap();

        assert_eq!(config.pools.len(), 2);
        let bullet = &config.pools[0];
        assert_eq!(bullet.initial_capacity, 5);
        assert_eq!(bullet.exhaustion, ExhaustionPolicy::ReuseOldest);
        assert_eq!(bullet.hibernation, HibernationStyle::KeepActive);
        assert_eq!(bullet.safe_placement, Vec3::new(1.0, -50.0, 2.0));

        let spark = &config.pools[1];
        assert_eq!(spark.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(spark.exhaustion, ExhaustionPolicy::Expand);
        assert_eq!(spark.hibernation, HibernationStyle::Deactivate);
        assert_eq!(spark.safe_placement, DEFAULT_SAFE_PLACEMENT);
    }

    #[test]
    fn test_inactive_alias() {
        let config = RegistryConfig::from_toml_str(
            "[[pools]]\nprototype = \"orb\"\nhibernation = \"Inactive\"\n",
        )
        .unwrap();
        assert_eq!(config.pools[0].hibernation, HibernationStyle::Deactivate);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PoolConfig::new("bullet", 0).validate().unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_duplicate_prototype_rejected() {
        let config = RegistryConfig::new()
            .with_pool(PoolConfig::new("bullet", 4))
            .with_pool(PoolConfig::new("bullet", 8));
        assert_eq!(
            config.validate(),
            Err(PoolError::DuplicatePrototype(PrototypeId::new("bullet")))
        );
    }

    #[test]
    fn test_non_finite_safe_placement_rejected() {
        let config =
            PoolConfig::new("bullet", 1).with_safe_placement(Vec3::new(f32::INFINITY, 0.0, 0.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = RegistryConfig::from_toml_str("[[pools]]\nprototype = 3\n").unwrap_err();
        assert!(matches!(err, PoolError::ConfigParse(_)));
    }
}
