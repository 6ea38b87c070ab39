//! # Pool Error Types
//!
//! Everything a caller can get wrong when talking to a pool.
//!
//! Running dry is not in here: exhaustion is handled by policy. A missing
//! pool for a prototype is not in here either: the registry falls back to
//! unpooled creation and logs a warning.

use thiserror::Error;

use crate::config::PrototypeId;
use crate::pool::PoolId;

/// Errors reported by pools and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool configuration failed validation.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// Two pool configurations named the same prototype.
    #[error("prototype registered twice: {0}")]
    DuplicatePrototype(PrototypeId),

    /// The handle was issued by a different pool.
    #[error("handle belongs to {handle_pool}, not {pool}")]
    ForeignHandle {
        /// The pool the handle was presented to.
        pool: PoolId,
        /// The pool that issued the handle.
        handle_pool: PoolId,
    },

    /// The handle names a slot the pool never had.
    #[error("slot {slot} out of range for {pool}")]
    InvalidSlot {
        /// The pool the handle was presented to.
        pool: PoolId,
        /// The slot index carried by the handle.
        slot: u32,
    },

    /// The instance behind the handle has been released since it was issued.
    #[error("stale handle for slot {slot} of {pool}: held generation {held}, current {current}")]
    StaleHandle {
        /// The owning pool.
        pool: PoolId,
        /// The slot index carried by the handle.
        slot: u32,
        /// Generation recorded in the handle.
        held: u64,
        /// Generation the slot is at now.
        current: u64,
    },

    /// The slot is idle; only active instances can be released.
    #[error("slot {slot} of {pool} is not active")]
    NotActive {
        /// The owning pool.
        pool: PoolId,
        /// The slot index carried by the handle.
        slot: u32,
    },

    /// The handle's owning pool is not (or no longer) part of this registry.
    #[error("no {0} in this registry")]
    UnknownPool(PoolId),

    /// A pooled instance was bound to an owner twice.
    #[error("pooled instance already initialized by {0}")]
    AlreadyInitialized(PoolId),

    /// The configuration text could not be parsed.
    #[error("failed to parse pool configuration: {0}")]
    ConfigParse(String),

    /// The configuration file could not be read.
    #[error("failed to read pool configuration: {0}")]
    Io(String),
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

impl From<toml::de::Error> for PoolError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

impl From<std::io::Error> for PoolError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
