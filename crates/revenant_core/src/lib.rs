//! # REVENANT Core
//!
//! Prototype-keyed object recycling for simulation and game loops that
//! spawn many short-lived actors (projectiles, sparks, pickups).
//!
//! Instances are created once, parked off-stage while idle, and handed out
//! again on the next spawn request instead of being destroyed and rebuilt.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ PoolRegistry<S: Stage>                                           │
//! │   PrototypeId ──> PoolId ──> ObjectPool<S::Object>               │
//! │                                 ├─ available: LIFO stack          │
//! │                                 ├─ active: acquisition order      │
//! │                                 └─ slots: PooledInstance<T>       │
//! │                                              └─ Poolable parts    │
//! │   unregistered prototype ──> Stage::create / Stage::destroy       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **Single owner** - a registry and its pools are driven from one
//!    logical thread (one update pass); there is no internal locking.
//! 2. **Exhaustion is policy, not failure** - a dry pool either expands or
//!    recycles its oldest active instance.
//! 3. **Handles go stale** - every release bumps the slot generation, so a
//!    handle kept past its release no longer resolves. Handles issued by
//!    another registry never resolve either.
//!
//! ## Example
//!
//! ```rust,ignore
//! use revenant_core::{PoolConfig, PoolRegistry, RegistryConfig, Placement, Vec3};
//!
//! let config = RegistryConfig::new().with_pool(PoolConfig::new("bullet", 64));
//! let mut registry = PoolRegistry::init(stage, &config)?;
//!
//! let bullet = registry.instantiate(&"bullet".into(), Placement::at(Vec3::new(0.0, 1.0, 0.0)));
//! // ... simulate ...
//! registry.destroy(bullet)?;
//! registry.dispose();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod math;
pub mod pool;
pub mod registry;
pub mod stage;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{
    ExhaustionPolicy, HibernationStyle, PoolConfig, PrototypeId, RegistryConfig,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_SAFE_PLACEMENT,
};
pub use error::{PoolError, PoolResult};
pub use math::{ParentId, Placement, Quat, Vec3};
pub use pool::{
    Composite, InstanceHandle, ObjectPool, PoolDisposal, PoolId, PoolStats, Poolable,
    PooledInstance, STANDALONE_REGISTRY,
};
pub use registry::{PoolRegistry, RegistryStats, Spawned};
pub use stage::Stage;
