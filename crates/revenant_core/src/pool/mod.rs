//! # Object Pools
//!
//! The per-prototype recycling machinery.
//!
//! ## Design Philosophy
//!
//! - Instances are created up front and reused, never destroyed mid-run
//! - Idle instances sit on a LIFO stack: the most recently released is reused first
//! - Active instances are kept in acquisition order so the oldest can be reclaimed
//! - Callers hold generation-checked handles, never references into the pool

mod handle;
mod instance;
mod object_pool;
mod poolable;

pub use handle::{InstanceHandle, PoolId, STANDALONE_REGISTRY};
pub(crate) use handle::next_registry_tag;
pub use instance::PooledInstance;
pub use object_pool::{ObjectPool, PoolDisposal, PoolStats};
pub use poolable::{Composite, Poolable};
