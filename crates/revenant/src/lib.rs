//! # REVENANT Demo
//!
//! A small projectile simulation that exercises the recycling pools the
//! way a game would: turrets request projectiles every tick, projectiles
//! expire after their lifetime, and everything flows through a
//! [`PoolRegistry`](revenant_core::PoolRegistry).
//!
//! ## Modules
//!
//! - `scene`: in-memory [`Stage`](revenant_core::Stage) implementation
//! - `projectile`: the pooled object and its lifecycle parts
//! - `turret`: fire cadence and aiming
//! - `simulation`: the fixed-step loop
//! - `config`: TOML-loaded demo settings

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod projectile;
pub mod scene;
pub mod simulation;
pub mod turret;

/// The pooling engine this demo drives.
pub use revenant_core as pool;

pub use config::{DemoConfig, TurretConfig};
pub use error::{DemoError, DemoResult};
pub use projectile::{Body, Lifetime, Projectile, Trail};
pub use scene::{NodeId, ProjectileSpec, SceneStage, SceneStats};
pub use simulation::{Simulation, SimulationReport};
pub use turret::{Turret, MAX_BURST};
