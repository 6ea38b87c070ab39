//! # Simulation Loop
//!
//! Fixed-step loop over turrets and live projectiles. Each step:
//!
//! 1. every turret fires its due shots through the registry
//! 2. every live projectile advances; expired ones are destroyed
//!
//! A pooled projectile whose handle no longer resolves was recycled early
//! by a `ReuseOldest` pool and is dropped from the live list.

use revenant_core::{PoolRegistry, RegistryStats, Spawned};
use tracing::{debug, info, warn};

use crate::config::DemoConfig;
use crate::error::DemoResult;
use crate::projectile::Projectile;
use crate::scene::{SceneStage, SceneStats};
use crate::turret::Turret;

/// Outcome of a finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationReport {
    /// Steps executed.
    pub ticks: u64,
    /// Projectiles requested by turrets.
    pub spawned: u64,
    /// Of those, served by a pool.
    pub pooled_spawns: u64,
    /// Of those, created unpooled.
    pub transient_spawns: u64,
    /// Projectiles that ran out their lifetime.
    pub expired: u64,
    /// Projectiles reclaimed by their pool before expiring.
    pub recycled_early: u64,
    /// Projectiles still in flight at shutdown.
    pub in_flight_at_shutdown: u64,
    /// Registry totals taken just before teardown.
    pub registry: RegistryStats,
    /// Scene counters after teardown.
    pub scene: SceneStats,
}

impl SimulationReport {
    /// Scene nodes never destroyed. Zero after a clean shutdown.
    #[must_use]
    pub fn leaked(&self) -> u64 {
        self.scene.live()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    spawned: u64,
    pooled_spawns: u64,
    transient_spawns: u64,
    expired: u64,
    recycled_early: u64,
}

/// Turrets, live projectiles and the registry that recycles them.
pub struct Simulation {
    registry: PoolRegistry<SceneStage>,
    turrets: Vec<Turret>,
    live: Vec<Spawned<Projectile>>,
    dt: f32,
    log_every: u64,
    tick: u64,
    counters: Counters,
}

impl Simulation {
    /// Builds the scene, pools and turrets described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the registry cannot be built.
    pub fn new(config: &DemoConfig) -> DemoResult<Self> {
        config.validate()?;

        let mut stage = SceneStage::new();
        for (prototype, spec) in &config.prototypes {
            stage.register(prototype.clone(), *spec);
        }
        let registry = PoolRegistry::init(stage, &config.registry_config())?;

        let turrets = config
            .turrets
            .iter()
            .zip(0u64..)
            .map(|(turret, index)| Turret::new(turret.clone(), config.seed.wrapping_add(index)))
            .collect();

        debug!(
            pools = registry.pool_count(),
            turrets = config.turrets.len(),
            tick_rate_hz = config.tick_rate_hz,
            "simulation built"
        );

        Ok(Self {
            registry,
            turrets,
            live: Vec::new(),
            dt: config.step_secs(),
            log_every: u64::from(config.tick_rate_hz),
            tick: 0,
            counters: Counters::default(),
        })
    }

    /// Runs one fixed step.
    pub fn step(&mut self) {
        self.fire();
        self.advance();
        self.tick += 1;

        if self.tick % self.log_every == 0 {
            let stats = self.registry.stats();
            debug!(
                tick = self.tick,
                live = self.live.len(),
                capacity = stats.capacity,
                active = stats.active,
                "simulation progress"
            );
        }
    }

    /// Runs `ticks` fixed steps.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    fn fire(&mut self) {
        for turret in &mut self.turrets {
            for _ in 0..turret.update(self.dt) {
                let (placement, velocity) = turret.aim();
                let mut spawned = self.registry.instantiate(turret.prototype(), placement);
                match &mut spawned {
                    Spawned::Pooled(handle) => {
                        if let Some(projectile) = self.registry.get_mut(*handle) {
                            projectile.launch(velocity);
                        }
                        self.counters.pooled_spawns += 1;
                    }
                    Spawned::Transient { object: projectile, .. } => {
                        projectile.launch(velocity);
                        self.counters.transient_spawns += 1;
                    }
                }
                self.counters.spawned += 1;
                self.live.push(spawned);
            }
        }
    }

    fn advance(&mut self) {
        let dt = self.dt;
        let mut survivors = Vec::with_capacity(self.live.len());

        for mut spawned in std::mem::take(&mut self.live) {
            let expired = match &mut spawned {
                Spawned::Pooled(handle) => match self.registry.get_mut(*handle) {
                    Some(projectile) => projectile.advance(dt),
                    None => {
                        self.counters.recycled_early += 1;
                        continue;
                    }
                },
                Spawned::Transient { object: projectile, .. } => projectile.advance(dt),
            };

            if expired {
                self.counters.expired += 1;
                if let Err(err) = self.registry.destroy(spawned) {
                    warn!(%err, "failed to give back an expired projectile");
                }
            } else {
                survivors.push(spawned);
            }
        }

        self.live = survivors;
    }

    /// Steps executed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Projectiles currently tracked as in flight.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// The registry driving the pools.
    #[must_use]
    pub fn registry(&self) -> &PoolRegistry<SceneStage> {
        &self.registry
    }

    /// Returns everything in flight, disposes the pools and reports.
    #[must_use]
    pub fn shutdown(mut self) -> SimulationReport {
        let in_flight = u64::try_from(self.live.len()).unwrap_or(u64::MAX);
        for spawned in std::mem::take(&mut self.live) {
            // Stale handles were already reclaimed by their pool.
            if let Err(err) = self.registry.destroy(spawned) {
                debug!(%err, "in-flight projectile already recycled");
            }
        }

        let registry = self.registry.stats();
        let scene = self.registry.shutdown().stats();
        let counters = self.counters;

        let report = SimulationReport {
            ticks: self.tick,
            spawned: counters.spawned,
            pooled_spawns: counters.pooled_spawns,
            transient_spawns: counters.transient_spawns,
            expired: counters.expired,
            recycled_early: counters.recycled_early,
            in_flight_at_shutdown: in_flight,
            registry,
            scene,
        };
        info!(
            ticks = report.ticks,
            spawned = report.spawned,
            created = scene.created,
            destroyed = scene.destroyed,
            "simulation shut down"
        );
        report
    }
}
