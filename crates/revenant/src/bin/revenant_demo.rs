//! # REVENANT Demo Binary
//!
//! ```text
//! revenant_demo [CONFIG.toml]
//! ```
//!
//! Without an argument the bundled `data/demo.toml` is used. Log verbosity
//! follows `RUST_LOG` (default `info`); `RUST_LOG=revenant_core=debug`
//! shows every eviction and construction.

use std::process::ExitCode;

use revenant::{DemoConfig, DemoError, DemoResult, Simulation};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const BUNDLED_CONFIG: &str = include_str!("../../data/demo.toml");

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> DemoResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading demo config");
            DemoConfig::load(&path)?
        }
        None => DemoConfig::from_toml_str(BUNDLED_CONFIG)?,
    };

    let ticks = config.total_ticks();
    let mut simulation = Simulation::new(&config)?;
    info!(
        ticks,
        pools = simulation.registry().pool_count(),
        turrets = config.turrets.len(),
        "simulation starting"
    );

    simulation.run(ticks);
    let report = simulation.shutdown();

    let totals = report.registry.totals;
    info!(
        spawned = report.spawned,
        pooled = report.pooled_spawns,
        unpooled = report.transient_spawns,
        expired = report.expired,
        recycled_early = report.recycled_early,
        "projectiles"
    );
    info!(
        capacity = report.registry.capacity,
        acquisitions = totals.acquisitions,
        expansions = totals.expansions,
        forced_releases = totals.forced_releases,
        peak_active = totals.peak_active,
        "pools"
    );
    info!(
        created = report.scene.created,
        destroyed = report.scene.destroyed,
        "scene"
    );

    match report.leaked() {
        0 => Ok(()),
        leaked => Err(DemoError::Leak(leaked)),
    }
}
