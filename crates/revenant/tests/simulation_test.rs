//! End-to-end runs of the projectile demo.

use revenant::pool::{ExhaustionPolicy, HibernationStyle, PoolConfig, PrototypeId};
use revenant::{DemoConfig, ProjectileSpec, Simulation, SimulationReport, TurretConfig};

const BUNDLED_CONFIG: &str = include_str!("../data/demo.toml");

fn run_for(config: &DemoConfig) -> SimulationReport {
    let mut simulation = Simulation::new(config).unwrap();
    simulation.run(config.total_ticks());
    simulation.shutdown()
}

fn single_pool(capacity: usize, rate: f32, lifetime: f32) -> DemoConfig {
    let mut config = DemoConfig {
        duration_secs: 3.0,
        pools: vec![PoolConfig::new("bolt", capacity)],
        turrets: vec![TurretConfig::new("bolt", rate)],
        ..DemoConfig::default()
    };
    config.prototypes.insert(
        PrototypeId::new("bolt"),
        ProjectileSpec {
            lifetime_secs: lifetime,
            ..ProjectileSpec::default()
        },
    );
    config
}

#[test]
fn bundled_demo_shuts_down_clean() {
    let config = DemoConfig::from_toml_str(BUNDLED_CONFIG).unwrap();
    let mut simulation = Simulation::new(&config).unwrap();
    simulation.run(config.total_ticks());

    let rocket = simulation.registry().pool(&"rocket".into()).unwrap();
    assert_eq!(rocket.capacity(), 4);
    assert_eq!(rocket.config().exhaustion, ExhaustionPolicy::ReuseOldest);
    assert_eq!(rocket.config().hibernation, HibernationStyle::KeepActive);

    let report = simulation.shutdown();
    assert_eq!(report.leaked(), 0);
    assert_eq!(report.scene.created, report.scene.destroyed);

    // 30 bullets/s living 1.5s outgrow a pool of 32.
    assert!(report.registry.totals.expansions > 0);
    // 2 rockets/s living 4s overrun a pool of 4.
    assert!(report.recycled_early > 0);
    // Flares have no pool.
    assert!(report.transient_spawns > 0);
    assert_eq!(report.registry.fallback_spawns, report.transient_spawns);
    assert_eq!(report.registry.fallback_destroys, report.transient_spawns);
}

#[test]
fn every_spawn_is_accounted_for() {
    let config = DemoConfig::from_toml_str(BUNDLED_CONFIG).unwrap();
    let report = run_for(&config);

    assert_eq!(report.spawned, report.pooled_spawns + report.transient_spawns);
    assert_eq!(
        report.spawned,
        report.expired + report.recycled_early + report.in_flight_at_shutdown
    );
    assert_eq!(report.registry.totals.forced_releases, report.recycled_early);
    assert_eq!(report.registry.totals.acquisitions, report.pooled_spawns);
}

#[test]
fn roomy_pool_never_creates_beyond_capacity() {
    let config = single_pool(64, 10.0, 1.0);
    let report = run_for(&config);

    assert!(report.spawned >= 30);
    assert_eq!(report.transient_spawns, 0);
    assert_eq!(report.registry.totals.expansions, 0);
    assert_eq!(report.scene.created, 64);
    assert_eq!(report.scene.destroyed, 64);
}

#[test]
fn recycled_projectiles_start_fresh() {
    let config = single_pool(4, 10.0, 0.2);
    let mut simulation = Simulation::new(&config).unwrap();
    simulation.run(config.total_ticks());

    let registry = simulation.registry();
    let pool = registry.pool(&"bolt".into()).unwrap();
    let mut saw_reuse = false;
    for handle in pool.active_handles() {
        let bolt = registry.get(handle).unwrap();
        assert!(bolt.active);
        assert!(bolt.trail.is_emitting());
        assert!(bolt.lifetime.remaining() <= 0.2);
        saw_reuse |= bolt.lifetime.spawns() > 1;
    }
    assert!(saw_reuse);

    let report = simulation.shutdown();
    assert_eq!(report.scene.created, 4);
    assert_eq!(report.leaked(), 0);
}

#[test]
fn idle_bullets_are_deactivated() {
    let config = single_pool(8, 10.0, 0.2);
    let report = run_for(&config);

    // Built idle, then parked once per release.
    assert_eq!(
        report.scene.deactivations,
        8 + report.registry.totals.releases
    );
    assert_eq!(report.scene.activations, report.registry.totals.acquisitions);
}

#[test]
fn same_seed_same_run() {
    let config = DemoConfig::from_toml_str(BUNDLED_CONFIG).unwrap();
    assert_eq!(run_for(&config), run_for(&config));
}

#[test]
fn empty_config_runs_idle() {
    let report = run_for(&DemoConfig::default());
    assert_eq!(report.spawned, 0);
    assert_eq!(report.registry.pools, 0);
    assert_eq!(report.ticks, DemoConfig::default().total_ticks());
}
