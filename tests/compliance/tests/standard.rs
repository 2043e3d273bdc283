use compliance::quiet_engine;
use core_bench::{Sweep, SweepConfig};

// STANDARD profile extensions beyond MINIMAL
// - full geometric size range through the sweep driver, every provider

#[test]
fn full_size_range_sweep() {
    let config = SweepConfig {
        iterations: 4,
        progress_interval_ms: 5,
        ..SweepConfig::default()
    };
    let providers = core_crypto::select(&config.providers).expect("select");
    let count = providers.len();
    let sweep = Sweep::new(&config, providers);
    assert_eq!(sweep.sizes().len(), 11);

    let runs = sweep.run(&quiet_engine(&config)).expect("sweep");
    assert_eq!(runs.len(), 11 * count);
    assert!(runs.iter().all(|r| r.is_success()));
}

#[test]
fn strict_randomness_does_not_change_healthy_providers() {
    let config = SweepConfig {
        iterations: 2,
        max_message_size: 64,
        randomness_policy: core_bench::RandomnessPolicy::Strict,
        ..SweepConfig::default()
    };
    let sweep = Sweep::new(&config, core_crypto::registry());
    assert!(sweep.run(&quiet_engine(&config)).is_ok());
}
