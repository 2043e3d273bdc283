use anyhow::{Context, Result};
use core_bench::{Engine, Sweep, SweepConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("benchmark aborted: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Config via env: CIPHER_BENCH_CONFIG=bench.toml, CIPHER_BENCH_ITERATIONS,
    // CIPHER_BENCH_PROVIDERS, ...
    let config = SweepConfig::from_env().context("load sweep configuration")?;
    let providers = core_crypto::select(&config.providers).context("select providers")?;
    let sweep = Sweep::new(&config, providers);
    info!(
        providers = ?sweep.providers().collect::<Vec<_>>(),
        sizes = ?sweep.sizes(),
        iterations = config.iterations,
        "cipher-bench starting"
    );

    let engine = Engine::new(&config);
    let runs = sweep.run(&engine)?;
    info!(runs = runs.len(), "all benchmarks completed and validated");
    Ok(())
}
