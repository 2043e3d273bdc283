//! Outer loop over message sizes and providers.

use crate::config::SweepConfig;
use crate::engine::{Engine, ProviderRun};
use crate::error::{BenchError, Result};
use crate::provider::Provider;
use tracing::{error, info};

pub struct Sweep {
    sizes: Vec<usize>,
    iterations: u64,
    providers: Vec<Box<dyn Provider>>,
}

impl Sweep {
    pub fn new(config: &SweepConfig, providers: Vec<Box<dyn Provider>>) -> Self {
        Self {
            sizes: config.message_sizes(),
            iterations: config.iterations,
            providers,
        }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name())
    }

    /// Run every (size, provider) pair in order, stopping at the first pair
    /// that is not fully successful.
    pub fn run(&self, engine: &Engine) -> Result<Vec<ProviderRun>> {
        if self.providers.is_empty() {
            return Err(BenchError::Config("no providers enabled".into()));
        }
        if self.sizes.is_empty() {
            return Err(BenchError::Config("message size range is empty".into()));
        }
        let mut runs = Vec::with_capacity(self.sizes.len() * self.providers.len());
        for &message_size in &self.sizes {
            info!(message_size, "message size");
            for provider in &self.providers {
                let run = engine.run(provider.as_ref(), message_size, self.iterations)?;
                if !run.is_success() {
                    error!(
                        provider = provider.name(),
                        message_size, "provider run failed, aborting sweep"
                    );
                    return Err(BenchError::ProviderFailed {
                        provider: run.provider,
                        message_size,
                    });
                }
                runs.push(run);
            }
        }
        Ok(runs)
    }
}
