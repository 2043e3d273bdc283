//! Sweep configuration.
use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Env var naming an optional TOML file loaded before env overrides.
pub const ENV_CONFIG_FILE: &str = "CIPHER_BENCH_CONFIG";

/// What to do when the provider cannot randomize the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomnessPolicy {
    /// Log and keep benchmarking whatever the buffer holds.
    #[default]
    Lax,
    /// Abort the provider run.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub min_message_size: usize,
    pub max_message_size: usize,
    pub iterations: u64,
    pub progress_interval_ms: u64,
    /// Providers to run, in order. Empty means every compiled-in provider.
    pub providers: Vec<String>,
    pub randomness_policy: RandomnessPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_message_size: 16,
            max_message_size: 16384,
            iterations: 1_000_000,
            progress_interval_ms: 250,
            providers: Vec::new(),
            randomness_policy: RandomnessPolicy::Lax,
        }
    }
}

impl SweepConfig {
    /// Defaults, then the TOML file named by `CIPHER_BENCH_CONFIG`, then
    /// individual `CIPHER_BENCH_*` overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| BenchError::Config(format!("read {path}: {e}")))?;
                Self::from_toml(&text)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BenchError::Config(e.to_string()))
    }

    /// Apply `CIPHER_BENCH_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CIPHER_BENCH_ITERATIONS") {
            self.iterations = parse_number("CIPHER_BENCH_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("CIPHER_BENCH_MIN_SIZE") {
            self.min_message_size = parse_number("CIPHER_BENCH_MIN_SIZE", &v)?;
        }
        if let Some(v) = lookup("CIPHER_BENCH_MAX_SIZE") {
            self.max_message_size = parse_number("CIPHER_BENCH_MAX_SIZE", &v)?;
        }
        if let Some(v) = lookup("CIPHER_BENCH_PROGRESS_MS") {
            self.progress_interval_ms = parse_number("CIPHER_BENCH_PROGRESS_MS", &v)?;
        }
        if let Some(v) = lookup("CIPHER_BENCH_PROVIDERS") {
            self.providers = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("CIPHER_BENCH_STRICT_RANDOM") {
            self.randomness_policy = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => RandomnessPolicy::Strict,
                "0" | "false" | "no" | "" => RandomnessPolicy::Lax,
                other => {
                    return Err(BenchError::Config(format!(
                        "CIPHER_BENCH_STRICT_RANDOM: expected a boolean, got '{other}'"
                    )))
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::Config("iterations must be positive".into()));
        }
        if self.min_message_size == 0 {
            return Err(BenchError::Config("min_message_size must be positive".into()));
        }
        if self.max_message_size < self.min_message_size {
            return Err(BenchError::Config(format!(
                "max_message_size {} is below min_message_size {}",
                self.max_message_size, self.min_message_size
            )));
        }
        Ok(())
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    /// Doubling sequence from `min_message_size` up to `max_message_size` inclusive.
    pub fn message_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut size = self.min_message_size;
        while size > 0 && size <= self.max_message_size {
            sizes.push(size);
            size = match size.checked_mul(2) {
                Some(next) => next,
                None => break,
            };
        }
        sizes
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BenchError::Config(format!("{key}: '{value}' is not a valid number")))
}
