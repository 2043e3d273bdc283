//! Benchmark harness core: a uniform provider contract, the timed
//! encrypt/decrypt engine, live progress reporting and round-trip validation.

pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod provider;
pub mod sweep;
pub mod validate;

#[cfg(test)]
mod mock;

pub use config::{RandomnessPolicy, SweepConfig};
pub use engine::{CipherOutcome, CipherRun, Engine, ProviderRun};
pub use error::{BenchError, ProviderError};
pub use progress::{ConsoleSink, ProgressSink, ProgressState, Snapshot};
pub use provider::{Provider, Session};
pub use sweep::Sweep;
pub use validate::validate;

/// Cipher identifiers shared by every adapter.
pub mod cipher {
    pub const AES_128_GCM: &str = "AES-128-GCM";
    pub const AES_256_GCM: &str = "AES-256-GCM";
    pub const AES_256_OCB: &str = "AES-256-OCB";
    pub const CHACHA20_POLY1305: &str = "ChaCha20-Poly1305";
    pub const XCHACHA20_POLY1305: &str = "XChaCha20-Poly1305";
}
