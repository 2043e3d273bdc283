//! Per-provider benchmark: one timed encrypt/decrypt loop per cipher,
//! progress reported concurrently, round trip validated afterwards.

use crate::config::{RandomnessPolicy, SweepConfig};
use crate::error::{BenchError, ProviderError, Result};
use crate::progress::{ConsoleSink, ProgressSink, ProgressState, Reporter};
use crate::provider::{Provider, Session};
use crate::validate::validate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub type SinkFactory = Arc<dyn Fn() -> Box<dyn ProgressSink> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum CipherOutcome {
    Passed { elapsed: Duration },
    /// `set_cipher` refused the identifier; not a failure.
    Skipped { reason: String },
    EncryptFailed { iteration: u64 },
    DecryptFailed { iteration: u64 },
    /// Round trip completed but the plaintext came back different.
    Mismatch { elapsed: Duration },
}

impl CipherOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CipherOutcome::EncryptFailed { .. }
                | CipherOutcome::DecryptFailed { .. }
                | CipherOutcome::Mismatch { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CipherRun {
    pub cipher: String,
    pub outcome: CipherOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRun {
    pub provider: String,
    pub message_size: usize,
    pub iterations: u64,
    pub ciphers: Vec<CipherRun>,
}

impl ProviderRun {
    /// True unless some cipher failed to encrypt, decrypt or validate.
    pub fn is_success(&self) -> bool {
        !self.ciphers.iter().any(|c| c.outcome.is_failure())
    }

    pub fn outcome(&self, cipher: &str) -> Option<&CipherOutcome> {
        self.ciphers.iter().find(|c| c.cipher == cipher).map(|c| &c.outcome)
    }
}

pub struct Engine {
    progress_interval: Duration,
    randomness_policy: RandomnessPolicy,
    sink_factory: SinkFactory,
}

impl Engine {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            progress_interval: config.progress_interval(),
            randomness_policy: config.randomness_policy,
            sink_factory: Arc::new(|| Box::new(ConsoleSink::default()) as Box<dyn ProgressSink>),
        }
    }

    /// Replace the console with another progress destination.
    pub fn with_sink<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ProgressSink> + Send + Sync + 'static,
    {
        self.sink_factory = Arc::new(factory) as SinkFactory;
        self
    }

    /// Benchmark every cipher of `provider` at `message_size` bytes.
    ///
    /// `Err` means the provider could not be benchmarked at all; per-cipher
    /// failures are reported in the returned run.
    pub fn run(
        &self,
        provider: &dyn Provider,
        message_size: usize,
        iterations: u64,
    ) -> Result<ProviderRun> {
        let name = provider.name();
        if name.is_empty() {
            return Err(BenchError::Config("provider has an empty name".into()));
        }
        if iterations == 0 {
            return Err(BenchError::Config(format!("[{name}] iterations must be positive")));
        }
        let capacity = provider.buffer_size(message_size);
        if capacity < message_size {
            return Err(BenchError::Config(format!(
                "[{name}] buffer_size({message_size}) = {capacity} cannot hold the message"
            )));
        }

        let mut session = provider.init().map_err(|source| {
            error!(provider = name, error = %source, "initialization failed");
            BenchError::Init {
                provider: name.to_string(),
                source,
            }
        })?;

        let mut src = vec![0u8; message_size];
        let mut dst = vec![0u8; capacity];

        if let Err(source) = session.random(&mut src) {
            warn!(provider = name, error = %source, "input randomization failed");
            if self.randomness_policy == RandomnessPolicy::Strict {
                session.close();
                return Err(BenchError::Randomness {
                    provider: name.to_string(),
                    source,
                });
            }
        }

        let mut run = ProviderRun {
            provider: name.to_string(),
            message_size,
            iterations,
            ciphers: Vec::with_capacity(provider.ciphers().len()),
        };
        for &cipher in provider.ciphers() {
            let outcome = self.run_cipher(name, &mut *session, cipher, &src, &mut dst, iterations);
            run.ciphers.push(CipherRun {
                cipher: cipher.to_string(),
                outcome,
            });
        }

        session.close();
        Ok(run)
    }

    fn run_cipher(
        &self,
        name: &str,
        session: &mut dyn Session,
        cipher: &str,
        src: &[u8],
        dst: &mut [u8],
        iterations: u64,
    ) -> CipherOutcome {
        let message_size = src.len();
        if let Err(e) = session.set_cipher(cipher) {
            warn!(provider = name, cipher, error = %e, "failed to set cipher, skipping it");
            return CipherOutcome::Skipped {
                reason: e.to_string(),
            };
        }
        info!(provider = name, cipher, message_size, iterations, "running benchmark");

        let state = Arc::new(ProgressState::new(name, iterations));
        let sink = (self.sink_factory)();
        let reporter = match Reporter::spawn(Arc::clone(&state), self.progress_interval, sink) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(provider = name, error = %e, "progress reporter unavailable");
                None
            }
        };

        let start = Instant::now();
        let looped = timed_loop(session, iterations, dst, src, &state);
        let elapsed = start.elapsed();

        match reporter {
            Some(r) => r.stop(),
            None => state.finish(),
        }

        if let Err(failure) = looped {
            match &failure {
                LoopFailure::Encrypt { iteration, error } => {
                    error!(provider = name, cipher, iteration, %error, "encryption failed")
                }
                LoopFailure::Decrypt { iteration, error } => {
                    error!(provider = name, cipher, iteration, %error, "decryption failed")
                }
            }
            return failure.into_outcome();
        }

        if !validate(message_size, dst, src) {
            error!(
                provider = name,
                cipher,
                message_size,
                "decrypted message doesn't match original, encryption/decryption failure"
            );
            return CipherOutcome::Mismatch { elapsed };
        }

        info!(
            provider = name,
            cipher,
            elapsed_secs = elapsed.as_secs_f64(),
            iterations,
            message_size,
            throughput_mib_s = throughput_mib_s(message_size, iterations, elapsed),
            "benchmark complete"
        );
        CipherOutcome::Passed { elapsed }
    }
}

enum LoopFailure {
    Encrypt {
        iteration: u64,
        error: ProviderError,
    },
    Decrypt {
        iteration: u64,
        error: ProviderError,
    },
}

impl LoopFailure {
    fn into_outcome(self) -> CipherOutcome {
        match self {
            LoopFailure::Encrypt { iteration, .. } => CipherOutcome::EncryptFailed { iteration },
            LoopFailure::Decrypt { iteration, .. } => CipherOutcome::DecryptFailed { iteration },
        }
    }
}

// Timed region: no logging, no locks. Failures are returned and reported by the caller.
fn timed_loop(
    session: &mut dyn Session,
    iterations: u64,
    dst: &mut [u8],
    src: &[u8],
    state: &ProgressState,
) -> std::result::Result<(), LoopFailure> {
    let message_size = src.len();
    for i in 0..iterations {
        let ct_len = match session.encrypt(message_size, dst, src) {
            Ok(0) => {
                return Err(LoopFailure::Encrypt {
                    iteration: i,
                    error: ProviderError::Encrypt("empty ciphertext".into()),
                })
            }
            Ok(n) if n > dst.len() => {
                return Err(LoopFailure::Encrypt {
                    iteration: i,
                    error: ProviderError::BufferTooSmall {
                        needed: n,
                        available: dst.len(),
                    },
                })
            }
            Ok(n) => n,
            Err(error) => {
                return Err(LoopFailure::Encrypt {
                    iteration: i,
                    error,
                })
            }
        };
        let error = match session.decrypt(ct_len, dst) {
            Ok(n) if n == message_size => {
                state.record(i);
                continue;
            }
            Ok(0) => ProviderError::Decrypt("empty plaintext".into()),
            Ok(n) => ProviderError::Decrypt(format!("recovered {n} of {message_size} bytes")),
            Err(error) => error,
        };
        return Err(LoopFailure::Decrypt {
            iteration: i,
            error,
        });
    }
    Ok(())
}

fn throughput_mib_s(message_size: usize, iterations: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (message_size as f64 * iterations as f64) / (1024.0 * 1024.0) / secs
}
