//! Error kinds raised by adapters and by the harness itself.

use thiserror::Error;

/// Failure reported by a provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("initialization failed: {0}")]
    Init(String),

    #[error("randomness source unavailable: {0}")]
    Randomness(String),

    #[error("cipher '{0}' is not supported")]
    UnsupportedCipher(String),

    #[error("key setup failed for '{cipher}': {reason}")]
    KeySetup { cipher: String, reason: String },

    #[error("no cipher selected")]
    NoCipherSelected,

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("encryption failed: {0}")]
    Encrypt(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// Failure that aborts a provider run or the whole sweep.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("[{provider}] initialization failed: {source}")]
    Init {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("[{provider}] input randomization failed: {source}")]
    Randomness {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("[{provider}] run at {message_size} bytes was not fully successful")]
    ProviderFailed {
        provider: String,
        message_size: usize,
    },

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
}

impl BenchError {
    /// Get type name for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            BenchError::Config(_) => "config_error",
            BenchError::Init { .. } => "init_error",
            BenchError::Randomness { .. } => "randomness_error",
            BenchError::ProviderFailed { .. } => "provider_failed",
            BenchError::UnknownProvider(_) => "unknown_provider",
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
