//! Provider adapters over concrete cryptography libraries.
//!
//! Each library sits behind its own cargo feature so a build can include
//! any subset of them.

use core_bench::{BenchError, Provider};

#[cfg(feature = "ring")]
pub mod ring_provider;
#[cfg(feature = "rustcrypto")]
pub mod rustcrypto;

#[cfg(feature = "ring")]
pub use ring_provider::RingProvider;
#[cfg(feature = "rustcrypto")]
pub use rustcrypto::RustCryptoProvider;

/// Every compiled-in provider, in benchmark order.
#[allow(unused_mut)]
pub fn registry() -> Vec<Box<dyn Provider>> {
    let mut providers: Vec<Box<dyn Provider>> = Vec::new();
    #[cfg(feature = "ring")]
    providers.push(Box::new(RingProvider));
    #[cfg(feature = "rustcrypto")]
    providers.push(Box::new(RustCryptoProvider));
    providers
}

/// Resolve configured provider names (case-insensitive) in the given order.
/// An empty list selects the whole registry.
pub fn select(names: &[String]) -> Result<Vec<Box<dyn Provider>>, BenchError> {
    if names.is_empty() {
        return Ok(registry());
    }
    names
        .iter()
        .map(|name| {
            registry()
                .into_iter()
                .find(|p| p.name().eq_ignore_ascii_case(name))
                .ok_or_else(|| BenchError::UnknownProvider(name.clone()))
        })
        .collect()
}
