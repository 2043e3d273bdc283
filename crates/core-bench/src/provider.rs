//! The capability set every cryptography library adapter exposes.
//!
//! A [`Provider`] describes a library and opens [`Session`]s; a session is the
//! opaque per-run handle holding key material and cipher state. The engine
//! owns one session at a time and only touches it from the benchmarking
//! thread, so adapters need not be thread-safe.

use crate::error::ProviderError;

pub trait Provider {
    /// Stable display identifier.
    fn name(&self) -> &str;

    /// Supported cipher identifiers, in the order they are benchmarked.
    fn ciphers(&self) -> &[&'static str];

    /// Minimum destination length sufficient for any supported cipher at
    /// `message_size` bytes of plaintext. Never less than `message_size`.
    fn buffer_size(&self, message_size: usize) -> usize;

    /// Allocate a fresh handle.
    fn init(&self) -> Result<Box<dyn Session>, ProviderError>;
}

pub trait Session {
    /// Fill `dst` with bytes suitable as plaintext.
    fn random(&mut self, dst: &mut [u8]) -> Result<(), ProviderError>;

    /// Select the named cipher and derive its key material.
    fn set_cipher(&mut self, cipher: &str) -> Result<(), ProviderError>;

    /// Encrypt the first `message_size` bytes of `src` into `dst`, returning the
    /// ciphertext length. Must not write past `buffer_size(message_size)`.
    fn encrypt(
        &mut self,
        message_size: usize,
        dst: &mut [u8],
        src: &[u8],
    ) -> Result<usize, ProviderError>;

    /// Decrypt `buf[..ciphertext_len]` in place, returning the plaintext length.
    /// The plaintext occupies `buf[..len]` on success.
    fn decrypt(&mut self, ciphertext_len: usize, buf: &mut [u8]) -> Result<usize, ProviderError>;

    /// Release everything the handle owns.
    fn close(self: Box<Self>) {}
}
