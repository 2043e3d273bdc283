//! Adapter for the RustCrypto AEAD crates (`aes-gcm`, `ocb3`, `chacha20poly1305`).

use aes::Aes256;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{AeadInPlace, KeyInit, Nonce, Tag};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::{ChaCha20Poly1305, XChaCha20Poly1305};
use ocb3::Ocb3;
use core_bench::{cipher, Provider, ProviderError, Session};
use rand::rngs::OsRng;
use rand::RngCore;

const CIPHERS: &[&str] = &[
    cipher::AES_256_GCM,
    cipher::AES_256_OCB,
    cipher::CHACHA20_POLY1305,
    cipher::XCHACHA20_POLY1305,
];

const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;
const MAX_NONCE_LEN: usize = 24;

pub struct RustCryptoProvider;

impl Provider for RustCryptoProvider {
    fn name(&self) -> &str {
        "RustCrypto"
    }

    fn ciphers(&self) -> &[&'static str] {
        CIPHERS
    }

    fn buffer_size(&self, message_size: usize) -> usize {
        message_size + TAG_LEN
    }

    fn init(&self) -> Result<Box<dyn Session>, ProviderError> {
        let mut probe = [0u8; 1];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|e| ProviderError::Init(format!("OS random source unavailable: {e}")))?;
        Ok(Box::new(RustCryptoSession {
            active: None,
            nonce: [0u8; MAX_NONCE_LEN],
        }))
    }
}

type Aes256Ocb = Ocb3<Aes256, U12>;

enum Active {
    Aes256Gcm(Box<Aes256Gcm>),
    Aes256Ocb(Box<Aes256Ocb>),
    ChaCha20Poly1305(ChaCha20Poly1305),
    XChaCha20Poly1305(XChaCha20Poly1305),
}

impl Active {
    fn new(id: &str, key: &[u8]) -> Result<Self, ProviderError> {
        let rejected = |_| ProviderError::KeySetup {
            cipher: id.to_string(),
            reason: format!("{}-byte key rejected", key.len()),
        };
        let active = match id {
            cipher::AES_256_GCM => {
                Active::Aes256Gcm(Box::new(Aes256Gcm::new_from_slice(key).map_err(rejected)?))
            }
            cipher::AES_256_OCB => {
                Active::Aes256Ocb(Box::new(Aes256Ocb::new_from_slice(key).map_err(rejected)?))
            }
            cipher::CHACHA20_POLY1305 => {
                Active::ChaCha20Poly1305(ChaCha20Poly1305::new_from_slice(key).map_err(rejected)?)
            }
            cipher::XCHACHA20_POLY1305 => {
                let aead = XChaCha20Poly1305::new_from_slice(key).map_err(rejected)?;
                Active::XChaCha20Poly1305(aead)
            }
            _ => return Err(ProviderError::UnsupportedCipher(id.to_string())),
        };
        Ok(active)
    }

    fn nonce_len(&self) -> usize {
        match self {
            Active::XChaCha20Poly1305(_) => 24,
            _ => 12,
        }
    }
}

struct RustCryptoSession {
    active: Option<Active>,
    // Fixed for the lifetime of a cipher selection; benchmark use only.
    nonce: [u8; MAX_NONCE_LEN],
}

fn seal<A: AeadInPlace>(aead: &A, nonce: &[u8], body: &mut [u8]) -> Result<Tag<A>, ProviderError> {
    aead.encrypt_in_place_detached(Nonce::<A>::from_slice(nonce), b"", body)
        .map_err(|_| ProviderError::Encrypt("encrypt_in_place_detached failed".into()))
}

fn open<A: AeadInPlace>(
    aead: &A,
    nonce: &[u8],
    body: &mut [u8],
    tag: &[u8],
) -> Result<(), ProviderError> {
    let nonce = Nonce::<A>::from_slice(nonce);
    aead.decrypt_in_place_detached(nonce, b"", body, Tag::<A>::from_slice(tag))
        .map_err(|_| ProviderError::Decrypt("authentication failed".into()))
}

impl Session for RustCryptoSession {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), ProviderError> {
        OsRng.try_fill_bytes(dst).map_err(|e| ProviderError::Randomness(e.to_string()))
    }

    fn set_cipher(&mut self, id: &str) -> Result<(), ProviderError> {
        let key_setup = |reason: String| ProviderError::KeySetup {
            cipher: id.to_string(),
            reason,
        };
        self.active = None;

        let mut key = [0u8; KEY_LEN];
        OsRng.try_fill_bytes(&mut key).map_err(|e| key_setup(e.to_string()))?;
        OsRng.try_fill_bytes(&mut self.nonce).map_err(|e| key_setup(e.to_string()))?;
        self.active = Some(Active::new(id, &key)?);
        Ok(())
    }

    fn encrypt(
        &mut self,
        message_size: usize,
        dst: &mut [u8],
        src: &[u8],
    ) -> Result<usize, ProviderError> {
        let active = self.active.as_ref().ok_or(ProviderError::NoCipherSelected)?;
        let needed = message_size + TAG_LEN;
        if dst.len() < needed {
            return Err(ProviderError::BufferTooSmall {
                needed,
                available: dst.len(),
            });
        }
        let plain = src.get(..message_size).ok_or(ProviderError::BufferTooSmall {
            needed: message_size,
            available: src.len(),
        })?;

        let nonce = &self.nonce[..active.nonce_len()];
        let (body, rest) = dst.split_at_mut(message_size);
        body.copy_from_slice(plain);
        let tag = match active {
            Active::Aes256Gcm(c) => seal(&**c, nonce, body)?,
            Active::Aes256Ocb(c) => seal(&**c, nonce, body)?,
            Active::ChaCha20Poly1305(c) => seal(c, nonce, body)?,
            Active::XChaCha20Poly1305(c) => seal(c, nonce, body)?,
        };
        rest[..TAG_LEN].copy_from_slice(&tag);
        Ok(needed)
    }

    fn decrypt(&mut self, ciphertext_len: usize, buf: &mut [u8]) -> Result<usize, ProviderError> {
        let active = self.active.as_ref().ok_or(ProviderError::NoCipherSelected)?;
        if ciphertext_len > buf.len() {
            return Err(ProviderError::BufferTooSmall {
                needed: ciphertext_len,
                available: buf.len(),
            });
        }
        let len = ciphertext_len
            .checked_sub(TAG_LEN)
            .ok_or_else(|| ProviderError::Decrypt("ciphertext shorter than tag".into()))?;

        let nonce = &self.nonce[..active.nonce_len()];
        let (body, tag) = buf[..ciphertext_len].split_at_mut(len);
        match active {
            Active::Aes256Gcm(c) => open(&**c, nonce, body, tag)?,
            Active::Aes256Ocb(c) => open(&**c, nonce, body, tag)?,
            Active::ChaCha20Poly1305(c) => open(c, nonce, body, tag)?,
            Active::XChaCha20Poly1305(c) => open(c, nonce, body, tag)?,
        }
        Ok(len)
    }
}
