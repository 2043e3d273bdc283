//! Adapter for `ring`'s AEAD constructions.

use core_bench::{cipher, Provider, ProviderError, Session};
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, MAX_TAG_LEN, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

const CIPHERS: &[&str] = &[cipher::AES_256_GCM, cipher::AES_128_GCM, cipher::CHACHA20_POLY1305];

pub struct RingProvider;

impl Provider for RingProvider {
    fn name(&self) -> &str {
        "ring"
    }

    fn ciphers(&self) -> &[&'static str] {
        CIPHERS
    }

    fn buffer_size(&self, message_size: usize) -> usize {
        message_size + MAX_TAG_LEN
    }

    fn init(&self) -> Result<Box<dyn Session>, ProviderError> {
        let rng = SystemRandom::new();
        let mut probe = [0u8; 1];
        rng.fill(&mut probe)
            .map_err(|_| ProviderError::Init("system random source unavailable".into()))?;
        Ok(Box::new(RingSession {
            rng,
            key: None,
            nonce: [0u8; NONCE_LEN],
        }))
    }
}

fn algorithm(id: &str) -> Option<&'static aead::Algorithm> {
    match id {
        cipher::AES_256_GCM => Some(&aead::AES_256_GCM),
        cipher::AES_128_GCM => Some(&aead::AES_128_GCM),
        cipher::CHACHA20_POLY1305 => Some(&aead::CHACHA20_POLY1305),
        _ => None,
    }
}

struct RingSession {
    rng: SystemRandom,
    key: Option<LessSafeKey>,
    // Fixed for the lifetime of a cipher selection; benchmark use only.
    nonce: [u8; NONCE_LEN],
}

impl RingSession {
    fn key(&self) -> Result<&LessSafeKey, ProviderError> {
        self.key.as_ref().ok_or(ProviderError::NoCipherSelected)
    }

    fn nonce(&self) -> Nonce {
        Nonce::assume_unique_for_key(self.nonce)
    }
}

impl Session for RingSession {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), ProviderError> {
        self.rng
            .fill(dst)
            .map_err(|_| ProviderError::Randomness("SystemRandom::fill failed".into()))
    }

    fn set_cipher(&mut self, id: &str) -> Result<(), ProviderError> {
        let alg = algorithm(id).ok_or_else(|| ProviderError::UnsupportedCipher(id.to_string()))?;
        let key_setup = |reason: &str| ProviderError::KeySetup {
            cipher: id.to_string(),
            reason: reason.to_string(),
        };
        self.key = None;

        let mut key_bytes = [0u8; 32];
        let key_bytes = &mut key_bytes[..alg.key_len()];
        self.rng.fill(key_bytes).map_err(|_| key_setup("key generation failed"))?;
        self.rng.fill(&mut self.nonce).map_err(|_| key_setup("nonce generation failed"))?;
        let unbound = UnboundKey::new(alg, key_bytes).map_err(|_| key_setup("key rejected"))?;
        self.key = Some(LessSafeKey::new(unbound));
        Ok(())
    }

    fn encrypt(
        &mut self,
        message_size: usize,
        dst: &mut [u8],
        src: &[u8],
    ) -> Result<usize, ProviderError> {
        let key = self.key()?;
        let tag_len = key.algorithm().tag_len();
        let needed = message_size + tag_len;
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

        let (body, rest) = dst.split_at_mut(message_size);
        body.copy_from_slice(plain);
        let tag = key
            .seal_in_place_separate_tag(self.nonce(), Aad::empty(), body)
            .map_err(|_| ProviderError::Encrypt("seal_in_place_separate_tag failed".into()))?;
        rest[..tag_len].copy_from_slice(tag.as_ref());
        Ok(needed)
    }

    fn decrypt(&mut self, ciphertext_len: usize, buf: &mut [u8]) -> Result<usize, ProviderError> {
        let key = self.key()?;
        let available = buf.len();
        let sealed = buf
            .get_mut(..ciphertext_len)
            .ok_or(ProviderError::BufferTooSmall {
                needed: ciphertext_len,
                available,
            })?;
        let plain = key
            .open_in_place(self.nonce(), Aad::empty(), sealed)
            .map_err(|_| ProviderError::Decrypt("authentication failed".into()))?;
        Ok(plain.len())
    }
}
