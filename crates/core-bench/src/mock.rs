//! Scriptable in-memory provider and a recording progress sink.

use crate::error::ProviderError;
use crate::progress::{ProgressSink, Snapshot};
use crate::provider::{Provider, Session};
use parking_lot::Mutex;
use std::sync::Arc;

const TAG: [u8; 4] = *b"MOCK";

#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub inits: u64,
    pub encrypts: u64,
    pub decrypts: u64,
    pub closes: u64,
}

/// How a scripted encrypt or decrypt call misbehaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    Error,
    /// Reports success with a zero length.
    Empty,
    /// Reports more output than the call actually produced.
    Oversized,
}

#[derive(Debug, Clone, Default)]
struct Script {
    fail_init: bool,
    fail_random: bool,
    undersized: bool,
    rejected: Vec<String>,
    encrypt_fault: Option<(String, u64, Fault)>,
    decrypt_fault: Option<(String, u64, Fault)>,
    corrupted: Option<String>,
}

pub struct MockProvider {
    name: String,
    ciphers: Vec<&'static str>,
    script: Script,
    calls: Arc<Mutex<Calls>>,
}

impl MockProvider {
    pub fn new(name: &str, ciphers: &[&'static str]) -> Self {
        Self {
            name: name.to_string(),
            ciphers: ciphers.to_vec(),
            script: Script::default(),
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    pub fn fail_init(mut self) -> Self {
        self.script.fail_init = true;
        self
    }

    pub fn fail_random(mut self) -> Self {
        self.script.fail_random = true;
        self
    }

    pub fn undersized(mut self) -> Self {
        self.script.undersized = true;
        self
    }

    pub fn reject(mut self, cipher: &str) -> Self {
        self.script.rejected.push(cipher.to_string());
        self
    }

    pub fn fail_encrypt_at(self, cipher: &str, iteration: u64) -> Self {
        self.encrypt_fault(cipher, iteration, Fault::Error)
    }

    pub fn fail_decrypt_at(self, cipher: &str, iteration: u64) -> Self {
        self.decrypt_fault(cipher, iteration, Fault::Error)
    }

    pub fn encrypt_fault(mut self, cipher: &str, iteration: u64, fault: Fault) -> Self {
        self.script.encrypt_fault = Some((cipher.to_string(), iteration, fault));
        self
    }

    pub fn decrypt_fault(mut self, cipher: &str, iteration: u64, fault: Fault) -> Self {
        self.script.decrypt_fault = Some((cipher.to_string(), iteration, fault));
        self
    }

    pub fn corrupt(mut self, cipher: &str) -> Self {
        self.script.corrupted = Some(cipher.to_string());
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().clone()
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn ciphers(&self) -> &[&'static str] {
        &self.ciphers
    }

    fn buffer_size(&self, message_size: usize) -> usize {
        if self.script.undersized {
            message_size.saturating_sub(1)
        } else {
            message_size + TAG.len()
        }
    }

    fn init(&self) -> Result<Box<dyn Session>, ProviderError> {
        if self.script.fail_init {
            return Err(ProviderError::Init("scripted".into()));
        }
        self.calls.lock().inits += 1;
        Ok(Box::new(MockSession {
            script: self.script.clone(),
            calls: Arc::clone(&self.calls),
            cipher: None,
            key: 0,
            encrypts: 0,
            decrypts: 0,
        }))
    }
}

struct MockSession {
    script: Script,
    calls: Arc<Mutex<Calls>>,
    cipher: Option<String>,
    key: u8,
    encrypts: u64,
    decrypts: u64,
}

impl MockSession {
    fn scripted(
        fault: &Option<(String, u64, Fault)>,
        cipher: &Option<String>,
        n: u64,
    ) -> Option<Fault> {
        match (fault, cipher) {
            (Some((c, at, fault)), Some(cur)) if c == cur && *at == n => Some(*fault),
            _ => None,
        }
    }
}

impl Session for MockSession {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), ProviderError> {
        if self.script.fail_random {
            return Err(ProviderError::Randomness("scripted".into()));
        }
        for (i, b) in dst.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(31).wrapping_add(7);
        }
        Ok(())
    }

    fn set_cipher(&mut self, cipher: &str) -> Result<(), ProviderError> {
        if self.script.rejected.iter().any(|c| c == cipher) {
            return Err(ProviderError::UnsupportedCipher(cipher.to_string()));
        }
        self.cipher = Some(cipher.to_string());
        self.key = self.key.wrapping_add(0x5A);
        self.encrypts = 0;
        self.decrypts = 0;
        Ok(())
    }

    fn encrypt(
        &mut self,
        message_size: usize,
        dst: &mut [u8],
        src: &[u8],
    ) -> Result<usize, ProviderError> {
        self.calls.lock().encrypts += 1;
        let n = self.encrypts;
        self.encrypts += 1;
        match Self::scripted(&self.script.encrypt_fault, &self.cipher, n) {
            Some(Fault::Error) => return Err(ProviderError::Encrypt("scripted".into())),
            Some(Fault::Empty) => return Ok(0),
            Some(Fault::Oversized) => return Ok(dst.len() + 1),
            None => {}
        }
        let out_len = message_size + TAG.len();
        if dst.len() < out_len {
            return Err(ProviderError::BufferTooSmall {
                needed: out_len,
                available: dst.len(),
            });
        }
        for (d, s) in dst.iter_mut().zip(&src[..message_size]) {
            *d = s ^ self.key;
        }
        dst[message_size..out_len].copy_from_slice(&TAG);
        Ok(out_len)
    }

    fn decrypt(&mut self, ciphertext_len: usize, buf: &mut [u8]) -> Result<usize, ProviderError> {
        self.calls.lock().decrypts += 1;
        let n = self.decrypts;
        self.decrypts += 1;
        let fault = Self::scripted(&self.script.decrypt_fault, &self.cipher, n);
        match fault {
            Some(Fault::Error) => return Err(ProviderError::Decrypt("scripted".into())),
            Some(Fault::Empty) => return Ok(0),
            Some(Fault::Oversized) | None => {}
        }
        let len = ciphertext_len
            .checked_sub(TAG.len())
            .ok_or_else(|| ProviderError::Decrypt("short ciphertext".into()))?;
        if buf[len..ciphertext_len] != TAG {
            return Err(ProviderError::Decrypt("bad tag".into()));
        }
        for b in &mut buf[..len] {
            *b ^= self.key;
        }
        if self.script.corrupted.is_some() && self.script.corrupted == self.cipher && len > 0 {
            buf[0] ^= 0xFF;
        }
        if fault == Some(Fault::Oversized) {
            return Ok(ciphertext_len);
        }
        Ok(len)
    }

    fn close(self: Box<Self>) {
        self.calls.lock().closes += 1;
    }
}

#[derive(Debug, Default)]
pub struct Seen {
    pub reports: Vec<u64>,
    pub finished: Option<u64>,
}

#[derive(Clone)]
pub struct RecordingSink {
    seen: Arc<Mutex<Seen>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let sink = Self {
            seen: Arc::clone(&seen),
        };
        (sink, seen)
    }
}

impl ProgressSink for RecordingSink {
    fn report(&mut self, snapshot: &Snapshot) {
        self.seen.lock().reports.push(snapshot.completed);
    }

    fn finish(&mut self, snapshot: &Snapshot) {
        self.seen.lock().finished = Some(snapshot.completed);
    }
}
