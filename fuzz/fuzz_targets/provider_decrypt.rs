#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;

#[derive(Debug, Arbitrary)]
struct Input {
    provider: u8,
    cipher: u8,
    claimed_len: u16,
    data: Vec<u8>,
}

fuzz_target!(|inp: Input| {
    let providers = core_crypto::registry();
    if providers.is_empty() {
        return;
    }
    let provider = &providers[inp.provider as usize % providers.len()];
    let ciphers = provider.ciphers();
    let cipher = ciphers[inp.cipher as usize % ciphers.len()];
    let Ok(mut session) = provider.init() else {
        return;
    };
    if session.set_cipher(cipher).is_err() {
        return;
    }

    // Forged ciphertext and lying lengths must come back as errors, never panics.
    let mut buf = vec![0u8; provider.buffer_size(inp.data.len())];
    buf[..inp.data.len()].copy_from_slice(&inp.data);
    let _ = session.decrypt(inp.claimed_len as usize, &mut buf);
});
