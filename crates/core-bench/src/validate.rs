/// True iff `decrypted` and `original` agree byte for byte over the first `len` bytes.
///
/// Slices shorter than `len` never match.
pub fn validate(len: usize, decrypted: &[u8], original: &[u8]) -> bool {
    match (decrypted.get(..len), original.get(..len)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
