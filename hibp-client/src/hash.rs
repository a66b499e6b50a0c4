//! SHA-1 helpers used by the password range check.

use sha1::{Digest, Sha1};

/// The length of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// The length of a hex encoded SHA-1 digest.
pub const HEX_DIGEST_LEN: usize = DIGEST_LEN * 2;

/// Lowercase hex lookup table.
pub const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Computes the SHA-1 digest of the UTF-8 bytes of `input`.
#[inline]
pub fn digest(input: &str) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// Returns the SHA-1 digest of `input` as 40 lowercase hex characters.
pub fn hex_digest(input: &str) -> String {
    encode_hex(&digest(input))
}

/// Like [`hex_digest`], but for raw bytes that may not be text.
///
/// Returns `None` if `bytes` is not valid UTF-8.
pub fn hex_digest_utf8(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(hex_digest)
}

fn encode_hex(hash: &[u8; DIGEST_LEN]) -> String {
    let mut out = String::with_capacity(HEX_DIGEST_LEN);
    for byte in hash {
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    out
}
