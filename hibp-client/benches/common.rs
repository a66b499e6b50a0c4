use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALL_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

const HEX_UPPER: &[u8] = b"0123456789ABCDEF";

/// Generates a specified number of random passwords with uniform distribution.
/// Uses a fixed seed for reproducible benchmark results.
pub fn generate_random_passwords(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let length = rng.gen_range(8..=64);
            (0..length)
                .map(|_| ALL_CHARS[rng.gen_range(0..ALL_CHARS.len())] as char)
                .collect()
        })
        .collect()
}

/// Builds a range response body of `lines` random `SUFFIX:COUNT` entries,
/// CRLF separated like the live endpoint.
pub fn generate_range_body(lines: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let mut body = String::with_capacity(lines * 45);
    for _ in 0..lines {
        for _ in 0..35 {
            body.push(HEX_UPPER[rng.gen_range(0..HEX_UPPER.len())] as char);
        }
        body.push(':');
        body.push_str(&rng.gen_range(1..100_000u32).to_string());
        body.push_str("\r\n");
    }
    body
}
