use std::sync::LazyLock;

use regex::Regex;

/// Addresses of this many characters or more are rejected.
pub const MAX_EMAIL_LEN: usize = 256;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.\-_+]+@[a-zA-Z0-9.\-_]+\.[a-zA-Z]+$").expect("Invalid regex")
});

/// Permissive `local@domain.tld` shape check.
///
/// Meant to spare a round trip before paste and account queries; it is not
/// RFC 5322 validation and the queries do not enforce it.
pub fn is_email(candidate: &str) -> bool {
    candidate.len() < MAX_EMAIL_LEN && EMAIL_RE.is_match(candidate)
}
