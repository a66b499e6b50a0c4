//! The k-anonymity password range check.
//!
//! Only the first [`PREFIX_LEN`] hex characters of the password's SHA-1 ever
//! leave the process. The service answers with every known suffix sharing
//! that prefix, one `SUFFIX:COUNT` per line, and the matching line is picked
//! out locally.

use std::sync::Arc;

use http::HeaderMap;
use tracing::debug;

use crate::error::ServiceError;
use crate::hash;
use crate::pipeline::{self, PendingRequest};
use crate::target::{Query, TEXT_CONTENT_TYPE};
use crate::transport::Transport;

/// The length of the hash prefix sent to the service (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// Splits a hex digest into the prefix sent to the service and the
/// uppercased suffix matched against its response.
pub fn split_hash(hex: &str) -> Option<(&str, String)> {
    let (prefix, suffix) = hex.split_at_checked(PREFIX_LEN)?;
    Some((prefix, suffix.to_ascii_uppercase()))
}

/// Finds `suffix` in a range response body and returns its count.
///
/// Lines compare on the text before the first `:`, exactly. A matching line
/// with a missing or malformed count counts as 0, as does no match at all.
pub fn count_in_range(body: &str, suffix: &str) -> u64 {
    body.lines()
        .map(|line| line.split_once(':').unwrap_or((line, "")))
        .find(|(hash, _)| *hash == suffix)
        .map_or(0, |(_, rest)| parse_count(rest))
}

fn parse_count(rest: &str) -> u64 {
    rest.rsplit(':').next().unwrap_or_default().trim().parse().unwrap_or(0)
}

/// Decodes a range response body and looks up `suffix` in it.
pub fn decode_range_body(body: &[u8], suffix: &str) -> Result<u64, ServiceError> {
    let text = std::str::from_utf8(body).map_err(|err| {
        ServiceError::InvalidResponse(format!("Could not convert to string: {err}"))
    })?;
    Ok(count_in_range(text, suffix))
}

/// Starts a range check for `password`.
///
/// A 404 for the prefix means nothing shares it, so it resolves to a count
/// of 0 rather than [`ServiceError::NotFound`].
pub fn check_password<Tr>(
    transport: Arc<Tr>,
    headers: HeaderMap,
    password: &str,
) -> Result<PendingRequest<u64>, ServiceError>
where
    Tr: Transport + ?Sized,
{
    let hex = hash::hex_digest(password);
    let (prefix, suffix) = split_hash(&hex).ok_or(ServiceError::InvalidTarget)?;
    let target = Query::PasswordRange { prefix }.target(None).ok_or(ServiceError::InvalidTarget)?;
    debug!(prefix, "Checking password range");

    Ok(PendingRequest::spawn(async move {
        match pipeline::fetch(&*transport, target, headers, TEXT_CONTENT_TYPE).await {
            Ok(body) => decode_range_body(&body, &suffix),
            Err(ServiceError::NotFound) => Ok(0),
            Err(err) => Err(err),
        }
    }))
}
