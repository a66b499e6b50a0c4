/// The classified failure reasons a query can end with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service has no data for the requested target.
    #[error("Not found")]
    NotFound,

    #[error("Could not build a valid request URL")]
    InvalidTarget,

    /// Wrong content type, missing body, or an unreadable response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Parse error: {0}")]
    Decode(String),

    /// HTTP 429. `retry_after` is the server's hint in seconds, when it sent one.
    #[error("Rate limit exceeded, retry after {retry_after:?} seconds: {detail}")]
    RateLimited { retry_after: Option<u64>, detail: String },

    #[error("Offline: {0}")]
    Offline(String),

    #[error("Error: {0}")]
    Other(String),
}

impl ServiceError {
    /// Whether waiting and issuing the same query again may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Offline(_))
    }
}
