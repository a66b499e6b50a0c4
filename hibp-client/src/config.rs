use std::time::Duration;

/// Environment variable holding the API key for the authenticated endpoints.
pub const HIBP_API_KEY_ENV: &str = "HIBP_API_KEY";

/// Environment variable overriding the breach and paste API host.
pub const HIBP_BASE_URL_ENV: &str = "HIBP_BASE_URL";

/// Default request timeout for the bundled transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings a [`crate::HibpService`] is built from.
///
/// The service rejects anonymous clients, so a user agent identifying the
/// calling application is always required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    user_agent: String,
    api_key: Option<String>,
    base_url: Option<String>,
    padding: bool,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            api_key: None,
            base_url: None,
            padding: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a config with the API key and base URL taken from
    /// `HIBP_API_KEY` and `HIBP_BASE_URL`. Empty values count as unset.
    pub fn from_env(user_agent: impl Into<String>) -> Self {
        let mut config = Self::new(user_agent);
        config.api_key = non_empty_env(HIBP_API_KEY_ENV);
        config.base_url = non_empty_env(HIBP_BASE_URL_ENV);
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k| !k.is_empty());
        self
    }

    /// Points the breach and paste queries at another deployment. The
    /// password range query always goes to its dedicated host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into()).filter(|u| !u.is_empty());
        self
    }

    /// Asks the range endpoint to pad responses with zero-count entries so
    /// the response size does not leak the prefix's popularity.
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn padding(&self) -> bool {
        self.padding
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
