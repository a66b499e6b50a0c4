//! Maps the logical queries onto request URLs.

use std::fmt;

use url::Url;

/// Host serving the breach and paste APIs unless a base URL override is configured.
pub const DEFAULT_BASE_URL: &str = "https://haveibeenpwned.com";

/// Dedicated host for the k-anonymity range lookups. Never overridden.
pub const PASSWORD_RANGE_BASE_URL: &str = "https://api.pwnedpasswords.com";

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

const RANGE_PATH: &str = "/range/";
const BREACHES_PATH: &str = "/api/v3/breaches/";
const BREACHED_ACCOUNT_PATH: &str = "/api/v3/breachedaccount/";
const PASTE_ACCOUNT_PATH: &str = "/api/v3/pasteaccount/";

/// One of the read-only queries the service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// Every suffix sharing a 5 character hash prefix.
    PasswordRange { prefix: &'a str },
    /// All breaches, or only those for `domain`.
    Breaches { domain: Option<&'a str> },
    BreachedAccount { account: &'a str, include_unverified: bool },
    PasteAccount { email: &'a str },
}

impl Query<'_> {
    /// Resolves the query against `base_url` (or [`DEFAULT_BASE_URL`]).
    ///
    /// Returns `None` only when no valid http(s) URL can be formed. Inputs are
    /// not validated beyond that.
    pub fn target(&self, base_url: Option<&str>) -> Option<QueryTarget> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');

        match *self {
            Query::PasswordRange { prefix } => {
                QueryTarget::build(PASSWORD_RANGE_BASE_URL, RANGE_PATH, Some(prefix), &[])
            }
            Query::Breaches { domain } => {
                let params: Vec<_> = domain.map(|d| ("domain", d)).into_iter().collect();
                QueryTarget::build(base, BREACHES_PATH, None, &params)
            }
            Query::BreachedAccount { account, include_unverified } => {
                let mut params = vec![("truncateResponse", "false")];
                // The service includes unverified breaches when the parameter
                // is absent, so it is only ever sent to exclude them.
                if !include_unverified {
                    params.push(("includeUnverified", "false"));
                }
                QueryTarget::build(base, BREACHED_ACCOUNT_PATH, Some(account), &params)
            }
            Query::PasteAccount { email } => {
                QueryTarget::build(base, PASTE_ACCOUNT_PATH, Some(email), &[])
            }
        }
    }

    /// The content type a successful response must carry.
    pub fn expected_content_type(&self) -> &'static str {
        match self {
            Query::PasswordRange { .. } => TEXT_CONTENT_TYPE,
            _ => JSON_CONTENT_TYPE,
        }
    }
}

/// A fully resolved request destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget {
    url: Url,
}

impl QueryTarget {
    fn build(
        base: &str,
        path: &str,
        segment: Option<&str>,
        params: &[(&str, &str)],
    ) -> Option<Self> {
        let mut url = Url::parse(&format!("{base}{path}")).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        if let Some(segment) = segment {
            url.path_segments_mut().ok()?.pop_if_empty().push(segment);
        }

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        Some(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Value of the first query parameter called `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
