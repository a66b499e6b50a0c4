use std::sync::Arc;

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::decode::{self, Decoder, JsonDecoder};
use crate::email;
use crate::error::ServiceError;
use crate::models::{Breach, Paste};
use crate::password;
use crate::pipeline::{self, PendingRequest};
use crate::target::Query;
use crate::transport::{ReqwestTransport, Transport};

/// Header carrying the API key on authenticated endpoints.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("hibp-api-key");

/// Header asking the range endpoint to pad its response.
pub const ADD_PADDING_HEADER: HeaderName = HeaderName::from_static("add-padding");

/// Entry point for the breach, paste and password queries.
///
/// Every query returns a [`PendingRequest`] to await (or cancel), or an
/// immediate [`ServiceError::InvalidTarget`] when no request URL could be
/// built. Queries are independent of each other and may complete in any
/// order.
///
/// # Panics
///
/// Each query spawns its exchange onto the ambient Tokio runtime, so the
/// query methods panic when called outside of one. Building the service
/// needs no runtime.
///
/// ```no_run
/// # async fn run() -> Result<(), hibp_client::ServiceError> {
/// use hibp_client::{ClientConfig, HibpService};
///
/// let service = HibpService::new(ClientConfig::new("my-app"))?;
/// let count = service.password_count("password")?.await?;
/// println!("seen {count} times");
/// # Ok(())
/// # }
/// ```
pub struct HibpService<Tr: ?Sized = ReqwestTransport, D = JsonDecoder> {
    config: ClientConfig,
    transport: Arc<Tr>,
    decoder: Arc<D>,
    headers: HeaderMap,
    range_headers: HeaderMap,
}

impl HibpService {
    /// Builds a service on the bundled `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let transport = ReqwestTransport::new(config.timeout())
            .map_err(|err| ServiceError::Other(format!("Failed to create HTTP client: {err}")))?;
        Self::with_transport(config, transport)
    }
}

impl<Tr: Transport> HibpService<Tr, JsonDecoder> {
    pub fn with_transport(config: ClientConfig, transport: Tr) -> Result<Self, ServiceError> {
        Self::with_parts(config, Arc::new(transport), Arc::new(JsonDecoder))
    }
}

impl<Tr, D> HibpService<Tr, D>
where
    Tr: Transport + ?Sized,
    D: Decoder,
{
    /// Builds a service from a shared transport and a custom decoder.
    ///
    /// Fails if the user agent or API key cannot be sent as header values.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<Tr>,
        decoder: Arc<D>,
    ) -> Result<Self, ServiceError> {
        let user_agent = HeaderValue::from_str(config.user_agent())
            .map_err(|_| ServiceError::Other("User agent is not a valid header value".into()))?;

        let mut range_headers = HeaderMap::new();
        range_headers.insert(header::USER_AGENT, user_agent.clone());
        if config.padding() {
            range_headers.insert(ADD_PADDING_HEADER, HeaderValue::from_static("true"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);
        if let Some(api_key) = config.api_key() {
            let mut value = HeaderValue::from_str(api_key)
                .map_err(|_| ServiceError::Other("API key is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        Ok(Self { config, transport, decoder, headers, range_headers })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// See [`email::is_email`].
    pub fn is_email(&self, candidate: &str) -> bool {
        email::is_email(candidate)
    }

    /// How many times `password` appears in the breach corpus, 0 if never.
    ///
    /// Only a 5 character prefix of the password's SHA-1 is sent.
    #[instrument(level = "debug", skip_all)]
    pub fn password_count(&self, password: &str) -> Result<PendingRequest<u64>, ServiceError> {
        password::check_password(
            Arc::clone(&self.transport),
            self.range_headers.clone(),
            password,
        )
    }

    /// Every breach in the system.
    pub fn all_breaches(&self) -> Result<PendingRequest<Vec<Breach>>, ServiceError> {
        self.query_records(Query::Breaches { domain: None })
    }

    /// Breaches of the site at `domain`.
    pub fn breaches_for_domain(
        &self,
        domain: &str,
    ) -> Result<PendingRequest<Vec<Breach>>, ServiceError> {
        self.query_records(Query::Breaches { domain: Some(domain) })
    }

    /// Breaches `account` appears in. Fails with [`ServiceError::NotFound`]
    /// when it appears in none.
    pub fn breaches_for_account(
        &self,
        account: &str,
        include_unverified: bool,
    ) -> Result<PendingRequest<Vec<Breach>>, ServiceError> {
        self.query_records(Query::BreachedAccount { account, include_unverified })
    }

    /// Pastes `email` appears in. Fails with [`ServiceError::NotFound`] when
    /// it appears in none.
    pub fn pastes_for_account(&self, email: &str) -> Result<PendingRequest<Vec<Paste>>, ServiceError> {
        self.query_records(Query::PasteAccount { email })
    }

    #[instrument(level = "debug", skip(self))]
    fn query_records<T>(&self, query: Query<'_>) -> Result<PendingRequest<Vec<T>>, ServiceError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let decoder = Arc::clone(&self.decoder);
        pipeline::process_query(
            query.target(self.config.base_url()),
            query.expected_content_type(),
            Arc::clone(&self.transport),
            self.headers.clone(),
            move |body| decode::decode_body(&*decoder, &body),
        )
    }
}
