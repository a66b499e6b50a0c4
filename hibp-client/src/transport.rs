//! The HTTP boundary the pipeline issues its requests through.
//!
//! [`Transport`] is the only capability the library needs from an HTTP
//! client: a single GET with custom headers. Dropping the returned future
//! must abort the exchange, which is how cancellation reaches the network.
//! [`ReqwestTransport`] is the bundled implementation; embedders and tests
//! can supply their own.

use std::error::Error as StdError;
use std::time::Duration;
use std::{fmt, io};

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use url::Url;

/// A GET request ready to be sent.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// No network connectivity: the network is down or has no route to
    /// the host. Refused connections and TLS failures are [`Self::Failed`].
    Offline,
    Failed,
}

/// The exchange did not produce an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn offline(detail: impl Into<String>) -> Self {
        Self { kind: TransportErrorKind::Offline, detail: detail.into() }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self { kind: TransportErrorKind::Failed, detail: detail.into() }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Offline => write!(f, "offline"),
            TransportErrorKind::Failed => write!(f, "request failed"),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Issues one GET request and waits for the full response body.
    async fn get(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify_reqwest_error)?;

        Ok(TransportResponse { status, headers, body: Some(body) })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if is_no_connectivity(&err) {
        TransportError::offline(err.to_string())
    } else {
        TransportError::failed(err.to_string())
    }
}

/// Whether an I/O error somewhere in the source chain of `err` says the
/// network itself is unavailable.
pub fn is_no_connectivity(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(err) = source {
        if err.downcast_ref::<io::Error>().is_some_and(|io_err| is_no_connectivity_kind(io_err.kind())) {
            return true;
        }
        source = err.source();
    }
    false
}

fn is_no_connectivity_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkDown
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::offline("no route").to_string(), "offline: no route");
        assert_eq!(TransportError::failed("timed out").to_string(), "request failed: timed out");
    }

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connect failed")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_no_connectivity_kinds() {
        for kind in [
            io::ErrorKind::NetworkUnreachable,
            io::ErrorKind::HostUnreachable,
            io::ErrorKind::NetworkDown,
        ] {
            assert!(is_no_connectivity(&io::Error::from(kind)), "{kind:?}");
            assert!(is_no_connectivity(&Wrapped(io::Error::from(kind))), "{kind:?}");
        }
    }

    #[test]
    fn test_other_io_failures_are_not_offline() {
        for kind in [
            io::ErrorKind::ConnectionRefused,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::TimedOut,
            io::ErrorKind::InvalidData,
        ] {
            assert!(!is_no_connectivity(&Wrapped(io::Error::from(kind))), "{kind:?}");
        }
        assert!(!is_no_connectivity(&TransportError::failed("tls handshake")));
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_offline() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        // Nothing listens on port 1 of the loopback interface.
        let request = TransportRequest {
            url: Url::parse("http://127.0.0.1:1/range/00000").unwrap(),
            headers: HeaderMap::new(),
        };
        let err = transport.get(request).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Failed);
    }
}
