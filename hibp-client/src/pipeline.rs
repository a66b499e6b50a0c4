//! Fetch, classify and decode.
//!
//! Every query runs through [`process_query`]: the target is issued once
//! through the [`Transport`], the outcome is classified into a
//! [`ServiceError`] or a body, and the body is decoded. The result is
//! delivered exactly once through the returned [`PendingRequest`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, instrument, warn};

use crate::error::ServiceError;
use crate::target::QueryTarget;
use crate::transport::{
    Transport, TransportError, TransportErrorKind, TransportRequest, TransportResponse,
};

/// Issues `target` through `transport` and decodes the classified body with
/// `decode`.
///
/// A missing target is reported immediately as [`ServiceError::InvalidTarget`]
/// and no request is made.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn process_query<T, Tr, F>(
    target: Option<QueryTarget>,
    expected_content_type: &'static str,
    transport: Arc<Tr>,
    headers: HeaderMap,
    decode: F,
) -> Result<PendingRequest<T>, ServiceError>
where
    T: Send + 'static,
    Tr: Transport + ?Sized,
    F: FnOnce(Bytes) -> Result<T, ServiceError> + Send + 'static,
{
    let Some(target) = target else {
        debug!("Query target could not be built");
        return Err(ServiceError::InvalidTarget);
    };

    Ok(PendingRequest::spawn(async move {
        let body = fetch(&*transport, target, headers, expected_content_type).await?;
        decode(body)
    }))
}

/// Issues one request and classifies its outcome.
#[instrument(level = "debug", skip_all, fields(url = %target))]
pub async fn fetch<Tr>(
    transport: &Tr,
    target: QueryTarget,
    headers: HeaderMap,
    expected_content_type: &str,
) -> Result<Bytes, ServiceError>
where
    Tr: Transport + ?Sized,
{
    let request = TransportRequest { url: target.into_url(), headers };
    let outcome = transport.get(request).await;
    if let Ok(response) = &outcome {
        debug!(status = %response.status, "Received response");
    }

    let classified = classify(outcome, expected_content_type);
    match &classified {
        Ok(body) => debug!(body_len = body.len(), "Response accepted"),
        Err(err) => debug!(error = %err, "Response classified as failure"),
    }
    classified
}

/// Maps a finished exchange onto a body or a [`ServiceError`].
///
/// Checked in order: transport failure (offline before anything else), 404,
/// 429, then content type and presence of a body.
pub fn classify(
    outcome: Result<TransportResponse, TransportError>,
    expected_content_type: &str,
) -> Result<Bytes, ServiceError> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            return Err(match err.kind {
                TransportErrorKind::Offline => {
                    warn!(error = %err.detail, "No network connectivity");
                    ServiceError::Offline(format!("Error: {}", err.detail))
                }
                TransportErrorKind::Failed => ServiceError::Other(format!("Error: {}", err.detail)),
            });
        }
    };

    match response.status {
        StatusCode::NOT_FOUND => return Err(ServiceError::NotFound),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = retry_after_secs(&response.headers);
            warn!(?retry_after, "Rate limit exceeded");
            return Err(ServiceError::RateLimited {
                retry_after,
                detail: describe(&response),
            });
        }
        _ => {}
    }

    let content_type_matches = media_type(&response.headers)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(expected_content_type));

    response.body.clone().filter(|_| content_type_matches).ok_or_else(|| {
        ServiceError::InvalidResponse(format!(
            "Expected {expected_content_type}, {}",
            describe(&response)
        ))
    })
}

/// Seconds from a numeric `retry-after` header.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// The media type of the response, without parameters such as `charset`.
fn media_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
}

fn describe(response: &TransportResponse) -> String {
    let body_len = response.body.as_ref().map(Bytes::len);
    format!(
        "Response: status {}, headers {:?}, body length {:?}",
        response.status, response.headers, body_len
    )
}

/// Handle to an in-flight query.
///
/// Await it for the single result of the query. [`PendingRequest::cancel`]
/// (or dropping the handle) aborts the exchange; no result is delivered
/// after that. If the exchange already finished, cancelling just discards
/// the result.
#[must_use = "dropping a PendingRequest cancels the query"]
#[derive(Debug)]
pub struct PendingRequest<T> {
    receiver: oneshot::Receiver<Result<T, ServiceError>>,
    abort: AbortHandle,
}

impl<T: Send + 'static> PendingRequest<T> {
    /// Runs `future` as its own task and hands back the handle for its result.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, ServiceError>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let task = tokio::spawn(async move {
            // The receiver is gone only if the handle was dropped.
            let _ = sender.send(future.await);
        });
        Self { receiver, abort: task.abort_handle() }
    }
}

impl<T> PendingRequest<T> {
    /// Best-effort cancel of the underlying exchange.
    pub fn cancel(self) {
        self.abort.abort();
    }

    /// Whether the exchange has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

impl<T> Future for PendingRequest<T> {
    type Output = Result<T, ServiceError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(ServiceError::Other("request task ended without a result".to_string()))
            })
        })
    }
}

impl<T> Drop for PendingRequest<T> {
    fn drop(&mut self) {
        self.abort.abort();
    }
}
