//! Client for the Have I Been Pwned breach-notification service.
//!
//! Three read-only queries are supported:
//!
//! - breaches, all of them or those of one domain
//! - breaches and pastes an account appears in
//! - how often a password appears in the breach corpus, using the
//!   k-anonymity range API so neither the password nor its full hash is sent
//!
//! Each query builds a request URL, issues it through a [`Transport`],
//! classifies the HTTP outcome into a [`ServiceError`] and decodes the body.
//! Results arrive through a [`PendingRequest`], which is a future that can
//! also be cancelled. Nothing is cached and nothing is retried: a
//! [`ServiceError::RateLimited`] carries the server's retry hint and leaves
//! backoff to the caller.
//!
//! # Usage
//!
//! ```no_run
//! use hibp_client::{ClientConfig, HibpService, ServiceError};
//!
//! # async fn run() -> Result<(), ServiceError> {
//! let service = HibpService::new(ClientConfig::from_env("my-app/1.0"))?;
//!
//! match service.breaches_for_account("john.doe@example.com", false)?.await {
//!     Ok(breaches) => println!("{} breaches", breaches.len()),
//!     Err(ServiceError::NotFound) => println!("no breaches"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod date;
pub mod decode;
pub mod email;
pub mod error;
pub mod hash;
pub mod models;
pub mod password;
pub mod pipeline;
pub mod service;
pub mod target;
pub mod transport;

pub use config::{ClientConfig, HIBP_API_KEY_ENV, HIBP_BASE_URL_ENV};
pub use decode::{Decoder, JsonDecoder};
pub use email::is_email;
pub use error::ServiceError;
pub use hash::{digest, hex_digest};
pub use models::{Breach, Paste, PasteService};
pub use password::{PREFIX_LEN, count_in_range, split_hash};
pub use pipeline::{PendingRequest, process_query};
pub use service::HibpService;
pub use target::{Query, QueryTarget};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
