use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::ServiceError;

/// How many bytes of an undecodable body are echoed into the error.
const BODY_PREVIEW_LEN: usize = 256;

/// Turns a response body into a typed value.
pub trait Decoder: Send + Sync + 'static {
    type Error: fmt::Display;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error>;
}

/// The default structured-data decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    type Error = serde_json::Error;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Decodes `body` with `decoder`, classifying any failure as
/// [`ServiceError::Decode`] with the start of the body attached.
pub fn decode_body<T, D>(decoder: &D, body: &[u8]) -> Result<T, ServiceError>
where
    T: DeserializeOwned,
    D: Decoder,
{
    decoder.decode(body).map_err(|err| {
        let preview = String::from_utf8_lossy(&body[..body.len().min(BODY_PREVIEW_LEN)]);
        ServiceError::Decode(format!("{err}; body: {preview}"))
    })
}
