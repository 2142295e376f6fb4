//! Error types for the invoicing API client.
//!
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! resource does not exist" from "the API answered with something that is
//! not an envelope". Failures the API reports *inside* its envelope are not
//! errors here; they come back as `ApiResponse { succeeded: false, .. }`.

use thiserror::Error;

/// Errors returned while building requests, executing them, or parsing
/// responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API returned 404 without a response envelope.
    #[error("resource not found")]
    NotFound,

    /// The API returned a non-2xx status and a body that is not an envelope.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The invoice `typeCode` does not map to a creation endpoint.
    #[error("unsupported invoice type code: {0:?}")]
    UnsupportedInvoiceType(String),

    /// The round-trip itself failed (connection refused, DNS, reset...).
    #[error("transport failed: {0}")]
    Transport(String),
}
