//! Error types for the repository client.
//!
//! # Design
//! Every failure of the underlying round-trip (transport, non-2xx status,
//! JSON) is surfaced as-is; the client never retries or reinterprets a
//! status code. `NoObjects` and `MissingProperty` are the only failures
//! produced locally, by `resolve_node_id`.

use thiserror::Error;

/// Error produced by a [`crate::Transport`] implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `AlfrescoClient` and `ContentServiceClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not execute the request.
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A CMIS listing used to resolve a node id had no objects.
    #[error("no objects found under '{path}'")]
    NoObjects { path: String },

    /// A CMIS object lacked a property the operation reads.
    #[error("object has no '{property}' property")]
    MissingProperty { property: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the crate.
pub type ApiResult<T> = Result<T, ApiError>;
