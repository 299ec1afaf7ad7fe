//! Error types for the dispatcher, its collaborators and the files client.
//!
//! # Design
//! `DispatchError` is never returned to the host. Every variant maps to a
//! status code and its `Display` output is the exact response body, so the
//! dispatcher turns any failure into an `HttpResponse` with a single
//! conversion.

use thiserror::Error;

use crate::http::HttpResponse;

/// Failure to turn a request target into path segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The path does not carry the `apis/<dapp>` prefix.
    #[error("Invalid URL")]
    MissingPrefix,

    /// The target is not a valid URL or path.
    #[error("Invalid URL: {0}")]
    Malformed(String),
}

/// A failure reported by a content store or ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollabError(pub String);

impl CollabError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Every way a dispatched request can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Url(#[from] UrlError),

    #[error("No resource with name: {0}")]
    UnknownResource(String),

    #[error("Malformed request: Bad url.")]
    BadPostUrl,

    #[error("Malformed request: bad url.")]
    BadGetUrl,

    /// Empty body, unparsable body, or a body missing `name` or `data`.
    #[error("Malformed request: No filename provided.")]
    MissingFilename,

    #[error("Illegal request: {0}")]
    IllegalMethod(String),

    #[error("Internal error: failed to read file")]
    StoreWrite,

    #[error("Internal error: failed to register file: {0}")]
    LedgerMessage(String),

    #[error("Internal error: failed to commit: {0}")]
    LedgerCommit(String),

    #[error("File not found: {0}")]
    NotFound(String),
}

impl DispatchError {
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::Url(_)
            | DispatchError::UnknownResource(_)
            | DispatchError::BadPostUrl
            | DispatchError::BadGetUrl
            | DispatchError::MissingFilename
            | DispatchError::IllegalMethod(_) => 400,
            DispatchError::NotFound(_) => 404,
            DispatchError::StoreWrite
            | DispatchError::LedgerMessage(_)
            | DispatchError::LedgerCommit(_) => 500,
        }
    }
}

impl From<DispatchError> for HttpResponse {
    fn from(err: DispatchError) -> Self {
        HttpResponse::text(err.status(), err.to_string())
    }
}

/// Errors returned by `FilesClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: no file is registered under that name.
    #[error("file not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
