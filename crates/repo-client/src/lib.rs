//! HTTP clients for the model repository.
//!
//! [`Client`] talks GraphQL to the Repository Service; [`ObjectStoreClient`]
//! performs the unauthenticated PUT/POST/DELETE calls against presigned
//! object store URLs handed out in an upload session.

mod client;
#[cfg(test)]
mod mock;
mod object_store;
pub mod queries;

pub use client::{Client, DEFAULT_API_URL, user_agent};
pub use object_store::ObjectStoreClient;

use modelrepo_protocol::InputError;

/// Errors from the model repository clients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status; the body is kept verbatim for diagnostics.
    #[error("statuscode {status}: {body}")]
    Api { status: u16, body: String },

    /// First entry of a GraphQL `errors` array.
    #[error("{0}")]
    GraphQl(String),

    /// A mutation answered `success: false`.
    #[error("{0}")]
    Remote(String),

    /// The response lacked a payload the caller needs.
    #[error("{what} is nil: {raw}")]
    Missing { what: String, raw: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("API key is not set")]
    MissingApiKey,

    #[error("invalid API key")]
    InvalidKey,
}

impl Error {
    /// Returns true for failures that may succeed when the same request is
    /// sent again: connection problems, timeouts, 408, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Api { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}
