//! Upload error types.

use modelrepo_protocol::InputError;
use modelrepo_transfer::TransferError;

/// Errors produced by the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Bad input detected before any network call.
    #[error("{0}")]
    Validation(String),

    /// A collaborator broke the upload contract.
    #[error("{0}")]
    Protocol(String),

    /// Non-2xx HTTP response; `body` is kept verbatim.
    #[error("status {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("connection error: {0}")]
    Connection(String),

    /// The Repository Service answered `success: false`.
    #[error("{0}")]
    Remote(String),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cancelled")]
    Cancelled,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<UploadError>,
    },
}

impl From<InputError> for UploadError {
    fn from(e: InputError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl UploadError {
    /// Wraps the error with a prefix naming what was being done.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error beneath any context wrappers.
    pub fn root(&self) -> &UploadError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true if repeating the request may succeed: connection
    /// failures and HTTP 408, 429 or 5xx.
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Self::Connection(_) => true,
            Self::Http { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled)
    }
}
