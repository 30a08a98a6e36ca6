//! Multipart transfer mechanics for presigned-URL uploads.
//!
//! Everything here is independent of the network: the part plan that maps
//! a session's parts onto byte ranges of a file, random-access range reads,
//! ETag normalization, the `CompleteMultipartUpload` manifest, the retry
//! policy for part PUTs and transfer speed measurement.

mod etag;
mod manifest;
mod plan;
mod progress;
mod reader;
mod retry;

pub use etag::normalize_etag;
pub use manifest::{CompletedPart, MANIFEST_CONTENT_TYPE, S3_NAMESPACE, build_manifest};
pub use plan::{PlannedPart, ensure_fully_uploaded, plan_parts};
pub use progress::SpeedCalculator;
pub use reader::RangeReader;
pub use retry::RetryPolicy;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid part size {0}")]
    InvalidPartSize(i64),

    #[error("upload does not contain any parts")]
    NoParts,

    #[error("no data remaining for part {0}")]
    NoDataRemaining(i32),

    #[error("uploaded {uploaded} bytes but artifact size is {expected} bytes")]
    SizeMismatch { uploaded: u64, expected: u64 },

    #[error("duplicate part number {0}")]
    DuplicatePart(i32),

    #[error("XML error: {0}")]
    Xml(String),
}
