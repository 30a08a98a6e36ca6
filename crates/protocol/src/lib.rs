//! Wire types for the model repository control-plane.
//!
//! The Repository Service speaks GraphQL over HTTP. This crate holds the
//! request inputs, mutation results and upload-session shapes exchanged
//! with it, plus the lenient `partSizeBytes` decoder. It performs no I/O.

pub mod graphql;
pub mod messages;
pub mod part_size;
pub mod types;

// Re-export primary types for convenience.
pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use messages::{
    AddModelInput, CompleteUploadInput, CompleteUploadResult, CreateUploadInput, InputError,
    Metadata, MutationResult, VersionStatusResult,
};
pub use part_size::PartSizeError;
pub use types::{Model, ModelUser, ModelVersion, UploadPart, UploadSession, VERSION_STATUS_READY};
