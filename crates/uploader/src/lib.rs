//! Multipart model upload pipeline.
//!
//! This crate implements the **business logic** for pushing model
//! artifacts into the repository's object store. It has no transport
//! dependencies: the app provides [`RepositoryService`] and
//! [`ObjectStore`] implementations that bridge to the real HTTP clients.
//!
//! # Pipeline
//!
//! 1. **Enumerate**: walk the model directory in a stable order
//! 2. **Negotiate**: ask the Repository Service for an upload session
//! 3. **Transfer**: PUT every part's byte range to its presigned URL
//! 4. **Complete**: POST the part manifest to the completion URL
//! 5. **Finalize**: mark the session complete on the Repository Service
//!
//! The [`BatchOrchestrator`] runs steps 2–5 once per file and aborts the
//! remote session when step 3 or 4 fails.

pub mod completion;
pub mod error;
pub mod finalize;
#[cfg(test)]
mod mock;
pub mod negotiate;
pub mod orchestrator;
pub mod parts;
pub mod scanner;
pub mod service;
pub mod types;

// Re-export primary types for convenience.
pub use completion::{abort_session, submit_manifest};
pub use error::UploadError;
pub use finalize::finalize_session;
pub use negotiate::create_session;
pub use orchestrator::BatchOrchestrator;
pub use parts::PartTransfer;
pub use scanner::enumerate_files;
pub use service::{BoxFuture, ObjectStore, RepositoryService};
pub use types::{
    FileUploadResult, NegotiatedSession, SessionTemplate, UploadCandidate, UploadEvent,
    UploadOptions,
};
