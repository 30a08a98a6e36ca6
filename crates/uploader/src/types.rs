//! Data types for the upload flow.

use std::path::PathBuf;
use std::time::Duration;

use modelrepo_protocol::{CreateUploadInput, Metadata, Model, ModelVersion, UploadSession};
use modelrepo_transfer::RetryPolicy;

/// A regular file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub absolute_path: PathBuf,
    /// Path below the upload root, `/`-separated on every platform.
    pub relative_path: String,
    pub size_bytes: u64,
}

/// Per-batch fields copied into every file's session request.
#[derive(Debug, Clone, Default)]
pub struct SessionTemplate {
    /// Model name.
    pub name: String,
    /// Advisory part size; the session's `partSizeBytes` wins.
    pub part_size_hint: Option<u64>,
    pub content_type: String,
    pub credential_type: String,
    pub credential_reference: String,
    pub metadata: Metadata,
}

impl SessionTemplate {
    /// Builds the session request for one file.
    pub fn create_input(&self, file_name: &str, file_size: u64) -> CreateUploadInput {
        CreateUploadInput {
            name: self.name.clone(),
            file_name: file_name.to_string(),
            file_size_bytes: file_size.to_string(),
            part_size_bytes: self
                .part_size_hint
                .map(|n| n.to_string())
                .unwrap_or_default(),
            content_type: self.content_type.clone(),
            credential_type: self.credential_type.clone(),
            credential_reference: self.credential_reference.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Tuning for the part transfer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Parts of one file in flight at once; 1 uploads sequentially.
    pub part_concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            part_concurrency: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// A session that passed negotiation, with whatever the service
/// returned alongside it.
#[derive(Debug, Clone)]
pub struct NegotiatedSession {
    pub session: UploadSession,
    pub model: Option<Model>,
    pub version: Option<ModelVersion>,
}

/// Progress event emitted during an upload batch.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A file is about to be negotiated.
    FileStarted { path: String, size_bytes: u64 },
    /// The Repository Service allocated a session for the file.
    SessionCreated {
        path: String,
        session_id: String,
        parts: usize,
        part_size: i64,
    },
    /// One part was acknowledged by the object store.
    PartUploaded {
        path: String,
        part_number: i32,
        bytes: u64,
        uploaded_bytes: u64,
        total_bytes: u64,
        bytes_per_second: f64,
        /// Estimated time left for this file; `None` until a speed is known.
        eta: Option<Duration>,
    },
    /// The file is durably stored and its session finalized.
    FileCompleted {
        path: String,
        key: String,
        session_id: String,
        status: String,
    },
    /// The file failed; the batch stops here.
    Failed { path: String, error: String },
}

/// Outcome of one durably uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadResult {
    pub relative_path: String,
    /// Storage key reported by the session.
    pub key: String,
    pub session_id: String,
    /// Terminal session status from the Repository Service.
    pub status: String,
    pub parts: usize,
    pub size_bytes: u64,
}
