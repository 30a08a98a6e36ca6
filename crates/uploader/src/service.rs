//! Collaborator traits.
//!
//! The app implements these on top of the real HTTP clients. Using
//! traits keeps the pipeline decoupled from transport and testable with
//! mocks.

use std::future::Future;
use std::pin::Pin;

use modelrepo_protocol::{CompleteUploadResult, CreateUploadInput, MutationResult};

use crate::error::UploadError;

/// Boxed future returned by collaborator methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The control-plane that allocates and finalizes upload sessions.
pub trait RepositoryService: Send + Sync {
    /// Requests a multipart upload session for one file.
    fn create_upload(
        &self,
        input: CreateUploadInput,
    ) -> BoxFuture<'_, Result<MutationResult, UploadError>>;

    /// Marks the session complete once the object store has assembled it.
    fn complete_upload(
        &self,
        session_id: String,
    ) -> BoxFuture<'_, Result<CompleteUploadResult, UploadError>>;
}

/// Object storage reached through presigned URLs.
///
/// Non-2xx responses must be reported as [`UploadError::Http`] and
/// failures to get any response as [`UploadError::Connection`], so that
/// retry classification works.
pub trait ObjectStore: Send + Sync {
    /// PUTs one part and returns the raw `ETag` response header.
    fn put_part(
        &self,
        url: String,
        body: Vec<u8>,
    ) -> BoxFuture<'_, Result<Option<String>, UploadError>>;

    /// POSTs the completion manifest.
    fn complete(
        &self,
        url: String,
        content_type: &'static str,
        manifest: Vec<u8>,
    ) -> BoxFuture<'_, Result<(), UploadError>>;

    /// Abandons the multipart upload.
    fn abort(&self, url: String) -> BoxFuture<'_, Result<(), UploadError>>;
}
