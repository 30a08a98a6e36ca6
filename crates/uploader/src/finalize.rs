//! Session finalization on the Repository Service.

use modelrepo_protocol::{CompleteUploadInput, CompleteUploadResult};
use tracing::info;

use crate::error::UploadError;
use crate::service::RepositoryService;

/// Marks the session complete after the object store accepted the
/// manifest.
///
/// An empty `session_id` means the negotiation response was incomplete;
/// it is reported as a protocol error without calling the service.
pub async fn finalize_session(
    repo: &dyn RepositoryService,
    session_id: &str,
) -> Result<CompleteUploadResult, UploadError> {
    let input = CompleteUploadInput::new(session_id).map_err(|_| {
        UploadError::Protocol("missing session identifier for completion".into())
    })?;

    let result = repo.complete_upload(input.session_id).await?;
    if !result.success {
        let message = result.message.trim();
        return Err(UploadError::Remote(if message.is_empty() {
            "completeModelRepoUpload failed".into()
        } else {
            message.to_string()
        }));
    }

    info!(session_id = %result.session_id, status = %result.status, "upload session finalized");
    Ok(result)
}
