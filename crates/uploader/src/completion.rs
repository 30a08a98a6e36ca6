//! Object-store side completion and abort.

use modelrepo_protocol::UploadSession;
use modelrepo_transfer::{CompletedPart, MANIFEST_CONTENT_TYPE, build_manifest};
use tracing::{debug, warn};

use crate::error::UploadError;
use crate::service::ObjectStore;

/// Builds the `CompleteMultipartUpload` manifest and POSTs it to
/// `complete_url`.
pub async fn submit_manifest(
    store: &dyn ObjectStore,
    complete_url: &str,
    parts: &[CompletedPart],
) -> Result<(), UploadError> {
    let complete_url = complete_url.trim();
    if complete_url.is_empty() {
        return Err(UploadError::Protocol(
            "upload session missing completion URL".into(),
        ));
    }
    if parts.is_empty() {
        return Err(UploadError::Protocol(
            "completion manifest has no parts".into(),
        ));
    }

    let manifest = build_manifest(parts)?;
    debug!(parts = parts.len(), bytes = manifest.len(), "submitting completion manifest");

    store
        .complete(complete_url.to_string(), MANIFEST_CONTENT_TYPE, manifest)
        .await
        .map_err(|e| e.context("completion request failed"))
}

/// Best-effort abort of a session that will not be completed.
///
/// Failures are logged and swallowed so the caller can propagate the
/// error that caused the abort.
pub async fn abort_session(store: &dyn ObjectStore, session: &UploadSession) {
    let abort_url = session.abort_url.trim();
    if abort_url.is_empty() {
        debug!(session_id = %session.session_id, "no abort URL, leaving session");
        return;
    }

    match store.abort(abort_url.to_string()).await {
        Ok(()) => debug!(session_id = %session.session_id, "upload session aborted"),
        Err(e) => warn!(
            session_id = %session.session_id,
            error = %e,
            "failed to abort upload session"
        ),
    }
}
