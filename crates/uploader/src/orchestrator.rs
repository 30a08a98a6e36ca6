//! Batch orchestrator.
//!
//! Runs negotiate → transfer → complete → finalize once per file, in
//! enumeration order, emitting progress events and honoring cancellation.
//! The batch is all-or-nothing: the first failing file stops it.

use std::sync::Arc;

use modelrepo_protocol::UploadSession;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::completion::{abort_session, submit_manifest};
use crate::error::UploadError;
use crate::finalize::finalize_session;
use crate::negotiate::create_session;
use crate::parts::PartTransfer;
use crate::service::{ObjectStore, RepositoryService};
use crate::types::{FileUploadResult, SessionTemplate, UploadCandidate, UploadEvent, UploadOptions};

/// Orchestrates multipart uploads for a list of files.
pub struct BatchOrchestrator {
    repo: Arc<dyn RepositoryService>,
    store: Arc<dyn ObjectStore>,
    options: UploadOptions,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
    cancel: CancellationToken,
}

impl BatchOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        repo: Arc<dyn RepositoryService>,
        store: Arc<dyn ObjectStore>,
        options: UploadOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            repo,
            store,
            options,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this batch.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Uploads every candidate in order.
    ///
    /// Stops at the first failure and returns it; the error message names
    /// the failing file. On success returns one result per file.
    pub async fn upload_all(
        &self,
        candidates: &[UploadCandidate],
        template: &SessionTemplate,
    ) -> Result<Vec<FileUploadResult>, UploadError> {
        let mut results = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.upload_file(candidate, template).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    self.emit(UploadEvent::Failed {
                        path: candidate.relative_path.clone(),
                        error: e.to_string(),
                    });
                    error!(file = %candidate.relative_path, error = %e, "upload failed");
                    return Err(e);
                }
            }
        }

        info!(files = results.len(), "batch upload complete");
        Ok(results)
    }

    /// Runs the full pipeline for one file.
    pub async fn upload_file(
        &self,
        candidate: &UploadCandidate,
        template: &SessionTemplate,
    ) -> Result<FileUploadResult, UploadError> {
        let rel = &candidate.relative_path;
        self.check_cancelled()?;
        self.emit(UploadEvent::FileStarted {
            path: rel.clone(),
            size_bytes: candidate.size_bytes,
        });

        let input = template.create_input(rel, candidate.size_bytes);
        let session = create_session(self.repo.as_ref(), &input)
            .await
            .map_err(|e| e.context(format!("create upload for {rel}")))?
            .session;

        self.emit(UploadEvent::SessionCreated {
            path: rel.clone(),
            session_id: session.session_id.clone(),
            parts: session.parts.len(),
            part_size: session.part_size_bytes,
        });

        // Until the object store accepts the manifest the multipart upload
        // is pending and must not be left dangling on failure.
        if let Err(e) = self.transfer_and_complete(candidate, &session).await {
            abort_session(self.store.as_ref(), &session).await;
            return Err(e);
        }

        // The object is assembled; aborting now would be meaningless.
        let completion = finalize_session(self.repo.as_ref(), &session.session_id)
            .await
            .map_err(|e| e.context(format!("complete upload session for {rel}")))?;

        info!(
            file = %rel,
            key = %session.key,
            session_id = %completion.session_id,
            status = %completion.status,
            "model artifact uploaded"
        );
        self.emit(UploadEvent::FileCompleted {
            path: rel.clone(),
            key: session.key.clone(),
            session_id: completion.session_id.clone(),
            status: completion.status.clone(),
        });

        Ok(FileUploadResult {
            relative_path: rel.clone(),
            key: session.key,
            session_id: completion.session_id,
            status: completion.status,
            parts: session.parts.len(),
            size_bytes: candidate.size_bytes,
        })
    }

    async fn transfer_and_complete(
        &self,
        candidate: &UploadCandidate,
        session: &UploadSession,
    ) -> Result<(), UploadError> {
        let rel = &candidate.relative_path;

        let transfer = PartTransfer::new(Arc::clone(&self.store), self.options, self.cancel.clone())
            .with_events(self.events_tx.clone());
        let parts = transfer
            .upload_parts(session, &candidate.absolute_path, rel, candidate.size_bytes)
            .await
            .map_err(|e| e.context(format!("upload {rel}")))?;

        self.check_cancelled()?;
        submit_manifest(self.store.as_ref(), &session.complete_url, &parts)
            .await
            .map_err(|e| e.context(format!("upload {rel}")))
    }

    fn emit(&self, event: UploadEvent) {
        let _ = self.events_tx.try_send(event);
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        Ok(())
    }
}
