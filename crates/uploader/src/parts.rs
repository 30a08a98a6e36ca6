//! Part transfer engine.
//!
//! Uploads every part of one file to its presigned URL. The whole plan is
//! computed before the first PUT, so a session whose parts do not cover
//! the file exactly fails without any network traffic. Parts then run on
//! a bounded pool of tokio tasks; results are re-sorted and re-counted
//! before they are handed to the completion step.

use std::path::Path;
use std::sync::Arc;

use modelrepo_protocol::UploadSession;
use modelrepo_transfer::{
    CompletedPart, PlannedPart, RangeReader, RetryPolicy, SpeedCalculator, ensure_fully_uploaded,
    normalize_etag, plan_parts,
};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::UploadError;
use crate::service::ObjectStore;
use crate::types::{UploadEvent, UploadOptions};

/// Uploads the parts of one file.
pub struct PartTransfer {
    store: Arc<dyn ObjectStore>,
    concurrency: usize,
    retry: RetryPolicy,
    cancel: CancellationToken,
    events_tx: Option<mpsc::Sender<UploadEvent>>,
}

impl PartTransfer {
    pub fn new(store: Arc<dyn ObjectStore>, options: UploadOptions, cancel: CancellationToken) -> Self {
        Self {
            store,
            concurrency: options.part_concurrency.max(1),
            retry: options.retry,
            cancel,
            events_tx: None,
        }
    }

    /// Sends a `PartUploaded` event for every acknowledged part.
    pub fn with_events(mut self, events_tx: mpsc::Sender<UploadEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    /// Uploads the byte ranges of `path` (`file_size` bytes, labelled
    /// `label` in events and logs) described by `session`.
    ///
    /// Returns the completed parts sorted by part number. Fails on the
    /// first part that cannot be uploaded; parts still in flight are
    /// aborted.
    pub async fn upload_parts(
        &self,
        session: &UploadSession,
        path: &Path,
        label: &str,
        file_size: u64,
    ) -> Result<Vec<CompletedPart>, UploadError> {
        let plan = plan_parts(&session.parts, session.part_size_bytes, file_size)?;
        self.check_cancelled()?;

        let reader = tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            move || RangeReader::open(&path)
        })
        .await
        .map_err(join_error)??;

        // The file may have changed since it was enumerated; the plan must
        // cover what is on disk now.
        let planned: u64 = plan.iter().map(|p| p.len).sum();
        ensure_fully_uploaded(planned, reader.file_size())?;
        let reader = Arc::new(reader);

        debug!(
            file = %label,
            parts = plan.len(),
            concurrency = self.concurrency,
            "uploading parts"
        );

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        for part in plan {
            tasks.spawn(upload_one(
                Arc::clone(&self.store),
                Arc::clone(&reader),
                Arc::clone(&permits),
                self.retry,
                part,
            ));
        }

        let speed = SpeedCalculator::default();
        let mut completed = Vec::with_capacity(tasks.len());
        let mut uploaded: u64 = 0;
        // Marks the start of the transfer for speed measurement.
        speed.add_sample(0);

        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => {
                    tasks.abort_all();
                    return Err(UploadError::Cancelled);
                }
                next = tasks.join_next() => next,
            };
            let Some(joined) = next else {
                break;
            };

            let (part, len) = match joined.map_err(join_error)? {
                Ok(done) => done,
                Err(e) => {
                    tasks.abort_all();
                    return Err(e);
                }
            };

            uploaded += len;
            speed.add_sample(len);
            debug!(file = %label, part = part.part_number, bytes = len, "part uploaded");
            self.emit(UploadEvent::PartUploaded {
                path: label.to_string(),
                part_number: part.part_number,
                bytes: len,
                uploaded_bytes: uploaded,
                total_bytes: file_size,
                bytes_per_second: speed.bytes_per_second(),
                eta: speed.eta(file_size.saturating_sub(uploaded)),
            });
            completed.push(part);
        }

        // Terminal byte accounting over what actually came back.
        ensure_fully_uploaded(uploaded, file_size)?;
        completed.sort_by_key(|p| p.part_number);
        Ok(completed)
    }

    fn emit(&self, event: UploadEvent) {
        // Progress is lossy: a consumer that falls behind misses events
        // instead of stalling the upload.
        if let Some(tx) = &self.events_tx {
            let _ = tx.try_send(event);
        }
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        Ok(())
    }
}

/// Reads and PUTs one part, retrying transient failures.
async fn upload_one(
    store: Arc<dyn ObjectStore>,
    reader: Arc<RangeReader>,
    permits: Arc<Semaphore>,
    retry: RetryPolicy,
    part: PlannedPart,
) -> Result<(CompletedPart, u64), UploadError> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_| UploadError::Cancelled)?;

    let data = tokio::task::spawn_blocking({
        let part = part.clone();
        move || reader.read_part(&part)
    })
    .await
    .map_err(join_error)??;

    let number = part.part_number;
    let raw_etag = retry
        .run("part upload", UploadError::is_retryable, |_| {
            store.put_part(part.url.clone(), data.clone())
        })
        .await
        .map_err(|e| e.context(format!("upload part {number} failed")))?;

    let e_tag = raw_etag
        .as_deref()
        .and_then(normalize_etag)
        .ok_or_else(|| UploadError::Protocol(format!("upload part {number} missing ETag")))?;

    Ok((
        CompletedPart {
            part_number: number,
            e_tag,
        },
        part.len,
    ))
}

fn join_error(e: tokio::task::JoinError) -> UploadError {
    UploadError::Io(std::io::Error::other(format!("task join error: {e}")))
}
