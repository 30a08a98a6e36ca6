//! Collaborator mocks shared by the pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use modelrepo_protocol::{
    CompleteUploadResult, CreateUploadInput, MutationResult, UploadPart, UploadSession,
};

use crate::error::UploadError;
use crate::service::{BoxFuture, ObjectStore, RepositoryService};

/// Repository mock answering from queues and recording requests.
#[derive(Default)]
pub(crate) struct MockRepo {
    pub creates: Mutex<Vec<Result<MutationResult, UploadError>>>,
    pub completes: Mutex<Vec<Result<CompleteUploadResult, UploadError>>>,
    pub create_calls: Mutex<Vec<CreateUploadInput>>,
    pub complete_calls: Mutex<Vec<String>>,
}

impl MockRepo {
    pub fn push_create(&self, result: Result<MutationResult, UploadError>) {
        self.creates.lock().unwrap().push(result);
    }

    pub fn push_complete(&self, result: Result<CompleteUploadResult, UploadError>) {
        self.completes.lock().unwrap().push(result);
    }
}

impl RepositoryService for MockRepo {
    fn create_upload(
        &self,
        input: CreateUploadInput,
    ) -> BoxFuture<'_, Result<MutationResult, UploadError>> {
        Box::pin(async move {
            self.create_calls.lock().unwrap().push(input);
            let mut q = self.creates.lock().unwrap();
            if q.is_empty() {
                Err(UploadError::Remote("no create response".into()))
            } else {
                q.remove(0)
            }
        })
    }

    fn complete_upload(
        &self,
        session_id: String,
    ) -> BoxFuture<'_, Result<CompleteUploadResult, UploadError>> {
        Box::pin(async move {
            self.complete_calls.lock().unwrap().push(session_id.clone());
            let mut q = self.completes.lock().unwrap();
            if q.is_empty() {
                Ok(CompleteUploadResult {
                    success: true,
                    message: String::new(),
                    session_id,
                    status: "COMPLETED".into(),
                })
            } else {
                q.remove(0)
            }
        })
    }
}

/// Object store mock.
///
/// PUTs answer from a per-URL script; unscripted URLs succeed with an
/// unquoted ETag `etag-<last path segment>`.
#[derive(Default)]
pub(crate) struct MockStore {
    pub put_script: Mutex<HashMap<String, Vec<Result<Option<String>, UploadError>>>>,
    pub puts: Mutex<Vec<(String, Vec<u8>)>>,
    pub complete_results: Mutex<Vec<Result<(), UploadError>>>,
    pub completes: Mutex<Vec<(String, String, Vec<u8>)>>,
    pub abort_results: Mutex<Vec<Result<(), UploadError>>>,
    pub aborts: Mutex<Vec<String>>,
    pub put_delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockStore {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            put_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn script_put(&self, url: &str, result: Result<Option<String>, UploadError>) {
        self.put_script
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push(result);
    }

    /// Bodies PUT so far, sorted by URL.
    pub fn put_bodies(&self) -> Vec<(String, Vec<u8>)> {
        let mut puts = self.puts.lock().unwrap().clone();
        puts.sort();
        puts
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    pub fn manifest(&self, index: usize) -> String {
        String::from_utf8(self.completes.lock().unwrap()[index].2.clone()).unwrap()
    }
}

impl ObjectStore for MockStore {
    fn put_part(
        &self,
        url: String,
        body: Vec<u8>,
    ) -> BoxFuture<'_, Result<Option<String>, UploadError>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.put_delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.puts.lock().unwrap().push((url.clone(), body));
            let scripted = {
                let mut script = self.put_script.lock().unwrap();
                script
                    .get_mut(&url)
                    .filter(|q| !q.is_empty())
                    .map(|q| q.remove(0))
            };
            scripted.unwrap_or_else(|| {
                let segment = url.rsplit('/').next().unwrap_or_default();
                Ok(Some(format!("etag-{segment}")))
            })
        })
    }

    fn complete(
        &self,
        url: String,
        content_type: &'static str,
        manifest: Vec<u8>,
    ) -> BoxFuture<'_, Result<(), UploadError>> {
        Box::pin(async move {
            self.completes
                .lock()
                .unwrap()
                .push((url, content_type.to_string(), manifest));
            let mut q = self.complete_results.lock().unwrap();
            if q.is_empty() { Ok(()) } else { q.remove(0) }
        })
    }

    fn abort(&self, url: String) -> BoxFuture<'_, Result<(), UploadError>> {
        Box::pin(async move {
            self.aborts.lock().unwrap().push(url);
            let mut q = self.abort_results.lock().unwrap();
            if q.is_empty() { Ok(()) } else { q.remove(0) }
        })
    }
}

/// A session whose parts point at `https://store/<id>/p<n>`.
pub(crate) fn session(id: &str, part_size: i64, parts: &[i32]) -> UploadSession {
    UploadSession {
        session_id: id.into(),
        upload_id: format!("upload-{id}"),
        key: format!("models/llama/{id}"),
        part_size_bytes: part_size,
        part_count: parts.len() as i32,
        parts: parts
            .iter()
            .map(|&n| UploadPart {
                part_number: n,
                url: format!("https://store/{id}/p{n}"),
                expires_at: String::new(),
            })
            .collect(),
        complete_url: format!("https://store/{id}/complete"),
        abort_url: format!("https://store/{id}/abort"),
        status: "PENDING".into(),
        ..UploadSession::default()
    }
}

pub(crate) fn created(session: UploadSession) -> Result<MutationResult, UploadError> {
    Ok(MutationResult {
        success: true,
        upload: Some(session),
        ..MutationResult::default()
    })
}
