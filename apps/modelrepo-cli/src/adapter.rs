//! Adapters from the HTTP clients to the uploader's collaborator traits.

use modelrepo_client::{Client, Error as ClientError, ObjectStoreClient};
use modelrepo_protocol::{CompleteUploadResult, CreateUploadInput, MutationResult};
use modelrepo_uploader::{BoxFuture, ObjectStore, RepositoryService, UploadError};

/// Maps client errors onto the uploader's taxonomy.
pub fn upload_error(e: ClientError) -> UploadError {
    match e {
        ClientError::Api { status, body } => UploadError::Http {
            status,
            body: body.trim().to_string(),
        },
        e @ ClientError::Http(_) if e.is_transient() => UploadError::Connection(e.to_string()),
        ClientError::Http(e) => UploadError::Protocol(e.to_string()),
        ClientError::GraphQl(message) | ClientError::Remote(message) => {
            UploadError::Remote(message)
        }
        ClientError::Input(e) => e.into(),
        e @ (ClientError::MissingApiKey | ClientError::InvalidKey) => {
            UploadError::Validation(e.to_string())
        }
        e @ (ClientError::Missing { .. } | ClientError::Json(_)) => {
            UploadError::Protocol(e.to_string())
        }
    }
}

/// [`RepositoryService`] backed by the GraphQL client.
pub struct RepositoryAdapter {
    client: Client,
}

impl RepositoryAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RepositoryService for RepositoryAdapter {
    fn create_upload(
        &self,
        input: CreateUploadInput,
    ) -> BoxFuture<'_, Result<MutationResult, UploadError>> {
        Box::pin(async move { self.client.create_upload(&input).await.map_err(upload_error) })
    }

    fn complete_upload(
        &self,
        session_id: String,
    ) -> BoxFuture<'_, Result<CompleteUploadResult, UploadError>> {
        Box::pin(async move {
            self.client
                .complete_upload(&session_id)
                .await
                .map_err(upload_error)
        })
    }
}

/// [`ObjectStore`] backed by the presigned-URL client.
pub struct ObjectStoreAdapter {
    client: ObjectStoreClient,
}

impl ObjectStoreAdapter {
    pub fn new(client: ObjectStoreClient) -> Self {
        Self { client }
    }
}

impl ObjectStore for ObjectStoreAdapter {
    fn put_part(
        &self,
        url: String,
        body: Vec<u8>,
    ) -> BoxFuture<'_, Result<Option<String>, UploadError>> {
        Box::pin(async move { self.client.put(&url, body).await.map_err(upload_error) })
    }

    fn complete(
        &self,
        url: String,
        content_type: &'static str,
        manifest: Vec<u8>,
    ) -> BoxFuture<'_, Result<(), UploadError>> {
        Box::pin(async move {
            self.client
                .post(&url, content_type, manifest)
                .await
                .map_err(upload_error)
        })
    }

    fn abort(&self, url: String) -> BoxFuture<'_, Result<(), UploadError>> {
        Box::pin(async move { self.client.delete(&url).await.map_err(upload_error) })
    }
}
