//! Repository Service GraphQL client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.
//! Every mutation goes through [`Client::mutate`], which turns the four
//! ways a GraphQL call can fail (HTTP status, `errors` array, missing
//! `data`, `success: false`) into [`Error`] values.

use std::time::Duration;

use modelrepo_protocol::{
    AddModelInput, CompleteUploadInput, CompleteUploadResult, CreateUploadInput, GraphQlRequest,
    GraphQlResponse, InputError, Model, ModelVersion, MutationResult, VersionStatusResult,
};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Error;
use crate::queries;

/// Production GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.runpod.io/graphql";

/// `User-Agent` sent with every control-plane request.
pub fn user_agent() -> String {
    format!(
        "modelrepo/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Mutation payloads that carry a `success`/`message` pair.
trait Outcome {
    fn success(&self) -> bool;
    fn message(&self) -> &str;
}

macro_rules! impl_outcome {
    ($($ty:ty),*) => {
        $(impl Outcome for $ty {
            fn success(&self) -> bool {
                self.success
            }
            fn message(&self) -> &str {
                &self.message
            }
        })*
    };
}

impl_outcome!(MutationResult, CompleteUploadResult, VersionStatusResult);

/// Repository Service client.
pub struct Client {
    http: reqwest::Client,
    api_url: String,
}

impl Client {
    /// Creates a client for `api_url` authenticating with `api_key`.
    ///
    /// `timeout` bounds each whole request.
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Result<Self, Error> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| Error::InvalidKey)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.to_string(),
        })
    }

    /// Sends `request` and returns the payload of `field` with the raw body.
    async fn mutate<T>(&self, field: &str, request: &GraphQlRequest) -> Result<(T, String), Error>
    where
        T: DeserializeOwned + Outcome,
    {
        debug!(operation = field, "sending GraphQL request");
        let resp = self.http.post(&self.api_url).json(request).send().await?;
        let status = resp.status();
        let raw = resp.text().await?;

        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
                body: raw,
            });
        }

        let mut envelope: GraphQlResponse = serde_json::from_str(&raw)?;
        if let Some(message) = envelope.first_error() {
            return Err(Error::GraphQl(message.to_string()));
        }

        let Some(result) = envelope.take_field::<T>(field)? else {
            return Err(Error::Missing {
                what: "data".into(),
                raw,
            });
        };

        if !result.success() {
            let message = result.message().trim();
            if message.is_empty() {
                return Err(Error::Remote(format!("{field} failed: {raw}")));
            }
            return Err(Error::Remote(message.to_string()));
        }

        Ok((result, raw))
    }

    /// Registers a model and returns it.
    pub async fn add_model(&self, input: &AddModelInput) -> Result<Model, Error> {
        let input = input.normalized()?;
        let request = GraphQlRequest::with_input(queries::ADD_MODEL, &input)?;
        let (result, raw): (MutationResult, _) = self.mutate("addModelToRepo", &request).await?;
        result.model.ok_or_else(|| Error::Missing {
            what: "model".into(),
            raw,
        })
    }

    /// Allocates a multipart upload session.
    ///
    /// The returned result is known to be successful; whether its `upload`
    /// payload is usable is left to the caller.
    pub async fn create_upload(&self, input: &CreateUploadInput) -> Result<MutationResult, Error> {
        let input = input.normalized()?;
        let request = GraphQlRequest::with_input(queries::CREATE_UPLOAD, &input)?;
        let (result, _) = self.mutate("createModelRepoUpload", &request).await?;
        Ok(result)
    }

    /// Marks an upload session complete.
    pub async fn complete_upload(&self, session_id: &str) -> Result<CompleteUploadResult, Error> {
        let input = CompleteUploadInput::new(session_id)?;
        let request = GraphQlRequest::with_input(queries::COMPLETE_UPLOAD, &input)?;
        let (result, _) = self.mutate("completeModelRepoUpload", &request).await?;
        Ok(result)
    }

    /// Moves the model version identified by `hash` to `status`.
    pub async fn update_version_status(
        &self,
        hash: &str,
        status: &str,
    ) -> Result<ModelVersion, Error> {
        let hash = hash.trim();
        if hash.is_empty() {
            return Err(InputError::Empty("hash").into());
        }
        let status = status.trim();
        if status.is_empty() {
            return Err(InputError::Empty("status").into());
        }

        let request = GraphQlRequest {
            query: queries::UPDATE_VERSION_STATUS.to_string(),
            variables: serde_json::json!({ "hash": hash, "status": status }),
        };
        let (result, raw): (VersionStatusResult, _) =
            self.mutate("updateModelVersionStatus", &request).await?;
        result.model_version.ok_or_else(|| Error::Missing {
            what: "modelVersion".into(),
            raw,
        })
    }
}
