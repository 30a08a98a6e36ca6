//! Client for presigned object store URLs.
//!
//! Presigned URLs carry their own authorization, so no credentials are
//! attached here.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use tracing::debug;

use crate::Error;

/// HTTP client for part uploads, completion and abort calls.
pub struct ObjectStoreClient {
    http: reqwest::Client,
}

impl ObjectStoreClient {
    /// Creates a client; `connect_timeout` bounds connection setup only, so
    /// large part bodies are never cut off mid-transfer.
    pub fn new(connect_timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(crate::user_agent())
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { http })
    }

    /// PUTs `body` to `url` and returns the raw `ETag` header, if any.
    pub async fn put(&self, url: &str, body: Vec<u8>) -> Result<Option<String>, Error> {
        let len = body.len();
        debug!(bytes = len, "PUT presigned part");
        let resp = self
            .http
            .put(url)
            .header(CONTENT_LENGTH, len)
            .body(body)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        Ok(resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string))
    }

    /// POSTs `body` with the given content type.
    pub async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<(), Error> {
        debug!(bytes = body.len(), content_type, "POST presigned URL");
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Sends a DELETE to `url`.
    pub async fn delete(&self, url: &str) -> Result<(), Error> {
        debug!("DELETE presigned URL");
        let resp = self.http.delete(url).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Maps non-2xx responses to [`Error::Api`] with the body kept verbatim.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
