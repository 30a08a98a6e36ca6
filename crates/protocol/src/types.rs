use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Version status assigned once an artifact is durably uploaded.
pub const VERSION_STATUS_READY: &str = "READY";

/// A model registered in the repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub provider: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<ModelVersion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<ModelUser>,
}

/// Relationship between a repository user and a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUser {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential_reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

/// One stored version of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

/// A multipart upload session allocated by the control-plane.
///
/// `part_size_bytes` is authoritative for all chunk arithmetic; any part
/// size the client asked for is only a hint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub upload_id: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default, with = "crate::part_size")]
    pub part_size_bytes: i64,
    #[serde(default)]
    pub part_count: i32,
    #[serde(default)]
    pub expires_in_seconds: i64,
    #[serde(default)]
    pub parts: Vec<UploadPart>,
    #[serde(default)]
    pub complete_url: String,
    #[serde(default)]
    pub abort_url: String,
    #[serde(default)]
    pub status: String,
}

impl UploadSession {
    /// Returns true if the session carries nothing usable.
    ///
    /// The control-plane has been seen answering `upload: {}` on success.
    pub fn is_empty(&self) -> bool {
        self.upload_id.is_empty() && self.parts.is_empty() && self.complete_url.is_empty()
    }
}

/// A presigned URL for one part of a multipart upload (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPart {
    pub part_number: i32,
    pub url: String,
    #[serde(default)]
    pub expires_at: String,
}
