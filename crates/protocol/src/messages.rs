use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Model, ModelVersion, UploadSession};

/// Free-form key/value metadata attached to models and uploads.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Error returned when a request input is missing a required field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} must be a positive integer")]
    NotPositive(&'static str),
}

/// Trims `value` and fails if nothing is left.
fn required(field: &'static str, value: &str) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(InputError::Empty(field))
    } else {
        Ok(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Request inputs
// ---------------------------------------------------------------------------

/// Registers a model with the repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddModelInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential_reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_status: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl AddModelInput {
    /// Trims every string field and checks the required ones.
    pub fn normalized(&self) -> Result<Self, InputError> {
        Ok(Self {
            name: required("name", &self.name)?,
            credential_type: self.credential_type.trim().to_string(),
            credential_reference: self.credential_reference.trim().to_string(),
            model_status: self.model_status.trim().to_string(),
            version_status: self.version_status.trim().to_string(),
            metadata: self.metadata.clone(),
        })
    }
}

/// Asks the control-plane to allocate a multipart upload session.
///
/// Sizes are strings on the wire so that 64-bit values survive
/// JavaScript number precision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadInput {
    pub name: String,
    pub file_name: String,
    pub file_size_bytes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub part_size_bytes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential_reference: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl CreateUploadInput {
    /// Trims every string field and checks `name`, `fileName` and
    /// `fileSizeBytes` (which must be a positive integer).
    pub fn normalized(&self) -> Result<Self, InputError> {
        let name = required("name", &self.name)?;
        let file_name = required("fileName", &self.file_name)?;
        let file_size_bytes = required("fileSizeBytes", &self.file_size_bytes)?;
        match file_size_bytes.parse::<u64>() {
            Ok(n) if n > 0 => {}
            _ => return Err(InputError::NotPositive("fileSizeBytes")),
        }

        Ok(Self {
            name,
            file_name,
            file_size_bytes,
            part_size_bytes: self.part_size_bytes.trim().to_string(),
            content_type: self.content_type.trim().to_string(),
            credential_type: self.credential_type.trim().to_string(),
            credential_reference: self.credential_reference.trim().to_string(),
            metadata: self.metadata.clone(),
        })
    }
}

/// Marks an upload session complete on the control-plane side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadInput {
    pub session_id: String,
}

impl CompleteUploadInput {
    pub fn new(session_id: &str) -> Result<Self, InputError> {
        Ok(Self {
            session_id: required("sessionId", session_id)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Payload returned by model repository mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ModelVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadSession>,
}

/// Result of marking an upload session complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Result of `updateModelVersionStatus`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStatusResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<ModelVersion>,
}
