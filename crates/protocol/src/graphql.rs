use serde::{Deserialize, Serialize};

/// A GraphQL request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Value,
}

impl GraphQlRequest {
    /// Builds a request whose variables are `{"input": <input>}`.
    pub fn with_input<T: Serialize>(
        query: impl Into<String>,
        input: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            query: query.into(),
            variables: serde_json::json!({ "input": serde_json::to_value(input)? }),
        })
    }
}

/// Error entry in a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Envelope for every GraphQL response.
///
/// `data` maps the operation name to its payload and is left untyped
/// here; callers pull out the one field they asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Returns the first reported error message, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// Deserializes the payload of `field` inside `data`.
    ///
    /// Returns `Ok(None)` when `data` or the field is absent or null.
    pub fn take_field<T: for<'de> Deserialize<'de>>(
        &mut self,
        field: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        match self.data.as_mut().and_then(|d| d.remove(field)) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}
