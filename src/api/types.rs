use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::pipeline::AggregateError;
use crate::source::origin::ResourcePath;

/// Body of `POST /render`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Packages to load, in the order the renderer must execute them.
    pub files: Vec<ResourcePath>,
    /// `require()`-style path of the module exporting the component.
    pub path: String,
    /// Props handed to the component, passed through untouched.
    pub props: Map<String, Value>,
}

/// Reply to `POST /render`: either the assembled package contents or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderResponse {
    Contents { contents: String },
    Error { error: ErrorDetail },
}

impl RenderResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// One or more packages could not be fetched.
    Fetch,
    /// The request body was not a well-formed render request.
    MalformedRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub path: String,
    pub reason: String,
}

impl ErrorDetail {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedRequest,
            message: message.into(),
            failures: Vec::new(),
        }
    }
}

impl From<&AggregateError> for ErrorDetail {
    fn from(err: &AggregateError) -> Self {
        Self {
            kind: ErrorKind::Fetch,
            message: err.to_string(),
            failures: err
                .failures()
                .iter()
                .map(|f| FailureDetail {
                    path: f.error.path().to_string(),
                    reason: f.error.to_string(),
                })
                .collect(),
        }
    }
}
