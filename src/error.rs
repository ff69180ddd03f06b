use thiserror::Error;

use crate::api::ApiError;
use crate::topology::TopologyError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("Deployment template get error: {0}")]
    TemplateGet(#[source] ApiError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A short title plus the full message, the way errors are reported to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
}

impl Error {
    pub fn diagnostic(&self) -> Diagnostic {
        let summary = match self {
            Self::Topology(err) => err.summary(),
            Self::TemplateGet(_) => "deployment template error",
            Self::Api(_) => "API error",
            Self::Io(_) => "I/O error",
            Self::Json(_) => "failed reading input",
            Self::Config(_) => "configuration error",
        };

        Diagnostic {
            summary: summary.to_string(),
            detail: self.to_string(),
        }
    }
}
