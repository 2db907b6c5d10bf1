//! Error handling for remote platform calls.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub type CloudResult<T> = Result<T, CloudError>;

#[derive(Deserialize)]
struct RawError {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Error)]
pub enum CloudError {
    /// Transport-level failure: DNS, TLS, timeout, connection reset.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Invalid reference: {0}")]
    Reference(#[from] pd_core::CoreError),

    #[error("Argument {name} references {path}, which was not uploaded for this job")]
    ArtifactNotUploaded { name: String, path: String },

    #[error("A job takes exactly one argument set, got {count}")]
    ArgumentSetCount { count: usize },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl CloudError {
    pub fn from_response(response: reqwest::blocking::Response) -> CloudError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        CloudError::Http {
            status,
            message: pretty_message(&body),
        }
    }

    /// Credentials were rejected by the platform.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CloudError::Http { status: 401 | 403, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::Http { status: 404, .. })
    }
}

fn pretty_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<RawError>(body) {
        if let Some(message) = parsed.message {
            return message;
        }
        match parsed.detail {
            Some(serde_json::Value::String(detail)) => return detail,
            Some(detail) => return detail.to_string(),
            None => {}
        }
    }
    body.to_string()
}
