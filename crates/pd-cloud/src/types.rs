//! Wire types for the platform's project, artifact and job endpoints.

use std::collections::HashMap;

use pd_core::RemoteStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum JobArgumentWire {
    JobArgument { name: String, value: Value },
    JobPathArgument { name: String, source: ArtifactSource },
}

impl JobArgumentWire {
    pub fn name(&self) -> &str {
        match self {
            JobArgumentWire::JobArgument { name, .. }
            | JobArgumentWire::JobPathArgument { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ArtifactSource {
    ProjectFolder { path: String },
}

/// Body of `POST /projects/{owner}/{project}/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateJobBody {
    /// Recipe URL in the registry.
    pub source: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub arguments: Vec<Vec<JobArgumentWire>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedContent {
    pub id: String,
}

/// Presigned form returned by `POST /projects/{owner}/{project}/artifacts`.
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedUpload {
    pub url: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobInfo {
    pub id: String,
    pub status: JobStatusInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatusInfo {
    pub status: RemoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}
