//! Result data types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One entry of `grids_info.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridInfo {
    pub full_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Sensor count as written by the simulation, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Merged geometry and values for every grid of one result set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ResultPayload {
    AnalyticalMesh(AnalyticalMesh),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalyticalMesh {
    /// Grid meshes, in `grids_info.json` order.
    pub mesh: Vec<Value>,
    /// Concatenated per-sensor values, in the same order.
    pub values: Vec<f64>,
}

impl AnalyticalMesh {
    pub fn into_payload(self) -> ResultPayload {
        ResultPayload::AnalyticalMesh(self)
    }

    pub fn grid_count(&self) -> usize {
        self.mesh.len()
    }
}

/// A results folder mounted under a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub folder: PathBuf,
    pub name: String,
}

/// Aggregated payload for one mounted result set.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedResult {
    pub name: String,
    pub mesh: AnalyticalMesh,
}
