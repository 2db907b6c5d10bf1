//! HBJSON model schema.
//!
//! Only the parts the dashboards read are typed. Everything else is kept in
//! `extra` maps so a loaded model serializes back to the same document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    #[serde(rename = "type", default = "default_model_type")]
    pub kind: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default)]
    pub properties: ModelProperties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModelProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiance: Option<RadianceProperties>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RadianceProperties {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_grids: Vec<SensorGrid>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorGrid {
    #[serde(rename = "type", default = "default_grid_type")]
    pub kind: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensors: Vec<Sensor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Mesh3D>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SensorGrid {
    /// Number of result values expected for this grid.
    ///
    /// Grids list their sensors explicitly; a grid without a sensor list
    /// falls back to one value per mesh face.
    pub fn sensor_count(&self) -> usize {
        if !self.sensors.is_empty() {
            return self.sensors.len();
        }
        self.mesh.as_ref().map(|m| m.faces.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sensor {
    pub pos: [f64; 3],
    pub dir: [f64; 3],
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mesh3D {
    #[serde(rename = "type", default = "default_mesh_type")]
    pub kind: String,
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_model_type() -> String {
    "Model".to_string()
}

fn default_grid_type() -> String {
    "SensorGrid".to_string()
}

fn default_mesh_type() -> String {
    "Mesh3D".to_string()
}
