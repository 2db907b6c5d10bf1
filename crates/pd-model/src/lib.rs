//! pd-model: HBJSON model loading and validation.

pub mod schema;
pub mod validate;

use std::path::Path;

use serde_json::Value;

pub use schema::*;
pub use validate::{ValidationError, validate_model};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_hbjson(path: &Path) -> ModelResult<Model> {
    let content = std::fs::read_to_string(path)?;
    let model = parse_hbjson(&content)?;
    tracing::debug!(
        path = %path.display(),
        identifier = %model.identifier,
        grids = model.sensor_grids().len(),
        "loaded model"
    );
    Ok(model)
}

pub fn parse_hbjson(content: &str) -> ModelResult<Model> {
    let model: Model = serde_json::from_str(content)?;
    validate_model(&model)?;
    Ok(model)
}

impl Model {
    /// Sensor grids in document order; empty when the model has no radiance properties.
    pub fn sensor_grids(&self) -> &[SensorGrid] {
        self.properties
            .radiance
            .as_ref()
            .map(|r| r.sensor_grids.as_slice())
            .unwrap_or(&[])
    }

    /// The full model document, as sent to host applications.
    pub fn to_value(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
