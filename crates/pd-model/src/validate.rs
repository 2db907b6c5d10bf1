//! Model validation logic.

use crate::schema::{Mesh3D, Model};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_model(model: &Model) -> Result<(), ValidationError> {
    if model.identifier.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "identifier".to_string(),
            value: model.identifier.clone(),
            reason: "must not be empty".to_string(),
        });
    }

    let Some(radiance) = &model.properties.radiance else {
        return Ok(());
    };

    let mut grid_ids = HashSet::new();
    for grid in &radiance.sensor_grids {
        if !grid_ids.insert(&grid.identifier) {
            return Err(ValidationError::DuplicateId {
                id: grid.identifier.clone(),
                context: "sensor_grids".to_string(),
            });
        }
        if let Some(mesh) = &grid.mesh {
            validate_mesh(&grid.identifier, mesh)?;
        }
    }

    Ok(())
}

fn validate_mesh(grid_id: &str, mesh: &Mesh3D) -> Result<(), ValidationError> {
    let vertex_count = mesh.vertices.len();
    for (face_index, face) in mesh.faces.iter().enumerate() {
        if !(3..=4).contains(&face.len()) {
            return Err(ValidationError::InvalidValue {
                field: format!("{grid_id}.mesh.faces[{face_index}]"),
                value: format!("{face:?}"),
                reason: "faces must have 3 or 4 vertices".to_string(),
            });
        }
        if let Some(bad) = face.iter().find(|&&v| v >= vertex_count) {
            return Err(ValidationError::InvalidValue {
                field: format!("{grid_id}.mesh.faces[{face_index}]"),
                value: bad.to_string(),
                reason: format!("vertex index out of range (vertices={vertex_count})"),
            });
        }
    }
    Ok(())
}
