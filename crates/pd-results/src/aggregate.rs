//! Merge per-grid result files into analytical mesh payloads.

use std::collections::HashSet;
use std::path::PathBuf;

use pd_model::Model;

use crate::folder::ResultFolder;
use crate::types::{AnalyticalMesh, MountedResult, ResultSet};
use crate::{ResultsError, ResultsResult};

/// Pair each `grids_info.json` entry with the model grid at the same position
/// and concatenate geometry and values in that order.
pub fn aggregate_results(model: &Model, folder: &ResultFolder) -> ResultsResult<AnalyticalMesh> {
    let infos = folder.load_grids_info()?;
    let grids = model.sensor_grids();
    let mut merged = AnalyticalMesh::default();

    for (index, info) in infos.iter().enumerate() {
        let grid = grids
            .get(index)
            .ok_or_else(|| ResultsError::GridIndexOutOfRange {
                index,
                full_id: info.full_id.clone(),
                grid_count: grids.len(),
            })?;
        let mesh = grid.mesh.as_ref().ok_or_else(|| ResultsError::MissingMesh {
            grid_id: grid.identifier.clone(),
        })?;

        let values = folder.load_values(&info.full_id)?;

        for expected in [Some(grid.sensor_count()), info.count].into_iter().flatten() {
            if values.len() != expected {
                return Err(ResultsError::CountMismatch {
                    full_id: info.full_id.clone(),
                    expected,
                    found: values.len(),
                });
            }
        }

        tracing::debug!(
            full_id = %info.full_id,
            grid = %grid.identifier,
            values = values.len(),
            "merged grid results"
        );

        merged.mesh.push(serde_json::to_value(mesh)?);
        merged.values.extend(values);
    }

    Ok(merged)
}

/// Pair result folders with display names. Missing names default to `result_{i}`.
pub fn result_sets(folders: Vec<PathBuf>, names: Vec<String>) -> ResultsResult<Vec<ResultSet>> {
    if !names.is_empty() && names.len() != folders.len() {
        return Err(ResultsError::NameCountMismatch {
            folders: folders.len(),
            names: names.len(),
        });
    }

    let names = if names.is_empty() {
        (0..folders.len()).map(|i| format!("result_{}", i)).collect()
    } else {
        names
    };

    Ok(folders
        .into_iter()
        .zip(names)
        .map(|(folder, name)| ResultSet { folder, name })
        .collect())
}

/// Aggregate several result sets against the same model.
///
/// Names key the downstream messages, so they must be unique.
pub fn mount_result_sets(model: &Model, sets: &[ResultSet]) -> ResultsResult<Vec<MountedResult>> {
    let mut seen = HashSet::new();
    for set in sets {
        if !seen.insert(set.name.as_str()) {
            return Err(ResultsError::DuplicateName {
                name: set.name.clone(),
            });
        }
    }

    sets.iter()
        .map(|set| {
            let folder = ResultFolder::open(&set.folder)?;
            let mesh = aggregate_results(model, &folder)?;
            tracing::info!(
                name = %set.name,
                grids = mesh.grid_count(),
                values = mesh.values.len(),
                "mounted result set"
            );
            Ok(MountedResult {
                name: set.name.clone(),
                mesh,
            })
        })
        .collect()
}
