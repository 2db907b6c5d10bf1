//! Result visualization.
//!
//! The host is probed once ([`Host::detect`]) and the matching
//! [`VizBackend`] is built once ([`select_backend`]); everything below takes
//! the back-end as an argument instead of consulting global state.

pub mod backend;
pub mod channel;
pub mod host;
pub mod viewer;

use std::path::Path;

use pd_results::{ResultSet, mount_result_sets};
use tracing::info;

pub use backend::{
    EmbeddedViewerBackend, HostPluginBackend, ModelViewOptions, VizBackend, select_backend,
};
pub use channel::{HostChannel, HostMessage, JsonLinesChannel};
pub use host::{HOST_ENV, Host};
pub use viewer::{DirViewerSink, SceneFile, ViewerSink};

use crate::error::AppResult;

/// What a visualization call delivered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VizSummary {
    pub backend: &'static str,
    pub grids: usize,
    pub values: usize,
    pub result_sets: Vec<String>,
}

/// Show a model and mount each result set on it as a colored mesh.
pub fn visualize_model_with_mesh(
    backend: &mut dyn VizBackend,
    model_path: &Path,
    sets: &[ResultSet],
    options: &ModelViewOptions,
) -> AppResult<VizSummary> {
    let model = pd_model::load_hbjson(model_path)?;
    let mut summary = VizSummary {
        backend: backend.name(),
        ..VizSummary::default()
    };

    backend.show_model(&model, options)?;

    if sets.is_empty() || !backend.accepts_meshes() {
        return Ok(summary);
    }

    for result in mount_result_sets(&model, sets)? {
        backend.show_results(&result)?;
        summary.grids += result.mesh.grid_count();
        summary.values += result.mesh.values.len();
        summary.result_sets.push(result.name);
    }

    info!(
        backend = summary.backend,
        sets = summary.result_sets.len(),
        grids = summary.grids,
        "dispatched result meshes"
    );
    Ok(summary)
}

/// Hand a pre-exported scene to the back-end.
pub fn show_scene(backend: &mut dyn VizBackend, path: &Path, key: &str) -> AppResult<VizSummary> {
    let scene = SceneFile::read(path, key)?;
    backend.show_scene(&scene)?;
    Ok(VizSummary {
        backend: backend.name(),
        ..VizSummary::default()
    })
}
