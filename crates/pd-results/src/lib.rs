//! pd-results: simulation result folders and analytical mesh payloads.

pub mod aggregate;
pub mod folder;
pub mod types;

use std::path::PathBuf;

pub use aggregate::{aggregate_results, mount_result_sets, result_sets};
pub use folder::{GRIDS_INFO_FILE, ResultFolder, parse_values};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Results folder not found: {}", path.display())]
    FolderNotFound { path: PathBuf },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Mesh serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid value in {} line {line}: {text:?}", path.display())]
    InvalidValue {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("Grid {full_id} is entry {index} but the model has {grid_count} sensor grids")]
    GridIndexOutOfRange {
        index: usize,
        full_id: String,
        grid_count: usize,
    },

    #[error("Sensor grid {grid_id} has no mesh")]
    MissingMesh { grid_id: String },

    #[error("Count mismatch for {full_id}: expected {expected} values, found {found}")]
    CountMismatch {
        full_id: String,
        expected: usize,
        found: usize,
    },

    #[error("{folders} result folders but {names} result names")]
    NameCountMismatch { folders: usize, names: usize },

    #[error("Duplicate result name: {name}")]
    DuplicateName { name: String },
}
