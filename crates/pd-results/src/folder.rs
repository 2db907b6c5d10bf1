//! Read access to a simulation results folder.

use crate::types::GridInfo;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const GRIDS_INFO_FILE: &str = "grids_info.json";
pub const RESULT_EXTENSION: &str = "res";

#[derive(Debug, Clone)]
pub struct ResultFolder {
    root_dir: PathBuf,
}

impl ResultFolder {
    pub fn open(root_dir: impl Into<PathBuf>) -> ResultsResult<Self> {
        let root_dir = root_dir.into();
        if !root_dir.is_dir() {
            return Err(ResultsError::FolderNotFound { path: root_dir });
        }
        Ok(Self { root_dir })
    }

    pub fn result_path(&self, full_id: &str) -> PathBuf {
        self.root_dir
            .join(format!("{}.{}", full_id, RESULT_EXTENSION))
    }

    pub fn load_grids_info(&self) -> ResultsResult<Vec<GridInfo>> {
        let path = self.root_dir.join(GRIDS_INFO_FILE);
        let content = read_file(&path)?;
        serde_json::from_str(&content).map_err(|source| ResultsError::Json { path, source })
    }

    pub fn load_values(&self, full_id: &str) -> ResultsResult<Vec<f64>> {
        let path = self.result_path(full_id);
        let content = read_file(&path)?;
        parse_values(&path, &content)
    }
}

fn read_file(path: &Path) -> ResultsResult<String> {
    fs::read_to_string(path).map_err(|source| ResultsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `.res` file: one float per line, blank lines skipped.
pub fn parse_values(path: &Path, content: &str) -> ResultsResult<Vec<f64>> {
    let mut values = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ResultsError::InvalidValue {
                path: path.to_path_buf(),
                line: index + 1,
                text: trimmed.to_string(),
            })?;
        values.push(value);
    }
    Ok(values)
}
