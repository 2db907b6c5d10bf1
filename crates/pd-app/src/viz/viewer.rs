//! Embedded 3D viewer input.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// A pre-exported scene, read whole.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFile {
    pub key: String,
    pub extension: String,
    pub content: Vec<u8>,
}

impl SceneFile {
    pub fn read(path: &Path, key: impl Into<String>) -> AppResult<Self> {
        let content = fs::read(path).map_err(|e| AppError::SceneRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bin".to_string());
        Ok(Self {
            key: key.into(),
            extension,
            content,
        })
    }
}

/// Receives scene bytes for in-page rendering.
pub trait ViewerSink {
    fn render(&mut self, scene: &SceneFile) -> AppResult<()>;
}

/// Publishes scenes as `{key}.{extension}` in a directory served to the page.
pub struct DirViewerSink {
    out_dir: PathBuf,
}

impl DirViewerSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// The published file name. Keys must name a file directly in `out_dir`.
    pub fn path_for(&self, scene: &SceneFile) -> AppResult<PathBuf> {
        let key = scene.key.as_str();
        if key.trim().is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(AppError::InvalidInput(format!(
                "viewer key '{}' must be a plain file name",
                key
            )));
        }
        Ok(self.out_dir.join(format!("{}.{}", key, scene.extension)))
    }
}

impl ViewerSink for DirViewerSink {
    fn render(&mut self, scene: &SceneFile) -> AppResult<()> {
        let path = self.path_for(scene)?;
        fs::create_dir_all(&self.out_dir)?;
        fs::write(&path, &scene.content)?;
        tracing::info!(key = %scene.key, path = %path.display(), bytes = scene.content.len(), "published scene");
        Ok(())
    }
}
