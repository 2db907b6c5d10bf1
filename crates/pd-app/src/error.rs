//! Error types for the pd-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Missing API key: pass --api-key or set {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model error: {0}")]
    Model(#[from] pd_model::ModelError),

    #[error("Results error: {0}")]
    Results(#[from] pd_results::ResultsError),

    #[error("Platform error: {0}")]
    Cloud(#[from] pd_cloud::CloudError),

    #[error("Visualization error: {0}")]
    Viz(String),

    #[error("Failed to read scene file: {path}")]
    SceneRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pd-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// A suggestion for the user, when the failure has an obvious remedy.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::Cloud(err) if err.is_unauthorized() => Some(
                "the platform rejected the credentials; check --api-key or POLLINATION_API_KEY",
            ),
            AppError::Cloud(err) if err.is_not_found() => {
                Some("check the owner, project and job id")
            }
            _ => None,
        }
    }
}

impl From<pd_core::CoreError> for AppError {
    fn from(err: pd_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Viz(format!("Failed to encode message: {}", err))
    }
}
