//! Shared application service layer for the pollination dashboard tools.
//!
//! The CLI (and any other front-end) calls into this crate for the three
//! flows: job submission, job status, and result visualization.

pub mod config;
pub mod error;
pub mod job_service;
pub mod status_service;
pub mod viz;

// Re-export key types for convenience
pub use config::{API_KEY_ENV, DashboardConfig, JobDefaults, resolve_api_key};
pub use error::{AppError, AppResult};
pub use job_service::{DaylightFactorInputs, JobRequest, assemble_arguments, create_job};
pub use status_service::{JobStatusReport, get_job_status, get_job_status_with_app};
pub use viz::{Host, VizBackend, VizSummary, select_backend, show_scene, visualize_model_with_mesh};
