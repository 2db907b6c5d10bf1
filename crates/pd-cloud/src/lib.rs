//! pd-cloud: blocking client for the cloud simulation platform.
//!
//! Covers the three calls the dashboards need: uploading an input artifact,
//! creating a job from a recipe, and reading a job's status.

pub mod api;
pub mod arguments;
pub mod client;
pub mod error;
pub mod memory;
pub mod new_job;
pub mod types;

pub use api::JobApi;
pub use arguments::{ArgumentValue, ArtifactRef, JobArguments};
pub use client::{ApiClient, ApiClientConfig, DEFAULT_API_URL};
pub use error::{CloudError, CloudResult};
pub use memory::{ApiCall, MemoryJobApi};
pub use new_job::NewJob;
pub use types::*;
