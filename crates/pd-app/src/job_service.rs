//! Daylight-factor job submission.

use std::path::Path;

use pd_cloud::{ArtifactRef, JobApi, JobArguments, NewJob};
use pd_core::{JobRef, ProjectRef, RecipeRef};
use tracing::info;

use crate::config::JobDefaults;
use crate::error::{AppError, AppResult};

/// Scalar inputs of the daylight-factor recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct DaylightFactorInputs {
    pub cpu_count: u32,
    /// Pattern selecting which sensor grids to simulate.
    pub grid_filter: String,
    /// Minimum number of sensors handed to each CPU.
    pub min_sensor_count: u32,
    /// Omitted from the job when `None` or blank.
    pub radiance_parameters: Option<String>,
}

impl From<&JobDefaults> for DaylightFactorInputs {
    fn from(defaults: &JobDefaults) -> Self {
        Self {
            cpu_count: defaults.cpu_count,
            grid_filter: defaults.grid_filter.clone(),
            min_sensor_count: defaults.min_sensor_count,
            radiance_parameters: Some(defaults.radiance_parameters.clone()),
        }
    }
}

/// Request to submit one job.
pub struct JobRequest<'a> {
    pub project: ProjectRef,
    pub recipe: RecipeRef,
    pub name: String,
    pub description: Option<String>,
    pub inputs: DaylightFactorInputs,
    pub model_path: &'a Path,
}

pub fn validate_inputs(inputs: &DaylightFactorInputs) -> AppResult<()> {
    if inputs.cpu_count == 0 {
        return Err(AppError::InvalidInput(
            "cpu count must be at least 1".to_string(),
        ));
    }
    if inputs.min_sensor_count == 0 {
        return Err(AppError::InvalidInput(
            "min sensor count must be at least 1".to_string(),
        ));
    }
    if inputs.grid_filter.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "grid filter must not be empty (use '*' for all grids)".to_string(),
        ));
    }
    Ok(())
}

/// Combine the scalar inputs with the uploaded model into one argument set.
pub fn assemble_arguments(inputs: &DaylightFactorInputs, model: ArtifactRef) -> JobArguments {
    let mut args = JobArguments::new();
    args.integer("cpu-count", i64::from(inputs.cpu_count))
        .text("grid-filter", inputs.grid_filter.clone())
        .integer("min-sensor-count", i64::from(inputs.min_sensor_count))
        .artifact("model", model);

    if let Some(params) = inputs
        .radiance_parameters
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        args.text("radiance-parameters", params);
    }

    args
}

/// Upload the model, then submit a job with a single argument set.
pub fn create_job<A: JobApi>(api: A, request: &JobRequest) -> AppResult<JobRef> {
    validate_inputs(&request.inputs)?;
    if !request.model_path.is_file() {
        return Err(AppError::InvalidInput(format!(
            "model file not found: {}",
            request.model_path.display()
        )));
    }

    let mut new_job = NewJob::new(
        api,
        request.project.clone(),
        request.recipe.clone(),
        request.name.clone(),
    );
    if let Some(description) = &request.description {
        new_job = new_job.with_description(description.clone());
    }

    let model = new_job.upload_artifact(request.model_path, ".")?;
    let arguments = assemble_arguments(&request.inputs, model);
    new_job.set_arguments(vec![arguments]);

    let job = new_job.create()?;
    info!(job = %job, recipe = %request.recipe, "submitted job");
    Ok(job)
}
