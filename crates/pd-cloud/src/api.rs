//! The remote calls the dashboards make.

use std::path::Path;

use pd_core::{JobRef, ProjectRef, RecipeRef};

use crate::error::CloudResult;
use crate::types::{CreateJobBody, JobInfo};

/// Blocking access to a project's artifacts and jobs.
///
/// Every call is a single attempt. Implementations do not retry or cache.
pub trait JobApi {
    /// Registry URL used as the `source` of a job running `recipe`.
    fn recipe_source(&self, recipe: &RecipeRef) -> String;

    /// Upload `file` into the project folder at `key`.
    fn upload_artifact(&self, project: &ProjectRef, key: &str, file: &Path) -> CloudResult<()>;

    /// Create a job and return its id.
    fn create_job(&self, project: &ProjectRef, body: &CreateJobBody) -> CloudResult<String>;

    /// Fetch the current state of a job.
    fn get_job(&self, job: &JobRef) -> CloudResult<JobInfo>;
}

impl<T: JobApi + ?Sized> JobApi for &T {
    fn recipe_source(&self, recipe: &RecipeRef) -> String {
        (**self).recipe_source(recipe)
    }

    fn upload_artifact(&self, project: &ProjectRef, key: &str, file: &Path) -> CloudResult<()> {
        (**self).upload_artifact(project, key, file)
    }

    fn create_job(&self, project: &ProjectRef, body: &CreateJobBody) -> CloudResult<String> {
        (**self).create_job(project, body)
    }

    fn get_job(&self, job: &JobRef) -> CloudResult<JobInfo> {
        (**self).get_job(job)
    }
}
