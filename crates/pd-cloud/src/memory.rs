//! In-process stand-in for the platform, used for dry runs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use pd_core::{JobRef, ProjectRef, RecipeRef, RemoteStatus};

use crate::api::JobApi;
use crate::client::DEFAULT_API_URL;
use crate::error::{CloudError, CloudResult};
use crate::types::{CreateJobBody, JobInfo, JobStatusInfo};

/// A call observed by [`MemoryJobApi`], in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Upload { project: ProjectRef, key: String },
    CreateJob { project: ProjectRef, body: CreateJobBody },
    GetJob { job: JobRef },
}

/// Records every call and keeps created jobs in memory. Nothing leaves the process.
#[derive(Debug, Default)]
pub struct MemoryJobApi {
    calls: RefCell<Vec<ApiCall>>,
    jobs: RefCell<HashMap<String, JobInfo>>,
    next_id: Cell<u64>,
}

impl MemoryJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn created_jobs(&self) -> Vec<CreateJobBody> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ApiCall::CreateJob { body, .. } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    /// Move a known job to `status`, or register it if unseen.
    pub fn set_status(&self, job_id: &str, status: RemoteStatus) {
        let mut jobs = self.jobs.borrow_mut();
        let entry = jobs.entry(job_id.to_string()).or_insert_with(|| JobInfo {
            id: job_id.to_string(),
            status: JobStatusInfo {
                status: RemoteStatus::Created,
                message: None,
                started_at: None,
                finished_at: None,
            },
        });
        entry.status.status = status;
    }
}

impl JobApi for MemoryJobApi {
    fn recipe_source(&self, recipe: &RecipeRef) -> String {
        format!(
            "{}/registries/{}/recipe/{}/{}",
            DEFAULT_API_URL, recipe.owner, recipe.name, recipe.tag
        )
    }

    fn upload_artifact(&self, project: &ProjectRef, key: &str, file: &Path) -> CloudResult<()> {
        std::fs::metadata(file).map_err(|source| CloudError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        self.calls.borrow_mut().push(ApiCall::Upload {
            project: project.clone(),
            key: key.to_string(),
        });
        Ok(())
    }

    fn create_job(&self, project: &ProjectRef, body: &CreateJobBody) -> CloudResult<String> {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let job_id = format!("job-{n}");

        self.calls.borrow_mut().push(ApiCall::CreateJob {
            project: project.clone(),
            body: body.clone(),
        });
        self.set_status(&job_id, RemoteStatus::Created);
        Ok(job_id)
    }

    fn get_job(&self, job: &JobRef) -> CloudResult<JobInfo> {
        self.calls
            .borrow_mut()
            .push(ApiCall::GetJob { job: job.clone() });
        self.jobs
            .borrow()
            .get(&job.job_id)
            .cloned()
            .ok_or_else(|| CloudError::Http {
                status: 404,
                message: format!("job {} not found", job.job_id),
            })
    }
}
