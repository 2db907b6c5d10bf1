//! Job status lookup.

use pd_cloud::JobApi;
use pd_core::{DEFAULT_APP_URL, JobRef, RemoteStatus, SimStatus, dashboard_url_with_base};

use crate::error::AppResult;

/// Current state of a job, as shown on a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatusReport {
    pub status: SimStatus,
    pub remote: RemoteStatus,
    pub message: Option<String>,
    pub url: String,
}

/// Fetch the job once and map its status. No caching; callers poll by calling again.
pub fn get_job_status<A: JobApi>(api: A, job: &JobRef) -> AppResult<JobStatusReport> {
    get_job_status_with_app(api, job, DEFAULT_APP_URL)
}

pub fn get_job_status_with_app<A: JobApi>(
    api: A,
    job: &JobRef,
    app_url: &str,
) -> AppResult<JobStatusReport> {
    let info = api.get_job(job)?;
    let status = SimStatus::from_remote(&info.status.status);
    tracing::debug!(job = %job, remote = %info.status.status, local = %status, "fetched job status");

    Ok(JobStatusReport {
        status,
        remote: info.status.status,
        message: info.status.message,
        url: dashboard_url_with_base(app_url, job.owner(), job.project_name(), &job.job_id),
    })
}
