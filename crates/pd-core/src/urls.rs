//! Dashboard links.

/// Web app that hosts project and job pages.
pub const DEFAULT_APP_URL: &str = "https://app.pollination.cloud";

/// Job page on the default web app. Plain substitution, no escaping.
pub fn dashboard_url(owner: &str, project: &str, job_id: &str) -> String {
    dashboard_url_with_base(DEFAULT_APP_URL, owner, project, job_id)
}

pub fn dashboard_url_with_base(base: &str, owner: &str, project: &str, job_id: &str) -> String {
    format!(
        "{}/projects/{}/{}/jobs/{}",
        base.trim_end_matches('/'),
        owner,
        project,
        job_id
    )
}
