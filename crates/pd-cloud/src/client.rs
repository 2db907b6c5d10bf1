//! HTTP client for the Pollination platform API.

use std::path::Path;
use std::time::Duration;

use pd_core::{JobRef, ProjectRef, RecipeRef};
use reqwest::blocking::{Client, RequestBuilder, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::JobApi;
use crate::error::{CloudError, CloudResult};
use crate::types::{CreateJobBody, CreatedContent, JobInfo, PresignedUpload};

pub const DEFAULT_API_URL: &str = "https://api.pollination.cloud";
const API_KEY_HEADER: &str = "x-pollination-token";

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    /// Account API key, sent as `x-pollination-token`.
    pub api_token: Option<String>,
    /// Session token, sent as a bearer `Authorization` header.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            access_token: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ApiClientConfig {
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

pub struct ApiClient {
    http: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> CloudResult<Self> {
        if config.api_token.is_none() && config.access_token.is_none() {
            return Err(CloudError::Config(
                "an API key or access token is required".to_string(),
            ));
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.api_token {
            Some(token) => request.header(API_KEY_HEADER, token),
            None => request,
        };
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get_json<R: DeserializeOwned>(&self, path: &str) -> CloudResult<R> {
        debug!(path, "GET");
        let response = self.authorize(self.http.get(self.url(path))).send()?;
        read_json(response)
    }

    fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> CloudResult<R> {
        debug!(path, "POST");
        let response = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()?;
        read_json(response)
    }
}

fn read_json<R: DeserializeOwned>(response: reqwest::blocking::Response) -> CloudResult<R> {
    if !response.status().is_success() {
        return Err(CloudError::from_response(response));
    }
    let text = response.text()?;
    serde_json::from_str(&text).map_err(|e| CloudError::InvalidResponse(e.to_string()))
}

impl JobApi for ApiClient {
    fn recipe_source(&self, recipe: &RecipeRef) -> String {
        format!(
            "{}/registries/{}/recipe/{}/{}",
            self.base_url(),
            recipe.owner,
            recipe.name,
            recipe.tag
        )
    }

    fn upload_artifact(&self, project: &ProjectRef, key: &str, file: &Path) -> CloudResult<()> {
        let content = std::fs::read(file).map_err(|source| CloudError::Io {
            path: file.to_path_buf(),
            source,
        })?;

        let signed: PresignedUpload = self.post_json(
            &format!("/projects/{}/{}/artifacts", project.owner, project.name),
            &serde_json::json!({ "key": key }),
        )?;

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| key.to_string());
        let mut form = multipart::Form::new();
        for (field, value) in &signed.fields {
            form = form.text(field.clone(), value.clone());
        }
        let size = content.len();
        form = form.part("file", multipart::Part::bytes(content).file_name(file_name));

        // The presigned URL carries its own credentials.
        let response = self.http.post(&signed.url).multipart(form).send()?;
        if !response.status().is_success() {
            return Err(CloudError::from_response(response));
        }

        info!(project = %project, key, bytes = size, "uploaded artifact");
        Ok(())
    }

    fn create_job(&self, project: &ProjectRef, body: &CreateJobBody) -> CloudResult<String> {
        let created: CreatedContent = self.post_json(
            &format!("/projects/{}/{}/jobs", project.owner, project.name),
            body,
        )?;
        info!(project = %project, job_id = %created.id, name = %body.name, "created job");
        Ok(created.id)
    }

    fn get_job(&self, job: &JobRef) -> CloudResult<JobInfo> {
        self.get_json(&format!(
            "/projects/{}/{}/jobs/{}",
            job.owner(),
            job.project_name(),
            job.job_id
        ))
    }
}
