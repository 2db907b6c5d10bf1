//! Building and submitting a single job.

use std::collections::HashSet;
use std::path::Path;

use pd_core::{JobRef, ProjectRef, RecipeRef};
use uuid::Uuid;

use crate::api::JobApi;
use crate::arguments::{ArtifactRef, JobArguments};
use crate::error::{CloudError, CloudResult};
use crate::types::CreateJobBody;

/// A job being prepared for submission.
///
/// Artifacts must be uploaded through [`NewJob::upload_artifact`] before an
/// argument set may reference them; [`NewJob::create`] refuses any artifact
/// reference this job did not upload.
pub struct NewJob<A: JobApi> {
    api: A,
    project: ProjectRef,
    recipe: RecipeRef,
    name: String,
    description: Option<String>,
    upload_folder: String,
    uploaded: HashSet<String>,
    arguments: Vec<JobArguments>,
}

impl<A: JobApi> NewJob<A> {
    pub fn new(api: A, project: ProjectRef, recipe: RecipeRef, name: impl Into<String>) -> Self {
        Self {
            api,
            project,
            recipe,
            name: name.into(),
            description: None,
            upload_folder: Uuid::new_v4().to_string(),
            uploaded: HashSet::new(),
            arguments: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Project folder that receives this job's uploads. Defaults to a fresh UUID
    /// so repeated submissions never overwrite each other's inputs.
    pub fn with_upload_folder(mut self, folder: impl Into<String>) -> Self {
        self.upload_folder = folder.into();
        self
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    /// Upload `file` under `{upload_folder}/{target_folder}/{file name}`.
    pub fn upload_artifact(&mut self, file: &Path, target_folder: &str) -> CloudResult<ArtifactRef> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CloudError::Io {
                path: file.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
            })?;

        let key = [self.upload_folder.as_str(), target_folder, file_name.as_str()]
            .iter()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty() && *s != ".")
            .collect::<Vec<_>>()
            .join("/");

        self.api.upload_artifact(&self.project, &key, file)?;
        self.uploaded.insert(key.clone());
        Ok(ArtifactRef::new(key))
    }

    pub fn set_arguments(&mut self, arguments: Vec<JobArguments>) {
        self.arguments = arguments;
    }

    pub fn body(&self) -> CloudResult<CreateJobBody> {
        if self.arguments.len() != 1 {
            return Err(CloudError::ArgumentSetCount {
                count: self.arguments.len(),
            });
        }
        for set in &self.arguments {
            for (name, artifact) in set.artifacts() {
                if !self.uploaded.contains(artifact.path()) {
                    return Err(CloudError::ArtifactNotUploaded {
                        name: name.to_string(),
                        path: artifact.path().to_string(),
                    });
                }
            }
        }

        Ok(CreateJobBody {
            source: self.api.recipe_source(&self.recipe),
            name: self.name.clone(),
            description: self.description.clone(),
            arguments: self.arguments.iter().map(JobArguments::to_wire).collect(),
        })
    }

    /// Submit the job. Single attempt.
    pub fn create(self) -> CloudResult<JobRef> {
        let body = self.body()?;
        let job_id = self.api.create_job(&self.project, &body)?;
        Ok(self.project.job(job_id)?)
    }
}
