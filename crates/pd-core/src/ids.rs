use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

fn check_segment(what: &'static str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::EmptyId { what });
    }
    if value.contains('/') {
        return Err(CoreError::InvalidId {
            what,
            value: value.to_string(),
            reason: "must not contain '/'",
        });
    }
    Ok(())
}

/// A project on the cloud platform, addressed by account owner and project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProjectRef")]
pub struct ProjectRef {
    pub owner: String,
    pub name: String,
}

impl ProjectRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> CoreResult<Self> {
        let owner = owner.into();
        let name = name.into();
        check_segment("owner", &owner)?;
        check_segment("project", &name)?;
        Ok(Self { owner, name })
    }

    pub fn job(&self, job_id: impl Into<String>) -> CoreResult<JobRef> {
        let job_id = job_id.into();
        check_segment("job id", &job_id)?;
        Ok(JobRef {
            project: self.clone(),
            job_id,
        })
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A remote job. All mutable job state lives on the platform; this is only the address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawJobRef")]
pub struct JobRef {
    pub project: ProjectRef,
    pub job_id: String,
}

impl JobRef {
    pub fn new(
        owner: impl Into<String>,
        project: impl Into<String>,
        job_id: impl Into<String>,
    ) -> CoreResult<Self> {
        ProjectRef::new(owner, project)?.job(job_id)
    }

    pub fn owner(&self) -> &str {
        &self.project.owner
    }

    pub fn project_name(&self) -> &str {
        &self.project.name
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/jobs/{}", self.project, self.job_id)
    }
}

/// Recipe identity: `owner/name:tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRecipeRef")]
pub struct RecipeRef {
    pub owner: String,
    pub name: String,
    pub tag: String,
}

impl RecipeRef {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        tag: impl Into<String>,
    ) -> CoreResult<Self> {
        let recipe = Self {
            owner: owner.into(),
            name: name.into(),
            tag: tag.into(),
        };
        check_segment("recipe owner", &recipe.owner)?;
        check_segment("recipe name", &recipe.name)?;
        check_segment("recipe tag", &recipe.tag)?;
        Ok(recipe)
    }

    /// The daylight-factor recipe published by ladybug-tools.
    pub fn daylight_factor() -> Self {
        Self {
            owner: "ladybug-tools".to_string(),
            name: "daylight-factor".to_string(),
            tag: "latest".to_string(),
        }
    }
}

impl Default for RecipeRef {
    fn default() -> Self {
        Self::daylight_factor()
    }
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.name, self.tag)
    }
}

impl FromStr for RecipeRef {
    type Err = CoreError;

    /// Parses `owner/name` or `owner/name:tag`; the tag defaults to `latest`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidRecipe {
            value: s.to_string(),
        };
        let (owner, rest) = s.split_once('/').ok_or_else(invalid)?;
        let (name, tag) = match rest.split_once(':') {
            Some((name, tag)) => (name, tag),
            None => (rest, "latest"),
        };
        Self::new(owner, name, tag).map_err(|_| invalid())
    }
}

// Deserialized forms. Conversion runs the same checks as the constructors.

#[derive(Deserialize)]
struct RawProjectRef {
    owner: String,
    name: String,
}

impl TryFrom<RawProjectRef> for ProjectRef {
    type Error = CoreError;

    fn try_from(raw: RawProjectRef) -> CoreResult<Self> {
        Self::new(raw.owner, raw.name)
    }
}

#[derive(Deserialize)]
struct RawJobRef {
    project: ProjectRef,
    job_id: String,
}

impl TryFrom<RawJobRef> for JobRef {
    type Error = CoreError;

    fn try_from(raw: RawJobRef) -> CoreResult<Self> {
        raw.project.job(raw.job_id)
    }
}

#[derive(Deserialize)]
struct RawRecipeRef {
    owner: String,
    name: String,
    #[serde(default = "latest_tag")]
    tag: String,
}

fn latest_tag() -> String {
    "latest".to_string()
}

impl TryFrom<RawRecipeRef> for RecipeRef {
    type Error = CoreError;

    fn try_from(raw: RawRecipeRef) -> CoreResult<Self> {
        Self::new(raw.owner, raw.name, raw.tag)
    }
}
