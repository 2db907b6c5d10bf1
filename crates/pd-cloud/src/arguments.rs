//! Job argument sets.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{ArtifactSource, JobArgumentWire};

/// A file uploaded into the project folder, referenced by its project path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    path: String,
}

impl ArtifactRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Integer(i64),
    Text(String),
    Artifact(ArtifactRef),
}

impl ArgumentValue {
    pub fn is_artifact(&self) -> bool {
        matches!(self, ArgumentValue::Artifact(_))
    }
}

/// One argument set for a job: recipe input name to value, ordered by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobArguments {
    entries: BTreeMap<String, ArgumentValue>,
}

impl JobArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    pub fn integer(&mut self, name: impl Into<String>, value: i64) -> &mut Self {
        self.insert(name, ArgumentValue::Integer(value))
    }

    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.insert(name, ArgumentValue::Text(value.into()))
    }

    pub fn artifact(&mut self, name: impl Into<String>, artifact: ArtifactRef) -> &mut Self {
        self.insert(name, ArgumentValue::Artifact(artifact))
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn artifacts(&self) -> impl Iterator<Item = (&str, &ArtifactRef)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            ArgumentValue::Artifact(a) => Some((k.as_str(), a)),
            _ => None,
        })
    }

    /// Scalar entries only, for comparing argument sets across uploads.
    pub fn scalars(&self) -> BTreeMap<&str, &ArgumentValue> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_artifact())
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    pub fn to_wire(&self) -> Vec<JobArgumentWire> {
        self.entries
            .iter()
            .map(|(name, value)| {
                let name = name.clone();
                match value {
                    ArgumentValue::Integer(v) => JobArgumentWire::JobArgument {
                        name,
                        value: Value::from(*v),
                    },
                    ArgumentValue::Text(v) => JobArgumentWire::JobArgument {
                        name,
                        value: Value::from(v.as_str()),
                    },
                    ArgumentValue::Artifact(a) => JobArgumentWire::JobPathArgument {
                        name,
                        source: ArtifactSource::ProjectFolder {
                            path: a.path.clone(),
                        },
                    },
                }
            })
            .collect()
    }
}
