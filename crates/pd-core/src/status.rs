//! Job status vocabularies.
//!
//! The platform reports a larger, open set of job states. Dashboards only care
//! about five local outcomes, so every remote value collapses into exactly one
//! [`SimStatus`].

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Job status as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteStatus {
    Created,
    PreProcessing,
    Running,
    Completed,
    Failed,
    Cancelled,
    Unknown,
    /// A value outside the vocabulary this build knows about.
    Unrecognized(String),
}

impl RemoteStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RemoteStatus::Created => "Created",
            RemoteStatus::PreProcessing => "Pre-Processing",
            RemoteStatus::Running => "Running",
            RemoteStatus::Completed => "Completed",
            RemoteStatus::Failed => "Failed",
            RemoteStatus::Cancelled => "Cancelled",
            RemoteStatus::Unknown => "Unknown",
            RemoteStatus::Unrecognized(raw) => raw,
        }
    }
}

impl FromStr for RemoteStatus {
    type Err = Infallible;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        Ok(match normalized.as_str() {
            "created" => RemoteStatus::Created,
            "pre_processing" | "preprocessing" => RemoteStatus::PreProcessing,
            "running" => RemoteStatus::Running,
            "completed" => RemoteStatus::Completed,
            "failed" => RemoteStatus::Failed,
            "cancelled" | "canceled" => RemoteStatus::Cancelled,
            "unknown" => RemoteStatus::Unknown,
            _ => RemoteStatus::Unrecognized(s.to_string()),
        })
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RemoteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RemoteStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(status) = raw.parse();
        Ok(status)
    }
}

/// Local status taxonomy shown on dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimStatus {
    /// Nothing has been submitted yet.
    #[default]
    NotStarted,
    Incomplete,
    Complete,
    Failed,
    Cancelled,
}

impl SimStatus {
    pub fn from_remote(remote: &RemoteStatus) -> Self {
        match remote {
            RemoteStatus::Created
            | RemoteStatus::PreProcessing
            | RemoteStatus::Running
            | RemoteStatus::Unknown => SimStatus::Incomplete,
            RemoteStatus::Failed => SimStatus::Failed,
            RemoteStatus::Cancelled => SimStatus::Cancelled,
            RemoteStatus::Completed => SimStatus::Complete,
            RemoteStatus::Unrecognized(raw) => {
                tracing::warn!(status = %raw, "unrecognized remote job status, treating as incomplete");
                SimStatus::Incomplete
            }
        }
    }

    /// True once the job can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SimStatus::Complete | SimStatus::Failed | SimStatus::Cancelled
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            SimStatus::NotStarted => "NOTSTARTED",
            SimStatus::Incomplete => "INCOMPLETE",
            SimStatus::Complete => "COMPLETE",
            SimStatus::Failed => "FAILED",
            SimStatus::Cancelled => "CANCELLED",
        }
    }
}

impl From<&RemoteStatus> for SimStatus {
    fn from(remote: &RemoteStatus) -> Self {
        SimStatus::from_remote(remote)
    }
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn known() -> impl Strategy<Value = RemoteStatus> {
        prop_oneof![
            Just(RemoteStatus::Created),
            Just(RemoteStatus::PreProcessing),
            Just(RemoteStatus::Running),
            Just(RemoteStatus::Completed),
            Just(RemoteStatus::Failed),
            Just(RemoteStatus::Cancelled),
            Just(RemoteStatus::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn mapping_is_deterministic(raw in "\\PC{0,24}") {
            let Ok(a) = raw.parse::<RemoteStatus>();
            let Ok(b) = raw.parse::<RemoteStatus>();
            prop_assert_eq!(SimStatus::from_remote(&a), SimStatus::from_remote(&b));
            prop_assert_ne!(SimStatus::from_remote(&a), SimStatus::NotStarted);
        }

        #[test]
        fn wire_spelling_round_trips(status in known()) {
            let Ok(parsed) = status.as_str().parse::<RemoteStatus>();
            prop_assert_eq!(parsed, status);
        }
    }
}
