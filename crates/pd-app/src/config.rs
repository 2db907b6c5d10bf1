//! Dashboard configuration file.

use std::path::Path;
use std::time::Duration;

use pd_cloud::{ApiClientConfig, DEFAULT_API_URL};
use pd_core::{DEFAULT_APP_URL, RecipeRef};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable holding the account API key.
pub const API_KEY_ENV: &str = "POLLINATION_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    pub recipe: RecipeRef,
    pub defaults: JobDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Web app used for dashboard links.
    pub app_url: String,
    pub timeout_s: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            timeout_s: 60,
        }
    }
}

/// Form defaults for a daylight-factor submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobDefaults {
    pub cpu_count: u32,
    pub grid_filter: String,
    pub min_sensor_count: u32,
    pub radiance_parameters: String,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            cpu_count: 50,
            grid_filter: "*".to_string(),
            min_sensor_count: 200,
            radiance_parameters: "-ab 2 -aa 0.1 -ad 2048 -ar 64".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from YAML. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        // An empty document deserializes to unit, not a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Client settings for `api_key`.
    pub fn client_config(&self, api_key: String) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api.base_url.clone(),
            api_token: Some(api_key),
            access_token: None,
            timeout: Duration::from_secs(self.api.timeout_s.max(1)),
        }
    }
}

/// An explicit key wins over the environment.
pub fn resolve_api_key(explicit: Option<String>) -> AppResult<String> {
    explicit
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(AppError::MissingApiKey(API_KEY_ENV))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = DashboardConfig::from_yaml(
            "api:\n  base_url: http://localhost:8000\ndefaults:\n  cpu_count: 8\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.app_url, DEFAULT_APP_URL);
        assert_eq!(config.defaults.cpu_count, 8);
        assert_eq!(config.defaults.min_sensor_count, 200);
        assert_eq!(config.recipe, RecipeRef::daylight_factor());
    }

    #[test]
    fn recipe_override() {
        let config = DashboardConfig::from_yaml(
            "recipe:\n  owner: ladybug-tools\n  name: annual-daylight\n  tag: 0.10.0\n",
        )
        .unwrap();
        assert_eq!(config.recipe.name, "annual-daylight");
        assert_eq!(config.recipe.tag, "0.10.0");
    }

    #[test]
    fn blank_recipe_owner_is_rejected() {
        let err = DashboardConfig::from_yaml(
            "recipe:\n  owner: \"\"\n  name: daylight-factor\n",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("owner")), "{err}");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            DashboardConfig::from_yaml("").unwrap(),
            DashboardConfig::default()
        );
    }

    #[test]
    fn explicit_key_wins() {
        assert_eq!(resolve_api_key(Some(" abc ".to_string())).unwrap(), "abc");
    }

    #[test]
    fn client_config_uses_settings() {
        let config = DashboardConfig::default();
        let client = config.client_config("k".to_string());
        assert_eq!(client.base_url, DEFAULT_API_URL);
        assert_eq!(client.timeout, Duration::from_secs(60));
    }
}
