//! Application configuration.
//!
//! Loaded once at startup from an optional TOML file and handed to each
//! component at construction time.

use crate::error::CoreError;
use crate::types::ModelRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "har-predict.toml";

pub const PREDICTION_SCOPE: &str = "https://www.googleapis.com/auth/prediction";
pub const STORAGE_READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub project_id: String,
    pub model_id: String,
    /// Cloud Storage location of the training CSV, `bucket/object`.
    pub dataset_uri: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            project_id: "human-interact".to_string(),
            model_id: "HAR-model".to_string(),
            dataset_uri: "human-interact-dataset/dataset.csv".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn model_ref(&self) -> ModelRef {
        ModelRef::new(&self.project_id, &self.model_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub root_url: String,
    pub service: String,
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            root_url: "https://www.googleapis.com".to_string(),
            service: "prediction".to_string(),
            version: "v1.6".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.root_url.trim_end_matches('/'),
            self.service,
            self.version
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    ServiceAccount,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub credential_cache: PathBuf,
    pub service_account_key: PathBuf,
    pub client_secrets: PathBuf,
    pub scopes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::ServiceAccount,
            credential_cache: PathBuf::from("oAuth2.json"),
            service_account_key: PathBuf::from("service-account.json"),
            client_secrets: PathBuf::from("client_secrets.json"),
            scopes: vec![
                PREDICTION_SCOPE.to_string(),
                STORAGE_READ_ONLY_SCOPE.to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub record_path: PathBuf,
    /// How many train-then-retry cycles a missing model may trigger.
    pub max_train_retries: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            record_path: PathBuf::from("record.csv"),
            max_train_retries: 1,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the built-in defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| CoreError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.model.project_id.trim().is_empty() {
            return Err(CoreError::Config(
                "model.project_id cannot be empty".to_string(),
            ));
        }
        if self.model.model_id.trim().is_empty() {
            return Err(CoreError::Config("model.model_id cannot be empty".to_string()));
        }
        if self.api.service.trim().is_empty() || self.api.version.trim().is_empty() {
            return Err(CoreError::Config(
                "api.service and api.version are required".to_string(),
            ));
        }
        if self.auth.scopes.is_empty() {
            return Err(CoreError::Config(
                "auth.scopes must name at least one scope".to_string(),
            ));
        }
        if self.run.record_path.as_os_str().is_empty() {
            return Err(CoreError::Config("run.record_path cannot be empty".to_string()));
        }
        Ok(())
    }
}
