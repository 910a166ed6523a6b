//! Backend location.

use crate::form::SubmitMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const DEVELOPMENT_BACKEND_URL: &str = "http://127.0.0.1:5000";
/// Same-origin prefix the production deployment proxies to the solver.
pub const PRODUCTION_BACKEND_URL: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Backend base URL must not be empty.")]
    EmptyBaseUrl,
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Debug builds talk to the local backend.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(Self { base_url })
    }

    pub fn for_environment(env: Environment) -> Self {
        let base_url = match env {
            Environment::Development => DEVELOPMENT_BACKEND_URL,
            Environment::Production => PRODUCTION_BACKEND_URL,
        };
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Full URL for the route `mode` posts to.
    pub fn endpoint(&self, mode: SubmitMode) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), mode.path())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::for_environment(Environment::from_build())
    }
}
