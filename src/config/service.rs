use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Service under test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Endpoint paths
    #[serde(default)]
    pub paths: ServicePaths,
}

/// Paths of the session endpoints, relative to the base URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePaths {
    #[serde(default = "default_authorize_path")]
    pub authorize: String,
    #[serde(default = "default_private_path")]
    pub private: String,
    #[serde(default = "default_logout_path")]
    pub logout: String,
    #[serde(default = "default_health_path")]
    pub health: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_authorize_path() -> String {
    "/authorize".to_string()
}

fn default_private_path() -> String {
    "/private".to_string()
}

fn default_logout_path() -> String {
    "/logout".to_string()
}

fn default_health_path() -> String {
    "/".to_string()
}

impl ServiceConfig {
    /// Service config pointing at `base_url` with every other value defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Joins the base URL and an endpoint path without doubling the slash
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            paths: ServicePaths::default(),
        }
    }
}

impl Default for ServicePaths {
    fn default() -> Self {
        Self {
            authorize: default_authorize_path(),
            private: default_private_path(),
            logout: default_logout_path(),
            health: default_health_path(),
        }
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::ValidationError("service.base_url cannot be empty".to_string()));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "service.base_url is not a valid URL: {}",
                self.base_url
            )));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::ValidationError("service.request_timeout must be > 0".to_string()));
        }
        self.paths.validate()
    }
}

impl Validate for ServicePaths {
    fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("authorize", &self.authorize),
            ("private", &self.private),
            ("logout", &self.logout),
            ("health", &self.health),
        ];

        for (name, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "service.paths.{} must start with '/'",
                    name
                )));
            }
        }

        Ok(())
    }
}
