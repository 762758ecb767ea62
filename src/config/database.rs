use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Environment variable read when `database.url` is left empty
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Fixture database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL of the target database, falls back to DATABASE_URL
    #[serde(default)]
    pub url: String,
    /// Database connected to for DROP/CREATE DATABASE
    #[serde(default = "default_admin_database")]
    pub admin_database: String,
    /// Terminate open connections when dropping (PostgreSQL 13+)
    #[serde(default)]
    pub force_drop: bool,
    /// Seconds to wait for a database connection before the step fails
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// How the schema is brought up after the database is recreated
    #[serde(default)]
    pub migrations: MigrationConfig,
}

/// Migration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    #[serde(default = "default_migration_strategy")]
    pub strategy: MigrationStrategy,
    /// Program and arguments of the service's migration tool
    #[serde(default = "default_migration_command")]
    pub command: Vec<String>,
    /// Working directory of the migration tool, usually the service checkout
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStrategy {
    /// Run the service's own migration tool
    Command,
    /// Apply the bundled reference schema
    Embedded,
}

fn default_admin_database() -> String {
    "postgres".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_migration_strategy() -> MigrationStrategy {
    MigrationStrategy::Command
}

fn default_migration_command() -> Vec<String> {
    vec!["diesel".to_string(), "migration".to_string(), "run".to_string()]
}

impl DatabaseConfig {
    /// Configured URL, or DATABASE_URL when the configured one is empty
    pub fn resolve_url(&self) -> Option<String> {
        if !self.url.trim().is_empty() {
            return Some(self.url.clone());
        }

        std::env::var(DATABASE_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            admin_database: default_admin_database(),
            force_drop: false,
            connect_timeout: default_connect_timeout(),
            migrations: MigrationConfig::default(),
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            strategy: default_migration_strategy(),
            command: default_migration_command(),
            working_dir: None,
        }
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_database.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.admin_database cannot be empty".to_string()));
        }
        if self.connect_timeout == 0 {
            return Err(ConfigError::ValidationError("database.connect_timeout must be > 0".to_string()));
        }
        self.migrations.validate()
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy == MigrationStrategy::Command && self.command.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.migrations.command cannot be empty with the command strategy".to_string(),
            ));
        }
        Ok(())
    }
}
