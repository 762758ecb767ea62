pub mod database;
pub mod observability;
pub mod readiness;
pub mod service;
pub mod verifier;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use database::{DatabaseConfig, MigrationConfig, MigrationStrategy};
pub use observability::{LogFormat, ObservabilityConfig};
pub use readiness::{ReadinessBackoff, ReadinessConfig};
pub use service::{ServiceConfig, ServicePaths};
pub use verifier::VerifierConfig;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "SESSION_HARNESS";

/// Configuration loading or validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Checks a configuration section for values the harness cannot run with
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Top-level harness configuration that aggregates all config sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Service under test (base URL, endpoint paths, request timeout)
    #[serde(default)]
    pub service: ServiceConfig,
    /// Scenario selection and expected rejection status
    #[serde(default)]
    pub verifier: VerifierConfig,
    /// Readiness probe run before verification
    #[serde(default)]
    pub readiness: ReadinessConfig,
    /// Fixture database (connection URL, admin database, migrations)
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Validate for HarnessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.verifier.validate()?;
        self.readiness.validate()?;
        self.database.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

/// Load the harness configuration from `config/` and environment variables
pub fn load() -> Result<HarnessConfig, ConfigError> {
    load_from("config")
}

/// Load configuration from files in `dir` and environment variables
///
/// Configuration loading follows this precedence (highest to lowest):
/// 1. Environment variables: SESSION_HARNESS__SERVICE__BASE_URL=http://...
/// 2. {dir}/local.toml (git-ignored, developer overrides)
/// 3. {dir}/{HARNESS_ENV}.toml (development/ci/...)
/// 4. {dir}/default.toml (base defaults)
pub fn load_from(dir: impl AsRef<Path>) -> Result<HarnessConfig, ConfigError> {
    use ::config::{Config, Environment, File};

    let dir = dir.as_ref();
    let env = std::env::var("HARNESS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        .add_source(File::from(dir.join("default")).required(false))
        .add_source(File::from(dir.join(&env)).required(false))
        .add_source(File::from(dir.join("local")).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("database.migrations.command")
                .with_list_parse_key("verifier.scenarios")
                .try_parsing(true),
        )
        .build()?;

    let harness_config: HarnessConfig = config.try_deserialize()?;

    harness_config.validate()?;

    Ok(harness_config)
}
