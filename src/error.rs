use thiserror::Error;

use crate::config::ConfigError;
use crate::fixture::ProvisionError;

/// Failure that aborts a harness run before or instead of verification
///
/// Protocol violations are not in here: they fail a single scenario and end up
/// in the [`RunReport`](crate::report::RunReport).
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Provisioning failed at step `{step}`: {0}", step = .0.step())]
    Provision(#[from] ProvisionError),

    #[error("Service at {url} not ready after {attempts} attempts: {last_error}")]
    NotReady {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Unknown scenario `{0}`")]
    UnknownScenario(String),
}
