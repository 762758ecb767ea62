use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Verifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Status the service answers with for a logged-out token
    #[serde(default = "default_rejection_status")]
    pub rejection_status: u16,
    /// Names of the scenarios to run, empty runs all of them
    #[serde(default)]
    pub scenarios: Vec<String>,
}

fn default_rejection_status() -> u16 {
    400
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            rejection_status: default_rejection_status(),
            scenarios: Vec::new(),
        }
    }
}

impl Validate for VerifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(400..500).contains(&self.rejection_status) {
            return Err(ConfigError::ValidationError(format!(
                "verifier.rejection_status must be a 4xx status, got {}",
                self.rejection_status
            )));
        }
        Ok(())
    }
}
