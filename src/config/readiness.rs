use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Readiness probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Probe the service before verification
    #[serde(default = "default_readiness_enabled")]
    pub enabled: bool,
    /// Maximum number of probe attempts
    #[serde(default = "default_readiness_max_attempts")]
    pub max_attempts: u32,
    /// Backoff strategy between attempts
    #[serde(default = "default_readiness_backoff")]
    pub backoff: ReadinessBackoff,
    /// Initial delay in milliseconds
    #[serde(default = "default_readiness_initial_delay")]
    pub initial_delay: u64,
    /// Maximum delay in milliseconds
    #[serde(default = "default_readiness_max_delay")]
    pub max_delay: u64,
    /// Multiplier for exponential backoff
    #[serde(default = "default_readiness_multiplier")]
    pub multiplier: f64,
}

/// Readiness backoff strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessBackoff {
    /// Exponential backoff (delay *= multiplier)
    Exponential,
    /// Linear backoff (delay += initial_delay)
    Linear,
    /// Constant backoff (delay = initial_delay)
    Constant,
}

fn default_readiness_enabled() -> bool {
    true
}

fn default_readiness_max_attempts() -> u32 {
    10
}

fn default_readiness_backoff() -> ReadinessBackoff {
    ReadinessBackoff::Exponential
}

fn default_readiness_initial_delay() -> u64 {
    250 // milliseconds
}

fn default_readiness_max_delay() -> u64 {
    5000 // milliseconds
}

fn default_readiness_multiplier() -> f64 {
    2.0
}

impl ReadinessConfig {
    /// Delay to wait after the failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let step = attempt.saturating_sub(1);
        let millis = match self.backoff {
            ReadinessBackoff::Constant => self.initial_delay as f64,
            ReadinessBackoff::Linear => self.initial_delay as f64 * f64::from(step + 1),
            ReadinessBackoff::Exponential => {
                self.initial_delay as f64 * self.multiplier.powi(step as i32)
            }
        };

        Duration::from_millis(millis.min(self.max_delay as f64) as u64)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            enabled: default_readiness_enabled(),
            max_attempts: default_readiness_max_attempts(),
            backoff: default_readiness_backoff(),
            initial_delay: default_readiness_initial_delay(),
            max_delay: default_readiness_max_delay(),
            multiplier: default_readiness_multiplier(),
        }
    }
}

impl Validate for ReadinessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.max_attempts == 0 {
            return Err(ConfigError::ValidationError("readiness.max_attempts must be > 0 when readiness is enabled".to_string()));
        }
        if self.enabled && self.initial_delay == 0 {
            return Err(ConfigError::ValidationError("readiness.initial_delay must be > 0 when readiness is enabled".to_string()));
        }
        if self.enabled && self.initial_delay > self.max_delay {
            return Err(ConfigError::ValidationError("readiness.initial_delay must be <= max_delay".to_string()));
        }
        if self.enabled && self.multiplier <= 0.0 {
            return Err(ConfigError::ValidationError("readiness.multiplier must be > 0.0 when readiness is enabled".to_string()));
        }
        Ok(())
    }
}
