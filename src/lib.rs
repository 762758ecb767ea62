//! End-to-end harness for a bearer-token session service
//!
//! The [`fixture`] provisioner rebuilds the service's database with one known
//! user; the [`verifier`] then drives `/authorize`, `/private` and `/logout`
//! through a set of scenarios and collects a [`RunReport`].

pub mod config;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod protocol;
pub mod readiness;
pub mod report;
pub mod telemetry;
pub mod verifier;

// Testing utilities (always available for integration tests)
pub mod testing;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use fixture::{Provisioner, ProvisionError};
pub use harness::{Harness, RunOptions};
pub use protocol::{Credential, SessionClient, SessionToken, Violation};
pub use report::{RunReport, ScenarioOutcome};
pub use verifier::{Scenario, SessionScope, SessionState, Verifier};
