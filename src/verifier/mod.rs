//! Session protocol verifier
//!
//! Scenarios drive the service through [`SessionScope`], which owns the
//! scenario's token and enforces the lifecycle invariants, and the
//! [`Verifier`] runs them sequentially into a [`RunReport`](crate::report::RunReport).

pub mod runner;
pub mod scenarios;
pub mod session;

pub use runner::Verifier;
pub use scenarios::Scenario;
pub use session::{SessionScope, SessionState};
