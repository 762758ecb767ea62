//! Wire contract of the session service
//!
//! Request and response shapes of `/authorize`, `/private` and `/logout`, an
//! HTTP client speaking them, and the checks that turn a raw reply into either
//! a typed response or a [`Violation`].

pub mod client;
pub mod contract;
pub mod types;
pub mod violation;

use std::fmt;

use serde::Serialize;

pub use client::{Reply, SessionClient};
pub use types::{AuthorizationResponse, Credential, LogoutResponse, SessionToken};
pub use violation::Violation;

/// Protocol operation a reply or a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Authorize,
    ProtectedAccess,
    Logout,
    Readiness,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Authorize => write!(f, "authorize"),
            Operation::ProtectedAccess => write!(f, "protected access"),
            Operation::Logout => write!(f, "logout"),
            Operation::Readiness => write!(f, "readiness"),
        }
    }
}
