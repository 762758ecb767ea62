use thiserror::Error;

use super::Operation;

/// Observed service behavior that contradicts the session-lifecycle contract
///
/// Connectivity failures are violations too: the harness assumes a running,
/// healthy service once verification starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("{operation}: service unreachable: {message}")]
    Unreachable { operation: Operation, message: String },

    #[error("{operation}: expected status {expected}, got {actual} (body: {body})")]
    UnexpectedStatus {
        operation: Operation,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("{operation}: response body is not a JSON object: {message}")]
    MalformedBody { operation: Operation, message: String },

    #[error("{operation}: response field `{field}` is missing or empty")]
    MissingField {
        operation: Operation,
        field: &'static str,
    },

    #[error("logout: `ok` is false for session {session_id}")]
    LogoutNotOk { session_id: String },

    #[error("authorize: repeated issuance without logout changed the token ({first} -> {second})")]
    TokenChanged { first: String, second: String },

    #[error("authorize: token issued after logout equals the invalidated token {token}")]
    TokenReissued { token: String },

    #[error(
        "authorize: unrecognized credential was accepted with status {status}{}",
        .cleanup.as_ref().map(|e| format!(" (cleanup logout failed: {})", e)).unwrap_or_default()
    )]
    CredentialAccepted { status: u16, cleanup: Option<String> },

    #[error("{operation}: the scenario holds no session token")]
    NoSession { operation: Operation },
}

impl Violation {
    pub fn operation(&self) -> Operation {
        match self {
            Violation::Unreachable { operation, .. }
            | Violation::UnexpectedStatus { operation, .. }
            | Violation::MalformedBody { operation, .. }
            | Violation::MissingField { operation, .. }
            | Violation::NoSession { operation } => *operation,
            Violation::LogoutNotOk { .. } => Operation::Logout,
            Violation::TokenChanged { .. }
            | Violation::TokenReissued { .. }
            | Violation::CredentialAccepted { .. } => Operation::Authorize,
        }
    }
}
