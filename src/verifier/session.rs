//! Per-scenario session state
//!
//! ```text
//! Unauthenticated ──authorize──► Authenticated(t) ──logout──► LoggedOut(t)
//!                                   │    ▲                        │
//!                                   └────┘ authorize (same t)     │
//!                                        ▲                        │
//!                                        └──── authorize (new t) ─┘
//! ```

use awc::http::StatusCode;

use crate::protocol::{
    contract, AuthorizationResponse, Credential, LogoutResponse, Operation, SessionClient,
    SessionToken, Violation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(SessionToken),
    LoggedOut(SessionToken),
}

/// Session owned by exactly one scenario
///
/// The scope checks the lifecycle invariants on every transition: a repeat
/// authorize must return the held token, an authorize after logout must not
/// return the invalidated one. [`SessionScope::release`] logs out every token
/// the scope acquired and did not log out, so no live session leaks into the
/// next scenario.
pub struct SessionScope<'a> {
    client: &'a SessionClient,
    credential: Credential,
    rejection_status: StatusCode,
    state: SessionState,
    // Live tokens replaced by a different one on a repeat authorize.
    superseded: Vec<SessionToken>,
}

impl<'a> SessionScope<'a> {
    pub fn new(client: &'a SessionClient, credential: Credential, rejection_status: StatusCode) -> Self {
        Self {
            client,
            credential,
            rejection_status,
            state: SessionState::Unauthenticated,
            superseded: Vec::new(),
        }
    }

    pub fn client(&self) -> &'a SessionClient {
        self.client
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Status the service must answer a logged-out token with
    pub fn rejection_status(&self) -> StatusCode {
        self.rejection_status
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Token of the current or most recently logged-out session
    pub fn token(&self) -> Option<&SessionToken> {
        match &self.state {
            SessionState::Unauthenticated => None,
            SessionState::Authenticated(token) | SessionState::LoggedOut(token) => Some(token),
        }
    }

    pub async fn authorize(&mut self) -> Result<AuthorizationResponse, Violation> {
        let reply = self.client.authorize(&self.credential).await?;
        let response = contract::authorization(&reply)?;
        let issued = response.token();

        let violation = match &self.state {
            SessionState::Authenticated(held) if *held != issued => {
                self.superseded.push(held.clone());
                Some(Violation::TokenChanged {
                    first: held.redacted(),
                    second: issued.redacted(),
                })
            }
            SessionState::LoggedOut(invalidated) if *invalidated == issued => {
                Some(Violation::TokenReissued {
                    token: invalidated.redacted(),
                })
            }
            _ => None,
        };

        // Whatever was issued is live now, so release() must log it out.
        tracing::info!(token = %issued, token_type = %response.token_type, "authorized");
        self.state = SessionState::Authenticated(issued);

        if let Some(violation) = violation {
            return Err(violation);
        }

        Ok(response)
    }

    pub async fn expect_access_granted(&self) -> Result<(), Violation> {
        let token = self.token().ok_or(Violation::NoSession {
            operation: Operation::ProtectedAccess,
        })?;
        let reply = self.client.access_private(token).await?;

        contract::expect_status(&reply, StatusCode::OK)
    }

    pub async fn expect_access_rejected(&self) -> Result<(), Violation> {
        let token = self.token().ok_or(Violation::NoSession {
            operation: Operation::ProtectedAccess,
        })?;
        let reply = self.client.access_private(token).await?;

        contract::expect_status(&reply, self.rejection_status)
    }

    /// Logs out the held token; only valid while authenticated
    pub async fn logout(&mut self) -> Result<LogoutResponse, Violation> {
        let token = match &self.state {
            SessionState::Authenticated(token) => token.clone(),
            _ => {
                return Err(Violation::NoSession {
                    operation: Operation::Logout,
                })
            }
        };

        let reply = self.client.logout(&token).await?;
        let response = contract::logout(&reply)?;

        tracing::info!(token = %token, session_id = %response.session_id, "logged out");
        self.state = SessionState::LoggedOut(token);

        Ok(response)
    }

    /// Live tokens the service replaced with another one
    pub fn superseded(&self) -> &[SessionToken] {
        &self.superseded
    }

    /// Teardown: log out superseded tokens and a still-authenticated session
    ///
    /// Every token is attempted; the first failure is returned.
    pub async fn release(mut self) -> Result<(), Violation> {
        let mut first_error = None;

        for token in std::mem::take(&mut self.superseded) {
            tracing::debug!(token = %token, "releasing superseded session");
            let released = match self.client.logout(&token).await {
                Ok(reply) => contract::logout(&reply).map(|_| ()),
                Err(violation) => Err(violation),
            };
            if let Err(violation) = released {
                first_error.get_or_insert(violation);
            }
        }

        if matches!(self.state, SessionState::Authenticated(_)) {
            tracing::debug!("releasing session");
            if let Err(violation) = self.logout().await {
                first_error.get_or_insert(violation);
            }
        }

        match first_error {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}
