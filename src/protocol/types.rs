use std::fmt;

use serde::{Deserialize, Serialize};

/// Client identifier of the user the fixture seeds
pub const FIXTURE_CLIENT_ID: &str = "sam.raker+1@gmail.com";
/// Plaintext secret of the user the fixture seeds
pub const FIXTURE_CLIENT_SECRET: &str = "password1";

/// Body of `POST /authorize`
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// The credential of the single seeded, confirmed user
    pub fn fixture() -> Self {
        Self::new(FIXTURE_CLIENT_ID, FIXTURE_CLIENT_SECRET)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Opaque bearer token returned by authorize
///
/// `Debug` and `Display` only show a short prefix; use [`SessionToken::as_str`]
/// to build the `Authorization` header.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(6).collect();
        if prefix.len() < self.0.len() {
            format!("{}…", prefix)
        } else {
            prefix
        }
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.redacted())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Successful body of `POST /authorize`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub access_token: String,
    pub token_type: String,
}

impl AuthorizationResponse {
    pub fn token(&self) -> SessionToken {
        SessionToken::new(self.access_token.clone())
    }
}

/// Successful body of `POST /logout`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LogoutResponse {
    pub session_id: String,
    pub ok: bool,
}
