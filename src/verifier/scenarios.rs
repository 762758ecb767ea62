//! Scenario catalogue
//!
//! Every scenario starts from an unauthenticated [`SessionScope`] and leaves
//! teardown to the runner.

use async_trait::async_trait;

use crate::protocol::{contract, Credential, SessionToken, Violation};

use super::session::SessionScope;

// Never provisioned by the fixture.
const UNKNOWN_CLIENT_ID: &str = "unknown+session-harness@example.invalid";
const UNKNOWN_CLIENT_SECRET: &str = "not-the-password";
const FORGED_TOKEN: &str = "forged0session0harness0token00000";

/// One independent check of the session lifecycle
#[async_trait(?Send)]
pub trait Scenario {
    /// Stable, kebab-case name used for selection and reporting
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation>;
}

pub struct Authorize;

#[async_trait(?Send)]
impl Scenario for Authorize {
    fn name(&self) -> &'static str {
        "authorize"
    }

    fn description(&self) -> &'static str {
        "authorize returns 200 with access_token and token_type"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        scope.authorize().await?;
        Ok(())
    }
}

pub struct AuthorizeIdempotent;

#[async_trait(?Send)]
impl Scenario for AuthorizeIdempotent {
    fn name(&self) -> &'static str {
        "authorize-idempotent"
    }

    fn description(&self) -> &'static str {
        "two authorize calls without logout return the same token"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        scope.authorize().await?;
        // The scope rejects a second token that differs from the held one.
        scope.authorize().await?;
        Ok(())
    }
}

pub struct PrivateAccess;

#[async_trait(?Send)]
impl Scenario for PrivateAccess {
    fn name(&self) -> &'static str {
        "private-access"
    }

    fn description(&self) -> &'static str {
        "an issued token is accepted by the protected resource"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        scope.authorize().await?;
        scope.expect_access_granted().await
    }
}

pub struct LogoutInvalidates;

#[async_trait(?Send)]
impl Scenario for LogoutInvalidates {
    fn name(&self) -> &'static str {
        "logout-invalidates"
    }

    fn description(&self) -> &'static str {
        "authorize, access, logout, then the same token is rejected"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        scope.authorize().await?;
        scope.expect_access_granted().await?;
        scope.logout().await?;
        scope.expect_access_rejected().await
    }
}

pub struct ReauthorizeAfterLogout;

#[async_trait(?Send)]
impl Scenario for ReauthorizeAfterLogout {
    fn name(&self) -> &'static str {
        "reauthorize-after-logout"
    }

    fn description(&self) -> &'static str {
        "authorize after logout issues a fresh token and the old one stays rejected"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        let first = scope.authorize().await?.token();
        scope.logout().await?;
        scope.expect_access_rejected().await?;

        // The scope rejects a token equal to the one just logged out.
        scope.authorize().await?;
        scope.expect_access_granted().await?;

        let reply = scope.client().access_private(&first).await?;
        contract::expect_status(&reply, scope.rejection_status())
    }
}

pub struct UnknownCredentialRejected;

#[async_trait(?Send)]
impl Scenario for UnknownCredentialRejected {
    fn name(&self) -> &'static str {
        "unknown-credential-rejected"
    }

    fn description(&self) -> &'static str {
        "authorize with an unrecognized credential does not succeed"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        let credential = Credential::new(UNKNOWN_CLIENT_ID, UNKNOWN_CLIENT_SECRET);
        let reply = scope.client().authorize(&credential).await?;

        if reply.is_success() {
            // Log out whatever was handed out so it cannot outlive the run.
            let cleanup = match contract::authorization(&reply) {
                Ok(response) => release_token(scope, &response.token()).await.err(),
                Err(_) => None,
            };

            return Err(Violation::CredentialAccepted {
                status: reply.status.as_u16(),
                cleanup: cleanup.map(|violation| violation.to_string()),
            });
        }

        tracing::info!(status = %reply.status, "unknown credential rejected");

        Ok(())
    }
}

pub struct ForgedTokenRejected;

#[async_trait(?Send)]
impl Scenario for ForgedTokenRejected {
    fn name(&self) -> &'static str {
        "forged-token-rejected"
    }

    fn description(&self) -> &'static str {
        "a bearer token the service never issued is rejected by the protected resource"
    }

    async fn run(&self, scope: &mut SessionScope<'_>) -> Result<(), Violation> {
        let forged = SessionToken::new(FORGED_TOKEN);
        let reply = scope.client().access_private(&forged).await?;

        contract::expect_status(&reply, scope.rejection_status())
    }
}

async fn release_token(scope: &SessionScope<'_>, token: &SessionToken) -> Result<(), Violation> {
    let reply = scope.client().logout(token).await?;
    contract::logout(&reply)?;
    Ok(())
}

/// Every scenario, in execution order
pub fn all() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(Authorize),
        Box::new(AuthorizeIdempotent),
        Box::new(PrivateAccess),
        Box::new(LogoutInvalidates),
        Box::new(ReauthorizeAfterLogout),
        Box::new(UnknownCredentialRejected),
        Box::new(ForgedTokenRejected),
    ]
}

/// Scenarios named in `names` in catalogue order, all of them when empty
///
/// Returns the first unknown name as error.
pub fn select(names: &[String]) -> Result<Vec<Box<dyn Scenario>>, String> {
    if let Some(unknown) = names
        .iter()
        .find(|name| !all().iter().any(|scenario| scenario.name() == name.as_str()))
    {
        return Err(unknown.clone());
    }

    Ok(all()
        .into_iter()
        .filter(|scenario| names.is_empty() || names.iter().any(|name| name == scenario.name()))
        .collect())
}
