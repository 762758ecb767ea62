use std::future::Future;

use actix_web::web::Bytes;
use awc::error::{PayloadError, SendRequestError};
use awc::http::StatusCode;
use awc::{Client, ClientResponse};
use futures_util::Stream;
use serde_json::Value;

use crate::config::ServiceConfig;

use super::{Credential, Operation, SessionToken, Violation};

// Bodies quoted in violations are cut to this many characters.
const BODY_EXCERPT: usize = 200;

/// Status and body of one exchange with the service
#[derive(Debug, Clone)]
pub struct Reply {
    pub operation: Operation,
    pub status: StatusCode,
    pub body: Bytes,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as lossy UTF-8, shortened for error messages
    pub fn excerpt(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let mut excerpt: String = text.chars().take(BODY_EXCERPT).collect();
        if text.chars().count() > BODY_EXCERPT {
            excerpt.push('…');
        }
        excerpt
    }

    /// Body parsed as a JSON object
    pub fn json(&self) -> Result<Value, Violation> {
        let value: Value =
            serde_json::from_slice(&self.body).map_err(|e| Violation::MalformedBody {
                operation: self.operation,
                message: e.to_string(),
            })?;

        if !value.is_object() {
            return Err(Violation::MalformedBody {
                operation: self.operation,
                message: format!("expected an object, got `{}`", self.excerpt()),
            });
        }

        Ok(value)
    }
}

/// HTTP client for the session endpoints
///
/// Every call waits for the complete response before returning; transport
/// errors become [`Violation::Unreachable`] and are never retried here.
pub struct SessionClient {
    http: Client,
    service: ServiceConfig,
}

impl SessionClient {
    pub fn new(service: ServiceConfig) -> Self {
        let http = Client::builder().timeout(service.timeout()).finish();

        Self { http, service }
    }

    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// `POST /authorize` with the credential as JSON body
    #[tracing::instrument(skip_all, fields(client_id = %credential.client_id))]
    pub async fn authorize(&self, credential: &Credential) -> Result<Reply, Violation> {
        let url = self.service.url(&self.service.paths.authorize);
        let reply = exchange(Operation::Authorize, self.http.post(url).send_json(credential)).await?;

        tracing::debug!(status = %reply.status, "authorize replied");

        Ok(reply)
    }

    /// `GET /private` with the token as bearer credential
    #[tracing::instrument(skip_all, fields(token = %token))]
    pub async fn access_private(&self, token: &SessionToken) -> Result<Reply, Violation> {
        let url = self.service.url(&self.service.paths.private);
        let request = self.http.get(url).bearer_auth(token.as_str()).send();
        let reply = exchange(Operation::ProtectedAccess, request).await?;

        tracing::debug!(status = %reply.status, "protected resource replied");

        Ok(reply)
    }

    /// `POST /logout` with the token as bearer credential
    #[tracing::instrument(skip_all, fields(token = %token))]
    pub async fn logout(&self, token: &SessionToken) -> Result<Reply, Violation> {
        let url = self.service.url(&self.service.paths.logout);
        let request = self.http.post(url).bearer_auth(token.as_str()).send();
        let reply = exchange(Operation::Logout, request).await?;

        tracing::debug!(status = %reply.status, "logout replied");

        Ok(reply)
    }

    /// `GET` on the health path, used by the readiness probe
    pub async fn health(&self) -> Result<Reply, Violation> {
        let url = self.service.url(&self.service.paths.health);

        exchange(Operation::Readiness, self.http.get(url).send()).await
    }
}

async fn exchange<F, S>(operation: Operation, request: F) -> Result<Reply, Violation>
where
    F: Future<Output = Result<ClientResponse<S>, SendRequestError>>,
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut response = request.await.map_err(|e| {
        tracing::error!(%operation, error = %e, "request failed");

        Violation::Unreachable {
            operation,
            message: e.to_string(),
        }
    })?;

    let status = response.status();
    let body = response.body().await.map_err(|e| {
        tracing::error!(%operation, error = %e, "failed to read response body");

        Violation::Unreachable {
            operation,
            message: format!("failed to read response body: {}", e),
        }
    })?;

    Ok(Reply {
        operation,
        status,
        body,
    })
}
