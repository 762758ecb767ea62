use std::time::Instant;

use awc::http::StatusCode;
use tracing::Instrument;

use crate::config::HarnessConfig;
use crate::protocol::{Credential, SessionClient};
use crate::report::{RunReport, ScenarioOutcome};

use super::scenarios::Scenario;
use super::session::SessionScope;

/// Runs scenarios one after another against a live service
pub struct Verifier {
    client: SessionClient,
    credential: Credential,
    rejection_status: StatusCode,
}

impl Verifier {
    pub fn new(client: SessionClient, credential: Credential, rejection_status: StatusCode) -> Self {
        Self {
            client,
            credential,
            rejection_status,
        }
    }

    /// Verifier for the fixture credential against the configured service
    pub fn from_config(config: &HarnessConfig) -> Self {
        let rejection_status = StatusCode::from_u16(config.verifier.rejection_status)
            .unwrap_or(StatusCode::BAD_REQUEST);

        Self::new(
            SessionClient::new(config.service.clone()),
            Credential::fixture(),
            rejection_status,
        )
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Runs one scenario in a fresh scope, then releases the scope
    pub async fn run_scenario(&self, scenario: &dyn Scenario) -> ScenarioOutcome {
        let span = tracing::info_span!("scenario", scenario = scenario.name());

        async {
            let start = Instant::now();
            let mut scope = SessionScope::new(&self.client, self.credential.clone(), self.rejection_status);
            let mut violations = Vec::new();

            if let Err(violation) = scenario.run(&mut scope).await {
                tracing::error!(%violation, "protocol violation");
                violations.push(violation.to_string());
            }

            if let Err(violation) = scope.release().await {
                tracing::error!(%violation, "teardown failed");
                violations.push(format!("teardown: {}", violation));
            }

            let passed = violations.is_empty();
            let duration_ms = start.elapsed().as_millis() as u64;

            tracing::info!(passed, duration_ms, "scenario finished");

            ScenarioOutcome {
                name: scenario.name().to_string(),
                passed,
                violations,
                duration_ms,
            }
        }
        .instrument(span)
        .await
    }

    /// Runs every scenario; a failing scenario never stops the next one
    pub async fn run(&self, scenarios: &[Box<dyn Scenario>]) -> RunReport {
        let mut report = RunReport::new(self.client.service().base_url.clone());

        for scenario in scenarios {
            let outcome = self.run_scenario(scenario.as_ref()).await;
            report.push(outcome);
        }

        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            "verification finished"
        );

        report
    }
}
