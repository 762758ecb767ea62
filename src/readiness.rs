//! Readiness probe run before verification

use crate::config::ReadinessConfig;
use crate::error::HarnessError;
use crate::protocol::SessionClient;

/// Polls the health path until it answers 2xx
///
/// Returns the attempt that succeeded. Gives up with
/// [`HarnessError::NotReady`] after `max_attempts`, sleeping between attempts
/// as the backoff strategy dictates.
#[tracing::instrument(skip_all, fields(max_attempts = config.max_attempts))]
pub async fn wait_until_ready(client: &SessionClient, config: &ReadinessConfig) -> Result<u32, HarnessError> {
    let url = client.service().url(&client.service().paths.health);
    let mut last_error = String::from("no attempt made");

    for attempt in 1..=config.max_attempts {
        match client.health().await {
            Ok(reply) if reply.is_success() => {
                tracing::info!(attempt, %url, "service ready");
                return Ok(attempt);
            }
            Ok(reply) => last_error = format!("status {}", reply.status),
            Err(violation) => last_error = violation.to_string(),
        }

        if attempt < config.max_attempts {
            let delay = config.delay_after(attempt);
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %last_error,
                "service not ready, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    tracing::error!(%url, error = %last_error, "service never became ready");

    Err(HarnessError::NotReady {
        url,
        attempts: config.max_attempts,
        last_error,
    })
}
