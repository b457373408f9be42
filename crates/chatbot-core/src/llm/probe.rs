use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::config::ProbeSettings;
use crate::constants::endpoints;
use crate::error::ChatError;
use crate::llm::backend::{BackendDescriptor, BackendKind};

/// Retry schedule for waiting on a model service to come up.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbePolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_elapsed: Duration,
    pub request_timeout: Duration,
}

impl ProbePolicy {
    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        let delay = self.initial_delay.as_secs_f64() * factor;
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(delay)
        }
    }
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self::from(&ProbeSettings::default())
    }
}

impl From<&ProbeSettings> for ProbePolicy {
    fn from(settings: &ProbeSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            multiplier: settings.multiplier,
            max_elapsed: Duration::from_secs(settings.max_elapsed_secs),
            request_timeout: Duration::from_millis(settings.request_timeout_ms),
        }
    }
}

/// Polls `{endpoint}/v1/models` until the service answers with a 2xx status.
pub struct BackendProbe {
    client: reqwest::Client,
    policy: ProbePolicy,
}

impl BackendProbe {
    pub fn new(policy: ProbePolicy) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(policy.request_timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, policy })
    }

    pub fn models_url(endpoint: &Url) -> String {
        format!(
            "{}{}",
            endpoint.as_str().trim_end_matches('/'),
            endpoints::MODELS_PATH
        )
    }

    /// Wait for the backend to become ready, tagging it with `kind`.
    ///
    /// Fails with [`ChatError::ProbeTimeout`] once the attempt budget or the
    /// overall deadline runs out.
    pub async fn probe(
        &self,
        endpoint: &Url,
        kind: BackendKind,
    ) -> Result<BackendDescriptor, ChatError> {
        let url = Self::models_url(endpoint);
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    let elapsed = started.elapsed();
                    info!(
                        backend = %kind,
                        attempts = attempt,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Model service available"
                    );
                    return Ok(BackendDescriptor {
                        kind,
                        base_endpoint: endpoint.clone(),
                        discovered_at: Utc::now(),
                        elapsed,
                        attempts: attempt,
                    });
                }
                Ok(response) => {
                    debug!(%url, attempt, status = %response.status(), "Model service not ready");
                }
                Err(e) => {
                    debug!(%url, attempt, error = %e, "Model service not reachable");
                }
            }

            let delay = self.policy.delay_after(attempt);
            let elapsed = started.elapsed();
            if attempt >= self.policy.max_attempts || elapsed + delay > self.policy.max_elapsed {
                warn!(%url, attempts = attempt, "Giving up on model service");
                return Err(ChatError::ProbeTimeout {
                    attempts: attempt,
                    elapsed,
                });
            }

            tokio::time::sleep(delay).await;
        }
    }
}
