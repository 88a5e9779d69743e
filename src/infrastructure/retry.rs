use crate::domain::payment::{AuthorizationRequest, AuthorizationResponse};
use crate::domain::ports::{BankClient, BankClientBox};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Exponential backoff schedule for transient bank failures: retry
/// `max_retries` additional times, sleeping `base_delay * 2^attempt`
/// before retry `attempt` (with the 1-second default: 2s, 4s, 8s).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A custom schedule; tests shrink `base_delay` to keep runs fast.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Decorator adding the retry policy to any [`BankClient`].
///
/// Only transient failures are retried (see
/// [`crate::error::PaymentError::is_transient`]); everything else
/// surfaces immediately. Cancellation is cooperative: a caller that
/// drops the future stops the schedule between attempts, not inside an
/// in-flight call.
pub struct RetryingBankClient {
    inner: BankClientBox,
    policy: RetryPolicy,
}

impl RetryingBankClient {
    pub fn new(inner: BankClientBox, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl BankClient for RetryingBankClient {
    async fn authorize(&self, request: AuthorizationRequest) -> Result<AuthorizationResponse> {
        let mut attempt = 0;
        loop {
            match self.inner.authorize(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        info!(payment_id = %request.payment_id, attempt, "bank call succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(err) if err.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let delay = self.policy.delay(attempt);
                    warn!(
                        payment_id = %request.payment_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient bank failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!(payment_id = %request.payment_id, attempt, error = %err, "bank call failed");
                    return Err(err);
                }
            }
        }
    }
}
