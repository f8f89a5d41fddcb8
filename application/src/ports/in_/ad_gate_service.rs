use std::sync::Arc;

use tracing::{debug, info, warn};

use domain::{AdGate, RetryPolicy, UnlockReason};

use crate::ports::out_::{AdError, AdOutcome, AdProvider, AsyncTimer};

pub struct AdGateService {
    provider: Arc<dyn AdProvider>,
    timer: Arc<dyn AsyncTimer>,
    policy: RetryPolicy,
    placement: String,
}

impl AdGateService {
    pub fn new(
        provider: Arc<dyn AdProvider>,
        timer: Arc<dyn AsyncTimer>,
        policy: RetryPolicy,
        placement: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            timer,
            policy,
            placement: placement.into(),
        }
    }

    /// Shows a rewarded ad in front of a locked gate. Failed requests are
    /// retried with a fixed backoff; once every attempt has failed the gate
    /// opens anyway so the player is never stuck.
    pub async fn unlock(
        &self,
        gate: AdGate,
    ) -> AdGate {
        if gate.is_unlocked() {
            return gate;
        }

        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.try_once().await {
                Ok(AdOutcome::Rewarded) => {
                    info!(attempt, placement = %self.placement, "Ad reward granted");
                    return AdGate::Unlocked(UnlockReason::Rewarded);
                }
                Ok(AdOutcome::Dismissed) => {
                    debug!(attempt, placement = %self.placement, "Ad dismissed before reward");
                    return AdGate::Locked;
                }
                Err(e) => {
                    warn!(attempt, placement = %self.placement, error = %e, "Ad attempt failed");
                }
            }

            if attempt < attempts {
                self.timer.sleep(self.policy.backoff).await;
            }
        }

        warn!(attempts, placement = %self.placement, "Ad provider unavailable, opening gate");
        AdGate::Unlocked(UnlockReason::ProviderUnavailable)
    }

    pub fn bypass(
        &self,
        gate: AdGate,
    ) -> AdGate {
        info!(placement = %self.placement, "Ad gate bypassed by operator");
        gate.bypass()
    }

    async fn try_once(&self) -> Result<AdOutcome, AdError> {
        let ad = self.provider.request_ad(&self.placement).await?;
        self.provider.show(ad).await
    }
}
