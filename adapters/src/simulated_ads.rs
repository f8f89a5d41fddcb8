use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use application::ports::out_::{Ad, AdError, AdOutcome, AdProvider};

/// Stand-in for a rewarded-ad network. A request fills with probability
/// `fill_rate`; a filled ad plays for `watch_time` and always grants the
/// reward.
pub struct SimulatedAdProvider {
    fill_rate: f64,
    watch_time: Duration,
    served: AtomicU64,
}

impl SimulatedAdProvider {
    #[must_use]
    pub fn new(fill_rate: f64) -> Self {
        Self {
            fill_rate: if fill_rate.is_nan() { 0.0 } else { fill_rate.clamp(0.0, 1.0) },
            watch_time: Duration::from_millis(500),
            served: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_watch_time(
        mut self,
        watch_time: Duration,
    ) -> Self {
        self.watch_time = watch_time;
        self
    }
}

#[async_trait]
impl AdProvider for SimulatedAdProvider {
    async fn request_ad(
        &self,
        placement: &str,
    ) -> Result<Ad, AdError> {
        if !rand::thread_rng().gen_bool(self.fill_rate) {
            return Err(AdError::NoFill(placement.to_string()));
        }

        let serial = self.served.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(placement, serial, "Simulated ad filled");
        Ok(Ad {
            id: format!("sim-{serial}"),
            placement: placement.to_string(),
        })
    }

    async fn show(
        &self,
        ad: Ad,
    ) -> Result<AdOutcome, AdError> {
        tokio::time::sleep(self.watch_time).await;
        debug!(ad_id = %ad.id, "Simulated ad finished");
        Ok(AdOutcome::Rewarded)
    }
}
