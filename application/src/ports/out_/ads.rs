use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ad {
    pub id: String,
    pub placement: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdOutcome {
    Rewarded,
    Dismissed,
}

#[derive(Debug, Clone, Error)]
pub enum AdError {
    #[error("no fill for placement {0}")]
    NoFill(String),

    #[error("ad network unavailable: {0}")]
    Unavailable(String),

    #[error("ad failed to show: {0}")]
    ShowFailed(String),
}

#[async_trait]
pub trait AdProvider: Send + Sync {
    async fn request_ad(
        &self,
        placement: &str,
    ) -> Result<Ad, AdError>;

    /// Resolves once the ad is dismissed, reporting whether the reward was
    /// granted.
    async fn show(
        &self,
        ad: Ad,
    ) -> Result<AdOutcome, AdError>;
}
