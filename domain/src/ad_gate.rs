use std::time::Duration;

use serde::Serialize;

use crate::{AccessTier, Persona};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockReason {
    /// The persona never required an ad.
    Free,
    Rewarded,
    /// The operator skipped the ad explicitly.
    Bypassed,
    /// Every ad request failed; access is granted rather than blocking.
    ProviderUnavailable,
}

/// Access gate in front of a premium session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum AdGate {
    Locked,
    Unlocked(UnlockReason),
}

impl AdGate {
    #[must_use]
    pub fn for_persona(persona: &Persona) -> Self {
        match persona.tier() {
            AccessTier::Free => AdGate::Unlocked(UnlockReason::Free),
            AccessTier::Premium => AdGate::Locked,
        }
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        matches!(self, AdGate::Unlocked(_))
    }

    #[must_use]
    pub fn bypass(self) -> Self {
        match self {
            AdGate::Locked => AdGate::Unlocked(UnlockReason::Bypassed),
            unlocked => unlocked,
        }
    }
}

/// Fixed-backoff retry for ad requests.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}
