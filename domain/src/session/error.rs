use thiserror::Error;

use crate::ItemId;

use super::config::SessionPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("action {action} not valid in phase {phase:?}")]
    InvalidPhase { action: &'static str, phase: SessionPhase },

    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: i64, required: i64 },

    #[error("nothing to sell: {item_id:?} has quantity 0")]
    NothingToSell { item_id: ItemId },

    #[error("item not in catalog: {0:?}")]
    UnknownItem(ItemId),

    #[error("arithmetic overflow while applying {action}")]
    Overflow { action: &'static str },
}

impl SessionError {
    /// Rejections the player caused and should be told about, as opposed to
    /// stale or malformed intents.
    #[must_use]
    pub fn is_user_notice(&self) -> bool {
        matches!(
            self,
            SessionError::InsufficientFunds { .. } | SessionError::NothingToSell { .. }
        )
    }
}
