mod ad_gate;
mod catalog;
mod history;
pub mod money;
mod persona;
pub mod session;
mod types;

pub use ad_gate::{AdGate, RetryPolicy, UnlockReason};
pub use catalog::{Catalog, CatalogItem};
pub use history::{
    ProfileStats, PurchasedItem, SessionRecord, Tally, TopScore, favorite_persona, most_purchased_item,
    top_scores_by_persona, total_spent,
};
pub use persona::{AccessTier, Persona, PersonaDraft, PersonaError, built_in_personas};
pub use session::{
    ItemLine, SessionAction, SessionConfig, SessionEffect, SessionError, SessionEvent, SessionPhase, SessionSnapshot,
    SessionState, SessionSummary,
};
pub use types::{ImageRef, ItemId, SessionId};
