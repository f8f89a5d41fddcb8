use serde::Serialize;

use crate::{ImageRef, ItemId};

use super::config::SessionPhase;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemLine {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    pub image_ref: ImageRef,
}

/// Read-only view of a session for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub persona_name: String,
    pub persona_image: ImageRef,
    pub net_worth: i64,
    pub balance: i64,
    pub balance_display: String,
    pub elapsed_seconds: u64,
    pub items: Vec<ItemLine>,
}
