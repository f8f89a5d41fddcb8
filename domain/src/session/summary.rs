use serde::Serialize;

use crate::{ImageRef, PurchasedItem};

/// Snapshot of a finished session, before it is stamped into a
/// `SessionRecord`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub persona_name: String,
    pub persona_image: ImageRef,
    pub elapsed_seconds: u64,
    pub purchased_items: Vec<PurchasedItem>,
}
