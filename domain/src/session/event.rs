use serde::Serialize;

use crate::ItemId;

/// Visible messages for the surface showing a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        persona_name: String,
        net_worth: i64,
    },
    Ticked {
        elapsed_seconds: u64,
    },
    Purchased {
        item_id: ItemId,
        quantity: u32,
        balance: i64,
    },
    Sold {
        item_id: ItemId,
        quantity: u32,
        balance: i64,
    },
    Finished {
        elapsed_seconds: u64,
    },
    Abandoned,
}
