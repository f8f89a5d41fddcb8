use crate::{Catalog, ItemId};

/// Quantity owned per catalog item, indexed by `ItemId`.
#[derive(Clone, Debug)]
pub(super) struct PurchaseState {
    pub(super) quantities: Vec<u32>,
}

impl PurchaseState {
    pub(super) fn new(catalog: &Catalog) -> Self {
        Self {
            quantities: vec![0; catalog.len()],
        }
    }

    pub(super) fn quantity(
        &self,
        item_id: ItemId,
    ) -> u32 {
        self.quantities.get(item_id.0).copied().unwrap_or(0)
    }

    pub(super) fn spent(
        &self,
        catalog: &Catalog,
    ) -> i64 {
        catalog
            .iter()
            .map(|(item_id, item)| item.unit_price.saturating_mul(i64::from(self.quantity(item_id))))
            .fold(0i64, i64::saturating_add)
    }
}
