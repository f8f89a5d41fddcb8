use serde::{Deserialize, Serialize};

use crate::{ImageRef, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub unit_price: i64,
    pub image_ref: ImageRef,
}

impl CatalogItem {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        unit_price: i64,
        image_ref: ImageRef,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price,
            image_ref,
        }
    }
}

/// Fixed, ordered list of purchasable items. Order is display order and is
/// preserved in session summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog from explicit items. Items with a non-positive price
    /// are dropped.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: items.into_iter().filter(|item| item.unit_price > 0).collect(),
        }
    }

    #[must_use]
    pub fn standard() -> Self {
        Self::new(standard_items())
    }

    #[must_use]
    pub fn get(
        &self,
        item_id: ItemId,
    ) -> Option<&CatalogItem> {
        self.items.get(item_id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &CatalogItem)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i), item))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("Castle in Europe", 120_000_000, "castle_in_europe".into()),
        CatalogItem::new("Feed 100,000 Families", 35_000_000, "feed_1_00_000_families".into()),
        CatalogItem::new("Yacht", 300_000_000, "yacht".into()),
        CatalogItem::new("Fighter Jet", 150_000_000, "fighter_jet".into()),
        CatalogItem::new("Diamond Ring", 3_000_000, "diamond_ring".into()),
        CatalogItem::new("Skyscraper", 850_000_000, "skyscraper".into()),
        CatalogItem::new("Gaming PC Setup", 25_000, "gaming_pcs".into()),
        CatalogItem::new("Plant 1 Million Trees", 10_000_000, "plant_1_million_trees".into()),
        CatalogItem::new("Rolls Royce Phantom", 450_000, "rolls_royce_phantom".into()),
        CatalogItem::new("Satellite Launch", 70_000_000, "satellite".into()),
        CatalogItem::new("Monster Truck", 250_000, "monster_truck".into()),
        CatalogItem::new("Support 1,000 Orphans", 8_000_000, "support_1_000_orphans".into()),
        CatalogItem::new("Helicopter", 18_000_000, "helicopter".into()),
        CatalogItem::new("Luxury Villa", 80_000_000, "luxury_villa".into()),
        CatalogItem::new("Bugatti Chiron", 3_000_000, "bugatti_chiron".into()),
        CatalogItem::new("F1 Race Car", 20_000_000, "f1_race_car".into()),
        CatalogItem::new("Buy a Football Club", 600_000_000, "buy_a_football_club".into()),
        CatalogItem::new("Ice Cream Truck", 60_000, "ice_cream_truck".into()),
        CatalogItem::new("Banana Farm", 50_000, "bananas".into()),
        CatalogItem::new("Apartment Building", 30_000_000, "apartment_building".into()),
        CatalogItem::new("Desert Palace", 200_000_000, "desert_palace".into()),
        CatalogItem::new("Lamborghini Aventador", 500_000, "lamborghini_aventador".into()),
        CatalogItem::new("Buy McDonald's Franchise", 2_500_000, "buy_a_mcdonald_s_franchise".into()),
        CatalogItem::new("Private Zoo", 25_000_000, "private_zoo".into()),
        CatalogItem::new("USB Flash Drives (1,000)", 1_000, "usb_flash_drives".into()),
        CatalogItem::new("Harley Davidson", 70_000, "harley_davidson".into()),
        CatalogItem::new("Private Jet", 50_000_000, "private_jet".into()),
        CatalogItem::new("SpaceX Falcon 9 Ride", 90_000_000, "spacex_falcon_9_ride".into()),
        CatalogItem::new("VR Headset", 3_000, "vr_headset".into()),
        CatalogItem::new("Concorde Jet", 200_000_000, "concorde".into()),
        CatalogItem::new("Hot Air Balloon", 45_000, "hot_air_balloon".into()),
        CatalogItem::new("Golf Course", 150_000_000, "golf_course".into()),
        CatalogItem::new("Mountain Cabin", 8_000_000, "mountain_cabin".into()),
        CatalogItem::new("Jet Ski", 120_000, "jet_ski".into()),
        CatalogItem::new("Private Library", 2_000_000, "private_library".into()),
        CatalogItem::new("Boeing 747", 400_000_000, "boeing_747".into()),
        CatalogItem::new("NASA Space Suit", 12_000_000, "nasa_space_suit".into()),
        CatalogItem::new("Beach House", 60_000_000, "beach_house".into()),
        CatalogItem::new("iPhone 15 Pro Max", 1_500, "iphone_15_pro_max".into()),
        CatalogItem::new("Bulletproof SUV", 500_000, "bulletproof_suv".into()),
        CatalogItem::new("Jet (Mid-Range)", 35_000_000, "jet".into()),
        CatalogItem::new("Rolex Watch", 75_000, "rolex_watch".into()),
        CatalogItem::new("Airship", 250_000_000, "airship".into()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_keeps_display_order() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 43);
        assert_eq!(catalog.get(ItemId(0)).map(|i| i.name.as_str()), Some("Castle in Europe"));
        let last = catalog.get(ItemId(catalog.len() - 1)).unwrap();
        assert_eq!(last.name, "Airship");
        assert_eq!(last.unit_price, 250_000_000);
    }

    #[test]
    fn test_unknown_item_is_none() {
        assert!(Catalog::standard().get(ItemId(999)).is_none());
    }

    #[test]
    fn test_non_positive_prices_are_dropped() {
        let catalog = Catalog::new(vec![
            CatalogItem::new("Free Lunch", 0, ImageRef::none()),
            CatalogItem::new("Coffee", 5, ImageRef::none()),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(ItemId(0)).unwrap().name, "Coffee");
    }
}
