//! Completed sessions and the statistics derived from them.
//!
//! Everything here is a pure function over a record list; callers recompute
//! on every read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ImageRef, SessionSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedItem {
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    #[serde(default)]
    pub image_ref: ImageRef,
}

impl PurchasedItem {
    #[must_use]
    pub fn total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }
}

/// A persisted summary of one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub persona_name: String,
    #[serde(default)]
    pub persona_image_ref: ImageRef,
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub purchased_items: Vec<PurchasedItem>,
    /// Unix time in milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

impl SessionRecord {
    #[must_use]
    pub fn from_summary(
        summary: SessionSummary,
        timestamp: i64,
    ) -> Self {
        Self {
            persona_name: summary.persona_name,
            persona_image_ref: summary.persona_image,
            elapsed_seconds: summary.elapsed_seconds,
            purchased_items: summary.purchased_items,
            timestamp,
        }
    }

    #[must_use]
    pub fn total_spent(&self) -> i64 {
        self.purchased_items
            .iter()
            .map(PurchasedItem::total)
            .fold(0, i64::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopScore {
    pub persona_name: String,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub name: String,
    pub count: u64,
}

/// Fastest session per persona, fastest first. Within a persona the first
/// record encountered wins a tie; across personas equal times are ordered by
/// name.
#[must_use]
pub fn top_scores_by_persona(records: &[SessionRecord]) -> Vec<TopScore> {
    let mut best: Vec<TopScore> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.persona_name.as_str()) {
            Some(&i) => {
                if record.elapsed_seconds < best[i].elapsed_seconds {
                    best[i].elapsed_seconds = record.elapsed_seconds;
                }
            }
            None => {
                index.insert(record.persona_name.as_str(), best.len());
                best.push(TopScore {
                    persona_name: record.persona_name.clone(),
                    elapsed_seconds: record.elapsed_seconds,
                });
            }
        }
    }

    best.sort_by(|a, b| {
        a.elapsed_seconds
            .cmp(&b.elapsed_seconds)
            .then_with(|| a.persona_name.cmp(&b.persona_name))
    });
    best
}

#[must_use]
pub fn total_spent(records: &[SessionRecord]) -> i64 {
    records
        .iter()
        .map(SessionRecord::total_spent)
        .fold(0, i64::saturating_add)
}

/// Item with the highest total quantity across all records.
#[must_use]
pub fn most_purchased_item(records: &[SessionRecord]) -> Option<Tally> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for item in records.iter().flat_map(|r| &r.purchased_items) {
        *totals.entry(item.name.as_str()).or_default() += u64::from(item.quantity);
    }
    max_tally(totals)
}

/// Persona played most often.
#[must_use]
pub fn favorite_persona(records: &[SessionRecord]) -> Option<Tally> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        *counts.entry(record.persona_name.as_str()).or_default() += 1;
    }
    max_tally(counts)
}

// Highest count wins; ties go to the alphabetically first name.
fn max_tally(counts: HashMap<&str, u64>) -> Option<Tally> {
    counts
        .into_iter()
        .max_by(|(name_a, count_a), (name_b, count_b)| count_a.cmp(count_b).then_with(|| name_b.cmp(name_a)))
        .map(|(name, count)| Tally {
            name: name.to_string(),
            count,
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub sessions_played: usize,
    pub total_spent: i64,
    pub most_purchased_item: Option<Tally>,
    pub favorite_persona: Option<Tally>,
}

impl ProfileStats {
    #[must_use]
    pub fn from_records(records: &[SessionRecord]) -> Self {
        Self {
            sessions_played: records.len(),
            total_spent: total_spent(records),
            most_purchased_item: most_purchased_item(records),
            favorite_persona: favorite_persona(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(
        name: &str,
        unit_price: i64,
        quantity: u32,
    ) -> PurchasedItem {
        PurchasedItem {
            name: name.to_string(),
            unit_price,
            quantity,
            image_ref: ImageRef::none(),
        }
    }

    fn record(
        persona: &str,
        elapsed_seconds: u64,
        items: Vec<PurchasedItem>,
    ) -> SessionRecord {
        SessionRecord {
            persona_name: persona.to_string(),
            persona_image_ref: ImageRef::none(),
            elapsed_seconds,
            purchased_items: items,
            timestamp: 0,
        }
    }

    fn score(
        persona: &str,
        elapsed_seconds: u64,
    ) -> TopScore {
        TopScore {
            persona_name: persona.to_string(),
            elapsed_seconds,
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(total_spent(&[]), 0);
        assert!(top_scores_by_persona(&[]).is_empty());
        assert_eq!(most_purchased_item(&[]), None);
        assert_eq!(favorite_persona(&[]), None);
    }

    #[test]
    fn test_top_score_keeps_fastest_run() {
        let records = vec![record("A", 50, vec![]), record("A", 30, vec![])];
        assert_eq!(top_scores_by_persona(&records), vec![score("A", 30)]);
    }

    #[test]
    fn test_top_scores_sorted_fastest_first() {
        let records = vec![
            record("Slow", 90, vec![]),
            record("Fast", 12, vec![]),
            record("Slow", 70, vec![]),
            record("Beta", 40, vec![]),
            record("Alpha", 40, vec![]),
        ];
        assert_eq!(
            top_scores_by_persona(&records),
            vec![score("Fast", 12), score("Alpha", 40), score("Beta", 40), score("Slow", 70)]
        );
    }

    #[test]
    fn test_total_spent_sums_every_line() {
        let records = vec![
            record("A", 1, vec![item("Yacht", 300, 2), item("Jet", 50, 1)]),
            record("B", 1, vec![item("Yacht", 300, 1)]),
        ];
        assert_eq!(total_spent(&records), 950);
        assert_eq!(records[0].total_spent(), 650);
    }

    #[test]
    fn test_most_purchased_item_sums_across_records() {
        let records = vec![
            record("A", 1, vec![item("Yacht", 300, 2), item("Jet", 50, 1)]),
            record("B", 1, vec![item("Jet", 50, 4)]),
        ];
        assert_eq!(
            most_purchased_item(&records),
            Some(Tally {
                name: "Jet".to_string(),
                count: 5
            })
        );
    }

    #[test]
    fn test_ties_resolve_alphabetically() {
        let records = vec![
            record("Zed", 1, vec![item("Zoo", 1, 3)]),
            record("Amy", 1, vec![item("Apple", 1, 3)]),
        ];
        assert_eq!(most_purchased_item(&records).map(|t| t.name), Some("Apple".to_string()));
        assert_eq!(favorite_persona(&records).map(|t| t.name), Some("Amy".to_string()));
    }

    #[test]
    fn test_favorite_persona_counts_sessions() {
        let records = vec![record("A", 1, vec![]), record("B", 1, vec![]), record("B", 2, vec![])];
        assert_eq!(
            favorite_persona(&records),
            Some(Tally {
                name: "B".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn test_profile_stats() {
        let records = vec![record("A", 10, vec![item("Jet", 50, 2)])];
        let stats = ProfileStats::from_records(&records);
        assert_eq!(stats.sessions_played, 1);
        assert_eq!(stats.total_spent, 100);
        assert_eq!(stats.most_purchased_item.map(|t| t.count), Some(2));
        assert_eq!(stats.favorite_persona.map(|t| t.name), Some("A".to_string()));
    }

    #[test]
    fn test_record_shape_defaults_missing_fields() {
        let parsed: SessionRecord = serde_json::from_str(r#"{"personaName":"A"}"#).unwrap();
        assert_eq!(parsed, record("A", 0, vec![]));
    }
}
