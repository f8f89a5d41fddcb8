use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use domain::{Persona, SessionRecord};

use crate::ports::out_::{KeyValueStore, StoreError};

pub const PERSONA_NAMESPACE: &str = "custom_billionaires";
pub const PERSONA_KEY: &str = "billionaire_list";
pub const HISTORY_NAMESPACE: &str = "game_history";
pub const HISTORY_KEY: &str = "history_list";

const EMPTY_LIST: &str = "[]";

/// Reads and writes the two persisted JSON lists: custom personas and
/// session history. Both are kept most recent first.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load_custom_personas(&self) -> Vec<Persona> {
        self.load_list(PERSONA_NAMESPACE, PERSONA_KEY).await
    }

    pub async fn prepend_custom_persona(
        &self,
        persona: Persona,
    ) -> Result<(), StoreError> {
        self.prepend(PERSONA_NAMESPACE, PERSONA_KEY, persona).await
    }

    pub async fn load_history(&self) -> Vec<SessionRecord> {
        self.load_list(HISTORY_NAMESPACE, HISTORY_KEY).await
    }

    pub async fn prepend_history(
        &self,
        record: SessionRecord,
    ) -> Result<(), StoreError> {
        self.prepend(HISTORY_NAMESPACE, HISTORY_KEY, record).await
    }

    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.store.clear(HISTORY_NAMESPACE).await?;
        self.store.clear(PERSONA_NAMESPACE).await
    }

    async fn load_list<T: DeserializeOwned>(
        &self,
        namespace: &str,
        key: &str,
    ) -> Vec<T> {
        let json = self.store.get_string(namespace, key, EMPTY_LIST).await;
        decode_list(&json)
    }

    // Read all, prepend, write all. Last writer wins.
    async fn prepend<T: Serialize + DeserializeOwned>(
        &self,
        namespace: &str,
        key: &str,
        entry: T,
    ) -> Result<(), StoreError> {
        let mut list: Vec<T> = self.load_list(namespace, key).await;
        list.insert(0, entry);
        let json = serde_json::to_string(&list).map_err(|e| StoreError::Write {
            namespace: namespace.to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.put_string(namespace, key, json).await
    }
}

/// Decodes a JSON array leniently: anything that is not an array yields an
/// empty list, and elements that don't match `T` are skipped.
pub fn decode_list<T: DeserializeOwned>(json: &str) -> Vec<T> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(values) => values,
        Err(e) => {
            if !json.trim().is_empty() {
                warn!(error = %e, "Discarding malformed persisted list");
            }
            return Vec::new();
        }
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed persisted entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_json_is_empty() {
        let records: Vec<SessionRecord> = decode_list("{not valid");
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_and_non_array_are_empty() {
        assert!(decode_list::<Persona>("").is_empty());
        assert!(decode_list::<Persona>("null").is_empty());
        assert!(decode_list::<Persona>(r#"{"name":"A","netWorth":1}"#).is_empty());
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let personas: Vec<Persona> =
            decode_list(r#"[{"name":"Good","netWorth":5}, {"name":"NoWorth"}, 42, {"name":"Also","netWorth":7}]"#);
        let names: Vec<_> = personas.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Good".to_string(), "Also".to_string()]);
    }
}
