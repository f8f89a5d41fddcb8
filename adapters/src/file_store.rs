//! JSON-file-backed key-value store.
//!
//! Each namespace lives in `{data_dir}/{namespace}.json` as a single JSON
//! object mapping keys to string values. Writes go to a temp file that is
//! synced and renamed over the original.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, warn};

use application::ports::out_::{KeyValueStore, StoreError};

pub struct JsonFileStore {
    data_dir: PathBuf,
    // Serializes read-modify-write cycles on namespace files
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn namespace_path(
        &self,
        namespace: &str,
    ) -> PathBuf {
        self.data_dir.join(format!("{namespace}.json"))
    }

    /// Reads a namespace file. Missing and corrupt files both read as empty.
    fn load_namespace_sync(path: &Path) -> Map<String, Value> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read namespace file");
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %path.display(), "Namespace file is not a JSON object, treating as empty");
                Map::new()
            }
        }
    }

    fn save_namespace_sync(
        path: &Path,
        map: &Map<String, Value>,
    ) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create data directory '{}': {}", parent.display(), e))?;
        }

        let json = serde_json::to_string_pretty(map).map_err(|e| format!("failed to serialize namespace: {e}"))?;

        let tmp_path = path.with_extension("json.tmp");
        let mut tmp_file =
            File::create(&tmp_path).map_err(|e| format!("failed to create '{}': {}", tmp_path.display(), e))?;
        tmp_file
            .write_all(json.as_bytes())
            .map_err(|e| format!("failed to write '{}': {}", tmp_path.display(), e))?;
        tmp_file
            .sync_all()
            .map_err(|e| format!("failed to sync '{}': {}", tmp_path.display(), e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, path)
            .map_err(|e| format!("failed to rename '{}' to '{}': {}", tmp_path.display(), path.display(), e))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_string(
        &self,
        namespace: &str,
        key: &str,
        default: &str,
    ) -> String {
        let path = self.namespace_path(namespace);
        let key = key.to_string();

        let value = task::spawn_blocking(move || Self::load_namespace_sync(&path).remove(&key))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Namespace read task failed");
                None
            });

        match value {
            Some(Value::String(value)) => value,
            Some(other) => {
                warn!(namespace, kind = json_kind(&other), "Stored value is not a string, using default");
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    async fn put_string(
        &self,
        namespace: &str,
        key: &str,
        value: String,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.namespace_path(namespace);
        let owned_key = key.to_string();

        let result = task::spawn_blocking(move || {
            let mut map = Self::load_namespace_sync(&path);
            map.insert(owned_key, Value::String(value));
            Self::save_namespace_sync(&path, &map)
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|inner| inner);

        result.map_err(|reason| StoreError::Write {
            namespace: namespace.to_string(),
            key: key.to_string(),
            reason,
        })?;
        debug!(namespace, key, "Value written");
        Ok(())
    }

    async fn clear(
        &self,
        namespace: &str,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.namespace_path(namespace);

        let result = task::spawn_blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("failed to remove '{}': {}", path.display(), e)),
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|inner| inner);

        result.map_err(|reason| StoreError::Clear {
            namespace: namespace.to_string(),
            reason,
        })?;
        debug!(namespace, "Namespace cleared");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_value_returns_default() {
        let (_dir, store) = store();
        assert_eq!(store.get_string("ns", "key", "[]").await, "[]");
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (_dir, store) = store();
        store.put_string("ns", "a", "[1]".to_string()).await.unwrap();
        store.put_string("ns", "b", "[2]".to_string()).await.unwrap();

        assert_eq!(store.get_string("ns", "a", "").await, "[1]");
        assert_eq!(store.get_string("ns", "b", "").await, "[2]");
        assert!(store.data_dir().join("ns.json").exists());
        assert!(!store.data_dir().join("ns.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let (dir, store) = store();
        store.put_string("ns", "key", "kept".to_string()).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::new(dir.path().join("data"));
        assert_eq!(reopened.get_string("ns", "key", "").await, "kept");
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let (_dir, store) = store();
        fs::create_dir_all(store.data_dir()).unwrap();
        fs::write(store.data_dir().join("ns.json"), "{not valid").unwrap();

        assert_eq!(store.get_string("ns", "key", "[]").await, "[]");

        // A write replaces the corrupt file
        store.put_string("ns", "key", "fresh".to_string()).await.unwrap();
        assert_eq!(store.get_string("ns", "key", "").await, "fresh");
    }

    #[tokio::test]
    async fn test_non_string_value_reads_as_default() {
        let (_dir, store) = store();
        fs::create_dir_all(store.data_dir()).unwrap();
        fs::write(store.data_dir().join("ns.json"), r#"{"key":[{"name":"A"}]}"#).unwrap();

        assert_eq!(store.get_string("ns", "key", "[]").await, "[]");
        assert_eq!(json_kind(&serde_json::json!([1, 2])), "array");
        assert_eq!(json_kind(&serde_json::json!({"a": 1})), "object");
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_namespace() {
        let (_dir, store) = store();
        store.put_string("one", "key", "1".to_string()).await.unwrap();
        store.put_string("two", "key", "2".to_string()).await.unwrap();

        store.clear("one").await.unwrap();
        store.clear("missing").await.unwrap();

        assert_eq!(store.get_string("one", "key", "none").await, "none");
        assert_eq!(store.get_string("two", "key", "none").await, "2");
    }
}
