use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("failed to write {namespace}/{key}: {reason}")]
    Write {
        namespace: String,
        key: String,
        reason: String,
    },

    #[error("failed to clear {namespace}: {reason}")]
    Clear { namespace: String, reason: String },
}

/// String key-value persistence, grouped by namespace.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `default` when absent or unreadable.
    async fn get_string(
        &self,
        namespace: &str,
        key: &str,
        default: &str,
    ) -> String;

    async fn put_string(
        &self,
        namespace: &str,
        key: &str,
        value: String,
    ) -> Result<(), StoreError>;

    async fn clear(
        &self,
        namespace: &str,
    ) -> Result<(), StoreError>;
}
