use std::sync::Arc;

use tracing::info;

use domain::{ProfileStats, SessionRecord, SessionSummary, TopScore, top_scores_by_persona};

use crate::gateway::PersistenceGateway;
use crate::ports::out_::{Clock, StoreError};

#[derive(Clone)]
pub struct HistoryService {
    gateway: PersistenceGateway,
    clock: Arc<dyn Clock>,
}

impl HistoryService {
    pub fn new(
        gateway: PersistenceGateway,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { gateway, clock }
    }

    /// All completed sessions, most recent first.
    pub async fn history(&self) -> Vec<SessionRecord> {
        self.gateway.load_history().await
    }

    pub async fn top_scores(&self) -> Vec<TopScore> {
        top_scores_by_persona(&self.history().await)
    }

    pub async fn profile(&self) -> ProfileStats {
        ProfileStats::from_records(&self.history().await)
    }

    pub async fn record(
        &self,
        summary: SessionSummary,
    ) -> Result<SessionRecord, StoreError> {
        let record = SessionRecord::from_summary(summary, self.clock.now_millis());
        self.gateway.prepend_history(record.clone()).await?;
        info!(
            persona = %record.persona_name,
            elapsed_seconds = record.elapsed_seconds,
            items = record.purchased_items.len(),
            "Session recorded"
        );
        Ok(record)
    }

    /// Deletes history and custom personas.
    pub async fn clear_all_data(&self) -> Result<(), StoreError> {
        self.gateway.clear_all().await?;
        info!("All persisted data cleared");
        Ok(())
    }
}
