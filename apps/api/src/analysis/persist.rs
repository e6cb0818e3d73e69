use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::{AnalysisRecorded, EventPublisher};
use crate::models::record::Category;
use crate::state::AppState;
use crate::store::ResultStore;

/// A verdict as returned to the caller: the stored record's id and server
/// timestamp alongside the verdict fields.
#[derive(Debug, Serialize)]
pub struct Recorded<T> {
    pub record_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub verdict: T,
}

/// Appends verdicts and announces them.
pub struct ResultPersister<'a> {
    store: &'a dyn ResultStore,
    events: &'a dyn EventPublisher,
}

impl<'a> ResultPersister<'a> {
    pub fn new(store: &'a dyn ResultStore, events: &'a dyn EventPublisher) -> Self {
        Self { store, events }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(state.store.as_ref(), state.events.as_ref())
    }

    /// The append is the commit point. Event publication afterwards is
    /// best-effort and never turns a stored record into an error response.
    pub async fn record<T: Serialize>(
        &self,
        user_id: &str,
        category: Category,
        verdict: T,
    ) -> Result<Recorded<T>, AppError> {
        let payload = serde_json::to_value(&verdict)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verdict serialization: {e}")))?;

        let row = self.store.append(user_id, category, payload).await?;
        info!("Recorded {category} verdict {} for user {user_id}", row.id);

        let event = AnalysisRecorded::from_row(&row, category);
        if let Err(e) = self.events.publish(&event).await {
            warn!("Failed to publish event for record {}: {e:#}", row.id);
        }

        Ok(Recorded {
            record_id: row.id,
            created_at: row.created_at,
            verdict,
        })
    }
}
