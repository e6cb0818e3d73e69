use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::record::{AnalysisRecordRow, Category};

/// Published after every successful append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecorded {
    pub event: String,
    pub record_id: Uuid,
    pub user_id: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecorded {
    pub const EVENT: &'static str = "analysis.recorded";

    pub fn from_row(row: &AnalysisRecordRow, category: Category) -> Self {
        Self {
            event: Self::EVENT.to_string(),
            record_id: row.id,
            user_id: row.user_id.clone(),
            category,
            created_at: row.created_at,
        }
    }
}

/// Carried in `AppState` as `Arc<dyn EventPublisher>`.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &AnalysisRecorded) -> anyhow::Result<()>;
}

/// Publishes over one multiplexed connection opened at startup; each call
/// works on a cheap clone of it.
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
    channel: String,
}

impl RedisEventPublisher {
    pub async fn connect(
        client: &redis::Client,
        channel: impl Into<String>,
    ) -> redis::RedisResult<Self> {
        Ok(Self {
            conn: client.get_multiplexed_async_connection().await?,
            channel: channel.into(),
        })
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: &AnalysisRecorded) -> anyhow::Result<()> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.conn.clone();
        let _receivers: i64 = conn.publish(&self.channel, payload).await?;
        Ok(())
    }
}
