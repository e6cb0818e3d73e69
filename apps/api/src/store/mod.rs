//! Append-only verdict storage keyed by (user id, category).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::record::{AnalysisRecordRow, Category};

#[cfg(test)]
pub mod memory;

/// Carried in `AppState` as `Arc<dyn ResultStore>`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Appends a verdict. The timestamp is assigned by the store, never the caller.
    async fn append(
        &self,
        user_id: &str,
        category: Category,
        payload: Value,
    ) -> Result<AnalysisRecordRow, AppError>;

    /// Most recent records first.
    async fn list_recent(
        &self,
        user_id: &str,
        category: Category,
        limit: i64,
    ) -> Result<Vec<AnalysisRecordRow>, AppError>;
}

pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn append(
        &self,
        user_id: &str,
        category: Category,
        payload: Value,
    ) -> Result<AnalysisRecordRow, AppError> {
        // Append-only INSERT; rows are never updated
        let row = sqlx::query_as::<_, AnalysisRecordRow>(
            r#"
            INSERT INTO analysis_records (id, user_id, category, payload)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(category.as_str())
        .bind(&payload)
        .fetch_one(&self.pool)
        .await?;

        info!("Appended {category} record {} for user {user_id}", row.id);
        Ok(row)
    }

    async fn list_recent(
        &self,
        user_id: &str,
        category: Category,
        limit: i64,
    ) -> Result<Vec<AnalysisRecordRow>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRecordRow>(
            r#"
            SELECT * FROM analysis_records
            WHERE user_id = $1 AND category = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(category.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Decodes the newest record of a category into a typed verdict.
/// Records written by an older payload shape are skipped, not fatal.
pub async fn latest_verdict<T: DeserializeOwned>(
    store: &dyn ResultStore,
    user_id: &str,
    category: Category,
) -> Result<Option<T>, AppError> {
    Ok(recent_verdicts(store, user_id, category, 1)
        .await?
        .into_iter()
        .next())
}

/// Decodes up to `limit` recent records, newest first, skipping undecodable payloads.
pub async fn recent_verdicts<T: DeserializeOwned>(
    store: &dyn ResultStore,
    user_id: &str,
    category: Category,
    limit: i64,
) -> Result<Vec<T>, AppError> {
    let rows = store.list_recent(user_id, category, limit).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row.payload) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Skipping undecodable {category} record {}: {e}", row.id);
                None
            }
        })
        .collect())
}
