use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::QueryParams;
use crate::models::record::Category;
use crate::state::AppState;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub record_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub verdict: Value,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub category: Category,
    pub records: Vec<HistoryEntry>,
}

/// Missing → default; above the maximum → clamped; below 1 → rejected.
pub fn resolve_limit(limit: Option<i64>) -> Result<i64, AppError> {
    match limit {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(n) if n < 1 => Err(AppError::Validation(format!(
            "limit must be at least 1, got {n}"
        ))),
        Some(n) => Ok(n.min(MAX_HISTORY_LIMIT)),
    }
}

/// GET /history/:category?limit=N
pub async fn handle_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category): Path<String>,
    QueryParams(query): QueryParams<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let category: Category = category.parse().map_err(AppError::Validation)?;
    let limit = resolve_limit(query.limit)?;

    let rows = state
        .store
        .list_recent(&user.user_id, category, limit)
        .await?;

    Ok(Json(HistoryResponse {
        category,
        records: rows
            .into_iter()
            .map(|row| HistoryEntry {
                record_id: row.id,
                created_at: row.created_at,
                verdict: row.payload,
            })
            .collect(),
    }))
}
