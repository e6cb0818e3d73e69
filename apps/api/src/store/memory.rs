use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ResultStore;
use crate::errors::AppError;
use crate::models::record::{AnalysisRecordRow, Category};

/// In-process store for tests. Insertion order stands in for the server timestamp ordering.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<AnalysisRecordRow>>,
}

impl MemoryStore {
    pub async fn all(&self) -> Vec<AnalysisRecordRow> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn append(
        &self,
        user_id: &str,
        category: Category,
        payload: Value,
    ) -> Result<AnalysisRecordRow, AppError> {
        let row = AnalysisRecordRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            category: category.as_str().to_string(),
            payload,
            created_at: Utc::now(),
        };
        self.rows.lock().await.push(row.clone());
        Ok(row)
    }

    async fn list_recent(
        &self,
        user_id: &str,
        category: Category,
        limit: i64,
    ) -> Result<Vec<AnalysisRecordRow>, AppError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id && r.category == category.as_str())
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_is_scoped_and_newest_first() {
        let store = MemoryStore::default();
        store.append("a", Category::Swot, json!({"n": 1})).await.unwrap();
        store.append("b", Category::Swot, json!({"n": 2})).await.unwrap();
        store.append("a", Category::Strategy, json!({"n": 3})).await.unwrap();
        store.append("a", Category::Swot, json!({"n": 4})).await.unwrap();

        let rows = store.list_recent("a", Category::Swot, 10).await.unwrap();
        let ns: Vec<_> = rows.iter().map(|r| r.payload["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![4, 1]);
    }

    #[tokio::test]
    async fn test_appends_never_overwrite() {
        let store = MemoryStore::default();
        let first = store.append("a", Category::Swot, json!({})).await.unwrap();
        let second = store.append("a", Category::Swot, json!({})).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.all().await.len(), 2);
    }
}
