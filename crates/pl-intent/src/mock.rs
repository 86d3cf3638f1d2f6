//! In-memory [`RecordStore`] for tests and DB-less development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use pl_protocol::TargetTable;

use crate::store::{RecordStore, StoreError};

/// `RwLock<HashMap>`-backed store. Assigns UUIDv7 ids and UTC timestamps
/// the way the real database does.
pub struct MemoryStore {
    rows: RwLock<HashMap<TargetTable, Vec<Value>>>,
    reject_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            reject_with: None,
        }
    }

    /// A store that rejects every insert with the given message — for
    /// exercising persistence-failure paths.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            reject_with: Some(message.into()),
        }
    }

    /// Number of rows currently held in a table.
    pub async fn count(&self, table: TargetTable) -> usize {
        self.rows
            .read()
            .await
            .get(&table)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(
        &self,
        table: TargetTable,
        payload: Map<String, Value>,
    ) -> Result<Value, StoreError> {
        if let Some(message) = &self.reject_with {
            return Err(StoreError::Rejected(message.clone()));
        }

        let mut row = payload;
        row.insert("id".into(), Value::String(Uuid::now_v7().to_string()));
        row.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));
        let row = Value::Object(row);

        let mut rows = self.rows.write().await;
        rows.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn list(
        &self,
        table: TargetTable,
        pet_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = self.rows.read().await;
        let mut out: Vec<Value> = rows
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| match pet_id {
                        Some(id) => row["pet_id"].as_str() == Some(id),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        out.reverse(); // newest first
        Ok(out)
    }
}
