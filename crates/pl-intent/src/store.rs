//! Persistence collaborator seam.
//!
//! The pipeline only needs "insert record of shape X into table Y, return
//! the row or an error". Production uses the PostgreSQL implementation in
//! the server crate; tests use [`crate::MemoryStore`].

use async_trait::async_trait;
use serde_json::{Map, Value};

use pl_protocol::TargetTable;

/// Failure reported by a [`RecordStore`]. The message is surfaced to the
/// user verbatim (via the routing outcome), so implementations should
/// keep it meaningful.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the operation (constraint violation, bad value,
    /// backend unavailable).
    #[error("{0}")]
    Rejected(String),
}

/// Atomic single-row persistence with server-assigned `id`/`created_at`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one row; returns the stored row including assigned fields.
    async fn insert(&self, table: TargetTable, payload: Map<String, Value>)
    -> Result<Value, StoreError>;

    /// List rows of a table, newest first, optionally filtered by pet.
    async fn list(&self, table: TargetTable, pet_id: Option<&str>)
    -> Result<Vec<Value>, StoreError>;
}
