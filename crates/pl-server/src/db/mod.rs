//! Database access layer for PostgreSQL.
//!
//! `records` provides typed query functions over a `PgPool`; [`PgStore`]
//! adapts them to the pipeline's `RecordStore` seam.

pub mod records;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use pl_intent::{RecordStore, StoreError};
use pl_protocol::TargetTable;

/// Connect to PostgreSQL and run migrations.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("running database migrations");
    sqlx::raw_sql(include_str!("../../migrations/001_schema.sql"))
        .execute(&pool)
        .await?;
    tracing::info!("migrations complete");

    Ok(pool)
}

/// PostgreSQL-backed record store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(
        &self,
        table: TargetTable,
        payload: Map<String, Value>,
    ) -> Result<Value, StoreError> {
        let pet_id = opt_text(&payload, "pet_id");
        let created_by = opt_text(&payload, "created_by");

        // Absent required values bind as NULL; the NOT NULL constraints
        // report the rejection with a meaningful message.
        let result = match table {
            TargetTable::ShoppingItems => {
                records::insert_shopping(
                    &self.pool,
                    pet_id.as_deref(),
                    created_by.as_deref(),
                    opt_text(&payload, "title").as_deref(),
                    opt_f64(&payload, "price"),
                )
                .await
            }
            TargetTable::WeightRecords => {
                records::insert_weight(
                    &self.pool,
                    pet_id.as_deref(),
                    created_by.as_deref(),
                    opt_f64(&payload, "weight_kg"),
                )
                .await
            }
            TargetTable::Tasks => {
                records::insert_task(
                    &self.pool,
                    pet_id.as_deref(),
                    created_by.as_deref(),
                    opt_text(&payload, "title").as_deref(),
                    opt_text(&payload, "status").as_deref(),
                    opt_i32(&payload, "xp_reward"),
                )
                .await
            }
            TargetTable::Events => {
                records::insert_event(
                    &self.pool,
                    pet_id.as_deref(),
                    created_by.as_deref(),
                    opt_text(&payload, "type").as_deref(),
                    opt_text(&payload, "title").as_deref(),
                    opt_text(&payload, "date").as_deref(),
                )
                .await
            }
            TargetTable::Notes => {
                records::insert_note(
                    &self.pool,
                    pet_id.as_deref(),
                    created_by.as_deref(),
                    opt_text(&payload, "content").as_deref(),
                )
                .await
            }
        };

        result.map_err(|e| StoreError::Rejected(e.to_string()))
    }

    async fn list(
        &self,
        table: TargetTable,
        pet_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        records::list_rows(&self.pool, table, pet_id)
            .await
            .map_err(|e| StoreError::Rejected(e.to_string()))
    }
}

/// Text view of a payload value: strings pass through, other scalars via
/// their JSON form, null/absent become None.
fn opt_text(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn opt_f64(payload: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = payload.get(key)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn opt_i32(payload: &Map<String, Value>, key: &str) -> Option<i32> {
    let value = payload.get(key)?;
    value
        .as_i64()
        .map(|n| n as i32)
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
