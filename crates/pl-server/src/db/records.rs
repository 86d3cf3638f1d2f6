//! Typed insert/list queries per record table.
//!
//! Rows come back as `to_jsonb(...)` so the API and the in-memory store
//! speak the same shape.

use serde_json::Value;
use sqlx::PgPool;

use pl_protocol::TargetTable;

pub async fn insert_shopping(
    pool: &PgPool,
    pet_id: Option<&str>,
    created_by: Option<&str>,
    title: Option<&str>,
    price: Option<f64>,
) -> Result<Value, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO shopping_items (pet_id, created_by, title, price)
         VALUES ($1, $2, $3, $4)
         RETURNING to_jsonb(shopping_items.*)",
    )
    .bind(pet_id)
    .bind(created_by)
    .bind(title)
    .bind(price)
    .fetch_one(pool)
    .await
}

pub async fn insert_weight(
    pool: &PgPool,
    pet_id: Option<&str>,
    created_by: Option<&str>,
    weight_kg: Option<f64>,
) -> Result<Value, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO weight_records (pet_id, created_by, weight_kg)
         VALUES ($1, $2, $3)
         RETURNING to_jsonb(weight_records.*)",
    )
    .bind(pet_id)
    .bind(created_by)
    .bind(weight_kg)
    .fetch_one(pool)
    .await
}

pub async fn insert_task(
    pool: &PgPool,
    pet_id: Option<&str>,
    created_by: Option<&str>,
    title: Option<&str>,
    status: Option<&str>,
    xp_reward: Option<i32>,
) -> Result<Value, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO tasks (pet_id, created_by, title, status, xp_reward)
         VALUES ($1, $2, $3, COALESCE($4, 'pending'), COALESCE($5, 10))
         RETURNING to_jsonb(tasks.*)",
    )
    .bind(pet_id)
    .bind(created_by)
    .bind(title)
    .bind(status)
    .bind(xp_reward)
    .fetch_one(pool)
    .await
}

pub async fn insert_event(
    pool: &PgPool,
    pet_id: Option<&str>,
    created_by: Option<&str>,
    event_type: Option<&str>,
    title: Option<&str>,
    date: Option<&str>,
) -> Result<Value, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO events (pet_id, created_by, type, title, date)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING to_jsonb(events.*)",
    )
    .bind(pet_id)
    .bind(created_by)
    .bind(event_type)
    .bind(title)
    .bind(date)
    .fetch_one(pool)
    .await
}

pub async fn insert_note(
    pool: &PgPool,
    pet_id: Option<&str>,
    created_by: Option<&str>,
    content: Option<&str>,
) -> Result<Value, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO notes (pet_id, created_by, content)
         VALUES ($1, $2, $3)
         RETURNING to_jsonb(notes.*)",
    )
    .bind(pet_id)
    .bind(created_by)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// List rows of a table, newest first, optionally filtered by pet. The
/// table name comes from the closed `TargetTable` enum, never from user
/// input directly.
pub async fn list_rows(
    pool: &PgPool,
    table: TargetTable,
    pet_id: Option<&str>,
) -> Result<Vec<Value>, sqlx::Error> {
    let sql = match table {
        TargetTable::ShoppingItems => {
            "SELECT to_jsonb(t.*) FROM shopping_items t
             WHERE ($1::text IS NULL OR t.pet_id = $1) ORDER BY t.created_at DESC"
        }
        TargetTable::WeightRecords => {
            "SELECT to_jsonb(t.*) FROM weight_records t
             WHERE ($1::text IS NULL OR t.pet_id = $1) ORDER BY t.created_at DESC"
        }
        TargetTable::Tasks => {
            "SELECT to_jsonb(t.*) FROM tasks t
             WHERE ($1::text IS NULL OR t.pet_id = $1) ORDER BY t.created_at DESC"
        }
        TargetTable::Events => {
            "SELECT to_jsonb(t.*) FROM events t
             WHERE ($1::text IS NULL OR t.pet_id = $1) ORDER BY t.created_at DESC"
        }
        TargetTable::Notes => {
            "SELECT to_jsonb(t.*) FROM notes t
             WHERE ($1::text IS NULL OR t.pet_id = $1) ORDER BY t.created_at DESC"
        }
    };

    sqlx::query_scalar(sql).bind(pet_id).fetch_all(pool).await
}
