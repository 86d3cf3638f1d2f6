//! Generic record CRUD — one parameterized handler pair keyed by table
//! name instead of near-identical handlers per resource type.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use pl_protocol::TargetTable;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub pet_id: Option<String>,
}

fn resolve(table: &str) -> ApiResult<TargetTable> {
    TargetTable::from_name(table)
        .ok_or_else(|| ApiError::NotFound(format!("unknown table '{table}'")))
}

/// GET /api/v1/records/{table}?pet_id= — list rows, newest first.
pub async fn list_records(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let table = resolve(&table)?;
    let rows = state
        .store
        .list(table, params.pet_id.as_deref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(rows))
}

/// POST /api/v1/records/{table} — insert one row.
pub async fn create_record(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let table = resolve(&table)?;
    let row = state
        .store
        .insert(table, payload)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(row)))
}
