//! Domain record shapes as stored and returned by the API.
//!
//! Rows are created with server-assigned `id` and `created_at`; the
//! structs here are the typed view consumers deserialize API/store rows
//! into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Calendar event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Vet,
    Trip,
    Grooming,
    Other,
}

/// A dated event (vet visit, trip, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetEvent {
    pub id: Uuid,
    pub pet_id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    /// Kept as text — the model may extract relative dates ("tomorrow")
    /// that only the UI resolves.
    pub date: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Done,
    Overdue,
}

/// A family task with a small XP reward for gamification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub pet_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub xp_reward: i32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// A single weight measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: Uuid,
    pub pet_id: String,
    pub weight_kg: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// A free-form note (also the storage shape for reminders).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub pet_id: String,
    pub content: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// A shopping list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub pet_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
