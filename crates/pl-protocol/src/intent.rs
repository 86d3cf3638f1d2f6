//! Intent schema — the single source of truth for the seven recognized
//! command intents and their storage targets.
//!
//! The prompt text, the interpreter's validation, and the router's
//! default-filling all key off this module so they cannot drift apart.

use serde::{Deserialize, Serialize};

/// What kind of record a free-text command is asking to create.
///
/// An earlier contract revision also carried an "unknown" variant; it is
/// gone — the interpreter resolves everything to one of these seven,
/// defaulting to [`IntentKind::Note`] when uncertain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    /// Vet visit appointment (events table).
    Vet,
    /// Travel / trip with the pet (events table).
    Trip,
    /// Weight measurement (weight_records table).
    Weight,
    /// Shopping list entry or purchase (shopping_items table).
    Shopping,
    /// Free-form note (notes table).
    Note,
    /// Family task (tasks table).
    Task,
    /// Reminder — currently persisted as a note (see DESIGN.md).
    Reminder,
}

impl IntentKind {
    /// All seven live kinds.
    pub const ALL: [IntentKind; 7] = [
        IntentKind::Vet,
        IntentKind::Trip,
        IntentKind::Weight,
        IntentKind::Shopping,
        IntentKind::Note,
        IntentKind::Task,
        IntentKind::Reminder,
    ];

    /// Parse the model's `type` tag. Returns `None` for anything outside
    /// the live set — including the deprecated `"unknown"` tag.
    pub fn from_name(name: &str) -> Option<IntentKind> {
        match name {
            "vet" => Some(IntentKind::Vet),
            "trip" => Some(IntentKind::Trip),
            "weight" => Some(IntentKind::Weight),
            "shopping" => Some(IntentKind::Shopping),
            "note" => Some(IntentKind::Note),
            "task" => Some(IntentKind::Task),
            "reminder" => Some(IntentKind::Reminder),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Vet => "vet",
            IntentKind::Trip => "trip",
            IntentKind::Weight => "weight",
            IntentKind::Shopping => "shopping",
            IntentKind::Note => "note",
            IntentKind::Task => "task",
            IntentKind::Reminder => "reminder",
        }
    }

    /// Field names the router copies from extracted data into the record
    /// payload. Anything the model extracts outside this list is dropped
    /// at routing time.
    pub fn recognized_fields(&self) -> &'static [&'static str] {
        match self {
            IntentKind::Shopping => &["title", "price"],
            IntentKind::Weight => &["weight_kg"],
            IntentKind::Task => &["title", "status", "xp_reward"],
            IntentKind::Vet | IntentKind::Trip => &["type", "title", "date"],
            IntentKind::Note | IntentKind::Reminder => &["content", "title"],
        }
    }

    /// Storage target this intent routes to.
    pub fn target_table(&self) -> TargetTable {
        match self {
            IntentKind::Shopping => TargetTable::ShoppingItems,
            IntentKind::Weight => TargetTable::WeightRecords,
            IntentKind::Task => TargetTable::Tasks,
            IntentKind::Vet | IntentKind::Trip => TargetTable::Events,
            IntentKind::Note | IntentKind::Reminder => TargetTable::Notes,
        }
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic name of a persistence target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTable {
    ShoppingItems,
    WeightRecords,
    Tasks,
    Events,
    Notes,
}

impl TargetTable {
    pub const ALL: [TargetTable; 5] = [
        TargetTable::ShoppingItems,
        TargetTable::WeightRecords,
        TargetTable::Tasks,
        TargetTable::Events,
        TargetTable::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetTable::ShoppingItems => "shopping_items",
            TargetTable::WeightRecords => "weight_records",
            TargetTable::Tasks => "tasks",
            TargetTable::Events => "events",
            TargetTable::Notes => "notes",
        }
    }

    /// Resolve a URL/table name. `None` for anything not in the closed set.
    pub fn from_name(name: &str) -> Option<TargetTable> {
        match name {
            "shopping_items" => Some(TargetTable::ShoppingItems),
            "weight_records" => Some(TargetTable::WeightRecords),
            "tasks" => Some(TargetTable::Tasks),
            "events" => Some(TargetTable::Events),
            "notes" => Some(TargetTable::Notes),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
