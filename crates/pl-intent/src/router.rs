//! Intent router — maps a parsed command onto one storage insert.
//!
//! Payload construction is deterministic: recognized fields pass through
//! verbatim, required-but-absent fields get intent-specific defaults, and
//! unrecognized extra keys are dropped (an explicit lossy step — the
//! target schemas do not grow columns because the model invented one).

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value, json};

use pl_protocol::{CommandContext, IntentKind, ParsedCommand, RoutingOutcome, TargetTable};

use crate::store::RecordStore;

/// Routes parsed commands to the persistence collaborator. No retry —
/// a store rejection is reported upward as-is.
pub struct IntentRouter {
    store: Arc<dyn RecordStore>,
}

impl IntentRouter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Build the defaulted payload and attempt the insert.
    pub async fn route(&self, command: &ParsedCommand, ctx: &CommandContext) -> RoutingOutcome {
        let (target, payload) = build_payload(command, ctx);

        match self.store.insert(target, payload.clone()).await {
            Ok(record) => {
                tracing::info!(kind = %command.kind, table = %target, "command routed");
                RoutingOutcome::saved(target, payload, record)
            }
            Err(e) => {
                tracing::warn!(kind = %command.kind, table = %target, error = %e, "store rejected command");
                RoutingOutcome::rejected(target, payload, e.to_string())
            }
        }
    }
}

/// Select the target table and assemble the fully-defaulted record.
pub fn build_payload(
    command: &ParsedCommand,
    ctx: &CommandContext,
) -> (TargetTable, Map<String, Value>) {
    let target = command.kind.target_table();

    let mut payload = Map::new();
    payload.insert("pet_id".into(), Value::String(ctx.pet_id.clone()));
    payload.insert("created_by".into(), Value::String(ctx.issued_by.clone()));

    match command.kind {
        IntentKind::Note | IntentKind::Reminder => {
            payload.insert("content".into(), Value::String(note_content(command)));
        }
        kind => {
            for key in kind.recognized_fields() {
                if let Some(value) = command.fields.get(*key) {
                    payload.insert((*key).to_string(), value.clone());
                }
            }
            fill_defaults(kind, &mut payload);
        }
    }

    (target, payload)
}

/// Content fallback chain for notes: extracted content, else the title,
/// else a generic placeholder.
fn note_content(command: &ParsedCommand) -> String {
    for key in ["content", "title"] {
        if let Some(value) = command.fields.get(key) {
            match value {
                Value::String(s) if !s.is_empty() => return s.clone(),
                Value::String(_) | Value::Null => continue,
                other => return other.to_string(),
            }
        }
    }
    "Заметка".into()
}

fn fill_defaults(kind: IntentKind, payload: &mut Map<String, Value>) {
    let put = |payload: &mut Map<String, Value>, key: &str, value: Value| {
        if !payload.contains_key(key) {
            payload.insert(key.to_string(), value);
        }
    };

    match kind {
        IntentKind::Shopping => {
            put(payload, "title", json!("Покупка"));
            put(payload, "price", Value::Null);
        }
        IntentKind::Weight => {
            put(payload, "weight_kg", json!(0));
        }
        IntentKind::Task => {
            put(payload, "title", json!("Задача"));
            put(payload, "status", json!("pending"));
            put(payload, "xp_reward", json!(10));
        }
        IntentKind::Vet => {
            put(payload, "type", json!("vet"));
            put(payload, "title", json!("Визит к врачу"));
            put(payload, "date", Value::String(today()));
        }
        IntentKind::Trip => {
            put(payload, "type", json!("trip"));
            put(payload, "title", json!("Поездка"));
            put(payload, "date", Value::String(today()));
        }
        IntentKind::Note | IntentKind::Reminder => {}
    }
}

/// Today's UTC calendar date, matching the format the model is asked for.
fn today() -> String {
    Utc::now().date_naive().to_string()
}
