//! Parsed command types — the interpreter's output and the caller-supplied
//! context it is routed with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::intent::IntentKind;

/// A free-text command after interpretation.
///
/// Created fresh per inbound text, handed to the router, discarded after
/// the acknowledgment is built. Never persisted itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// Classified intent — always one of the seven live kinds.
    #[serde(rename = "type")]
    pub kind: IntentKind,
    /// Model's self-reported certainty, clamped to [0.0, 1.0].
    /// 0.0 marks the guaranteed fallback path.
    pub confidence: f64,
    /// Intent-specific extracted data. Keys are free-form and
    /// intent-dependent (e.g. `weight_kg`, `title`, `price`, `date`).
    #[serde(default, rename = "data")]
    pub fields: Map<String, Value>,
}

impl ParsedCommand {
    /// The guaranteed degraded result: the full text captured as a note.
    pub fn fallback_note(text: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("content".into(), Value::String(text.to_string()));
        Self {
            kind: IntentKind::Note,
            confidence: 0.0,
            fields,
        }
    }

    /// True when this command came from the fallback path rather than a
    /// successful model parse.
    pub fn is_degraded(&self) -> bool {
        self.kind == IntentKind::Note && self.confidence == 0.0
    }
}

/// Who issued a command and which pet it concerns. Supplied by the
/// transport-side caller, never derived from model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandContext {
    /// Subject pet identifier.
    pub pet_id: String,
    /// Display name of the person issuing the command.
    pub issued_by: String,
}

impl CommandContext {
    pub fn new(pet_id: impl Into<String>, issued_by: impl Into<String>) -> Self {
        Self {
            pet_id: pet_id.into(),
            issued_by: issued_by.into(),
        }
    }
}
