//! Routing outcome — the result of applying a parsed command to the
//! persistence collaborator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::intent::TargetTable;

/// What happened when a [`crate::ParsedCommand`] was routed to storage.
///
/// Ephemeral: used only to build the acknowledgment message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingOutcome {
    /// Storage target the command routed to.
    pub target: TargetTable,
    /// The fully-defaulted record that was handed to the store.
    pub payload: Map<String, Value>,
    /// Row returned by the store (server-assigned id and timestamps).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Value>,
    /// Whether the insert was accepted.
    pub success: bool,
    /// Store's rejection message, verbatim, when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl RoutingOutcome {
    pub fn saved(target: TargetTable, payload: Map<String, Value>, record: Value) -> Self {
        Self {
            target,
            payload,
            record: Some(record),
            success: true,
            error_detail: None,
        }
    }

    pub fn rejected(
        target: TargetTable,
        payload: Map<String, Value>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            target,
            payload,
            record: None,
            success: false,
            error_detail: Some(error.into()),
        }
    }
}
