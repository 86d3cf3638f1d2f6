//! AI command endpoints — the interpret → route → report pipeline over
//! HTTP, for the in-app command box.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use pl_intent::reporter;
use pl_protocol::{CommandContext, ParsedCommand, RoutingOutcome};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub text: String,
    /// Defaults to the server's configured pet.
    pub pet_id: Option<String>,
    /// Defaults to "Web".
    pub issued_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandResult {
    pub parsed: ParsedCommand,
    pub outcome: RoutingOutcome,
    pub message: String,
}

fn trimmed(text: &str) -> ApiResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("text field is required".into()));
    }
    Ok(text)
}

/// POST /api/v1/ai/parse — classify only, no persistence.
pub async fn parse_command(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> ApiResult<Json<ParsedCommand>> {
    let text = trimmed(&req.text)?;
    Ok(Json(state.interpreter.interpret(text).await))
}

/// POST /api/v1/ai/command — full pipeline: classify, persist, report.
///
/// A store rejection is not an HTTP error: the outcome carries
/// `success: false` and the message explains it, exactly as a chat user
/// would see it.
pub async fn run_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> ApiResult<Json<CommandResult>> {
    let text = trimmed(&req.text)?;
    let ctx = CommandContext::new(
        req.pet_id.unwrap_or_else(|| state.default_pet_id.clone()),
        req.issued_by.unwrap_or_else(|| "Web".into()),
    );

    let parsed = state.interpreter.interpret(text).await;
    let outcome = state.router.route(&parsed, &ctx).await;
    let message = reporter::report(&outcome, &parsed);

    Ok(Json(CommandResult {
        parsed,
        outcome,
        message,
    }))
}
