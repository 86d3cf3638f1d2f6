//! Telegram webhook — chat messages into the command pipeline.
//!
//! Transport rules follow the Bot API: the handler answers 200 with
//! `{"ok": true}` for every processed update (including internally failed
//! ones) so Telegram does not re-deliver; only a token mismatch is
//! rejected outright.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use pl_intent::reporter;
use pl_protocol::CommandContext;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Bot API update types (subset we handle).
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Deserialize)]
pub struct WebhookParams {
    pub token: Option<String>,
}

const START_MESSAGE: &str = "🐾 <b>Pawlog</b>\n\n\
Я помогаю следить за вашим питомцем!\n\n\
<b>Просто напишите в чат:</b>\n\
\"Купили корм Royal Canin\"\n\
\"Завтра к ветеринару в 15:00\"\n\
\"Вес 11.8 кг\"\n\
\"Дать таблетку от глистов\"";

fn ok() -> Json<Value> {
    Json(json!({"ok": true}))
}

/// POST /api/v1/telegram/webhook?token= — handle one Bot API update.
pub async fn webhook(
    State(state): State<AppState>,
    Query(params): Query<WebhookParams>,
    Json(update): Json<TelegramUpdate>,
) -> ApiResult<Json<Value>> {
    let Some(expected) = &state.webhook_token else {
        tracing::warn!("webhook update received but no bot token configured");
        return Ok(ok());
    };
    if params.token.as_deref() != Some(expected.as_str()) {
        return Err(ApiError::Unauthorized("webhook token mismatch".into()));
    }

    let Some(message) = update.message else {
        return Ok(ok());
    };
    let Some(text) = message.text.as_deref() else {
        return Ok(ok());
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(ok());
    }

    let chat_id = message.chat.id;
    let user_name = message
        .from
        .as_ref()
        .map(|u| u.first_name.clone())
        .unwrap_or_else(|| "User".into());

    tracing::info!(
        update_id = update.update_id,
        chat_id,
        chars = text.chars().count(),
        "webhook update"
    );

    if text == "/start" {
        deliver(&state, chat_id, START_MESSAGE, None).await;
        return Ok(ok());
    }

    // In groups, only react when addressed.
    if matches!(message.chat.chat_type.as_str(), "group" | "supergroup")
        && !is_bot_mentioned(text)
    {
        return Ok(ok());
    }

    // Other slash commands are not ours to answer.
    if text.starts_with('/') {
        return Ok(ok());
    }

    let ctx = CommandContext::new(state.default_pet_id.clone(), user_name);
    let parsed = state.interpreter.interpret(text).await;
    let outcome = state.router.route(&parsed, &ctx).await;
    let ack = reporter::report(&outcome, &parsed);

    deliver(&state, chat_id, &ack, Some(message.message_id)).await;
    Ok(ok())
}

fn is_bot_mentioned(text: &str) -> bool {
    text.contains('@') || text.to_lowercase().contains("pawlog")
}

async fn deliver(state: &AppState, chat_id: i64, text: &str, reply_to: Option<i64>) {
    if let Some(notifier) = &state.notifier {
        notifier.deliver(chat_id, text, reply_to).await;
    }
}
