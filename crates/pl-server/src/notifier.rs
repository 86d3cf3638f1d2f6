//! Outbound Telegram replies — a fire-and-forget notification sink.
//!
//! Delivery failures are logged and swallowed; the pipeline's result does
//! not depend on whether the acknowledgment reached the chat.

use serde::Serialize;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// `sendMessage` request body.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

/// Client for the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, TELEGRAM_API_BASE)
    }

    /// Custom API base, so tests can point at a mock server.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    /// Send `text` to a chat, optionally as a reply. Never fails — all
    /// errors are logged at warn and dropped.
    pub async fn deliver(&self, chat_id: i64, text: &str, reply_to: Option<i64>) {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
            reply_to_message_id: reply_to,
        };

        match self.client.post(&url).json(&body).send().await {
            Ok(response) if !response.status().is_success() => {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                tracing::warn!(%status, detail = %detail, "telegram sendMessage rejected");
            }
            Ok(_) => {
                tracing::debug!(chat_id, "acknowledgment delivered");
            }
            Err(e) => {
                tracing::warn!(error = %e, "telegram sendMessage failed");
            }
        }
    }
}
