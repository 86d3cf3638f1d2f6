//! Shared test harness for E2E integration tests.
//!
//! Wires the real router, interpreter, and reporter against an in-memory
//! store, a wiremock'd LLM provider, and a wiremock'd Telegram Bot API —
//! exercising real code paths across all crate boundaries.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pl_intent::{CommandInterpreter, GeminiConfig, MemoryStore};
use pl_server::notifier::TelegramNotifier;
use pl_server::routes::build_router;
use pl_server::state::AppState;

pub const BOT_TOKEN: &str = "123:abc";

/// End-to-end harness: HTTP in via `tower::oneshot`, LLM and Telegram
/// traffic out via wiremock.
pub struct TestHarness {
    /// Axum router over the shared state.
    pub router: Router,
    /// In-memory store, kept for direct row assertions.
    pub store: Arc<MemoryStore>,
    /// Mock LLM provider. Mount generateContent expectations here.
    pub gemini: MockServer,
    /// Mock Telegram Bot API. Mount sendMessage expectations here.
    pub telegram: MockServer,
}

impl TestHarness {
    /// Harness with the AI path enabled against the mock provider, two
    /// model candidates, and Telegram replies wired to the mock Bot API.
    pub async fn new() -> Self {
        Self::with_models(&["gemini-2.0-flash-lite", "gemini-2.0-flash"]).await
    }

    pub async fn with_models(models: &[&str]) -> Self {
        let gemini = MockServer::start().await;
        let telegram = MockServer::start().await;

        let store = Arc::new(MemoryStore::new());
        let interpreter = Arc::new(CommandInterpreter::from_config(GeminiConfig {
            base_url: gemini.uri(),
            api_key: Some("test-key".into()),
            models: models.iter().map(|m| m.to_string()).collect(),
            timeout_secs: 2,
        }));
        let notifier = Arc::new(TelegramNotifier::with_base_url(BOT_TOKEN, telegram.uri()));

        let state = AppState::new(
            store.clone(),
            interpreter,
            Some(notifier),
            Some(BOT_TOKEN.into()),
            "pet-archie",
        );
        let router = build_router(state);

        Self {
            router,
            store,
            gemini,
            telegram,
        }
    }

    /// Harness with no LLM credential — every command takes the fallback
    /// path without any provider traffic.
    pub async fn without_ai() -> Self {
        let gemini = MockServer::start().await;
        let telegram = MockServer::start().await;

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            Arc::new(CommandInterpreter::disabled()),
            Some(Arc::new(TelegramNotifier::with_base_url(
                BOT_TOKEN,
                telegram.uri(),
            ))),
            Some(BOT_TOKEN.into()),
            "pet-archie",
        );
        let router = build_router(state);

        Self {
            router,
            store,
            gemini,
            telegram,
        }
    }

    // ── wiremock helpers ─────────────────────────────────────────

    /// Mount a generateContent success (any model) returning `raw_text`
    /// as the model's output.
    pub async fn mock_parse(&self, raw_text: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body(raw_text)))
            .mount(&self.gemini)
            .await;
    }

    /// Mount a generateContent failure with `status` for one model.
    pub async fn mock_model_failure(&self, model: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{model}:generateContent")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.gemini)
            .await;
    }

    /// Mount a generateContent success for one specific model.
    pub async fn mock_model_success(&self, model: &str, raw_text: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{model}:generateContent")))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body(raw_text)))
            .mount(&self.gemini)
            .await;
    }

    /// Mount the Telegram sendMessage endpoint, expecting `expected`
    /// calls over the test's lifetime.
    pub async fn mock_send_message(&self, expected: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/bot{BOT_TOKEN}/sendMessage")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(expected)
            .mount(&self.telegram)
            .await;
    }

    // ── HTTP helpers ─────────────────────────────────────────────

    pub async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post(url)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    pub async fn get(&self, url: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(url).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// POST /api/v1/ai/command with the harness pet context.
    pub async fn send_ai_command(&self, text: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({
            "text": text,
            "pet_id": "pet-archie",
            "issued_by": "Anna",
        });
        self.post("/api/v1/ai/command", &body).await
    }

    /// POST a Telegram text-message update with the valid token.
    pub async fn send_webhook_text(&self, text: &str) -> (StatusCode, serde_json::Value) {
        let update = serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "from": {"id": 7, "first_name": "Anna"},
                "chat": {"id": 42, "type": "private"},
                "date": 1770000000,
                "text": text,
            }
        });
        self.post(
            &format!("/api/v1/telegram/webhook?token={BOT_TOKEN}"),
            &update,
        )
        .await
    }
}

/// Build a generateContent response body carrying `text`.
pub fn generation_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// The standard quota-exhausted error body.
pub fn quota_body() -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        }
    })
}
