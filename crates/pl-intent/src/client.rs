//! Generative-language API client for NL command parsing.
//!
//! Issues one `generateContent` call per model candidate, in order, most
//! available/cheapest first. A quota-style failure (HTTP 429 or a
//! "quota"/"429" marker in the error message) falls through to the next
//! candidate; any other failure stops the loop immediately — auth and
//! malformed-request errors are neither transient nor candidate-specific.

use serde::{Deserialize, Serialize};

/// Default model candidates, in preference order.
const DEFAULT_MODELS: [&str; 3] = [
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
];

/// Configuration for the generative-language endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API base URL. Overridable so tests can point at a mock server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key. None disables the AI path entirely.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model candidates to try in order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            models: default_models(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables (`GEMINI_API_KEY`,
    /// optionally `GEMINI_BASE_URL`).
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| default_base_url());
        Self {
            base_url,
            api_key,
            ..Self::default()
        }
    }
}

/// Failure reported by [`GeminiClient::generate`]. Provider errors are
/// captured and converted — the client never panics on a bad response.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A non-quota provider error stopped the candidate loop.
    #[error("provider error: {0}")]
    Provider(String),
    /// Every candidate failed with a quota-style error.
    #[error("all {attempts} model candidates quota-exhausted")]
    Exhausted { attempts: usize },
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// One combined user turn with system instructions and the command as
/// separate text parts.
#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response fields we need (first candidate's text parts).
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Error body shape returned by the API.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client for the generative-language HTTP API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client from config. Returns `None` when no API key is
    /// configured — callers treat that as "AI path disabled".
    pub fn from_config(config: GeminiConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Some(Self {
            client,
            api_key,
            config,
        })
    }

    /// Run one interpretation request, trying each candidate model in
    /// order. Returns the first successfully produced raw text.
    pub async fn generate(
        &self,
        system_instructions: &str,
        user_text: &str,
    ) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        text: system_instructions,
                    },
                    Part { text: user_text },
                ],
            }],
        };

        for model in &self.config.models {
            match self.call_model(model, &body).await {
                Ok(text) => return Ok(text),
                Err(CallError::Quota(reason)) => {
                    tracing::warn!(model = %model, reason = %reason, "model quota-exhausted, trying next candidate");
                    continue;
                }
                Err(CallError::Fatal(reason)) => {
                    tracing::warn!(model = %model, reason = %reason, "model call failed");
                    return Err(LlmError::Provider(reason));
                }
            }
        }

        Err(LlmError::Exhausted {
            attempts: self.config.models.len(),
        })
    }

    async fn call_model(&self, model: &str, body: &GenerateRequest<'_>) -> Result<String, CallError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| classify(None, &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or(raw);
            return Err(classify(Some(status.as_u16()), &message));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CallError::Fatal(format!("invalid response body: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| CallError::Fatal("no text in response".into()))
    }
}

/// Per-candidate failure classification.
enum CallError {
    /// Rate-limit / quota exhaustion — try the next candidate.
    Quota(String),
    /// Anything else — stop the loop.
    Fatal(String),
}

fn classify(status: Option<u16>, message: &str) -> CallError {
    if status == Some(429) || is_quota_message(message) {
        CallError::Quota(message.to_string())
    } else {
        CallError::Fatal(match status {
            Some(code) => format!("{code}: {message}"),
            None => message.to_string(),
        })
    }
}

/// Quota-style errors are recognizable by a "429" code or a "quota"
/// substring in the message.
fn is_quota_message(message: &str) -> bool {
    message.contains("429") || message.to_lowercase().contains("quota")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generation_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                },
                "finishReason": "STOP"
            }]
        })
    }

    fn quota_body() -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        })
    }

    fn client_for(server: &MockServer, models: &[&str]) -> GeminiClient {
        GeminiClient::from_config(GeminiConfig {
            base_url: server.uri(),
            api_key: Some("test-key".into()),
            models: models.iter().map(|m| m.to_string()).collect(),
            timeout_secs: 2,
        })
        .expect("api key is set")
    }

    #[tokio::test]
    async fn first_candidate_success_returns_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash-lite:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body(
                r#"{"type":"weight","confidence":0.98,"data":{"weight_kg":12.5}}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;
        // Second candidate must never be reached.
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body("{}")))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, &["gemini-2.0-flash-lite", "gemini-2.0-flash"]);
        let text = client.generate("system", "Parse: \"вес 12.5\"").await.unwrap();
        assert!(text.contains("weight_kg"));
    }

    #[tokio::test]
    async fn quota_error_falls_through_to_next_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash-lite:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_json(quota_body()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(generation_body(r#"{"type":"note","confidence":0.8}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &["gemini-2.0-flash-lite", "gemini-2.0-flash"]);
        let text = client.generate("system", "user").await.unwrap();
        assert!(text.contains("note"));
    }

    #[tokio::test]
    async fn quota_substring_in_message_also_falls_through() {
        let server = MockServer::start().await;
        // 403 body mentioning quota — still a fallthrough signal.
        Mock::given(method("POST"))
            .and(path("/v1beta/models/m1:generateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": { "message": "Quota exceeded for quota metric 'generate'", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/m2:generateContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(generation_body(r#"{"type":"task","confidence":0.9}"#)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, &["m1", "m2"]);
        assert!(client.generate("s", "u").await.is_ok());
    }

    #[tokio::test]
    async fn non_quota_error_stops_without_trying_next() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/m1:generateContent"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/m2:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body("{}")))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, &["m1", "m2"]);
        let err = client.generate("s", "u").await.unwrap_err();
        match err {
            LlmError::Provider(reason) => assert!(reason.contains("API key not valid")),
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_candidates_exhausted() {
        let server = MockServer::start().await;
        for model in ["m1", "m2", "m3"] {
            Mock::given(method("POST"))
                .and(path(format!("/v1beta/models/{model}:generateContent")))
                .respond_with(ResponseTemplate::new(429).set_body_json(quota_body()))
                .mount(&server)
                .await;
        }

        let client = client_for(&server, &["m1", "m2", "m3"]);
        let err = client.generate("s", "u").await.unwrap_err();
        match err {
            LlmError::Exhausted { attempts } => assert_eq!(attempts, 3),
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_carries_both_parts_in_one_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/m1:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "system prompt" }, { "text": "user text" }]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &["m1"]);
        assert_eq!(client.generate("system prompt", "user text").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn empty_candidates_is_a_fatal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/m1:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server, &["m1"]);
        assert!(matches!(
            client.generate("s", "u").await,
            Err(LlmError::Provider(_))
        ));
    }

    #[test]
    fn from_config_without_key_is_none() {
        assert!(GeminiClient::from_config(GeminiConfig::default()).is_none());
    }

    #[test]
    fn config_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.api_key.is_none());
        assert_eq!(
            config.models,
            vec!["gemini-2.0-flash-lite", "gemini-2.0-flash", "gemini-1.5-flash"]
        );
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
base_url = "http://localhost:9999"
api_key = "k-123"
models = ["gemini-2.0-flash"]
timeout_secs = 4
"#;
        let config: GeminiConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.models, vec!["gemini-2.0-flash"]);
        assert_eq!(config.timeout_secs, 4);
    }

    #[test]
    fn quota_message_detection() {
        assert!(is_quota_message("error 429: too many requests"));
        assert!(is_quota_message("Quota exceeded for metric"));
        assert!(!is_quota_message("API key not valid."));
        assert!(!is_quota_message("internal error"));
    }
}
