//! Command interpreter — free text to [`ParsedCommand`], never fails.
//!
//! Two paths: a structured LLM parse, and a guaranteed fallback that
//! captures the full text as a note. A total provider outage therefore
//! degrades to verbatim capture, never to data loss.

use pl_protocol::{IntentKind, ParsedCommand};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::{GeminiClient, GeminiConfig};

/// Instructions sent with every parse request. Describes the seven-intent
/// schema with few-shot examples and forbids the retired "unknown" tag.
const SYSTEM_PROMPT: &str = r#"You are an assistant for a pet care app.
Parse the user's text command and return a JSON object with:
- "type": one of "vet", "trip", "weight", "shopping", "note", "task", "reminder"
- "confidence": number 0-1 how confident you are
- "data": extracted structured data as key-value pairs

Examples:
- "Купили корм Royal Canin 3кг за 2500" → {"type":"shopping","confidence":0.95,"data":{"title":"Корм Royal Canin 3кг","price":2500}}
- "Арчи весит 12.5 кг" → {"type":"weight","confidence":0.98,"data":{"weight_kg":12.5}}
- "Завтра к ветеринару в 15:00" → {"type":"vet","confidence":0.9,"data":{"title":"Визит к ветеринару","date":"tomorrow","time":"15:00"}}
- "Купить новый поводок" → {"type":"shopping","confidence":0.85,"data":{"title":"Новый поводок"}}
- "Дать таблетку от глистов" → {"type":"task","confidence":0.9,"data":{"title":"Дать таблетку от глистов"}}
- "Напомни завтра в 10:00 про прививку" → {"type":"reminder","confidence":0.9,"data":{"content":"Прививка","remind_at":"tomorrow 10:00"}}
- "Гуляли 30 минут в парке" → {"type":"note","confidence":0.8,"data":{"content":"Гуляли 30 минут в парке"}}

If in doubt, use "note" as the type and put the full text in data.content.
NEVER return "unknown" as type — always pick the best matching type.
Return ONLY valid JSON, no markdown, no explanations, no code fences."#;

/// Raw model output before validation. All fields are untrusted.
#[derive(Deserialize)]
struct RawParse {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    confidence: Value,
    #[serde(default)]
    data: Value,
}

/// Best-effort classifier over the LLM path with unconditional fallback.
pub struct CommandInterpreter {
    client: Option<GeminiClient>,
}

impl CommandInterpreter {
    /// Build from config. Without an API key the interpreter still works —
    /// every command takes the fallback path without any network call.
    pub fn from_config(config: GeminiConfig) -> Self {
        let client = GeminiClient::from_config(config);
        if client.is_none() {
            tracing::warn!("no LLM credential configured — all commands will be saved as notes");
        }
        Self { client }
    }

    /// Interpreter with the AI path disabled (tests, degraded deploys).
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Classify `text` (non-empty, pre-trimmed). Always yields a valid
    /// command; interpretation problems degrade to a verbatim note.
    pub async fn interpret(&self, text: &str) -> ParsedCommand {
        let Some(client) = &self.client else {
            return ParsedCommand::fallback_note(text);
        };

        let user_text = format!("Parse this command: \"{text}\"");
        let raw = match client.generate(SYSTEM_PROMPT, &user_text).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "LLM parse unavailable, falling back to note");
                return ParsedCommand::fallback_note(text);
            }
        };

        match normalize(&raw, text) {
            Some(command) => {
                tracing::debug!(kind = %command.kind, confidence = command.confidence, "command interpreted");
                command
            }
            None => {
                tracing::warn!(raw = %raw, "uninterpretable model output, falling back to note");
                ParsedCommand::fallback_note(text)
            }
        }
    }
}

/// Validate and repair raw model output. `None` means the attempt failed
/// entirely (bad JSON, missing type, or the deprecated "unknown" tag) and
/// the caller should take the fallback path.
fn normalize(raw: &str, original_text: &str) -> Option<ParsedCommand> {
    let cleaned = strip_fences(raw);
    let parsed: RawParse = serde_json::from_str(cleaned).ok()?;
    let type_name = parsed.kind?;
    if type_name == "unknown" {
        return None;
    }

    let confidence = clamp_confidence(&parsed.confidence);

    let (kind, mut fields) = match IntentKind::from_name(&type_name) {
        Some(kind) => (kind, extract_fields(parsed.data)),
        None => {
            // Foreign-but-present type: keep everything as a note, with
            // the extracted payload stringified so nothing is dropped.
            let mut fields = Map::new();
            let content = match &parsed.data {
                Value::Object(map) if !map.is_empty() => {
                    serde_json::to_string(&parsed.data).unwrap_or_default()
                }
                Value::String(s) if !s.is_empty() => s.clone(),
                _ => String::new(),
            };
            if !content.is_empty() {
                fields.insert("content".into(), Value::String(content));
            }
            (IntentKind::Note, fields)
        }
    };

    // The original text always survives when the model extracted nothing.
    if fields.is_empty() {
        fields.insert("content".into(), Value::String(original_text.to_string()));
    }

    Some(ParsedCommand {
        kind,
        confidence,
        fields,
    })
}

fn extract_fields(data: Value) -> Map<String, Value> {
    match data {
        Value::Object(map) => map,
        Value::String(s) if !s.is_empty() => {
            let mut fields = Map::new();
            fields.insert("content".into(), Value::String(s));
            fields
        }
        _ => Map::new(),
    }
}

/// Clamp a raw confidence value into [0.0, 1.0]; anything non-numeric
/// (including NaN) becomes 0.0.
fn clamp_confidence(value: &Value) -> f64 {
    match value.as_f64() {
        Some(n) if n.is_finite() => n.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Strip a markdown code fence (optionally tagged `json`) wrapping the
/// model output.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    trimmed
}
