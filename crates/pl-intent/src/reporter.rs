//! Result reporter — routing outcome to a short human acknowledgment.
//!
//! Pure formatting; the caller decides where the string is delivered
//! (Telegram reply, API response).

use pl_protocol::{IntentKind, ParsedCommand, RoutingOutcome};
use serde_json::Value;

/// Emoji shown in front of the acknowledgment.
pub fn icon(kind: IntentKind) -> &'static str {
    match kind {
        IntentKind::Shopping => "🛒",
        IntentKind::Weight => "⚖️",
        IntentKind::Task => "✅",
        IntentKind::Vet => "🏥",
        IntentKind::Trip => "✈️",
        IntentKind::Note => "📝",
        IntentKind::Reminder => "🔔",
    }
}

/// Human-readable record label.
pub fn label(kind: IntentKind) -> &'static str {
    match kind {
        IntentKind::Shopping => "Покупка",
        IntentKind::Weight => "Вес",
        IntentKind::Task => "Задача",
        IntentKind::Vet => "Визит к врачу",
        IntentKind::Trip => "Поездка",
        IntentKind::Note => "Заметка",
        IntentKind::Reminder => "Напоминание",
    }
}

/// Format the acknowledgment for a routed command.
pub fn report(outcome: &RoutingOutcome, command: &ParsedCommand) -> String {
    if !outcome.success {
        let detail = outcome
            .error_detail
            .as_deref()
            .unwrap_or("неизвестная ошибка");
        return format!("❌ Ошибка сохранения: {detail}");
    }

    if command.is_degraded() {
        return "📝 Сохранено как заметка (AI временно недоступен)".into();
    }

    let details = command
        .fields
        .iter()
        .map(|(key, value)| format!("• {key}: {}", scalar(value)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{} {} сохранена!\n\n{}",
        icon(command.kind),
        label(command.kind),
        details
    )
}

/// Strings print bare; everything else through its JSON form.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_protocol::TargetTable;
    use serde_json::{Map, json};

    fn weight_command() -> ParsedCommand {
        let mut fields = Map::new();
        fields.insert("weight_kg".into(), json!(12.5));
        ParsedCommand {
            kind: IntentKind::Weight,
            confidence: 0.98,
            fields,
        }
    }

    fn saved(target: TargetTable) -> RoutingOutcome {
        RoutingOutcome::saved(target, Map::new(), json!({"id": "x"}))
    }

    #[test]
    fn success_message_has_icon_label_and_fields() {
        let message = report(&saved(TargetTable::WeightRecords), &weight_command());
        assert!(message.contains("⚖️"));
        assert!(message.contains("Вес"));
        assert!(message.contains("сохранена!"));
        assert!(message.contains("weight_kg: 12.5"));
    }

    #[test]
    fn string_fields_print_without_quotes() {
        let mut fields = Map::new();
        fields.insert("title".into(), json!("Корм 3кг"));
        fields.insert("price".into(), json!(2500));
        let command = ParsedCommand {
            kind: IntentKind::Shopping,
            confidence: 0.95,
            fields,
        };
        let message = report(&saved(TargetTable::ShoppingItems), &command);
        assert!(message.contains("• title: Корм 3кг"));
        assert!(message.contains("• price: 2500"));
        assert!(!message.contains('"'));
    }

    #[test]
    fn degraded_capture_gets_its_own_message() {
        let command = ParsedCommand::fallback_note("Арчи весит 12.5 кг");
        let message = report(&saved(TargetTable::Notes), &command);
        assert_eq!(message, "📝 Сохранено как заметка (AI временно недоступен)");
    }

    #[test]
    fn failure_embeds_store_error_verbatim() {
        let outcome = RoutingOutcome::rejected(
            TargetTable::Notes,
            Map::new(),
            "null value in column \"pet_id\"",
        );
        let message = report(&outcome, &weight_command());
        assert!(message.starts_with("❌ Ошибка сохранения: "));
        assert!(message.contains("null value in column \"pet_id\""));
    }

    #[test]
    fn every_kind_has_icon_and_label() {
        for kind in IntentKind::ALL {
            assert!(!icon(kind).is_empty());
            assert!(!label(kind).is_empty());
        }
    }
}
