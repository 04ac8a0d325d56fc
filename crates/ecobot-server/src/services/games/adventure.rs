use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::GameService;
use crate::models::games::{Choice, Scenario};
use crate::services::extraction::extract_array;
use crate::services::prompts;
use crate::services::provider::generate_from_prompt;

/// Integer from a JSON number or numeric string; floats are rounded
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
            })
        }
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Each field is defaulted on its own; only a non-object entry is skipped
fn parse_choice(value: &Value, default_next: i64) -> Option<Choice> {
    let obj = value.as_object()?;

    Some(Choice {
        id: text_field(obj, "id"),
        text: text_field(obj, "text"),
        points: obj.get("points").and_then(as_integer).unwrap_or(0),
        feedback: text_field(obj, "feedback"),
        next: obj.get("next").and_then(as_integer).unwrap_or(default_next),
    })
}

fn parse_scenario(value: Value) -> Option<Scenario> {
    let Value::Object(obj) = value else {
        return None;
    };

    let id = obj.get("id").and_then(as_integer)?;
    let description = match obj.get("description") {
        Some(Value::String(s)) => s.clone(),
        _ => return None,
    };
    let choices = obj.get("choices")?.as_array()?;
    // No following scenario exists past the largest id
    let default_next = id.checked_add(1)?;

    Some(Scenario {
        id,
        description,
        environment: text_field(&obj, "environment"),
        hint: text_field(&obj, "hint"),
        choices: choices
            .iter()
            .filter_map(|c| parse_choice(c, default_next))
            .collect(),
    })
}

/// Drop scenarios without `id`, `description` or `choices`; default a
/// choice's `next` to the following scenario and its `points` to zero
pub fn validate_scenarios(items: Vec<Value>) -> Vec<Scenario> {
    let total = items.len();
    let scenarios: Vec<Scenario> = items.into_iter().filter_map(parse_scenario).collect();

    if scenarios.len() < total {
        debug!(dropped = total - scenarios.len(), "Dropped incomplete scenarios");
    }
    scenarios
}

impl GameService {
    /// Adventure scenario chain. Never fails; any problem yields the
    /// fallback scenarios.
    pub async fn scenarios(&self) -> Vec<Scenario> {
        let text = match generate_from_prompt(self.provider.as_ref(), prompts::SCENARIOS_PROMPT).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Scenario generation failed, using fallback: {}", e);
                return self.fallback.scenarios.clone();
            }
        };

        let scenarios = extract_array(&text)
            .map(|extracted| validate_scenarios(extracted.items))
            .unwrap_or_default();

        if scenarios.is_empty() {
            warn!("No usable scenarios in model output, using fallback");
            return self.fallback.scenarios.clone();
        }
        scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback::FallbackContent;
    use crate::services::provider::MockLlmProvider;
    use crate::utils::error::ProviderError;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_missing_next_defaults_to_following_scenario() {
        let items = vec![json!({
            "id": 4,
            "description": "Oil spill on the beach",
            "environment": "ocean",
            "hint": "h",
            "choices": [
                { "id": "4A", "text": "Help clean", "points": 10, "feedback": "f" },
                { "id": "4B", "text": "Walk away", "points": -5, "feedback": "f", "next": 9 }
            ]
        })];

        let scenarios = validate_scenarios(items);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].choices[0].next, 5);
        assert_eq!(scenarios[0].choices[1].next, 9);
    }

    #[test]
    fn test_missing_points_default_to_zero() {
        let items = vec![json!({
            "id": 1,
            "description": "d",
            "choices": [{ "id": 7, "text": "t", "next": 2 }, { "text": "u", "points": 12.6 }]
        })];

        let scenarios = validate_scenarios(items);
        let choices = &scenarios[0].choices;
        assert_eq!(choices[0].points, 0);
        assert_eq!(choices[0].id, "7");
        assert_eq!(choices[1].points, 13);
        assert_eq!(choices[1].id, "");
        assert_eq!(scenarios[0].environment, "");
    }

    #[test]
    fn test_incomplete_scenarios_are_dropped() {
        let items = vec![
            json!({ "description": "no id", "choices": [] }),
            json!({ "id": 2, "choices": [] }),
            json!({ "id": 3, "description": "no choices" }),
            json!({ "id": "four", "description": "unparseable id", "choices": [] }),
            json!({ "id": 5, "description": "ok", "choices": [] }),
            json!("not an object"),
        ];

        let scenarios = validate_scenarios(items);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].id, 5);
    }

    #[test]
    fn test_loosely_typed_choices_keep_the_scenario() {
        let items = vec![
            json!({
                "id": 1,
                "description": "River cleanup",
                "choices": [
                    { "id": "1A", "text": "Join", "points": 10, "next": 2 },
                    { "id": "1B", "text": "Skip", "points": "5" },
                    "stray text"
                ]
            }),
            json!({
                "id": 2.0,
                "description": "Recycling day",
                "choices": [{ "id": 3, "text": "Sort", "next": "3", "points": "2.6" }]
            }),
            json!({ "id": "3", "description": "Numeric string id", "choices": [] }),
        ];

        let scenarios = validate_scenarios(items);
        assert_eq!(scenarios.len(), 3);

        let first = &scenarios[0].choices;
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].points, 5);
        assert_eq!(first[1].next, 2);

        assert_eq!(scenarios[1].id, 2);
        assert_eq!(scenarios[1].choices[0].next, 3);
        assert_eq!(scenarios[1].choices[0].points, 3);
        assert_eq!(scenarios[1].choices[0].id, "3");
        assert_eq!(scenarios[2].id, 3);
    }

    #[test]
    fn test_largest_id_does_not_overflow() {
        let items = vec![
            json!({ "id": i64::MAX, "description": "d", "choices": [{ "text": "t" }] }),
            json!({ "id": 1, "description": "d", "choices": [{ "text": "t" }] }),
        ];

        let scenarios = validate_scenarios(items);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].id, 1);
        assert_eq!(scenarios[0].choices[0].next, 2);
    }

    #[tokio::test]
    async fn test_fallback_when_provider_fails_or_output_is_empty() {
        let fallback = Arc::new(FallbackContent::builtin().unwrap());

        let mut failing = MockLlmProvider::new();
        failing
            .expect_generate()
            .returning(|_| Err(ProviderError::Network("connection reset".into())));
        let games = GameService::new(Arc::new(failing), fallback.clone());
        assert_eq!(games.scenarios().await, fallback.scenarios);

        let mut useless = MockLlmProvider::new();
        useless
            .expect_generate()
            .returning(|_| Ok(r#"[{"title": "missing everything"}]"#.to_string()));
        let games = GameService::new(Arc::new(useless), fallback.clone());
        assert_eq!(games.scenarios().await, fallback.scenarios);
    }

    #[tokio::test]
    async fn test_generated_scenarios_pass_through() {
        let mut provider = MockLlmProvider::new();
        provider.expect_generate().returning(|_| {
            Ok(r#"Here is your adventure:
[{"id": 1, "description": "Forest fire", "environment": "forest", "hint": "h",
  "choices": [{"id": "1A", "text": "Call firefighters", "points": 15, "feedback": "f"}]}]"#
                .to_string())
        });
        let fallback = Arc::new(FallbackContent::builtin().unwrap());
        let games = GameService::new(Arc::new(provider), fallback);

        let scenarios = games.scenarios().await;
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].description, "Forest fire");
        assert_eq!(scenarios[0].choices[0].next, 2);
    }
}
