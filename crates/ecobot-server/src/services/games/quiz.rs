use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::warn;

use super::GameService;
use crate::models::games::QuizQuestion;
use crate::services::extraction::extract_array;
use crate::services::prompts;
use crate::services::provider::generate_from_prompt;
use crate::utils::error::ProviderError;

/// Object entries become questions; fields the model left out stay empty
pub fn parse_questions(items: Vec<Value>) -> Vec<QuizQuestion> {
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

impl GameService {
    /// Ten shuffled quiz questions.
    ///
    /// A failed provider call is an error for the caller. Output that cannot
    /// be parsed is replaced by the fallback questions.
    pub async fn quiz_questions(&self) -> Result<Vec<QuizQuestion>, ProviderError> {
        let text = generate_from_prompt(self.provider.as_ref(), prompts::QUIZ_PROMPT).await?;

        let mut questions = extract_array(&text)
            .map(|extracted| parse_questions(extracted.items))
            .unwrap_or_default();

        if questions.is_empty() {
            warn!("No usable quiz questions in model output, using fallback");
            questions = self.fallback.questions.clone();
        }

        questions.shuffle(&mut rand::rng());
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback::FallbackContent;
    use crate::services::provider::MockLlmProvider;
    use serde_json::json;
    use std::sync::Arc;

    fn service(provider: MockLlmProvider) -> (GameService, Arc<FallbackContent>) {
        let fallback = Arc::new(FallbackContent::builtin().unwrap());
        (GameService::new(Arc::new(provider), fallback.clone()), fallback)
    }

    fn sorted(questions: Vec<QuizQuestion>) -> Vec<String> {
        let mut texts: Vec<String> = questions.into_iter().map(|q| q.question).collect();
        texts.sort();
        texts
    }

    #[test]
    fn test_parse_questions_keeps_partial_entries() {
        let items = vec![
            json!({
                "question": "Q1",
                "options": ["a", "b", "c", "d"],
                "correct_answer": "A",
                "explanation": "because"
            }),
            json!({ "question": "Q2" }),
            json!("not an object"),
        ];

        let questions = parse_questions(items);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[1].question, "Q2");
        assert!(questions[1].options.is_empty());
    }

    #[tokio::test]
    async fn test_questions_are_shuffled_not_changed() {
        let reply: Vec<Value> = (1..=10)
            .map(|i| {
                json!({
                    "question": format!("Question {i:02}"),
                    "options": ["A", "B", "C", "D"],
                    "correct_answer": "A",
                    "explanation": "e"
                })
            })
            .collect();
        let body = format!("```json\n{}\n```", serde_json::to_string(&reply).unwrap());

        let mut provider = MockLlmProvider::new();
        provider.expect_generate().times(1).returning(move |_| Ok(body.clone()));
        let (games, _) = service(provider);

        let questions = games.quiz_questions().await.unwrap();
        let expected: Vec<String> = (1..=10).map(|i| format!("Question {i:02}")).collect();
        assert_eq!(sorted(questions), expected);
    }

    #[tokio::test]
    async fn test_unparseable_output_uses_fallback() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_generate()
            .returning(|_| Ok("Sorry, I can't help with that.".to_string()));
        let (games, fallback) = service(provider);

        let questions = games.quiz_questions().await.unwrap();
        assert_eq!(sorted(questions), sorted(fallback.questions.clone()));
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_generate()
            .returning(|_| Err(ProviderError::Http { status: 500, body: "down".into() }));
        let (games, _) = service(provider);

        assert!(games.quiz_questions().await.is_err());
    }
}
