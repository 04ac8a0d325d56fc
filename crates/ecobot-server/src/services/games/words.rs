use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::GameService;
use crate::models::games::{Difficulty, WordEntry};
use crate::services::extraction::extract_array;
use crate::services::prompts;
use crate::services::provider::generate_from_prompt;

/// Words requested per round, and the padding target
pub const WORD_COUNT: usize = 10;

/// Below this many valid words the list is padded from the fallback
pub const MIN_VALID_WORDS: usize = 5;

#[derive(Deserialize)]
struct RawWord {
    word: Option<String>,
    hint: Option<String>,
}

/// Trimmed, upper-cased word when it is purely alphabetic and within the
/// tier's length ceiling
pub fn normalize_word(raw: &str, difficulty: Difficulty) -> Option<String> {
    let word = raw.trim().to_uppercase();
    let len = word.chars().count();

    if len == 0 || len > difficulty.max_length() || !word.chars().all(char::is_alphabetic) {
        return None;
    }
    Some(word)
}

/// Keep usable entries, then pad from `fallback` when too few survive
pub fn validate_words(items: Vec<Value>, difficulty: Difficulty, fallback: &[WordEntry]) -> Vec<WordEntry> {
    let total = items.len();
    let mut words: Vec<WordEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawWord>(item).ok())
        .filter_map(|raw| {
            let hint = raw.hint?;
            let word = normalize_word(&raw.word?, difficulty)?;
            Some(WordEntry { word, hint })
        })
        .collect();

    debug!(
        difficulty = %difficulty,
        received = total,
        valid = words.len(),
        "Validated generated words"
    );

    if words.len() < MIN_VALID_WORDS {
        let before = words.len();
        for entry in fallback {
            if words.len() >= WORD_COUNT {
                break;
            }
            if !words.iter().any(|w| w.word == entry.word) {
                words.push(entry.clone());
            }
        }
        info!(
            difficulty = %difficulty,
            padded = words.len() - before,
            "Padded word list from fallback"
        );
    }

    words
}

impl GameService {
    /// Word list for the word-guess game. Never fails: provider or parse
    /// problems yield the tier's fallback list.
    pub async fn words(&self, difficulty: Difficulty, mode: &str) -> Vec<WordEntry> {
        let fallback = self.fallback.words(difficulty);
        let prompt = prompts::words_prompt(difficulty, mode, WORD_COUNT);

        let text = match generate_from_prompt(self.provider.as_ref(), &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(difficulty = %difficulty, "Word generation failed, using fallback: {}", e);
                return fallback.to_vec();
            }
        };

        match extract_array(&text) {
            Some(extracted) => validate_words(extracted.items, difficulty, fallback),
            None => {
                warn!(difficulty = %difficulty, "Unparseable word list, using fallback");
                fallback.to_vec()
            }
        }
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

    fn fallback() -> Arc<FallbackContent> {
        Arc::new(FallbackContent::builtin().unwrap())
    }

    fn entry(word: &str) -> Value {
        json!({ "word": word, "hint": "a hint" })
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  solar ", Difficulty::Easy), Some("SOLAR".into()));
        assert_eq!(normalize_word("RECYCLE", Difficulty::Easy), None);
        assert_eq!(normalize_word("RECYCLE", Difficulty::Medium), Some("RECYCLE".into()));
        assert_eq!(normalize_word("ECO-FRIENDLY", Difficulty::Hard), None);
        assert_eq!(normalize_word("WIND FARM", Difficulty::Hard), None);
        assert_eq!(normalize_word("CO2", Difficulty::Easy), None);
        assert_eq!(normalize_word("", Difficulty::Easy), None);
    }

    #[test]
    fn test_every_word_respects_tier() {
        let items = vec![
            entry("sun"),
            entry("forest"),
            entry("compost"),
            entry("biodiversity"),
            entry("desertification"),
            entry("smog!"),
            entry("green energy"),
        ];

        for difficulty in Difficulty::ALL {
            let words = validate_words(items.clone(), difficulty, fallback().words(difficulty));
            assert!(!words.is_empty());
            for w in &words {
                assert!(w.word.chars().all(char::is_alphabetic), "{}", w.word);
                assert!(w.word.chars().count() <= difficulty.max_length(), "{}", w.word);
            }
        }
    }

    #[test]
    fn test_pads_to_ten_when_few_valid() {
        let fb = fallback();
        let items = vec![entry("earth"), entry("solar"), entry("way-too-long-word")];

        let words = validate_words(items, Difficulty::Easy, fb.words(Difficulty::Easy));

        assert_eq!(words.len(), WORD_COUNT);
        assert_eq!(words[0].word, "EARTH");
        assert_eq!(words[1].word, "SOLAR");
        // Duplicates of generated words are skipped
        assert_eq!(words.iter().filter(|w| w.word == "EARTH").count(), 1);
    }

    #[test]
    fn test_padding_stops_when_fallback_runs_out() {
        let short = vec![
            WordEntry { word: "SUN".into(), hint: "h".into() },
            WordEntry { word: "RAIN".into(), hint: "h".into() },
        ];
        let words = validate_words(vec![entry("earth")], Difficulty::Easy, &short);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_no_padding_with_enough_words() {
        let items: Vec<Value> = ["tree", "leaf", "soil", "wind", "rain"].iter().map(|w| entry(w)).collect();
        let words = validate_words(items, Difficulty::Easy, fallback().words(Difficulty::Easy));
        assert_eq!(words.len(), 5);
    }

    #[test]
    fn test_entries_missing_fields_are_skipped() {
        let items = vec![
            json!({ "word": "TREE" }),
            json!({ "hint": "no word" }),
            json!({ "word": 42, "hint": "number" }),
            json!("LEAF"),
            entry("soil"),
        ];
        let words = validate_words(items, Difficulty::Easy, &[]);
        assert_eq!(words, vec![WordEntry { word: "SOIL".into(), hint: "a hint".into() }]);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_fallback() {
        let mut provider = MockLlmProvider::new();
        provider
            .expect_generate()
            .times(1)
            .returning(|_| Err(ProviderError::Timeout));

        let fb = fallback();
        let games = GameService::new(Arc::new(provider), fb.clone());
        let words = games.words(Difficulty::Hard, "hangman").await;

        assert_eq!(words, fb.words(Difficulty::Hard).to_vec());
    }

    #[tokio::test]
    async fn test_generated_words_are_cleaned() {
        let mut provider = MockLlmProvider::new();
        provider.expect_generate().times(1).returning(|contents| {
            assert!(contents[0].text.contains("(6-8 letters)"));
            Ok(r#"```json
[{"word": "compost", "hint": "h1"}, {"word": "carbon", "hint": "h2"},
 {"word": "habitat", "hint": "h3"}, {"word": "ecology", "hint": "h4"},
 {"word": "wetland", "hint": "h5"}, {"word": "photosynthesis", "hint": "h6"}]
```"#
                .to_string())
        });

        let games = GameService::new(Arc::new(provider), fallback());
        let words = games.words(Difficulty::Medium, "scramble").await;

        let list: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(list, vec!["COMPOST", "CARBON", "HABITAT", "ECOLOGY", "WETLAND"]);
    }
}
