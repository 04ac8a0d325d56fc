use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::models::games::{Difficulty, QuizQuestion, Scenario, WordEntry};
use crate::services::games::words::normalize_word;

const BUILTIN: &str = include_str!("../../config/fallback.json");

/// Hand-authored content served when model output cannot be used.
/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackContent {
    pub version: u32,
    pub questions: Vec<QuizQuestion>,
    pub scenarios: Vec<Scenario>,
    pub words: FallbackWords,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackWords {
    pub easy: Vec<WordEntry>,
    pub medium: Vec<WordEntry>,
    pub hard: Vec<WordEntry>,
}

impl FallbackContent {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN).context("built-in fallback content is invalid")
    }

    /// Reads `path` when given, otherwise the built-in document
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read fallback content {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("invalid fallback content {}", path.display()))?
            }
            None => Self::builtin()?,
        };

        info!(
            version = content.version,
            questions = content.questions.len(),
            scenarios = content.scenarios.len(),
            "Fallback content loaded"
        );
        Ok(content)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let content: FallbackContent = serde_json::from_str(raw)?;
        content.validate()?;
        Ok(content)
    }

    pub fn words(&self, difficulty: Difficulty) -> &[WordEntry] {
        match difficulty {
            Difficulty::Easy => &self.words.easy,
            Difficulty::Medium => &self.words.medium,
            Difficulty::Hard => &self.words.hard,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.questions.is_empty() {
            bail!("fallback questions must not be empty");
        }
        if self.scenarios.is_empty() {
            bail!("fallback scenarios must not be empty");
        }

        // Padding draws from these lists, so they must satisfy the same rules
        for difficulty in Difficulty::ALL {
            let words = self.words(difficulty);
            if words.is_empty() {
                bail!("fallback words for {} must not be empty", difficulty);
            }
            for entry in words {
                match normalize_word(&entry.word, difficulty) {
                    Some(normalized) if normalized == entry.word => {}
                    _ => bail!(
                        "fallback word {:?} is not a valid {} word (uppercase letters, at most {})",
                        entry.word,
                        difficulty,
                        difficulty.max_length()
                    ),
                }
            }
        }

        Ok(())
    }
}
