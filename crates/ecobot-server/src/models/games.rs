use serde::{Deserialize, Serialize};
use std::fmt;

// ===== QUIZ =====

/// Multiple-choice question as produced by the model.
/// Fields are not validated; whatever is missing stays empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

// ===== ADVENTURE =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub hint: String,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Eco points awarded, may be negative
    pub points: i64,
    #[serde(default)]
    pub feedback: String,
    /// Id of the scenario this choice leads to
    pub next: i64,
}

// ===== WORD GAME =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Unknown values fall back to medium
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("easy") => Difficulty::Easy,
            Some("hard") => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    /// Longest word accepted for this tier
    pub fn max_length(self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct WordsQuery {
    pub difficulty: Option<String>,
    pub mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse(Some("easy")), Difficulty::Easy);
        assert_eq!(Difficulty::parse(Some(" HARD ")), Difficulty::Hard);
        assert_eq!(Difficulty::parse(Some("medium")), Difficulty::Medium);
        assert_eq!(Difficulty::parse(Some("impossible")), Difficulty::Medium);
        assert_eq!(Difficulty::parse(None), Difficulty::Medium);
    }

    #[test]
    fn test_length_ceilings() {
        assert_eq!(Difficulty::Easy.max_length(), 6);
        assert_eq!(Difficulty::Medium.max_length(), 8);
        assert_eq!(Difficulty::Hard.max_length(), 12);
    }
}
