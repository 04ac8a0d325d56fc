//! Best-effort recovery of a JSON array from free-form model output.
//!
//! Models wrap JSON in markdown fences, prose or both. Each strategy is a pure
//! `&str -> Option<Value>` probe and only counts as a hit when it yields an
//! array. Strategies run in order until one hits.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

pub struct Strategy {
    pub name: &'static str,
    probe: fn(&str) -> Option<Value>,
}

impl Strategy {
    pub fn run(&self, text: &str) -> Option<Vec<Value>> {
        match (self.probe)(text)? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Successful extraction
#[derive(Debug)]
pub struct Extracted {
    pub strategy: &'static str,
    pub items: Vec<Value>,
}

pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "fenced",
        probe: fenced,
    },
    Strategy {
        name: "bracketed-objects",
        probe: bracketed_objects,
    },
    Strategy {
        name: "whole-text",
        probe: whole_text,
    },
    Strategy {
        name: "outer-brackets",
        probe: outer_brackets,
    },
];

static OBJECT_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("object array pattern is valid")
});

fn parse(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate.trim()).ok()
}

/// Body of a ```json fence, else of the first plain ``` fence
fn fenced(text: &str) -> Option<Value> {
    let body = if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next()?
    } else {
        text.split("```").nth(1)?
    };
    parse(body)
}

fn bracketed_objects(text: &str) -> Option<Value> {
    parse(OBJECT_ARRAY.find(text)?.as_str())
}

fn whole_text(text: &str) -> Option<Value> {
    parse(text)
}

fn outer_brackets(text: &str) -> Option<Value> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    parse(&text[start..=end])
}

/// Run every strategy in order; `None` means the caller should fall back
pub fn extract_array(text: &str) -> Option<Extracted> {
    for strategy in STRATEGIES {
        if let Some(items) = strategy.run(text) {
            debug!(
                strategy = strategy.name,
                items = items.len(),
                "Extracted JSON array from model output"
            );
            return Some(Extracted {
                strategy: strategy.name,
                items,
            });
        }
    }

    debug!(len = text.len(), "No JSON array found in model output");
    None
}
