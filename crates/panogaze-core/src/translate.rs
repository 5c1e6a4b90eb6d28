//! Translation collaborator interface and the definition panel state.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_example: Option<String>,
}

impl Definition {
    /// Placeholder shown when a lookup fails.
    pub fn fallback(word: &str) -> Self {
        Self {
            word: word.to_string(),
            translation: "Definition unavailable".to_string(),
            pronunciation: String::new(),
            part_of_speech: String::new(),
            usage_example: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translation service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed translation response: {0}")]
    Malformed(String),

    #[error("no definition found for {0:?}")]
    NotFound(String),
}

pub type LookupFuture = Pin<Box<dyn Future<Output = Result<Definition, TranslateError>>>>;

/// Async word lookup: word plus its sentence in, structured definition out.
pub trait Translator {
    fn lookup(&self, word: &str, context: &str) -> LookupFuture;
}

/// Collapse a lookup result into something displayable.
pub fn resolve_definition(word: &str, result: Result<Definition, TranslateError>) -> Definition {
    match result {
        Ok(def) => def,
        Err(e) => {
            log::warn!("[translate] lookup for {:?} failed: {}", word, e);
            Definition::fallback(word)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LookupState {
    #[default]
    Idle,
    Pending {
        word: String,
    },
    Shown(Definition),
}

impl LookupState {
    /// A pending lookup blocks every word; a shown definition blocks its own
    /// word.
    pub fn blocks_word(&self, word: &str) -> bool {
        match self {
            LookupState::Idle => false,
            LookupState::Pending { .. } => true,
            LookupState::Shown(def) => def.word.eq_ignore_ascii_case(word),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LookupState::Pending { .. })
    }

    pub fn shown(&self) -> Option<&Definition> {
        match self {
            LookupState::Shown(def) => Some(def),
            _ => None,
        }
    }
}
