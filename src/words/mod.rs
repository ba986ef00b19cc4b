pub mod catalog;
pub mod supply;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::dda::CefrLevel;

/// A vocabulary entry. Immutable once loaded; session word lists reference
/// draws from the supply and are replaced wholesale, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub meaning: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Word {
    /// The CEFR level this word was tagged with, if any.
    pub fn cefr_level(&self) -> Option<CefrLevel> {
        self.level.as_deref().and_then(CefrLevel::parse)
    }
}

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("no word pack for level {0}")]
    MissingPack(String),
    #[error("malformed word pack: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("word fetch failed: {0}")]
    Fetch(String),
}

/// Fetches up to `limit` words for a CEFR level. Implementations should
/// prefer degrading (fewer words) over failing where they can.
pub trait WordSource {
    fn fetch_words(&mut self, level: CefrLevel, limit: usize) -> Result<Vec<Word>, WordSourceError>;
}

/// Which pool a session draws from. Fixed CEFR pools end the game on their
/// last word; Endless and Dda reshuffle and keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyId {
    Cefr(CefrLevel),
    Endless,
    Dda,
}

impl DifficultyId {
    pub fn is_looping(self) -> bool {
        matches!(self, DifficultyId::Endless | DifficultyId::Dda)
    }

    pub fn key(self) -> &'static str {
        match self {
            DifficultyId::Cefr(level) => level.code(),
            DifficultyId::Endless => "endless",
            DifficultyId::Dda => "dda",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DifficultyId::Cefr(level) => level.label(),
            DifficultyId::Endless => "Endless",
            DifficultyId::Dda => "Dynamic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "endless" => Some(DifficultyId::Endless),
            "dda" | "dynamic" => Some(DifficultyId::Dda),
            other => CefrLevel::parse(other).map(DifficultyId::Cefr),
        }
    }
}
