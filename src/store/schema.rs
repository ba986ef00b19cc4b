use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

/// One completed session, as submitted at game over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub game_mode: String,
    pub game_style: String,
    pub score: u32,
    pub highest_streak: u32,
    pub words_correct: u32,
    pub words_incorrect: u32,
    pub time_spent_secs: f64,
    #[serde(default)]
    pub wpm: Option<f64>,
    #[serde(default)]
    pub challenge_total_score: Option<u32>,
    pub played_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Bests are keyed per mode+style pair.
    pub fn best_key(&self) -> String {
        format!("{}:{}", self.game_mode, self.game_style)
    }

    /// The metric compared for "new personal best": challenge sessions
    /// compare their challenge total, practice sessions the word count.
    pub fn primary_metric(&self) -> u32 {
        self.challenge_total_score.unwrap_or(self.score)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonalBest {
    pub score: u32,
    pub highest_streak: u32,
    #[serde(default)]
    pub wpm: Option<f64>,
    #[serde(default)]
    pub challenge_total_score: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalBest {
    pub fn primary_metric(&self) -> u32 {
        self.challenge_total_score.unwrap_or(self.score)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BestsData {
    pub schema_version: u32,
    pub bests: BTreeMap<String, PersonalBest>,
}

impl Default for BestsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bests: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub sessions: Vec<ScoreRecord>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}
