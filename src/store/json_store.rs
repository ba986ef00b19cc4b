use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{BestsData, HistoryData, PersonalBest, ScoreRecord};

/// Session history is capped; old entries roll off the front.
const HISTORY_CAP: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub new_high_score: bool,
}

/// JSON-file persistence for personal bests and session history. Writes go
/// through a tmp file + rename so a crash never leaves a torn file behind.
pub struct ScoreStore {
    base_dir: PathBuf,
}

impl ScoreStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordrush");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn personal_best(&self, mode_key: &str, style_key: &str) -> Option<PersonalBest> {
        let data: BestsData = self.load("personal_bests.json");
        data.bests.get(&format!("{mode_key}:{style_key}")).cloned()
    }

    /// Record a completed session: append to history and update the
    /// per-mode/style best. Callers invoke this at most once per session;
    /// see the finalization latch in `session::game`.
    pub fn submit(&self, record: &ScoreRecord) -> Result<SubmitOutcome> {
        let mut bests: BestsData = self.load("personal_bests.json");
        let key = record.best_key();

        let new_high_score = match bests.bests.get(&key) {
            Some(best) => record.primary_metric() > best.primary_metric(),
            None => true,
        };

        if new_high_score {
            bests.bests.insert(
                key,
                PersonalBest {
                    score: record.score,
                    highest_streak: record.highest_streak,
                    wpm: record.wpm,
                    challenge_total_score: record.challenge_total_score,
                    updated_at: Utc::now(),
                },
            );
            self.save("personal_bests.json", &bests)?;
        } else if let Some(best) = bests.bests.get_mut(&key) {
            // The streak best is tracked independently of the score best.
            if record.highest_streak > best.highest_streak {
                best.highest_streak = record.highest_streak;
                best.updated_at = Utc::now();
                self.save("personal_bests.json", &bests)?;
            }
        }

        let mut history: HistoryData = self.load("session_history.json");
        history.sessions.push(record.clone());
        if history.sessions.len() > HISTORY_CAP {
            let excess = history.sessions.len() - HISTORY_CAP;
            history.sessions.drain(..excess);
        }
        self.save("session_history.json", &history)?;

        Ok(SubmitOutcome { new_high_score })
    }

    #[allow(dead_code)] // Used by tests
    pub fn history(&self) -> Vec<ScoreRecord> {
        let data: HistoryData = self.load("session_history.json");
        data.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, ScoreStore) {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn record(score: u32, streak: u32, challenge: Option<u32>) -> ScoreRecord {
        ScoreRecord {
            game_mode: "memory".into(),
            game_style: "challenge".into(),
            score,
            highest_streak: streak,
            words_correct: score,
            words_incorrect: 0,
            time_spent_secs: 30.0,
            wpm: None,
            challenge_total_score: challenge,
            played_at: Utc::now(),
        }
    }

    #[test]
    fn first_submission_is_a_high_score() {
        let (_dir, store) = make_store();
        let outcome = store.submit(&record(10, 5, Some(800))).unwrap();
        assert!(outcome.new_high_score);
        let best = store.personal_best("memory", "challenge").unwrap();
        assert_eq!(best.challenge_total_score, Some(800));
    }

    #[test]
    fn lower_score_does_not_replace_best() {
        let (_dir, store) = make_store();
        store.submit(&record(10, 5, Some(800))).unwrap();
        let outcome = store.submit(&record(20, 2, Some(500))).unwrap();
        assert!(!outcome.new_high_score);
        let best = store.personal_best("memory", "challenge").unwrap();
        assert_eq!(best.challenge_total_score, Some(800));
    }

    #[test]
    fn streak_best_updates_even_without_score_best() {
        let (_dir, store) = make_store();
        store.submit(&record(10, 5, Some(800))).unwrap();
        store.submit(&record(3, 9, Some(100))).unwrap();
        let best = store.personal_best("memory", "challenge").unwrap();
        assert_eq!(best.highest_streak, 9);
        assert_eq!(best.challenge_total_score, Some(800));
    }

    #[test]
    fn bests_are_separate_per_mode_and_style() {
        let (_dir, store) = make_store();
        store.submit(&record(10, 5, Some(800))).unwrap();
        assert!(store.personal_best("typing", "challenge").is_none());
        assert!(store.personal_best("memory", "practice").is_none());
    }

    #[test]
    fn history_appends_and_caps() {
        let (_dir, store) = make_store();
        for i in 0..5 {
            store.submit(&record(i, 1, None)).unwrap();
        }
        let history = store.history();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].score, 0);
        assert_eq!(history[4].score, 4);
    }

    #[test]
    fn corrupt_files_fall_back_to_defaults() {
        let (dir, store) = make_store();
        fs::write(dir.path().join("personal_bests.json"), "not json").unwrap();
        assert!(store.personal_best("memory", "challenge").is_none());
        // And submitting over the corrupt file heals it.
        assert!(store.submit(&record(1, 1, None)).unwrap().new_high_score);
    }
}
