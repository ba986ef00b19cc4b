use crate::session::state::{GameMode, GameStyle, SessionState};
use crate::words::DifficultyId;

/// End-of-session statistics, snapshotted synchronously the moment the
/// session first reaches game over so later resets cannot race it.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub mode: GameMode,
    pub style: GameStyle,
    pub difficulty: DifficultyId,
    pub score: u32,
    pub highest_streak: u32,
    pub words_correct: u32,
    pub words_incorrect: u32,
    pub time_spent_secs: f64,
    pub wpm: Option<f64>,
    pub challenge_total_score: Option<u32>,
}

impl SessionSummary {
    pub fn capture(
        state: &SessionState,
        mode: GameMode,
        style: GameStyle,
        difficulty: DifficultyId,
        elapsed_secs: f64,
    ) -> Self {
        let wpm = match mode {
            GameMode::Typing if elapsed_secs > 0.0 => {
                Some(f64::from(state.score) / (elapsed_secs / 60.0))
            }
            _ => None,
        };

        Self {
            mode,
            style,
            difficulty,
            score: state.score,
            highest_streak: state.best_streak,
            words_correct: state.score,
            words_incorrect: state.misses.len() as u32,
            time_spent_secs: elapsed_secs,
            wpm,
            challenge_total_score: match style {
                GameStyle::Challenge => Some(state.total_challenge_score),
                GameStyle::Practice => None,
            },
        }
    }

    /// Minutes/seconds split for display.
    pub fn time_spent(&self) -> (u64, u64) {
        let total = self.time_spent_secs.max(0.0).round() as u64;
        (total / 60, total % 60)
    }
}
