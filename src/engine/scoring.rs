//! Challenge-style score breakdowns. Everything here is a pure function of
//! its inputs so results are replayable; Practice style never calls in.

use crate::engine::dda::CefrLevel;

#[derive(Clone, Copy, Debug)]
pub struct ScoringConfig {
    pub base_score: u32,
    pub max_answer_secs: f64,
    pub time_multiplier: f64,
    pub streak_cap: u32,
    pub streak_step: u32,
    pub typing_base_per_char: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 100,
            max_answer_secs: 5.0,
            time_multiplier: 15.0,
            streak_cap: 20,
            streak_step: 5,
            typing_base_per_char: 10,
        }
    }
}

/// Per-answer breakdown. Produced for display and folded into the running
/// challenge total; never persisted on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub base: u32,
    pub time_bonus: u32,
    pub time_used: f64,
    pub max_time: f64,
    pub difficulty_multiplier: f64,
    pub streak_bonus: u32,
    pub combo_multiplier: f64,
    pub final_score: u32,
}

pub fn time_bonus(config: &ScoringConfig, time_used: f64) -> u32 {
    let saved = (config.max_answer_secs - time_used).max(0.0);
    (saved * config.time_multiplier).round() as u32
}

pub fn streak_bonus(config: &ScoringConfig, streak: u32) -> u32 {
    streak.min(config.streak_cap) * config.streak_step
}

/// Typing combo multiplier, tiered on the consecutive-correct streak.
pub fn combo_multiplier(streak: u32) -> f64 {
    match streak {
        0..=4 => 1.0,
        5..=9 => 1.25,
        10..=14 => 1.5,
        15..=19 => 1.75,
        _ => 2.0,
    }
}

/// Shared Memory / Meaning Match formula, measuring time *used* against the
/// recall window: `(base + time bonus) x level multiplier + streak bonus`.
pub fn recall_score(
    config: &ScoringConfig,
    time_used: f64,
    level: CefrLevel,
    streak: u32,
    correct: bool,
) -> ScoreBreakdown {
    let multiplier = level.score_multiplier();
    if !correct {
        // Zero points, but keep the timing fields so a time-up breakdown
        // still renders consistently.
        return ScoreBreakdown {
            base: 0,
            time_bonus: 0,
            time_used,
            max_time: config.max_answer_secs,
            difficulty_multiplier: multiplier,
            streak_bonus: 0,
            combo_multiplier: 1.0,
            final_score: 0,
        };
    }

    let base = config.base_score;
    let bonus = time_bonus(config, time_used);
    let streak_part = streak_bonus(config, streak);
    let final_score = (f64::from(base + bonus) * multiplier).round() as u32 + streak_part;

    ScoreBreakdown {
        base,
        time_bonus: bonus,
        time_used,
        max_time: config.max_answer_secs,
        difficulty_multiplier: multiplier,
        streak_bonus: streak_part,
        combo_multiplier: 1.0,
        final_score,
    }
}

/// Echo scoring measures time *left* in the answer window. Replaying the
/// audio forfeits the first-listen time bonus.
pub fn echo_score(
    config: &ScoringConfig,
    time_left: f64,
    level: CefrLevel,
    streak: u32,
    correct: bool,
    used_replay: bool,
) -> ScoreBreakdown {
    let time_used = if used_replay {
        config.max_answer_secs
    } else {
        (config.max_answer_secs - time_left).clamp(0.0, config.max_answer_secs)
    };
    recall_score(config, time_used, level, streak, correct)
}

/// Typing challenge: base scales with word length, combo multiplier with
/// streak. No time-bonus term; pace is captured separately as WPM.
pub fn typing_score(
    config: &ScoringConfig,
    word: &str,
    streak: u32,
    correct: bool,
) -> ScoreBreakdown {
    if !correct {
        return ScoreBreakdown {
            base: 0,
            time_bonus: 0,
            time_used: 0.0,
            max_time: 0.0,
            difficulty_multiplier: 1.0,
            streak_bonus: 0,
            combo_multiplier: combo_multiplier(streak),
            final_score: 0,
        };
    }

    let base = word.chars().count() as u32 * config.typing_base_per_char;
    let combo = combo_multiplier(streak);
    let final_score = (f64::from(base) * combo).round() as u32;

    ScoreBreakdown {
        base,
        time_bonus: 0,
        time_used: 0.0,
        max_time: 0.0,
        difficulty_multiplier: 1.0,
        streak_bonus: 0,
        combo_multiplier: combo,
        final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_bonus_scales_with_time_saved() {
        let config = ScoringConfig::default();
        assert_eq!(time_bonus(&config, 0.0), 75);
        assert_eq!(time_bonus(&config, 2.0), 45);
        assert_eq!(time_bonus(&config, 5.0), 0);
        // Past the window never goes negative.
        assert_eq!(time_bonus(&config, 9.0), 0);
    }

    #[test]
    fn streak_bonus_is_capped() {
        let config = ScoringConfig::default();
        assert_eq!(streak_bonus(&config, 0), 0);
        assert_eq!(streak_bonus(&config, 7), 35);
        assert_eq!(streak_bonus(&config, 20), 100);
        assert_eq!(streak_bonus(&config, 500), 100);
    }

    #[test]
    fn recall_score_formula() {
        let config = ScoringConfig::default();
        let breakdown = recall_score(&config, 1.0, CefrLevel::B1, 4, true);
        // (100 + 60) * 1.5 + 20
        assert_eq!(breakdown.base, 100);
        assert_eq!(breakdown.time_bonus, 60);
        assert_eq!(breakdown.streak_bonus, 20);
        assert_eq!(breakdown.final_score, 260);
    }

    #[test]
    fn incorrect_answers_score_zero_but_keep_context() {
        let config = ScoringConfig::default();
        let breakdown = recall_score(&config, 5.0, CefrLevel::C2, 12, false);
        assert_eq!(breakdown.final_score, 0);
        assert_eq!(breakdown.streak_bonus, 0);
        assert!((breakdown.difficulty_multiplier - 2.25).abs() < 1e-9);
        assert!((breakdown.time_used - 5.0).abs() < 1e-9);
    }

    #[test]
    fn echo_score_converts_time_left_to_time_used() {
        let config = ScoringConfig::default();
        let fast = echo_score(&config, 4.5, CefrLevel::A1, 0, true, false);
        // (100 + round(4.5 * 15)) * 1.0 + 0
        assert_eq!(fast.time_bonus, 68);
        assert_eq!(fast.final_score, 168);

        let slow = echo_score(&config, 0.5, CefrLevel::A1, 0, true, false);
        assert!(slow.final_score < fast.final_score);
    }

    #[test]
    fn replay_forfeits_time_bonus() {
        let config = ScoringConfig::default();
        let replayed = echo_score(&config, 4.5, CefrLevel::A2, 3, true, true);
        assert_eq!(replayed.time_bonus, 0);
        // Base, multiplier and streak still apply.
        assert_eq!(replayed.final_score, 140);
    }

    #[test]
    fn higher_level_scores_higher() {
        let config = ScoringConfig::default();
        let mut prev = 0;
        for level in CefrLevel::ALL {
            let breakdown = recall_score(&config, 2.0, level, 0, true);
            assert!(breakdown.final_score > prev);
            prev = breakdown.final_score;
        }
    }

    #[test]
    fn scores_are_deterministic() {
        let config = ScoringConfig::default();
        let a = echo_score(&config, 3.3, CefrLevel::B2, 7, true, false);
        let b = echo_score(&config, 3.3, CefrLevel::B2, 7, true, false);
        assert_eq!(a, b);
    }

    #[test]
    fn typing_score_scales_with_length_and_combo() {
        let config = ScoringConfig::default();
        let short = typing_score(&config, "cat", 0, true);
        assert_eq!(short.final_score, 30);

        let long = typing_score(&config, "elephant", 0, true);
        assert_eq!(long.final_score, 80);

        let combo = typing_score(&config, "cat", 12, true);
        assert_eq!(combo.final_score, 45);

        let wrong = typing_score(&config, "cat", 12, false);
        assert_eq!(wrong.final_score, 0);
    }

    #[test]
    fn combo_tiers_are_monotonic() {
        let mut prev = 0.0;
        for streak in 0..40 {
            let combo = combo_multiplier(streak);
            assert!(combo >= prev);
            prev = combo;
        }
        assert_eq!(combo_multiplier(25), 2.0);
    }
}
