//! The game state machine. Owns the session state, the difficulty engine,
//! timers and the injected collaborators, and is the single place where
//! timer events, answer submissions and difficulty swaps interleave.
//!
//! Coordination rules:
//! - every word-list replacement bumps `generation`; timer events armed
//!   under an older generation are dropped at the dispatch point
//! - a set `transition` blocks submissions, speech and answer timers until
//!   it expires
//! - game-over finalization snapshots the summary synchronously, exactly
//!   once, behind a latch

use crate::audio::{SoundId, SoundPlayer, Speech};
use crate::engine::dda::{CefrLevel, DdaConfig, DdaEngine};
use crate::engine::energy::EnergyMeter;
use crate::engine::overdrive::{HeatLevel, OverdriveState};
use crate::engine::scoring::{self, ScoringConfig};
use crate::session::state::{
    GameMode, GameStatus, GameStyle, LEVEL_SWAP_LOCK_SECS, REVEAL_LOCK_SECS, SessionState,
    TIME_UP_ANSWER, Transition, TransitionKind, normalize_answer,
};
use crate::session::summary::SessionSummary;
use crate::session::timers::{ANSWER_WINDOW_SECS, PRACTICE_MEMORIZE_SECS, SessionTimers, TimerEvent};
use crate::words::supply::WordSupply;
use crate::words::{DifficultyId, Word};

const EPSILON: f64 = 1e-9;

#[derive(Clone, Debug)]
pub struct GameSettings {
    pub mode: GameMode,
    pub style: GameStyle,
    pub difficulty: DifficultyId,
    /// Typing mode countdown; `None` is unlimited.
    pub typing_duration_secs: Option<f64>,
}

impl GameSettings {
    pub fn new(mode: GameMode, style: GameStyle, difficulty: DifficultyId) -> Self {
        Self {
            mode,
            style,
            difficulty,
            typing_duration_secs: Some(60.0),
        }
    }
}

pub struct GameSession {
    settings: GameSettings,
    state: SessionState,
    dda: DdaEngine,
    scoring: ScoringConfig,
    timers: SessionTimers,
    energy: EnergyMeter,
    overdrive: OverdriveState,
    supply: WordSupply,
    speech: Box<dyn Speech>,
    sounds: Box<dyn SoundPlayer>,
    summary: Option<SessionSummary>,
    finalized: bool,
}

impl GameSession {
    pub fn new(
        settings: GameSettings,
        supply: WordSupply,
        speech: Box<dyn Speech>,
        sounds: Box<dyn SoundPlayer>,
    ) -> Self {
        let timers = SessionTimers::new(settings.typing_duration_secs);
        let mut session = Self {
            settings,
            state: SessionState::new(),
            dda: DdaEngine::new(DdaConfig::default()),
            scoring: ScoringConfig::default(),
            timers,
            energy: EnergyMeter::new(),
            overdrive: OverdriveState::new(),
            supply,
            speech,
            sounds,
            summary: None,
            finalized: false,
        };
        session.supply.prefetch_all();
        session.speech.cancel();
        session.draw_initial_words();
        session.sounds.play(SoundId::Countdown, 0.5);
        session
    }

    // --- accessors ---------------------------------------------------------

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dda_level(&self) -> CefrLevel {
        self.dda.level()
    }

    pub fn dda_performance(&self) -> i32 {
        self.dda.performance()
    }

    pub fn has_words(&self) -> bool {
        !self.state.words.is_empty()
    }

    pub fn answer_remaining(&self) -> Option<f64> {
        self.timers
            .answer
            .is_running()
            .then(|| self.timers.answer.remaining())
    }

    pub fn clock_remaining(&self) -> Option<f64> {
        self.timers.clock.remaining()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.timers.elapsed.secs()
    }

    pub fn energy(&self) -> &EnergyMeter {
        &self.energy
    }

    pub fn heat(&self) -> &'static HeatLevel {
        self.overdrive.current()
    }

    pub fn heat_transitioning(&self) -> bool {
        self.overdrive.is_transitioning()
    }

    pub fn supply_warnings(&self) -> &[String] {
        self.supply.warnings()
    }

    // --- lifecycle ---------------------------------------------------------

    /// Full session reset back into the countdown. Session-best streak is
    /// the one field that survives (see `SessionState::reset_for_restart`).
    pub fn restart(&mut self) {
        self.speech.cancel();
        self.dda.reset();
        self.energy.reset();
        self.overdrive.reset();
        self.timers = SessionTimers::new(self.settings.typing_duration_secs);
        self.state.reset_for_restart();
        self.summary = None;
        self.finalized = false;
        self.draw_initial_words();
        self.sounds.play(SoundId::Countdown, 0.5);
    }

    /// Cancel in-flight speech when leaving the game screen.
    pub fn abort(&mut self) {
        self.speech.cancel();
    }

    /// One-shot: the finalized summary, the first time it is asked for.
    pub fn take_summary(&mut self) -> Option<SessionSummary> {
        self.summary.take()
    }

    /// Challenge sessions (outside Meaning Match) always ride the
    /// difficulty ladder, whatever pool was selected; Practice plays the
    /// selected pool as-is.
    fn active_difficulty(&self) -> DifficultyId {
        if self.settings.style == GameStyle::Challenge && self.settings.mode.updates_dda() {
            DifficultyId::Dda
        } else {
            self.settings.difficulty
        }
    }

    fn draw_initial_words(&mut self) {
        let difficulty = self.active_difficulty();
        let words = self.supply.draw_for_difficulty(difficulty, self.dda.level());
        self.state.words = words;
        self.state.word_index = 0;
    }

    // --- ticking -----------------------------------------------------------

    pub fn tick(&mut self, dt: f64) {
        match self.state.status {
            GameStatus::Countdown => {
                self.state.countdown_left -= dt;
                if self.state.countdown_left <= EPSILON {
                    self.state.countdown_left = 0.0;
                    self.enter_playing();
                }
            }
            GameStatus::Playing => self.tick_playing(dt),
            GameStatus::GameOver => {}
        }
    }

    fn tick_playing(&mut self, dt: f64) {
        self.timers.elapsed.tick(dt);

        if let Some(mut transition) = self.state.transition {
            transition.remaining -= dt;
            if transition.remaining <= EPSILON {
                self.state.transition = None;
                match transition.kind {
                    TransitionKind::Reveal { correct, advance } => {
                        self.on_reveal_end(correct, advance);
                    }
                    TransitionKind::LevelSwap => self.begin_round(),
                }
            } else {
                self.state.transition = Some(transition);
            }
        }
        if self.state.status != GameStatus::Playing {
            return;
        }

        let transitioning = self.state.is_transitioning();

        // The typing clock keeps running through reveal/swap windows.
        if self.settings.mode == GameMode::Typing {
            if let Some(event) = self.timers.clock.tick(dt) {
                self.dispatch(event);
            }
            if self.state.status != GameStatus::Playing {
                return;
            }
            if self.settings.style == GameStyle::Challenge {
                self.overdrive.update_streak(self.state.streak);
                self.overdrive.tick(dt);
                self.energy
                    .tick(dt, self.overdrive.decay_interval(), transitioning);
                if self.energy.poll_depleted() {
                    self.finish();
                    return;
                }
            }
        }

        if transitioning {
            return;
        }

        // Echo arms its answer window only once playback has finished.
        if self.settings.mode == GameMode::Echo
            && self.state.awaiting_speech
            && !self.speech.is_speaking()
        {
            self.state.awaiting_speech = false;
            if self.settings.style == GameStyle::Challenge {
                self.timers
                    .answer
                    .start(ANSWER_WINDOW_SECS, self.state.generation);
            }
        }

        if let Some(event) = self.timers.memorize.tick(dt) {
            self.dispatch(event);
            if self.state.status != GameStatus::Playing {
                return;
            }
        }
        if let Some(event) = self.timers.answer.tick(dt) {
            self.dispatch(event);
        }
    }

    /// Single consumption point for timer events. Stale generations and
    /// events landing inside a transition window are dropped here.
    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::AnswerTimeUp { generation } => {
                if generation == self.state.generation
                    && self.state.status == GameStatus::Playing
                    && !self.state.is_transitioning()
                {
                    self.on_answer_time_up();
                }
            }
            TimerEvent::MemorizeDone { generation } => {
                if generation == self.state.generation && self.state.status == GameStatus::Playing {
                    self.state.word_visible = false;
                    if self.settings.style == GameStyle::Challenge {
                        self.timers
                            .answer
                            .start(ANSWER_WINDOW_SECS, self.state.generation);
                    }
                }
            }
            TimerEvent::ClockExpired => self.finish(),
        }
    }

    fn enter_playing(&mut self) {
        self.state.status = GameStatus::Playing;
        self.timers.elapsed.reset();
        if self.settings.mode == GameMode::Typing && self.settings.style == GameStyle::Challenge {
            self.energy.mark_initialized();
        }
        self.begin_round();
    }

    /// Per-word setup, run on entering play, after every index advance and
    /// after every list replacement.
    fn begin_round(&mut self) {
        if self.state.status != GameStatus::Playing || self.state.is_transitioning() {
            return;
        }
        self.state.replay_used = false;
        match self.settings.mode {
            GameMode::Echo => {
                if let Some(word) = self.state.current_word() {
                    let text = word.word.clone();
                    self.speech.cancel();
                    self.speech.speak(&text);
                    self.state.awaiting_speech = true;
                }
            }
            GameMode::Memory => {
                self.state.word_visible = true;
                let secs = match self.settings.style {
                    GameStyle::Challenge => self.dda.level().memorize_secs(),
                    GameStyle::Practice => PRACTICE_MEMORIZE_SECS,
                };
                self.timers.memorize.start(secs, self.state.generation);
            }
            GameMode::MeaningMatch => {
                if self.settings.style == GameStyle::Challenge {
                    self.timers
                        .answer
                        .start(ANSWER_WINDOW_SECS, self.state.generation);
                }
            }
            GameMode::Typing => {}
        }
    }

    // --- input -------------------------------------------------------------

    pub fn push_char(&mut self, ch: char) {
        if self.state.status != GameStatus::Playing || self.state.is_transitioning() {
            return;
        }
        if self.settings.mode == GameMode::Memory && self.state.word_visible {
            return;
        }
        if ch.is_control() {
            return;
        }
        self.state.input.push(ch);
        self.sounds.play(SoundId::Keypress, 0.4);
    }

    pub fn backspace(&mut self) {
        if self.state.status != GameStatus::Playing || self.state.is_transitioning() {
            return;
        }
        self.state.input.pop();
    }

    /// Echo: play the current word again. Challenge style forfeits the
    /// time bonus for this word.
    pub fn replay_word(&mut self) {
        if self.settings.mode != GameMode::Echo
            || self.state.status != GameStatus::Playing
            || self.state.is_transitioning()
        {
            return;
        }
        let Some(word) = self.state.current_word() else {
            return;
        };
        let text = word.word.clone();
        if self.settings.style == GameStyle::Challenge {
            self.state.replay_used = true;
        }
        self.speech.cancel();
        self.speech.speak(&text);
    }

    // --- answering ---------------------------------------------------------

    pub fn submit(&mut self) {
        if self.state.status != GameStatus::Playing || self.state.is_transitioning() {
            return;
        }
        if self.settings.mode == GameMode::Memory && self.state.word_visible {
            return;
        }
        let answered = self.state.input.trim().to_string();
        if answered.is_empty() {
            return;
        }
        let Some(word) = self.state.current_word().cloned() else {
            return;
        };

        // Capture the timing context before anything stops or swaps.
        let time_left = if self.state.awaiting_speech {
            ANSWER_WINDOW_SECS
        } else if self.timers.answer.is_running() {
            self.timers.answer.remaining()
        } else {
            0.0
        };
        let streak_before = self.state.streak;
        self.timers.answer.stop();

        let correct = normalize_answer(&answered) == normalize_answer(&word.word);

        let mut swapped = false;
        if self.settings.style == GameStyle::Challenge && self.settings.mode.updates_dda() {
            let outcome = self.dda.update(correct);
            if outcome.level_changed {
                swapped = self.apply_level_swap(outcome.new_level);
            }
        }

        if self.settings.style == GameStyle::Challenge && correct {
            let breakdown = self.score_answer(&word, time_left, streak_before);
            self.state.total_challenge_score += breakdown.final_score;
            self.state.last_breakdown = Some(breakdown);
        }

        if self.settings.mode == GameMode::Typing {
            self.submit_typing(&word, &answered, correct, swapped);
        } else {
            self.submit_revealed(&word, &answered, correct, swapped);
        }
    }

    fn score_answer(
        &self,
        word: &Word,
        time_left: f64,
        streak_before: u32,
    ) -> scoring::ScoreBreakdown {
        let level = self.scoring_level_for(word);
        match self.settings.mode {
            GameMode::Echo => scoring::echo_score(
                &self.scoring,
                time_left,
                level,
                streak_before,
                true,
                self.state.replay_used,
            ),
            GameMode::Memory | GameMode::MeaningMatch => {
                let time_used =
                    (ANSWER_WINDOW_SECS - time_left).clamp(0.0, ANSWER_WINDOW_SECS);
                scoring::recall_score(&self.scoring, time_used, level, streak_before, true)
            }
            GameMode::Typing => {
                scoring::typing_score(&self.scoring, &word.word, streak_before, true)
            }
        }
    }

    /// Difficulty multiplier keys off the word's own CEFR tag, falling back
    /// to the pool it was drawn for. Untagged endless words score neutral.
    fn scoring_level_for(&self, word: &Word) -> CefrLevel {
        word.cefr_level().unwrap_or(match self.active_difficulty() {
            DifficultyId::Cefr(level) => level,
            DifficultyId::Dda => self.dda.level(),
            DifficultyId::Endless => CefrLevel::A1,
        })
    }

    fn submit_typing(&mut self, word: &Word, answered: &str, correct: bool, swapped: bool) {
        if correct {
            self.sounds.play(SoundId::Correct, 0.7);
            self.state.record_hit();
            if self.settings.style == GameStyle::Challenge {
                self.energy.gain_for_word(word.word.chars().count());
            }
        } else {
            self.sounds.play(SoundId::Incorrect, 0.7);
            // No lives in typing: misses cost a point instead, floored at 0.
            self.state.score = self.state.score.saturating_sub(1);
            self.state.record_miss(&word.word, answered);
            if self.settings.style == GameStyle::Challenge {
                self.energy.lose_on_miss();
                if self.energy.poll_depleted() {
                    self.state.input.clear();
                    self.finish();
                    return;
                }
            }
        }

        self.state.input.clear();

        if swapped {
            // The swap already reset the list and index; the guard window
            // owns the rest of this step.
            return;
        }

        if self.state.is_last_word() {
            if self.active_difficulty().is_looping() {
                self.replace_word_list();
                self.begin_round();
            } else {
                self.finish();
            }
        } else {
            self.state.word_index += 1;
            self.begin_round();
        }
    }

    fn submit_revealed(&mut self, word: &Word, answered: &str, correct: bool, swapped: bool) {
        if correct {
            self.sounds.play(SoundId::Correct, 0.7);
            self.state.record_hit();
        } else {
            self.sounds.play(SoundId::Incorrect, 0.7);
            self.state.lives = self.state.lives.saturating_sub(1);
            self.state.record_miss(&word.word, answered);
        }
        self.enter_reveal(correct, !swapped);
    }

    fn on_answer_time_up(&mut self) {
        let Some(word) = self.state.current_word().cloned() else {
            return;
        };
        self.sounds.play(SoundId::Incorrect, 0.8);
        self.state.record_miss(&word.word, TIME_UP_ANSWER);
        self.state.lives = self.state.lives.saturating_sub(1);

        let mut swapped = false;
        if self.settings.style == GameStyle::Challenge && self.settings.mode.updates_dda() {
            let outcome = self.dda.update(false);
            if outcome.level_changed {
                swapped = self.apply_level_swap(outcome.new_level);
            }
        }
        self.enter_reveal(false, !swapped);
    }

    fn enter_reveal(&mut self, correct: bool, advance: bool) {
        self.state.transition = Some(Transition {
            kind: TransitionKind::Reveal { correct, advance },
            remaining: REVEAL_LOCK_SECS,
        });
    }

    fn on_reveal_end(&mut self, _correct: bool, advance: bool) {
        let lives_out = self.settings.mode.uses_lives() && self.state.lives == 0;
        let ends_list =
            advance && self.state.is_last_word() && !self.active_difficulty().is_looping();

        if lives_out || ends_list {
            self.state.input.clear();
            self.finish();
            return;
        }

        if advance {
            if self.state.is_last_word() {
                self.replace_word_list();
            } else {
                self.state.word_index += 1;
            }
        }
        self.state.input.clear();
        self.begin_round();
    }

    // --- word-pool management ----------------------------------------------

    /// The difficulty-change propagation step: new pool, index zeroed,
    /// generation bumped and all per-word tracking cleared, atomically from
    /// the perspective of any timer callback. Returns false (and leaves the
    /// session untouched) when the new level has no words to offer.
    fn apply_level_swap(&mut self, new_level: CefrLevel) -> bool {
        let words = self.supply.draw_for_level(new_level);
        if words.is_empty() {
            return false;
        }
        self.speech.cancel();
        self.timers.answer.stop();
        self.timers.memorize.clear();
        self.state.awaiting_speech = false;
        self.state.replay_used = false;
        self.state.word_visible = false;
        self.state.words = words;
        self.state.word_index = 0;
        self.state.generation = self.state.generation.wrapping_add(1);
        if !self.settings.mode.has_reveal_lock() {
            // Typing has no reveal window, so the swap gets its own guard.
            self.state.transition = Some(Transition {
                kind: TransitionKind::LevelSwap,
                remaining: LEVEL_SWAP_LOCK_SECS,
            });
        }
        true
    }

    /// Endless/DDA wraparound: a fresh shuffled list, index back to zero.
    fn replace_word_list(&mut self) {
        let words = self
            .supply
            .draw_for_difficulty(self.active_difficulty(), self.dda.level());
        if words.is_empty() {
            // Nothing left to play with; end the session instead of
            // pointing the index at a missing word.
            self.finish();
            return;
        }
        self.speech.cancel();
        self.timers.answer.stop();
        self.timers.memorize.clear();
        self.state.awaiting_speech = false;
        self.state.words = words;
        self.state.word_index = 0;
        self.state.generation = self.state.generation.wrapping_add(1);
    }

    // --- finalization ------------------------------------------------------

    /// Terminal transition. The summary is snapshotted synchronously here,
    /// and the latch keeps re-entry (duplicate timer events, repeated
    /// depletion observations) from producing a second one.
    fn finish(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        self.speech.cancel();
        self.timers.answer.stop();
        self.timers.memorize.clear();
        self.state.transition = None;
        self.state.status = GameStatus::GameOver;
        if self.settings.mode != GameMode::Echo {
            self.sounds.play(SoundId::Completed, 0.5);
        }
        self.summary = Some(SessionSummary::capture(
            &self.state,
            self.settings.mode,
            self.settings.style,
            self.settings.difficulty,
            self.timers.elapsed.secs(),
        ));
    }
}
