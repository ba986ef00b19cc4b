use chrono::Utc;

use crate::audio::{CommandSounds, CommandSpeech, NullSounds, NullSpeech, SoundPlayer, Speech};
use crate::config::Config;
use crate::session::game::GameSession;
use crate::session::summary::SessionSummary;
use crate::store::json_store::ScoreStore;
use crate::store::schema::{PersonalBest, ScoreRecord};
use crate::ui::components::menu::SetupMenu;
use crate::ui::theme::Theme;
use crate::words::WordSource;
use crate::words::catalog::{EmbeddedCatalog, RemoteCatalog};
use crate::words::supply::WordSupply;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Game,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: SetupMenu<'static>,
    pub session: Option<GameSession>,
    pub store: Option<ScoreStore>,
    pub personal_best: Option<PersonalBest>,
    pub last_summary: Option<SessionSummary>,
    pub new_high_score: bool,
    pub status_line: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.validate();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = SetupMenu::new(theme);
        let store = ScoreStore::new().ok();

        Self {
            screen: AppScreen::Menu,
            config,
            theme,
            menu,
            session: None,
            store,
            personal_best: None,
            last_summary: None,
            new_high_score: false,
            status_line: None,
            should_quit: false,
        }
    }

    pub fn start_session(&mut self) {
        let settings = self.menu.settings();

        let source: Box<dyn WordSource> = if self.config.word_pack_url.is_empty() {
            Box::new(EmbeddedCatalog)
        } else {
            Box::new(RemoteCatalog::new(&self.config.word_pack_url))
        };
        let supply = WordSupply::new(source, self.config.words_per_session);

        let speech: Box<dyn Speech> = if self.config.speech_command.is_empty() {
            Box::new(NullSpeech)
        } else {
            Box::new(CommandSpeech::new(&self.config.speech_command))
        };
        let sounds: Box<dyn SoundPlayer> = if self.config.sound_command.is_empty() {
            Box::new(NullSounds)
        } else {
            Box::new(CommandSounds::new(&self.config.sound_command))
        };

        let session = GameSession::new(settings, supply, speech, sounds);
        if !session.has_words() {
            // Degrade instead of entering play with an empty list.
            self.status_line = Some("No words available for this selection".to_string());
            return;
        }

        self.personal_best = self.store.as_ref().and_then(|store| {
            let settings = session.settings();
            store.personal_best(settings.mode.key(), settings.style.key())
        });
        self.last_summary = None;
        self.new_high_score = false;
        self.status_line = None;
        self.session = Some(session);
        self.screen = AppScreen::Game;
    }

    /// Advance game time. Called for every loop iteration with the real
    /// delta so timers do not stall under sustained input.
    pub fn advance(&mut self, dt: f64) {
        if self.screen != AppScreen::Game {
            return;
        }
        if let Some(session) = &mut self.session {
            session.tick(dt);
            if let Some(summary) = session.take_summary() {
                self.finalize_session(summary);
            }
        }
    }

    /// Runs once per completed session: the one-shot summary from the
    /// state machine is recorded, and submitted only when a player identity
    /// is configured. Submission failures are kept as a status line, never
    /// surfaced as an error or allowed to block restart.
    fn finalize_session(&mut self, summary: SessionSummary) {
        self.new_high_score = false;
        if self.config.player_name.is_some() {
            if let Some(store) = &self.store {
                let record = ScoreRecord {
                    game_mode: summary.mode.key().to_string(),
                    game_style: summary.style.key().to_string(),
                    score: summary.score,
                    highest_streak: summary.highest_streak,
                    words_correct: summary.words_correct,
                    words_incorrect: summary.words_incorrect,
                    time_spent_secs: summary.time_spent_secs,
                    wpm: summary.wpm,
                    challenge_total_score: summary.challenge_total_score,
                    played_at: Utc::now(),
                };
                match store.submit(&record) {
                    Ok(outcome) => {
                        self.new_high_score = outcome.new_high_score;
                        self.personal_best =
                            store.personal_best(&record.game_mode, &record.game_style);
                    }
                    Err(e) => {
                        self.status_line = Some(format!("score submit failed: {e}"));
                    }
                }
            }
        }
        self.last_summary = Some(summary);
    }

    pub fn restart_session(&mut self) {
        if let Some(session) = &mut self.session {
            session.restart();
            self.last_summary = None;
            self.new_high_score = false;
        }
    }

    pub fn back_to_menu(&mut self) {
        if let Some(session) = &mut self.session {
            session.abort();
        }
        self.session = None;
        self.last_summary = None;
        self.screen = AppScreen::Menu;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
