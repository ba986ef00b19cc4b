use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Identity attached to score submissions; bests are only recorded
    /// when a name is set.
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_words_per_session")]
    pub words_per_session: usize,
    /// Typing mode countdown in seconds; 0 means unlimited.
    #[serde(default = "default_typing_duration_secs")]
    pub typing_duration_secs: u32,
    /// External TTS command for Echo mode (e.g. "espeak"); empty disables
    /// speech and the answer timer starts immediately.
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    /// External sound-effect command; empty disables sounds.
    #[serde(default = "default_sound_command")]
    pub sound_command: String,
    /// Base URL for refreshed word packs; empty uses the embedded packs.
    #[serde(default = "default_word_pack_url")]
    pub word_pack_url: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_words_per_session() -> usize {
    20
}
fn default_typing_duration_secs() -> u32 {
    60
}
fn default_speech_command() -> String {
    String::new()
}
fn default_sound_command() -> String {
    String::new()
}
fn default_word_pack_url() -> String {
    String::new()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: None,
            theme: default_theme(),
            words_per_session: default_words_per_session(),
            typing_duration_secs: default_typing_duration_secs(),
            speech_command: default_speech_command(),
            sound_command: default_sound_command(),
            word_pack_url: default_word_pack_url(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordrush")
            .join("config.toml")
    }

    /// Clamp ranges after deserialization so a hand-edited file cannot put
    /// the game in a degenerate state.
    pub fn validate(&mut self) {
        self.words_per_session = self.words_per_session.clamp(5, 50);
        self.typing_duration_secs = self.typing_duration_secs.min(600);
        if let Some(name) = &self.player_name {
            if name.trim().is_empty() {
                self.player_name = None;
            }
        }
    }

    pub fn typing_duration(&self) -> Option<f64> {
        if self.typing_duration_secs == 0 {
            None
        } else {
            Some(f64::from(self.typing_duration_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.player_name, None);
        assert_eq!(config.words_per_session, 20);
        assert_eq!(config.typing_duration_secs, 60);
        assert!(config.speech_command.is_empty());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let config: Config = toml::from_str(
            r#"
player_name = "mint"
typing_duration_secs = 120
"#,
        )
        .unwrap();
        assert_eq!(config.player_name.as_deref(), Some("mint"));
        assert_eq!(config.typing_duration_secs, 120);
        assert_eq!(config.words_per_session, 20);
    }

    #[test]
    fn serde_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.words_per_session, deserialized.words_per_session);
    }

    #[test]
    fn validate_clamps_ranges() {
        let mut config = Config::default();
        config.words_per_session = 2;
        config.typing_duration_secs = 10_000;
        config.player_name = Some("   ".into());
        config.validate();
        assert_eq!(config.words_per_session, 5);
        assert_eq!(config.typing_duration_secs, 600);
        assert_eq!(config.player_name, None);
    }

    #[test]
    fn zero_duration_means_unlimited() {
        let mut config = Config::default();
        config.typing_duration_secs = 0;
        assert_eq!(config.typing_duration(), None);
        config.typing_duration_secs = 90;
        assert_eq!(config.typing_duration(), Some(90.0));
    }
}
