//! Speech and sound-effect seams. Gameplay only depends on the traits;
//! default implementations either shell out to a user-configured command
//! (fire-and-forget) or do nothing. Echo mode keys its answer timer off
//! `Speech::is_speaking` flipping to false.

use std::process::{Child, Command, Stdio};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundId {
    Keypress,
    Correct,
    Incorrect,
    Completed,
    Countdown,
}

impl SoundId {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundId::Keypress => "keypress",
            SoundId::Correct => "correct",
            SoundId::Incorrect => "incorrect",
            SoundId::Completed => "completed",
            SoundId::Countdown => "countdown",
        }
    }
}

pub trait SoundPlayer {
    fn play(&mut self, id: SoundId, volume: f32);
}

pub struct NullSounds;

impl SoundPlayer for NullSounds {
    fn play(&mut self, _id: SoundId, _volume: f32) {}
}

/// Spawns `<command> <sound-id> <volume>` and forgets about it. Spawn
/// failures are swallowed; sound is never worth interrupting a session for.
pub struct CommandSounds {
    command: String,
}

impl CommandSounds {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl SoundPlayer for CommandSounds {
    fn play(&mut self, id: SoundId, volume: f32) {
        let _ = Command::new(&self.command)
            .arg(id.as_str())
            .arg(format!("{volume:.2}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }
}

pub trait Speech {
    fn speak(&mut self, text: &str);
    fn cancel(&mut self);
    /// Takes `&mut self` so process-backed implementations can reap their
    /// child on the same call.
    fn is_speaking(&mut self) -> bool;
}

/// No TTS configured: speech completes instantly, so Echo answer timers
/// start right away.
pub struct NullSpeech;

impl Speech for NullSpeech {
    fn speak(&mut self, _text: &str) {}
    fn cancel(&mut self) {}
    fn is_speaking(&mut self) -> bool {
        false
    }
}

/// Runs `<command> <text>` (e.g. espeak) per utterance. Starting a new
/// utterance cancels the previous one.
pub struct CommandSpeech {
    command: String,
    child: Option<Child>,
}

impl CommandSpeech {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            child: None,
        }
    }
}

impl Speech for CommandSpeech {
    fn speak(&mut self, text: &str) {
        self.cancel();
        self.child = Command::new(&self.command)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .ok();
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_speaking(&mut self) -> bool {
        if let Some(child) = self.child.as_mut() {
            if matches!(child.try_wait(), Ok(Some(_)) | Err(_)) {
                self.child = None;
            }
        }
        self.child.is_some()
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_speech_is_never_speaking() {
        let mut speech = NullSpeech;
        speech.speak("hello");
        assert!(!speech.is_speaking());
        speech.cancel();
        assert!(!speech.is_speaking());
    }

    #[test]
    fn sound_ids_have_stable_names() {
        assert_eq!(SoundId::Correct.as_str(), "correct");
        assert_eq!(SoundId::Completed.as_str(), "completed");
    }

    #[test]
    fn command_speech_handles_missing_binary() {
        let mut speech = CommandSpeech::new("/definitely/not/a/binary");
        speech.speak("word");
        // Spawn failed silently; nothing is speaking and cancel is a no-op.
        assert!(!speech.is_speaking());
        speech.cancel();
    }
}
