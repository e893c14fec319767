//! Spoken feedback output
//!
//! At most one utterance plays at a time: speaking always cancels whatever
//! is still in progress.

use parking_lot::Mutex;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub trait SpeechFeedback: Send {
    /// Cancel any in-progress utterance, then speak `text`
    fn speak(&mut self, text: &str);

    fn cancel(&mut self);
}

/// Writes utterances to the log only
#[derive(Debug, Default)]
pub struct LogSpeech;

impl SpeechFeedback for LogSpeech {
    fn speak(&mut self, text: &str) {
        info!("[SPEECH] {}", text);
    }

    fn cancel(&mut self) {}
}

/// Speaks through an external synthesizer such as `espeak-ng` or `say`
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    available: bool,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
            available: true,
        }
    }
}

impl SpeechFeedback for CommandSpeech {
    fn speak(&mut self, text: &str) {
        self.cancel();
        if !self.available {
            debug!("[SPEECH] (muted) {}", text);
            return;
        }

        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.child = Some(child),
            Err(e) => {
                warn!(
                    "[SPEECH] '{}' unavailable, falling back to log: {}",
                    self.program, e
                );
                self.available = false;
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCall {
    Speak(String),
    Cancel,
}

/// Records calls for inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    calls: Arc<Mutex<Vec<SpeechCall>>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().clone()
    }

    /// Only the spoken texts, in order
    pub fn spoken(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SpeechCall::Speak(text) => Some(text.clone()),
                SpeechCall::Cancel => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl SpeechFeedback for RecordingSpeech {
    fn speak(&mut self, text: &str) {
        let mut calls = self.calls.lock();
        calls.push(SpeechCall::Cancel);
        calls.push(SpeechCall::Speak(text.to_string()));
    }

    fn cancel(&mut self) {
        self.calls.lock().push(SpeechCall::Cancel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_cancels_before_speaking() {
        let recorder = RecordingSpeech::new();
        let mut speech: Box<dyn SpeechFeedback> = Box::new(recorder.clone());
        speech.speak("one");
        speech.speak("two");

        assert_eq!(
            recorder.calls(),
            vec![
                SpeechCall::Cancel,
                SpeechCall::Speak("one".into()),
                SpeechCall::Cancel,
                SpeechCall::Speak("two".into()),
            ]
        );
        assert_eq!(recorder.spoken(), vec!["one", "two"]);
    }

    #[test]
    fn test_missing_program_mutes() {
        let mut speech = CommandSpeech::new("braillai-no-such-synth", Vec::new());
        speech.speak("hello");
        assert!(!speech.available);
        speech.speak("again");
        assert!(speech.child.is_none());
    }
}
