//! Speech ports: spoken feedback out, voice capture in
//!
//! Neither recognizer nor synthesizer lives in this crate; both are consumed
//! through the traits below.

pub mod capture;
pub mod feedback;

pub use capture::{
    apply_transcript, CaptureErrorKind, CaptureEvent, CaptureManager, CaptureOutcome, FormField,
    UnsupportedCapture, VoiceCapture,
};
pub use feedback::{CommandSpeech, LogSpeech, RecordingSpeech, SpeechCall, SpeechFeedback};
