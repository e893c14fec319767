//! Voice capture for form fields
//!
//! The capture backend is an opaque port. [`CaptureManager`] guarantees at
//! most one active capture and turns backend results into field updates.

use crate::{BraillError, Result};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Every form field that accepts dictation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    GeminiKey,
    DeviceRunnerKey,
    DeviceId,
    Name,
    DateOfBirth,
    BloodType,
    Address,
    EmergencyContactName,
    EmergencyContactNumber,
    ContactName,
    ContactNumber,
}

impl FormField {
    /// Multi-line fields accumulate dictation instead of replacing it
    pub fn is_multiline(&self) -> bool {
        matches!(self, FormField::Address)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::GeminiKey => "Gemini API key",
            FormField::DeviceRunnerKey => "Device runner key",
            FormField::DeviceId => "Device ID",
            FormField::Name => "Full name",
            FormField::DateOfBirth => "Date of birth",
            FormField::BloodType => "Blood type",
            FormField::Address => "Address",
            FormField::EmergencyContactName => "Emergency contact name",
            FormField::EmergencyContactNumber => "Emergency contact number",
            FormField::ContactName => "Contact name",
            FormField::ContactNumber => "Phone number",
        }
    }
}

/// Write a transcript into a field value
pub fn apply_transcript(field: FormField, value: &mut String, transcript: &str) {
    if field.is_multiline() && !value.trim().is_empty() {
        value.push(' ');
        value.push_str(transcript);
    } else {
        *value = transcript.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureErrorKind {
    NoSpeech,
    NotAllowed,
    Other,
}

impl CaptureErrorKind {
    /// Backend error codes as reported by speech recognizers
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => CaptureErrorKind::NoSpeech,
            "not-allowed" => CaptureErrorKind::NotAllowed,
            _ => CaptureErrorKind::Other,
        }
    }

    pub fn notice(&self) -> &'static str {
        match self {
            CaptureErrorKind::NoSpeech => "No speech detected. Try again!",
            CaptureErrorKind::NotAllowed => {
                "Microphone access denied. Enable it in browser settings."
            }
            CaptureErrorKind::Other => "Voice input error. Try typing instead.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    Transcript(String),
    Failed(CaptureErrorKind),
    /// Recognizer finished without a result
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub field: FormField,
    pub outcome: CaptureOutcome,
}

/// Speech-to-text backend
pub trait VoiceCapture: Send {
    fn is_available(&self) -> bool;

    /// Begin listening for `field`; results are sent to `events`
    fn start(&mut self, field: FormField, events: Sender<CaptureEvent>) -> Result<()>;

    fn stop(&mut self);
}

/// Backend for runtimes without speech recognition
#[derive(Debug, Default)]
pub struct UnsupportedCapture;

impl VoiceCapture for UnsupportedCapture {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _field: FormField, _events: Sender<CaptureEvent>) -> Result<()> {
        Err(BraillError::CapabilityUnavailable(
            "speech recognition".to_string(),
        ))
    }

    fn stop(&mut self) {}
}

/// Owns the single active capture
pub struct CaptureManager {
    backend: Box<dyn VoiceCapture>,
    events: Sender<CaptureEvent>,
    active: Option<FormField>,
}

impl CaptureManager {
    pub fn new(backend: Box<dyn VoiceCapture>, events: Sender<CaptureEvent>) -> Self {
        Self {
            backend,
            events,
            active: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn active(&self) -> Option<FormField> {
        self.active
    }

    /// Start capturing for `field`, stopping any capture already running
    pub fn start(&mut self, field: FormField) -> Result<()> {
        if !self.backend.is_available() {
            return Err(BraillError::CapabilityUnavailable(
                "speech recognition".to_string(),
            ));
        }
        if let Some(previous) = self.active.take() {
            debug!("[CAPTURE] Stopping capture for {:?}", previous);
            self.backend.stop();
        }
        self.backend.start(field, self.events.clone())?;
        self.active = Some(field);
        info!("[CAPTURE] Listening for {:?}", field);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            self.backend.stop();
        }
    }

    /// Accept a backend event; events for a replaced capture are dropped
    pub fn accept(&mut self, event: CaptureEvent) -> Option<CaptureEvent> {
        if self.active != Some(event.field) {
            debug!("[CAPTURE] Dropping stale result for {:?}", event.field);
            return None;
        }
        self.active = None;
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[derive(Default)]
    struct FakeCapture {
        started: Vec<FormField>,
        stops: usize,
    }

    impl VoiceCapture for FakeCapture {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&mut self, field: FormField, _events: Sender<CaptureEvent>) -> Result<()> {
            self.started.push(field);
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_single_line_replaced() {
        let mut value = "old".to_string();
        apply_transcript(FormField::Name, &mut value, "Nora Lee");
        assert_eq!(value, "Nora Lee");
    }

    #[test]
    fn test_multiline_appends_with_space() {
        let mut value = "12 Oak Street".to_string();
        apply_transcript(FormField::Address, &mut value, "Springfield");
        assert_eq!(value, "12 Oak Street Springfield");

        let mut empty = "  ".to_string();
        apply_transcript(FormField::Address, &mut empty, "Springfield");
        assert_eq!(empty, "Springfield");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CaptureErrorKind::from_code("no-speech"), CaptureErrorKind::NoSpeech);
        assert_eq!(
            CaptureErrorKind::from_code("not-allowed"),
            CaptureErrorKind::NotAllowed
        );
        assert_eq!(
            CaptureErrorKind::from_code("network").notice(),
            "Voice input error. Try typing instead."
        );
    }

    #[test]
    fn test_one_active_capture() {
        let (tx, _rx) = unbounded();
        let mut manager = CaptureManager::new(Box::new(FakeCapture::default()), tx);

        manager.start(FormField::Name).unwrap();
        manager.start(FormField::Address).unwrap();
        assert_eq!(manager.active(), Some(FormField::Address));

        let stale = CaptureEvent {
            field: FormField::Name,
            outcome: CaptureOutcome::Transcript("x".into()),
        };
        assert!(manager.accept(stale).is_none());

        let fresh = CaptureEvent {
            field: FormField::Address,
            outcome: CaptureOutcome::Transcript("y".into()),
        };
        assert!(manager.accept(fresh).is_some());
        assert!(manager.active().is_none());
    }

    #[test]
    fn test_unsupported_backend() {
        let (tx, _rx) = unbounded();
        let mut manager = CaptureManager::new(Box::new(UnsupportedCapture), tx);
        assert!(!manager.is_available());
        assert!(matches!(
            manager.start(FormField::Name),
            Err(BraillError::CapabilityUnavailable(_))
        ));
    }
}
