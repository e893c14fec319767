//! Terminal output classifier
//!
//! The assistant process only prints text. Each line is matched against an
//! ordered rule table; the first matching rule decides the event, so the
//! rules are mutually exclusive.

use serde::{Deserialize, Serialize};

/// Phrases that mean the assistant is handling an emergency
pub const EMERGENCY_PHRASES: &[&str] = &[
    "[COMMAND] Executing: emergency",
    "Emergency contact called",
    "Calling emergency contact",
];

pub const LISTENING_MARKER: &str = "Listening...";
pub const USER_MARKER: &str = "You said:";
pub const ASSISTANT_MARKER: &str = "Braill-AI:";

/// Typed interpretation of one line of assistant output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEvent {
    EmergencyDetected,
    ListeningStateChanged(bool),
    /// Recognized user speech; listening has implicitly ended
    UserUtterance(String),
    AssistantUtterance(String),
    SystemNotice(String),
    RawOutput(String),
}

struct Rule {
    name: &'static str,
    matches: fn(&str) -> bool,
    build: fn(&str) -> StatusEvent,
}

static RULES: &[Rule] = &[
    Rule {
        name: "emergency",
        matches: |line| EMERGENCY_PHRASES.iter().any(|p| line.contains(p)),
        build: |_| StatusEvent::EmergencyDetected,
    },
    Rule {
        name: "listening",
        matches: |line| line.contains(LISTENING_MARKER),
        build: |_| StatusEvent::ListeningStateChanged(true),
    },
    Rule {
        name: "user",
        matches: |line| line.contains(USER_MARKER),
        build: |line| StatusEvent::UserUtterance(strip_marker(line, USER_MARKER)),
    },
    Rule {
        name: "assistant",
        matches: |line| line.contains(ASSISTANT_MARKER),
        build: |line| StatusEvent::AssistantUtterance(strip_marker(line, ASSISTANT_MARKER)),
    },
    Rule {
        name: "system",
        matches: |line| line.contains('[') && line.contains(']'),
        build: |line| StatusEvent::SystemNotice(line.to_string()),
    },
    Rule {
        name: "raw",
        matches: |line| !line.trim().is_empty(),
        build: |line| StatusEvent::RawOutput(line.to_string()),
    },
];

/// Remove the first occurrence of `marker` and trim
fn strip_marker(line: &str, marker: &str) -> String {
    line.replacen(marker, "", 1).trim().to_string()
}

/// Classify one line; blank lines yield nothing
pub fn classify(line: &str) -> Option<StatusEvent> {
    let rule = RULES.iter().find(|rule| (rule.matches)(line))?;
    tracing::trace!("[CLASSIFIER] '{}' matched {}", line, rule.name);
    Some((rule.build)(line))
}

/// Classify a chunk that may hold several lines
pub fn classify_text(text: &str) -> Vec<StatusEvent> {
    text.lines().filter_map(classify).collect()
}
