//! Conversation feed and transient notices shown on the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Entries kept before the oldest are dropped
pub const FEED_CAPACITY: usize = 200;

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedKind {
    User,
    Assistant,
    System,
    /// Unclassified assistant output, rendered dimmed
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: Uuid,
    pub kind: FeedKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl FeedEntry {
    pub fn new(kind: FeedKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Feed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
}

impl Default for Feed {
    fn default() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }
}

impl Feed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(FEED_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, kind: FeedKind, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(FeedEntry::new(kind, text));
    }

    pub fn system(&mut self, text: impl Into<String>) {
        self.push(FeedKind::System, text);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&FeedEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
            created: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_is_bounded() {
        let mut feed = Feed::with_capacity(3);
        for i in 0..5 {
            feed.system(format!("line {}", i));
        }
        let texts: Vec<&str> = feed.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_entries_get_unique_ids() {
        let mut feed = Feed::default();
        feed.push(FeedKind::User, "a");
        feed.push(FeedKind::User, "a");
        let ids: Vec<Uuid> = feed.entries().map(|e| e.id).collect();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(feed.last().unwrap().kind, FeedKind::User);
    }
}
