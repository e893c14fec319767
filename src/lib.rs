//! BraillAI dashboard client
//!
//! Local profiles, a screen state machine and the realtime protocol that
//! drives a voice assistant backend, behind an egui front-end.

pub mod api;
pub mod classifier;
pub mod contacts;
pub mod emergency;
pub mod error;
pub mod feed;
pub mod orchestrator;
pub mod profile;
pub mod protocol;
pub mod screen;
pub mod session;
pub mod settings;
pub mod speech;
pub mod storage;
pub mod timers;
pub mod ui;
pub mod view;

pub use error::{BraillError, Result};
