//! Dashboard HTTP API

pub mod client;
pub mod types;
pub mod worker;

pub use client::{DashboardApi, HttpApi, MemoryApi};
pub use types::{Note, Reminder, SaveProfileRequest};
pub use worker::{respond, ApiRequest, ApiResponse, ApiWorker};
