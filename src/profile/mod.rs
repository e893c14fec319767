//! Local user profiles
//!
//! A profile bundles assistant credentials with personal/emergency details
//! for one user of a shared device.

pub mod store;
pub mod types;

pub use store::{ActiveCaches, ProfileStore};
pub use types::{Config, PersonalInfo, Profile, DEFAULT_PROFILE_NAME};
