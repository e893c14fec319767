//! Durable registry of local profiles and the active-profile caches

use super::types::{Config, PersonalInfo, Profile, DEFAULT_PROFILE_NAME};
use crate::storage::{LocalStore, LocalStoreExt, KEY_CONFIG, KEY_PERSONAL_INFO, KEY_PROFILES};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Working copies of the active profile's data
///
/// Forms edit these; committing writes them back into the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveCaches {
    pub config: Config,
    pub personal_info: PersonalInfo,
}

/// Registry of profiles plus the active selection
///
/// Every mutation persists the whole registry before returning. Storage
/// failures are logged by the store and never reach the caller.
pub struct ProfileStore {
    store: Arc<dyn LocalStore>,
    profiles: Vec<Profile>,
    active_id: Option<String>,
    caches: ActiveCaches,
}

impl ProfileStore {
    /// Load the registry and the last flattened active config/info
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let profiles: Vec<Profile> = store.load(KEY_PROFILES).unwrap_or_default();
        let caches = ActiveCaches {
            config: store.load(KEY_CONFIG).unwrap_or_default(),
            personal_info: store.load(KEY_PERSONAL_INFO).unwrap_or_default(),
        };
        info!("[PROFILES] Loaded {} profiles", profiles.len());

        Self {
            store,
            profiles,
            active_id: None,
            caches,
        }
    }

    /// Profiles in insertion order
    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Profile> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn caches(&self) -> &ActiveCaches {
        &self.caches
    }

    pub fn config(&self) -> &Config {
        &self.caches.config
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.caches.personal_info
    }

    /// Allocate an empty profile, append it and make it active
    pub fn create_profile(&mut self) -> Profile {
        let profile = Profile::new();
        self.profiles.push(profile.clone());
        self.active_id = Some(profile.id.clone());
        self.caches = ActiveCaches::default();
        self.persist_registry();
        self.persist_caches();
        info!("[PROFILES] Created profile {}", profile.id);
        profile
    }

    /// Make `id` active and load its data into the caches
    ///
    /// Unknown ids leave everything untouched.
    pub fn select_profile(&mut self, id: &str) -> Option<Profile> {
        let Some(profile) = self.get(id).cloned() else {
            warn!("[PROFILES] Select ignored, no profile {}", id);
            return None;
        };

        self.active_id = Some(profile.id.clone());
        self.caches = ActiveCaches {
            config: profile.config.clone(),
            personal_info: profile.personal_info.clone(),
        };
        self.persist_caches();
        debug!("[PROFILES] Selected {}", profile.id);
        Some(profile)
    }

    /// Remove a profile; clears the active selection when it was active
    pub fn delete_profile(&mut self, id: &str) -> Option<Profile> {
        let index = self.profiles.iter().position(|p| p.id == id)?;
        let removed = self.profiles.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
            info!("[PROFILES] Deleted the active profile {}", id);
        } else {
            info!("[PROFILES] Deleted profile {}", id);
        }
        self.persist_registry();
        Some(removed)
    }

    /// Write config and personal info into the active profile
    ///
    /// Returns false when there is no active profile.
    pub fn commit_active(&mut self, config: Config, personal_info: PersonalInfo) -> bool {
        let Some(active_id) = self.active_id.clone() else {
            debug!("[PROFILES] Commit skipped, no active profile");
            return false;
        };
        self.commit(&active_id, config, personal_info)
    }

    /// Store `config` into profile `id`
    ///
    /// The config cache follows only while `id` is the active profile.
    /// Returns false when the profile no longer exists.
    pub fn save_config(&mut self, id: &str, config: Config) -> bool {
        let Some(personal_info) = self.get(id).map(|p| p.personal_info.clone()) else {
            warn!("[PROFILES] Config save dropped, no profile {}", id);
            return false;
        };
        self.commit(id, config.clone(), personal_info);
        if self.active_id.as_deref() == Some(id) {
            self.caches.config = config;
            self.store.save(KEY_CONFIG, &self.caches.config);
        }
        true
    }

    /// Store `personal_info` into profile `id`
    ///
    /// The personal info cache follows only while `id` is the active profile.
    /// Returns false when the profile no longer exists.
    pub fn save_personal_info(&mut self, id: &str, personal_info: PersonalInfo) -> bool {
        let Some(config) = self.get(id).map(|p| p.config.clone()) else {
            warn!("[PROFILES] Personal info save dropped, no profile {}", id);
            return false;
        };
        self.commit(id, config, personal_info.clone());
        if self.active_id.as_deref() == Some(id) {
            self.caches.personal_info = personal_info;
            self.store.save(KEY_PERSONAL_INFO, &self.caches.personal_info);
        }
        true
    }

    fn commit(&mut self, id: &str, config: Config, personal_info: PersonalInfo) -> bool {
        let Some(profile) = self.profiles.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        profile.name = if personal_info.name.trim().is_empty() {
            DEFAULT_PROFILE_NAME.to_string()
        } else {
            personal_info.name.clone()
        };
        profile.config = config;
        profile.personal_info = personal_info;
        self.persist_registry();
        true
    }

    fn persist_registry(&self) {
        self.store.save(KEY_PROFILES, &self.profiles);
    }

    fn persist_caches(&self) {
        self.store.save(KEY_CONFIG, &self.caches.config);
        self.store.save(KEY_PERSONAL_INFO, &self.caches.personal_info);
    }
}
