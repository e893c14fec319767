use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder display name for profiles without a personal name
pub const DEFAULT_PROFILE_NAME: &str = "User";

/// Assistant credentials owned by a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub gemini_key: String,
    pub device_runner_key: String,
    pub device_id: String,
}

impl Config {
    pub fn new(
        gemini_key: impl Into<String>,
        device_runner_key: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            gemini_key: gemini_key.into(),
            device_runner_key: device_runner_key.into(),
            device_id: device_id.into(),
        }
    }

    /// All keys the assistant cannot start without are present
    pub fn has_required_keys(&self) -> bool {
        !self.gemini_key.trim().is_empty()
    }
}

/// Personal and emergency details owned by a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub date_of_birth: String,
    pub blood_type: String,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
}

impl PersonalInfo {
    /// Enough information to route past the personal-info form
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// First word of the name, used in greetings
    pub fn first_name(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }
}

/// A named bundle of config and personal info for one user of the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub personal_info: PersonalInfo,
}

impl Profile {
    /// Empty profile with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: format!("profile_{}", Uuid::new_v4().simple()),
            name: String::new(),
            config: Config::default(),
            personal_info: PersonalInfo::default(),
        }
    }

    /// Name shown on profile cards
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_PROFILE_NAME
        } else {
            &self.name
        }
    }

    /// Avatar letter shown on profile cards
    pub fn initial(&self) -> char {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('U')
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_required_keys() {
        assert!(!Config::default().has_required_keys());
        assert!(!Config::new("   ", "runner", "device").has_required_keys());
        assert!(Config::new("gemini", "", "").has_required_keys());
    }

    #[test]
    fn test_profile_ids_are_unique() {
        let a = Profile::new();
        let b = Profile::new();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("profile_"));
    }

    #[test]
    fn test_display_name_and_initial() {
        let mut profile = Profile::new();
        assert_eq!(profile.display_name(), "User");
        assert_eq!(profile.initial(), 'U');

        profile.name = "ada lovelace".to_string();
        assert_eq!(profile.display_name(), "ada lovelace");
        assert_eq!(profile.initial(), 'A');
    }

    #[test]
    fn test_config_wire_names() {
        let json = serde_json::to_value(Config::new("g", "r", "d")).unwrap();
        assert_eq!(json["geminiKey"], "g");
        assert_eq!(json["deviceRunnerKey"], "r");
        assert_eq!(json["deviceId"], "d");
    }

    #[test]
    fn test_partial_documents_decode() {
        let info: PersonalInfo = serde_json::from_str(r#"{"name":"Ravi"}"#).unwrap();
        assert_eq!(info.first_name(), Some("Ravi"));
        assert!(info.blood_type.is_empty());
    }
}
