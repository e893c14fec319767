//! Client settings loaded from TOML
//!
//! Lookup order: `--config <path>`, then `BRAILLAI_CONFIG`, then
//! `<data_dir>/braillai/settings.toml`. A missing file means defaults.

use crate::protocol::ReconnectPolicy;
use crate::{BraillError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "BRAILLAI_CONFIG";
const APP_DIR: &str = "braillai";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the dashboard HTTP API
    pub server_url: String,

    /// WebSocket endpoint of the realtime channel
    pub socket_url: String,

    pub request_timeout_ms: u64,
    pub reconnect_base_ms: u64,
    pub reconnect_max_ms: u64,

    /// Where local profiles and contacts are kept
    pub data_dir: Option<PathBuf>,

    /// External synthesizer for spoken feedback; log-only when unset
    pub speech_command: Option<String>,
    pub speech_args: Vec<String>,

    /// Run against in-memory backends only
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            socket_url: "ws://127.0.0.1:5000/ws".to_string(),
            request_timeout_ms: 10_000,
            reconnect_base_ms: 500,
            reconnect_max_ms: 30_000,
            data_dir: None,
            speech_command: None,
            speech_args: Vec::new(),
            offline: false,
        }
    }
}

impl Settings {
    /// Load and validate a settings file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BraillError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|e| {
            BraillError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        settings.validate()?;
        info!("[SETTINGS] Loaded {}", path.display());
        Ok(settings)
    }

    /// Resolve the settings path and load it, falling back to defaults when
    /// no file exists there
    pub fn discover(cli_path: Option<PathBuf>) -> Result<Self> {
        let explicit = cli_path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match explicit {
            // An explicitly named file must exist
            Some(path) => Self::load(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::load(path),
                _ => {
                    debug!("[SETTINGS] No settings file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(BraillError::Config(format!(
                "server_url must be http(s): {}",
                self.server_url
            )));
        }
        if !self.socket_url.starts_with("ws://") && !self.socket_url.starts_with("wss://") {
            return Err(BraillError::Config(format!(
                "socket_url must be ws(s): {}",
                self.socket_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(BraillError::Config(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        if self.reconnect_base_ms == 0 || self.reconnect_base_ms > self.reconnect_max_ms {
            return Err(BraillError::Config(format!(
                "reconnect delays must satisfy 0 < base ({}) <= max ({})",
                self.reconnect_base_ms, self.reconnect_max_ms
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base: Duration::from_millis(self.reconnect_base_ms),
            max: Duration::from_millis(self.reconnect_max_ms),
        }
    }

    /// Directory for local state
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_speech_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.speech_command = Some(program.into());
        self.speech_args = args;
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }
}

/// `<data_dir>/braillai/settings.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = \"https://assist.local\"").unwrap();
        writeln!(file, "offline = true").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.server_url, "https://assist.local");
        assert!(settings.offline);
        assert_eq!(settings.socket_url, Settings::default().socket_url);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Settings::default()
            .with_server_url("ftp://nope")
            .validate()
            .is_err());
        assert!(Settings::default()
            .with_socket_url("http://wrong-scheme")
            .validate()
            .is_err());

        let mut settings = Settings::default();
        settings.reconnect_base_ms = 60_000;
        assert!(matches!(settings.validate(), Err(BraillError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::discover(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(BraillError::Config(_))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = [").unwrap();
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_builders() {
        let settings = Settings::default()
            .with_data_dir("/tmp/braillai-test")
            .with_speech_command("espeak-ng", vec!["-s".into(), "150".into()])
            .offline();
        assert_eq!(settings.store_dir(), PathBuf::from("/tmp/braillai-test"));
        assert_eq!(settings.speech_command.as_deref(), Some("espeak-ng"));
        assert!(settings.offline);
    }
}
