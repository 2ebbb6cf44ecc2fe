//! Configuration file support for the triage workflow.
//!
//! Holds user preferences and the workflow tuning (progress simulation and
//! the tree state a session opens with). Native builds read the file from
//! the platform config directory, browser builds from localStorage.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXPANDED_ASSET, DEFAULT_PROGRESS_INTERVAL_MS, DEFAULT_PROGRESS_STEP,
    DEFAULT_SELECTED_ZONE, PROGRESS_COMPLETE,
};
use crate::model::AssetId;
use crate::state::Selection;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Convert to the level used by the browser console logger.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Workflow tuning
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

fn default_app_name() -> String {
    "Hull Triage".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Workflow section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Percentage added per simulated transfer tick (1..=100)
    #[serde(default = "default_progress_step")]
    pub progress_step: u8,

    /// Milliseconds between transfer ticks
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Ships expanded when a session opens
    #[serde(default = "default_initial_expanded")]
    pub initial_expanded: Vec<AssetId>,

    /// Zone selected when a session opens; `null` opens with no selection
    #[serde(default = "default_initial_selection")]
    pub initial_selection: Option<Selection>,
}

fn default_progress_step() -> u8 {
    DEFAULT_PROGRESS_STEP
}

fn default_progress_interval_ms() -> u64 {
    DEFAULT_PROGRESS_INTERVAL_MS
}

fn default_initial_expanded() -> Vec<AssetId> {
    vec![AssetId::new(DEFAULT_EXPANDED_ASSET)]
}

fn default_initial_selection() -> Option<Selection> {
    let (asset, zone) = DEFAULT_SELECTED_ZONE;
    Some(Selection::new(asset, zone))
}

impl WorkflowConfig {
    /// A workflow that opens with nothing expanded or selected.
    pub fn empty() -> Self {
        Self {
            initial_expanded: Vec::new(),
            initial_selection: None,
            ..Self::default()
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            progress_step: default_progress_step(),
            progress_interval_ms: default_progress_interval_ms(),
            initial_expanded: default_initial_expanded(),
            initial_selection: default_initial_selection(),
        }
    }
}

impl TriageConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            workflow: WorkflowConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        let step = config.workflow.progress_step;
        if step == 0 || step > PROGRESS_COMPLETE {
            return Err(ConfigError::InvalidValue {
                field: "workflow.progress_step",
                message: format!("{} is outside 1..={}", step, PROGRESS_COMPLETE),
            });
        }
        if config.workflow.progress_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workflow.progress_interval_ms",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "hull-triage-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("hull-triage").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("hull-triage")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "hull-triage-config";

    /// Try to load configuration from localStorage (WASM only).
    /// Returns None if not found or can't be parsed.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }

    /// Load from the platform's persistent store, falling back to defaults.
    pub fn load_or_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let loaded = Self::load_from_default_path();
        #[cfg(target_arch = "wasm32")]
        let loaded = Self::load_from_local_storage();

        loaded.unwrap_or_default()
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is outside its accepted range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TriageConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.workflow.progress_step, 10);
        assert_eq!(config.workflow.progress_interval(), Duration::from_millis(200));
        assert_eq!(
            config.workflow.initial_selection,
            Some(Selection::new("ship-4", "t5"))
        );
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = TriageConfig::default();
        config.preferences.log_level = LogLevel::Debug;
        config.workflow = WorkflowConfig::empty();

        let json = config.to_json().unwrap();
        assert_eq!(TriageConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TriageConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config.app_name, "Hull Triage");
        assert_eq!(config.workflow, WorkflowConfig::default());
        assert_eq!(config.preferences.log_level, LogLevel::Info);
    }

    #[test]
    fn test_null_selection_opens_empty() {
        let json = r#"{"version": 1, "workflow": {"initial_selection": null}}"#;
        let config = TriageConfig::from_json(json).unwrap();
        assert_eq!(config.workflow.initial_selection, None);
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            TriageConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_invalid_progress_step() {
        for step in [0, 101] {
            let json = format!(r#"{{"version": 1, "workflow": {{"progress_step": {step}}}}}"#);
            assert!(matches!(
                TriageConfig::from_json(&json),
                Err(ConfigError::InvalidValue {
                    field: "workflow.progress_step",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level(), log::Level::Trace);
    }
}
