use std::str::FromStr;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::crypto::{CredentialError, CredentialHash};

pub const APP_NAME: &str = "whisper";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the board is served on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Hash of the first passcode. The passcode itself is never stored.
    #[serde(default)]
    pub genesis_hash: Option<String>,
    /// Default log level for the daemon, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            genesis_hash: None,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }

    /// The configured genesis hash, checked for shape
    pub fn genesis(&self) -> Result<Option<CredentialHash>, StateError> {
        self.genesis_hash
            .as_deref()
            .map(CredentialHash::parse)
            .transpose()
            .map_err(StateError::InvalidGenesis)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the whisper directory (~/.whisper)
    pub whisper_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the whisper directory path (custom or default ~/.whisper)
    pub fn whisper_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new whisper state directory
    pub fn init(custom_path: Option<PathBuf>, config: AppConfig) -> Result<Self, StateError> {
        let whisper_dir = Self::whisper_dir(custom_path)?;

        if whisper_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }
        config.log_level()?;
        config.genesis()?;

        fs::create_dir_all(&whisper_dir)?;

        let config_path = whisper_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            whisper_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the whisper directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let whisper_dir = Self::whisper_dir(custom_path)?;

        if !whisper_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = whisper_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            whisper_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("whisper directory not initialized. Run 'whisper init' first")]
    NotInitialized,

    #[error("whisper directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid genesis hash: {0}")]
    InvalidGenesis(CredentialError),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("whisper");

        let config = AppConfig {
            genesis_hash: Some(CredentialHash::from_passcode("abc123").to_string()),
            ..AppConfig::default()
        };
        let state = AppState::init(Some(dir.clone()), config).unwrap();
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config.port, DEFAULT_PORT);
        assert_eq!(
            loaded.config.genesis().unwrap(),
            Some(CredentialHash::from_passcode("abc123"))
        );

        // the passcode never touches disk
        let raw = fs::read_to_string(dir.join(CONFIG_FILE_NAME)).unwrap();
        assert!(!raw.contains("abc123"));

        assert!(matches!(
            AppState::init(Some(dir), AppConfig::default()),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(tmp.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_init_rejects_bad_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            AppState::init(Some(tmp.path().join("a")), config),
            Err(StateError::InvalidLogLevel(_))
        ));

        let config = AppConfig {
            genesis_hash: Some("not a hash".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(
            AppState::init(Some(tmp.path().join("b")), config),
            Err(StateError::InvalidGenesis(_))
        ));
        assert!(!tmp.path().join("b").exists());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.genesis().unwrap(), None);
    }
}
