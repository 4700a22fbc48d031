//! TOML-based configuration for quill.
//!
//! Supports a config file (quill.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [executor]
//! path = "${QUILL_HOME}/bin/report-executor"
//! args = ["--profile", "dev"]
//! timeout_secs = 30
//!
//! [preview]
//! limit = 20
//!
//! [logging]
//! filter = "quill=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::preview::DEFAULT_PREVIEW_LIMIT;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Report executor process.
    pub executor: ExecutorSettings,

    /// Data preview.
    pub preview: PreviewSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

/// Executor process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Path to the executor binary (supports ${ENV_VAR} expansion).
    pub path: Option<String>,

    /// Extra command-line arguments.
    pub args: Vec<String>,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            timeout_secs: 30,
        }
    }
}

/// Preview configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Rows fetched per preview.
    pub limit: u64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `QUILL_CONFIG`
    /// 2. `./quill.toml`
    /// 3. `~/.config/quill/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("QUILL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("quill.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("quill").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.executor.timeout_secs == 0 {
            return Err(SettingsError::InvalidConfig(
                "executor.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.preview.limit == 0 {
            return Err(SettingsError::InvalidConfig(
                "preview.limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured executor path with environment variables expanded.
    ///
    /// Returns `None` when no path is set or it references an unset
    /// variable; the caller then searches conventional locations.
    pub fn executor_path(&self) -> Option<PathBuf> {
        let path = self.executor.path.as_deref()?;
        let expanded = expand_env_vars(path).ok()?;
        Some(PathBuf::from(expanded))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                name.push(ch);
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                name.push(ch);
                chars.next();
            }
            if name.is_empty() {
                // lone '$'
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
