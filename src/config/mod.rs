//! Configuration for quill.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, ExecutorSettings, LoggingSettings, PreviewSettings, Settings, SettingsError,
};
