//! Configuration for a REST Quest session.
//!
//! Settings come from an optional `restquest.json` in the working directory.
//! A missing file means defaults; a malformed one is an error. Command-line
//! flags are layered on top by the shell, which re-validates afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};
use crate::level::{Mode, Variant};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "restquest.json";

/// Default API base URL of the companion server.
fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

/// Default value for boolean options that default to true.
const fn default_true() -> bool {
    true
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL every request path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Tutorial rule set.
    #[serde(default)]
    pub variant: Variant,

    /// Difficulty mode to preselect. Only meaningful for `quest`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Whether requests carry the header the server uses to attribute
    /// progress.
    #[serde(default = "default_true")]
    pub track_progress_header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            variant: Variant::default(),
            mode: None,
            track_progress_header: default_true(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `restquest.json` exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            QuestError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `restquest.json` from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::ConfigParseError` if the file cannot be read or
    /// holds invalid JSON or enum values.
    ///
    /// Returns `QuestError::ConfigValidationError` if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(QuestError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| QuestError::config_parse(path, e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), variant = %config.variant, "Loaded config");
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `baseUrl` must be an `http://` or `https://` URL
    /// - `mode` may only be set for the `quest` variant
    ///
    /// # Errors
    ///
    /// Returns `QuestError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(QuestError::config_validation(
                "baseUrl must not be empty",
                "Set baseUrl to the API root, e.g. http://localhost:3000/api",
            ));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(QuestError::config_validation(
                format!("baseUrl '{base_url}' must start with http:// or https://"),
                "Set baseUrl to the API root, e.g. http://localhost:3000/api",
            ));
        }

        if self.mode.is_some() && !self.variant.supports_modes() {
            return Err(QuestError::config_validation(
                format!("mode is not available for the '{}' variant", self.variant),
                "Remove mode from your restquest.json or use the quest variant",
            ));
        }

        Ok(())
    }
}
