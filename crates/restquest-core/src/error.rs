//! Error types for REST Quest.
//!
//! Request outcomes never surface here: validation, transport and server
//! failures are rendered through a [`crate::DisplayRecord`]. This module
//! covers the process-level failures (configuration, command parsing,
//! navigation preconditions) that the shell reports to the learner.

use std::path::PathBuf;

/// A specialized `Result` type for REST Quest operations.
pub type Result<T> = std::result::Result<T, QuestError>;

/// Errors that can occur while setting up or driving a tutorial session.
///
/// Variants include actionable suggestions where possible.
#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your restquest.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// The tutorial variant requires a difficulty mode before starting.
    #[error("Please select a difficulty mode before starting\n\nSuggestion: Run 'mode beginner' or 'mode advanced' first")]
    ModeRequired,

    /// The variant has no difficulty modes to select.
    #[error("The '{variant}' tutorial has no difficulty modes\n\nSuggestion: Use 'start' directly, or run with --variant quest")]
    ModesUnsupported {
        /// Name of the active variant.
        variant: String,
    },

    /// The requested form is not offered on the current level.
    #[error("'{form}' is not available on level '{level}'\n\nSuggestion: Type 'show' to see the forms this level offers")]
    FormUnavailable {
        /// Endpoint label of the form.
        form: String,
        /// Identifier of the current level.
        level: String,
    },

    /// A learner command could not be understood.
    #[error("Unknown command '{input}'\n\nSuggestion: Type 'help' to list the available commands")]
    UnknownCommand {
        /// The raw command text.
        input: String,
    },

    /// A learner command was recognised but its arguments were malformed.
    #[error("Invalid arguments for '{command}': {message}")]
    InvalidArguments {
        /// The command name.
        command: String,
        /// What was wrong.
        message: String,
    },
}

impl QuestError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `ModesUnsupported` error.
    #[must_use]
    pub fn modes_unsupported(variant: impl std::fmt::Display) -> Self {
        Self::ModesUnsupported {
            variant: variant.to_string(),
        }
    }

    /// Creates a new `FormUnavailable` error.
    #[must_use]
    pub fn form_unavailable(form: impl Into<String>, level: impl Into<String>) -> Self {
        Self::FormUnavailable {
            form: form.into(),
            level: level.into(),
        }
    }

    /// Creates a new `UnknownCommand` error.
    #[must_use]
    pub fn unknown_command(input: impl Into<String>) -> Self {
        Self::UnknownCommand {
            input: input.into(),
        }
    }

    /// Creates a new `InvalidArguments` error.
    #[must_use]
    pub fn invalid_arguments(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error should abort startup.
    ///
    /// Everything else is reported at the prompt and the session continues.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. } | Self::ConfigValidationError { .. }
        )
    }
}
