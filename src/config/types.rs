use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::AUTO;
use crate::preferences::DEFAULT_PREFERENCE_LENGTH;
use crate::resolver::{
    DEFAULT_KEY_SEPARATOR,
    ResolverOptions,
};
use crate::source::{
    DEFAULT_FILE_EXTENSION,
    DEFAULT_LANGUAGE_PATH,
    DirectorySource,
};

/// A single invalid settings field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "fileExtension")
    pub field_path: String,
    /// What is wrong and how to fix it
    pub message: String,
}

impl ValidationError {
    /// Error for the field at `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Failure to produce valid settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields failed validation
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The settings file could not be read
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The settings file is not valid JSON
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.locale-resolver.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverSettings {
    /// Directory holding `<locale>.<fileExtension>` data files.
    /// Relative paths are resolved against the configuration root.
    pub language_path: PathBuf,
    /// Extension of data files, without the leading dot.
    pub file_extension: String,

    /// Joins nested object keys of data files (e.g., `menu.open`).
    pub key_separator: String,

    /// Infer the locale from the client's preferred languages.
    pub automatic: bool,
    /// Locale requested at startup. `auto` defers to automatic mode.
    pub locale: String,

    /// Characters kept from each `Accept-Language` entry.
    pub preference_length: usize,
}

impl ResolverSettings {
    /// Check every field, collecting all problems.
    ///
    /// # Errors
    /// - Required field is empty
    /// - Preference length is zero
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.file_extension.is_empty() {
            errors.push(ValidationError::new(
                "fileExtension",
                "The extension cannot be empty. Example: \"json\"",
            ));
        } else if self.file_extension.starts_with('.') {
            errors.push(ValidationError::new(
                "fileExtension",
                format!(
                    "The extension must not start with a dot. Use \"{}\" instead",
                    self.file_extension.trim_start_matches('.')
                ),
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.locale.trim().is_empty() {
            errors.push(ValidationError::new(
                "locale",
                "The locale cannot be empty. Use \"auto\" to infer it from the client",
            ));
        }

        if self.preference_length == 0 {
            errors.push(ValidationError::new(
                "preferenceLength",
                "The length must be at least 1. Example: 2",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Data source described by these settings.
    #[must_use]
    pub fn directory_source(&self) -> DirectorySource {
        DirectorySource::new(&self.language_path, &self.file_extension)
    }

    /// Construction options described by these settings.
    #[must_use]
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            content: None,
            locale: Some(self.locale.clone()),
            automatic: Some(self.automatic),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            language_path: PathBuf::from(DEFAULT_LANGUAGE_PATH),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            automatic: true,
            locale: AUTO.to_string(),
            preference_length: DEFAULT_PREFERENCE_LENGTH,
        }
    }
}
