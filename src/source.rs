//! Per-locale data sources

use std::fmt::Debug;
use std::path::{
    Path,
    PathBuf,
};

use jsonc_parser::ParseOptions;
use serde_json::Value;

use crate::content::{
    Messages,
    into_messages,
};
use crate::error::LoadError;

/// Base directory scanned for per-locale data files.
pub const DEFAULT_LANGUAGE_PATH: &str = "languages";

/// Extension of per-locale data files.
pub const DEFAULT_FILE_EXTENSION: &str = "json";

/// External data source consulted for locales missing from the translation table.
pub trait TranslationSource: Debug {
    /// Whether data for `locale` exists and is accessible.
    ///
    /// Must not load or cache anything.
    fn exists(&self, locale: &str) -> bool;

    /// Load the messages for `locale`.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the data cannot be read or is not a mapping.
    fn load(&self, locale: &str, separator: &str) -> Result<Messages, LoadError>;
}

/// Data source reading `<base>/<locale>.<extension>` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    /// Directory holding the data files
    base: PathBuf,
    /// File extension without the leading dot
    extension: String,
}

impl DirectorySource {
    /// Source reading `<base>/<locale>.<extension>`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self { base: base.into(), extension: extension.into() }
    }

    /// Conventional file path for `locale`.
    #[must_use]
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.base.join(format!("{locale}.{}", self.extension))
    }

    /// Directory holding the data files.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl Default for DirectorySource {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE_PATH, DEFAULT_FILE_EXTENSION)
    }
}

impl TranslationSource for DirectorySource {
    fn exists(&self, locale: &str) -> bool {
        // Reject identifiers that would escape the base directory.
        if locale.is_empty() || locale.contains(['/', '\\']) || locale.starts_with('.') {
            return false;
        }
        self.path_for(locale).is_file()
    }

    fn load(&self, locale: &str, separator: &str) -> Result<Messages, LoadError> {
        load_file(&self.path_for(locale), locale, separator)
    }
}

/// Load a data file and convert it into messages.
///
/// Comments and trailing commas are accepted.
///
/// # Errors
/// - file read error
/// - parse error
/// - content that is not an object
pub fn load_file(path: &Path, locale: &str, separator: &str) -> Result<Messages, LoadError> {
    tracing::debug!(locale, path = %path.display(), "Loading translation data");

    let text = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let value = jsonc_parser::parse_to_serde_value(&text, &ParseOptions::default())
        .map_err(|e| LoadError::Parse { path: path.to_path_buf(), message: e.to_string() })?
        .unwrap_or(Value::Null);

    into_messages(&value, locale, separator)
}
