//! Client language preferences
//!
//! The resolver only consumes an ordered list of short language codes; how
//! that list is obtained is up to the host. `AcceptLanguage` parses a raw
//! header value and `CgiEnvironment` reads it from the process environment.

use std::fmt::Debug;

use crate::locale::AUTO;

/// Number of characters kept from each header entry.
pub const DEFAULT_PREFERENCE_LENGTH: usize = 2;

/// Environment variable carrying the request's `Accept-Language` header.
pub const ACCEPT_LANGUAGE_ENV: &str = "HTTP_ACCEPT_LANGUAGE";

/// Supplies the client's preferred languages, most preferred first.
pub trait LanguagePreferences: Debug {
    /// Ordered language codes, without duplicates or `auto`.
    fn preferred_languages(&self) -> Vec<String>;
}

/// A fixed, already-normalized preference list.
impl LanguagePreferences for Vec<String> {
    fn preferred_languages(&self) -> Vec<String> {
        self.clone()
    }
}

/// Parsed `Accept-Language` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptLanguage {
    /// Lowercased language codes in header order
    languages: Vec<String>,
}

impl AcceptLanguage {
    /// Parse a header value.
    ///
    /// Entries are split on `,`, quality parameters are dropped and each
    /// entry is cut to `length` characters and lowercased. Empty entries and
    /// `auto` are removed; duplicates keep their first position.
    ///
    /// # Examples
    /// ```
    /// use locale_resolver::AcceptLanguage;
    ///
    /// let header = AcceptLanguage::parse("fr-CH, fr;q=0.9, en;q=0.8, de;q=0.7", 2);
    /// assert_eq!(header.languages(), ["fr", "en", "de"]);
    /// ```
    #[must_use]
    pub fn parse(header: &str, length: usize) -> Self {
        let mut languages: Vec<String> = Vec::new();

        for entry in header.split(',') {
            let tag = entry.split(';').next().unwrap_or_default().trim();
            let short = tag.chars().take(length).collect::<String>().to_lowercase();
            if short.is_empty() || short == AUTO || languages.contains(&short) {
                continue;
            }
            languages.push(short);
        }

        Self { languages }
    }

    /// Parsed language codes, most preferred first.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

impl LanguagePreferences for AcceptLanguage {
    fn preferred_languages(&self) -> Vec<String> {
        self.languages.clone()
    }
}

/// Reads an `Accept-Language` value from the process environment on every call.
///
/// The variable defaults to `HTTP_ACCEPT_LANGUAGE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiEnvironment {
    /// Environment variable holding the header value
    variable: String,
    /// Characters kept from each entry
    length: usize,
}

impl CgiEnvironment {
    /// Provider reading `HTTP_ACCEPT_LANGUAGE`.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self::with_variable(ACCEPT_LANGUAGE_ENV, length)
    }

    /// Provider reading the header value from `variable`.
    #[must_use]
    pub fn with_variable(variable: impl Into<String>, length: usize) -> Self {
        Self { variable: variable.into(), length }
    }

    /// Name of the environment variable consulted.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Default for CgiEnvironment {
    fn default() -> Self {
        Self::new(DEFAULT_PREFERENCE_LENGTH)
    }
}

impl LanguagePreferences for CgiEnvironment {
    fn preferred_languages(&self) -> Vec<String> {
        std::env::var(&self.variable).map_or_else(
            |_| {
                tracing::trace!("{} is not set", self.variable);
                Vec::new()
            },
            |header| AcceptLanguage::parse(&header, self.length).languages,
        )
    }
}
