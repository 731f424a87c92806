//! Locale resolution and message lookup

use std::collections::{
    BTreeSet,
    HashMap,
};

use crate::content::{
    Messages,
    TranslationContent,
};
use crate::error::LoadError;
use crate::locale::{
    AUTO,
    is_concrete,
    normalize_locale,
};
use crate::preferences::{
    CgiEnvironment,
    LanguagePreferences,
};
use crate::source::{
    DirectorySource,
    TranslationSource,
    load_file,
};

/// Default separator joining nested keys of loaded data.
pub const DEFAULT_KEY_SEPARATOR: &str = ".";

/// Whether a resolution call runs on behalf of automatic detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Requested by the caller or a fallback to the buffered locale
    Explicit,
    /// Trying one of the client's preferred languages
    Candidate,
}

/// Options applied when constructing a [`LocaleResolver`].
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Initial translation entry, registered for `locale`.
    pub content: Option<TranslationContent>,
    /// Initial requested locale. `auto` when unset.
    pub locale: Option<String>,
    /// Initial automatic mode. Stays on when unset.
    pub automatic: Option<bool>,
}

/// Mutable resolution state, always updated as one unit.
#[derive(Debug, Clone)]
struct ResolverState {
    /// Infer the locale from client preferences when `auto` is requested
    automatic: bool,
    /// Last explicitly requested concrete locale
    preferred_locale: Option<String>,
    /// Currently resolved locale
    active_locale: String,
    /// Messages of `active_locale`
    active_content: Option<Messages>,
}

impl Default for ResolverState {
    fn default() -> Self {
        Self {
            automatic: true,
            preferred_locale: None,
            active_locale: AUTO.to_string(),
            active_content: None,
        }
    }
}

/// Resolves the active locale and translates message keys.
///
/// The locale is either set explicitly or, in automatic mode, inferred from
/// the client's preferred languages. Translation content comes from the
/// in-memory table or, failing that, from the [`TranslationSource`].
#[derive(Debug)]
pub struct LocaleResolver {
    /// Locale to content table. Entries are replaced, never removed.
    translations: HashMap<String, TranslationContent>,
    /// Active locale, its content and the mode flags
    state: ResolverState,
    /// Fallback for locales missing from `translations`
    source: Box<dyn TranslationSource>,
    /// Client languages tried in automatic mode
    preferences: Box<dyn LanguagePreferences>,
    /// Joins nested keys of loaded data
    key_separator: String,
}

impl LocaleResolver {
    /// Create a resolver with the given collaborators and options.
    ///
    /// The initial translation is registered first, then automatic mode is
    /// applied, then the initial locale is resolved.
    ///
    /// # Errors
    /// Returns [`LoadError`] when resolving the initial locale hits a corrupt
    /// data source.
    pub fn new(
        options: ResolverOptions,
        source: Box<dyn TranslationSource>,
        preferences: Box<dyn LanguagePreferences>,
    ) -> Result<Self, LoadError> {
        Self::with_key_separator(options, source, preferences, DEFAULT_KEY_SEPARATOR)
    }

    /// Same as [`LocaleResolver::new`] with a custom separator for nested keys.
    ///
    /// # Errors
    /// Returns [`LoadError`] when resolving the initial locale fails hard.
    pub fn with_key_separator(
        options: ResolverOptions,
        source: Box<dyn TranslationSource>,
        preferences: Box<dyn LanguagePreferences>,
        key_separator: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let mut resolver = Self {
            translations: HashMap::new(),
            state: ResolverState::default(),
            source,
            preferences,
            key_separator: key_separator.into(),
        };

        let ResolverOptions { content, locale, automatic } = options;

        if let (Some(content), Some(locale)) = (content, locale.as_deref()) {
            resolver.add_translation(locale, content);
        }

        if let Some(automatic) = automatic {
            resolver.set_automatic(automatic)?;
        }

        let requested = locale.unwrap_or_else(|| AUTO.to_string());
        if !resolver.set_locale(&requested)? {
            tracing::debug!(requested = %requested, "Initial locale could not be resolved");
        }

        Ok(resolver)
    }

    /// Resolver backed by the `languages/` directory and the CGI environment.
    ///
    /// # Errors
    /// Returns [`LoadError`] when resolving the initial locale fails hard.
    pub fn from_options(options: ResolverOptions) -> Result<Self, LoadError> {
        Self::new(options, Box::new(DirectorySource::default()), Box::new(CgiEnvironment::default()))
    }

    /// Register content for `locale`, replacing any existing entry.
    ///
    /// Returns `false` when the locale or the content is empty. The active
    /// locale is not affected.
    pub fn add_translation(&mut self, locale: &str, content: impl Into<TranslationContent>) -> bool {
        let locale = normalize_locale(locale);
        let content = content.into();

        if locale.is_empty() || content.is_empty() {
            tracing::debug!(locale = %locale, "Rejected empty translation entry");
            return false;
        }

        tracing::debug!(locale = %locale, "Adding translation");
        self.translations.insert(locale, content);
        true
    }

    /// Locales with non-empty content, or `None` when there are none.
    #[must_use]
    pub fn get_list(&self) -> Option<BTreeSet<String>> {
        let list: BTreeSet<String> = self
            .translations
            .iter()
            .filter(|(_, content)| !content.is_empty())
            .map(|(locale, _)| locale.clone())
            .collect();

        if list.is_empty() { None } else { Some(list) }
    }

    /// The active locale, `auto` until a resolution succeeds.
    #[must_use]
    pub fn get_locale(&self) -> &str {
        &self.state.active_locale
    }

    /// Whether `auto` is inferred from client preferences.
    #[must_use]
    pub const fn is_automatic(&self) -> bool {
        self.state.automatic
    }

    /// Last explicitly requested concrete locale.
    #[must_use]
    pub fn preferred_locale(&self) -> Option<&str> {
        self.state.preferred_locale.as_deref()
    }

    /// Messages of the active locale.
    #[must_use]
    pub const fn active_messages(&self) -> Option<&Messages> {
        self.state.active_content.as_ref()
    }

    /// Whether `locale` is in the table or provided by the data source.
    ///
    /// Nothing is loaded.
    #[must_use]
    pub fn is_available(&self, locale: &str) -> bool {
        let locale = normalize_locale(locale);
        self.translations.contains_key(&locale) || self.source.exists(&locale)
    }

    /// Switch automatic mode and re-resolve `auto` under the new mode.
    ///
    /// Returns the outcome of the re-resolution.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the re-resolved locale fails to load.
    pub fn set_automatic(&mut self, automatic: bool) -> Result<bool, LoadError> {
        tracing::debug!(automatic, "Setting automatic mode");
        self.state.automatic = automatic;
        self.set_locale(AUTO)
    }

    /// Resolve and activate a locale.
    ///
    /// A concrete locale is remembered as the preferred locale whether or
    /// not it resolves. `Ok(false)` leaves the active locale untouched.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the selected locale's data is not a mapping
    /// or cannot be read.
    pub fn set_locale(&mut self, locale: &str) -> Result<bool, LoadError> {
        self.resolve(locale, Pass::Explicit)
    }

    /// Resolution state machine shared by explicit calls and candidate attempts.
    fn resolve(&mut self, requested: &str, pass: Pass) -> Result<bool, LoadError> {
        let locale = normalize_locale(requested);
        let concrete = is_concrete(&locale);

        if pass == Pass::Explicit && concrete {
            tracing::trace!(locale = %locale, "Buffering preferred locale");
            self.state.preferred_locale = Some(locale.clone());
        }

        if !self.state.automatic
            && !concrete
            && let Some(preferred) = self.state.preferred_locale.clone()
        {
            tracing::debug!(preferred = %preferred, "Falling back to preferred locale");
            return self.resolve(&preferred, Pass::Explicit);
        }

        if (!self.state.automatic || pass == Pass::Candidate)
            && concrete
            && self.is_available(&locale)
        {
            return self.activate(locale).map(|()| true);
        }

        if pass == Pass::Candidate || !self.state.automatic {
            return Ok(false);
        }

        for candidate in self.preferences.preferred_languages() {
            tracing::trace!(candidate = %candidate, "Trying client language");
            if self.resolve(&candidate, Pass::Candidate)? {
                return Ok(true);
            }
        }

        // None of the client languages matched; the requested locale itself
        // may still be available.
        if self.resolve(&locale, Pass::Candidate)? {
            tracing::debug!(locale = %locale, "Activated requested locale after client languages");
        }

        Ok(false)
    }

    /// Load the content of `locale` and make it active.
    fn activate(&mut self, locale: String) -> Result<(), LoadError> {
        let messages = self.load_translation_data(&locale)?;
        tracing::debug!(locale = %locale, keys = messages.len(), "Locale activated");
        self.state.active_locale = locale;
        self.state.active_content = Some(messages);
        Ok(())
    }

    /// Resolve the content of `locale` from the table or the data source.
    fn load_translation_data(&self, locale: &str) -> Result<Messages, LoadError> {
        let loaded = match self.translations.get(locale) {
            Some(TranslationContent::Messages(messages)) => Ok(messages.clone()),
            Some(TranslationContent::File(path)) => load_file(path, locale, &self.key_separator),
            None => self.source.load(locale, &self.key_separator),
        };
        loaded.inspect_err(|e| tracing::warn!(locale, "Failed to load translation data: {e}"))
    }

    /// Translate `key`, or return it unchanged when there is no translation.
    #[must_use]
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.state
            .active_content
            .as_ref()
            .and_then(|messages| messages.get(key))
            .map_or(key, String::as_str)
    }

    /// Shorthand for [`LocaleResolver::translate`].
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translate(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// In-memory data source that records what was loaded.
    #[derive(Debug, Default)]
    struct FakeSource {
        data: HashMap<String, serde_json::Value>,
        loads: Rc<RefCell<Vec<String>>>,
    }

    impl FakeSource {
        fn with(mut self, locale: &str, value: serde_json::Value) -> Self {
            self.data.insert(locale.to_string(), value);
            self
        }
    }

    impl TranslationSource for FakeSource {
        fn exists(&self, locale: &str) -> bool {
            self.data.contains_key(locale)
        }

        fn load(&self, locale: &str, separator: &str) -> std::result::Result<Messages, LoadError> {
            self.loads.borrow_mut().push(locale.to_string());
            let value = self.data.get(locale).cloned().unwrap_or_default();
            crate::content::into_messages(&value, locale, separator)
        }
    }

    fn prefs(languages: &[&str]) -> Box<dyn LanguagePreferences> {
        Box::new(languages.iter().map(ToString::to_string).collect::<Vec<_>>())
    }

    fn resolver(
        options: ResolverOptions,
        source: FakeSource,
        languages: &[&str],
    ) -> LocaleResolver {
        LocaleResolver::new(options, Box::new(source), prefs(languages)).unwrap()
    }

    fn manual() -> ResolverOptions {
        ResolverOptions { automatic: Some(false), ..ResolverOptions::default() }
    }

    #[googletest::test]
    fn starts_on_auto_without_resolution() {
        let resolver = resolver(ResolverOptions::default(), FakeSource::default(), &[]);

        expect_that!(resolver.get_locale(), eq("auto"));
        expect_that!(resolver.is_automatic(), eq(true));
        expect_that!(resolver.active_messages(), none());
    }

    #[googletest::test]
    fn initial_content_is_registered_and_activated() {
        let options = ResolverOptions {
            content: Some(TranslationContent::from([("hello", "Hola")])),
            locale: Some("ES".to_string()),
            automatic: Some(false),
        };

        let resolver = resolver(options, FakeSource::default(), &[]);

        expect_that!(resolver.get_locale(), eq("es"));
        expect_that!(resolver.translate("hello"), eq("Hola"));
        expect_that!(resolver.preferred_locale(), some(eq("es")));
    }

    #[rstest]
    #[case::empty_locale("  ", TranslationContent::from([("hello", "Hi")]))]
    #[case::empty_content("en", TranslationContent::Messages(Messages::new()))]
    fn add_translation_rejects_empty_arguments(
        #[case] locale: &str,
        #[case] content: TranslationContent,
    ) {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);

        assert!(!resolver.add_translation(locale, content));
        assert!(resolver.get_list().is_none());
    }

    #[googletest::test]
    fn add_translation_normalizes_and_lists_locale() {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);

        expect_that!(resolver.add_translation("EN ", [("hello", "Hi")]), eq(true));
        expect_that!(resolver.is_available("en"), eq(true));
        assert_eq!(resolver.get_list(), Some(BTreeSet::from(["en".to_string()])));
        expect_that!(resolver.get_locale(), eq("auto"));
    }

    #[googletest::test]
    fn add_translation_replaces_existing_entry() {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);
        resolver.add_translation("en", [("hello", "Hi")]);
        resolver.add_translation("en", [("hello", "Hello")]);

        resolver.set_locale("en").unwrap();

        expect_that!(resolver.translate("hello"), eq("Hello"));
        expect_that!(resolver.get_list().map(|list| list.len()), some(eq(1)));
    }

    #[googletest::test]
    fn get_list_is_none_without_entries() {
        let resolver = resolver(manual(), FakeSource::default().with("en", serde_json::json!({})), &[]);

        expect_that!(resolver.get_list(), none());
    }

    #[googletest::test]
    fn is_available_consults_source_without_loading() {
        let source = FakeSource::default().with("fr", serde_json::json!({"hello": "Salut"}));
        let loads = Rc::clone(&source.loads);
        let resolver = resolver(manual(), source, &[]);

        expect_that!(resolver.is_available(" FR"), eq(true));
        expect_that!(resolver.is_available("xx"), eq(false));
        expect_that!(loads.borrow().len(), eq(0));
    }

    #[googletest::test]
    fn unknown_locale_keeps_previous_locale() {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);
        resolver.add_translation("en", [("hello", "Hi")]);
        resolver.set_locale("en").unwrap();

        let result = resolver.set_locale("xx").unwrap();

        expect_that!(result, eq(false));
        expect_that!(resolver.get_locale(), eq("en"));
        expect_that!(resolver.translate("hello"), eq("Hi"));
        expect_that!(resolver.preferred_locale(), some(eq("xx")));
    }

    #[rstest]
    #[case::missing_key("greeting")]
    #[case::empty_key("")]
    #[case::different_case("HELLO")]
    fn translate_echoes_unknown_keys(#[case] key: &str) {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);
        resolver.add_translation("en", [("hello", "Hi")]);
        resolver.set_locale("en").unwrap();

        assert_eq!(resolver.translate(key), key);
        assert_eq!(resolver.t(key), key);
    }

    #[googletest::test]
    fn automatic_mode_picks_first_available_preference() {
        let source = FakeSource::default().with("en", serde_json::json!({"hello": "Hi"}));
        let mut resolver = resolver(ResolverOptions::default(), source, &["fr", "en"]);

        expect_that!(resolver.get_locale(), eq("en"));
        expect_that!(resolver.set_locale("auto").unwrap(), eq(true));
        expect_that!(resolver.get_locale(), eq("en"));
        expect_that!(resolver.t("hello"), eq("Hi"));
    }

    #[googletest::test]
    fn automatic_mode_prefers_client_language_over_explicit_request() {
        let mut resolver = resolver(ResolverOptions::default(), FakeSource::default(), &["de"]);
        resolver.add_translation("de", [("hello", "Hallo")]);
        resolver.add_translation("en", [("hello", "Hi")]);

        let result = resolver.set_locale("en").unwrap();

        expect_that!(result, eq(true));
        expect_that!(resolver.get_locale(), eq("de"));
        expect_that!(resolver.preferred_locale(), some(eq("en")));
    }

    #[googletest::test]
    fn automatic_mode_falls_back_to_requested_locale() {
        let mut resolver = resolver(ResolverOptions::default(), FakeSource::default(), &["fr"]);
        resolver.add_translation("en", [("hello", "Hi")]);

        let result = resolver.set_locale("en").unwrap();

        expect_that!(result, eq(false));
        expect_that!(resolver.get_locale(), eq("en"));
    }

    #[googletest::test]
    fn automatic_mode_without_preferences_terminates() {
        let mut resolver = resolver(ResolverOptions::default(), FakeSource::default(), &[]);

        expect_that!(resolver.set_locale("auto").unwrap(), eq(false));
        expect_that!(resolver.get_locale(), eq("auto"));
    }

    #[googletest::test]
    fn disabling_automatic_restores_buffered_locale() {
        let source = FakeSource::default().with("en", serde_json::json!({"hello": "Hi"}));
        let mut resolver = resolver(ResolverOptions::default(), source, &["en"]);
        resolver.add_translation("de", [("hello", "Hallo")]);

        resolver.set_automatic(false).unwrap();
        expect_that!(resolver.set_locale("de").unwrap(), eq(true));
        expect_that!(resolver.preferred_locale(), some(eq("de")));

        resolver.set_automatic(true).unwrap();
        expect_that!(resolver.get_locale(), eq("en"));

        expect_that!(resolver.set_automatic(false).unwrap(), eq(true));
        expect_that!(resolver.get_locale(), eq("de"));
        expect_that!(resolver.set_locale("auto").unwrap(), eq(true));
        expect_that!(resolver.get_locale(), eq("de"));
        expect_that!(resolver.t("hello"), eq("Hallo"));
    }

    #[googletest::test]
    fn auto_without_buffer_in_manual_mode_fails() {
        let mut resolver = resolver(manual(), FakeSource::default(), &["en"]);
        resolver.add_translation("en", [("hello", "Hi")]);

        expect_that!(resolver.set_locale("auto").unwrap(), eq(false));
        expect_that!(resolver.get_locale(), eq("auto"));
    }

    #[googletest::test]
    fn source_is_loaded_once_per_activation() {
        let source = FakeSource::default().with("fr", serde_json::json!({"hello": "Salut"}));
        let loads = Rc::clone(&source.loads);
        let mut resolver = resolver(manual(), source, &[]);

        resolver.set_locale("fr").unwrap();
        resolver.set_locale("fr").unwrap();

        assert_eq!(*loads.borrow(), vec!["fr".to_string(), "fr".to_string()]);
        expect_that!(resolver.translate("hello"), eq("Salut"));
    }

    #[googletest::test]
    fn non_mapping_source_raises_load_error() {
        let source = FakeSource::default().with("en", serde_json::json!("not a mapping"));
        let mut resolver = resolver(manual(), source, &[]);

        let result = resolver.set_locale("en");

        assert!(matches!(result, Err(LoadError::NotAMapping { ref locale }) if locale == "en"));
        expect_that!(resolver.get_locale(), eq("auto"));
        expect_that!(resolver.active_messages(), none());
    }

    fn corrupt_first_preference() -> LocaleResolver {
        let source = FakeSource::default().with("fr", serde_json::json!("not a mapping"));
        let mut resolver = resolver(manual(), source, &["fr", "en"]);
        resolver.add_translation("en", [("hello", "Hi")]);
        resolver
    }

    #[googletest::test]
    fn enabling_automatic_propagates_client_language_load_error() {
        let mut resolver = corrupt_first_preference();

        let result = resolver.set_automatic(true);

        assert!(matches!(result, Err(LoadError::NotAMapping { ref locale }) if locale == "fr"));
        expect_that!(resolver.get_locale(), eq("auto"));
        expect_that!(resolver.active_messages(), none());
    }

    #[googletest::test]
    fn auto_request_propagates_client_language_load_error() {
        let mut resolver = corrupt_first_preference();
        resolver.state.automatic = true;

        let result = resolver.set_locale("auto");

        assert!(matches!(result, Err(LoadError::NotAMapping { ref locale }) if locale == "fr"));
        expect_that!(resolver.get_locale(), eq("auto"));
        expect_that!(resolver.active_messages(), none());
    }

    #[googletest::test]
    fn missing_referenced_file_raises_load_error() {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);
        resolver.add_translation("en", std::path::PathBuf::from("/nonexistent/en.json"));

        let result = resolver.set_locale("en");

        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[googletest::test]
    fn construction_propagates_load_error() {
        let source = FakeSource::default().with("en", serde_json::json!(["a"]));
        let options = ResolverOptions { locale: Some("en".to_string()), ..manual() };

        let result = LocaleResolver::new(options, Box::new(source), prefs(&[]));

        assert!(result.is_err());
    }

    #[googletest::test]
    fn custom_separator_applies_to_loaded_keys() {
        let source =
            FakeSource::default().with("en", serde_json::json!({"menu": {"open": "Open"}}));
        let mut resolver =
            LocaleResolver::with_key_separator(manual(), Box::new(source), prefs(&[]), "/")
                .unwrap();

        resolver.set_locale("en").unwrap();

        expect_that!(resolver.translate("menu/open"), eq("Open"));
        expect_that!(resolver.translate("menu.open"), eq("menu.open"));
    }

    #[googletest::test]
    fn get_list_collects_all_registered_locales() {
        let mut resolver = resolver(manual(), FakeSource::default(), &[]);
        resolver.add_translation("en", [("hello", "Hi")]);
        resolver.add_translation("ja", [("hello", "こんにちは")]);

        let list = resolver.get_list().unwrap();

        assert_eq!(list, BTreeSet::from(["en".to_string(), "ja".to_string()]));
    }
}
