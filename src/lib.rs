//! locale-resolver
//!
//! Resolves message keys into localized strings. The active locale is set
//! explicitly or inferred from the client's preferred languages, and
//! translations come from an in-memory table or per-locale data files.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod locale;
pub mod preferences;
pub mod resolver;
pub mod source;

pub use content::{
    Messages,
    TranslationContent,
};
pub use error::LoadError;
pub use locale::{
    AUTO,
    normalize_locale,
};
pub use preferences::{
    AcceptLanguage,
    CgiEnvironment,
    LanguagePreferences,
};
pub use resolver::{
    LocaleResolver,
    ResolverOptions,
};
pub use source::{
    DirectorySource,
    TranslationSource,
};
