//! Command-line front end.
//!
//! Resolves a locale from the configuration in `--root`, the requested
//! locale and the client's `Accept-Language` value, then prints the
//! translation of every key on its own line.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::error::LoadError;
use crate::locale::AUTO;
use crate::preferences::AcceptLanguage;
use crate::resolver::LocaleResolver;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Directory containing `.locale-resolver.json`
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Locale to request (overrides config file)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Client `Accept-Language` header value
    #[arg(long, env = "HTTP_ACCEPT_LANGUAGE")]
    pub accept_language: Option<String>,

    /// Disable automatic locale detection (overrides config file)
    #[arg(long)]
    pub no_automatic: bool,

    /// Message keys to translate
    pub keys: Vec<String>,
}

/// Outcome of a run, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// A locale was resolved and every key was printed.
    Success,
    /// No locale could be resolved; keys were printed untranslated.
    Unresolved,
    /// Configuration, load or output failure.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Unresolved => Self::from(1),
            ExitStatus::Error => Self::from(2),
        }
    }
}

/// Failures that abort a run.
#[derive(Error, Debug)]
pub enum CliError {
    /// Settings could not be loaded or are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Translation data for a resolved locale is unusable
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Writing to the output stream failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Run the command, writing translations to `out`.
///
/// # Errors
/// Returns [`CliError`] on invalid configuration, corrupt translation data
/// or a failed write.
pub fn run(args: &Arguments, out: &mut impl Write) -> Result<ExitStatus, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(args.root.clone()))?;
    let settings = config_manager.get_settings();

    let mut options = settings.resolver_options();
    if let Some(locale) = &args.locale {
        options.locale = Some(locale.clone());
    }
    if args.no_automatic {
        options.automatic = Some(false);
    }

    let preferences = AcceptLanguage::parse(
        args.accept_language.as_deref().unwrap_or_default(),
        settings.preference_length,
    );
    tracing::debug!(languages = ?preferences.languages(), "Client languages");

    let resolver = LocaleResolver::with_key_separator(
        options,
        Box::new(settings.directory_source()),
        Box::new(preferences),
        settings.key_separator.as_str(),
    )?;

    let locale = resolver.get_locale();
    let status = if locale == AUTO {
        tracing::warn!("No locale could be resolved");
        ExitStatus::Unresolved
    } else {
        tracing::info!(locale, "Resolved locale");
        ExitStatus::Success
    };

    for key in &args.keys {
        writeln!(out, "{}", resolver.translate(key))?;
    }

    Ok(status)
}
