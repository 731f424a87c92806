//! Settings lifecycle

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    ResolverSettings,
    loader,
};

/// Loads, validates and holds the active settings.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    current_settings: ResolverSettings,

    /// Directory the settings were loaded from
    root: Option<PathBuf>,
}

impl ConfigManager {
    /// Manager holding default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: ResolverSettings::default(), root: None }
    }

    /// Load settings from `root`, or use defaults when `root` is `None` or
    /// has no configuration file.
    ///
    /// A relative `languagePath` is resolved against `root`.
    ///
    /// # Errors
    /// - file read error
    /// - JSON parse error
    /// - validation error
    pub fn load_settings(&mut self, root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for root: {:?}", root);

        let mut settings = if let Some(root) = &root {
            loader::load_from_root(root)?.map_or_else(ResolverSettings::default, |loaded| {
                tracing::debug!("Loaded settings: {:?}", loaded);
                loaded
            })
        } else {
            ResolverSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        if let Some(root) = &root
            && settings.language_path.is_relative()
        {
            settings.language_path = root.join(&settings.language_path);
        }

        self.current_settings = settings;
        self.root = root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// Settings from the last successful load.
    #[must_use]
    pub const fn get_settings(&self) -> &ResolverSettings {
        &self.current_settings
    }

    /// Directory the settings were loaded from, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
