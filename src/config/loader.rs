//! Config file loading

use std::path::Path;

use super::{
    ConfigError,
    ResolverSettings,
};

/// Name of the configuration file looked up in the root directory.
pub const CONFIG_FILE_NAME: &str = ".locale-resolver.json";

/// Load settings from `<root>/.locale-resolver.json`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: there is no configuration file
/// - `Err(ConfigError)`: read or parse error
pub(super) fn load_from_root(root: &Path) -> Result<Option<ResolverSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: ResolverSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
