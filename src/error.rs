use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading translation data for a locale.
///
/// These are hard failures: a data source was located but does not yield a
/// key to string mapping. An ordinary "locale not present" condition is
/// never reported through this type.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The data file could not be read
    #[error("Failed to read translation data '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The data file is not valid JSON
    #[error("Failed to parse translation data '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    /// The loaded value is not an object of messages
    #[error("Content for locale '{locale}' is not a mapping after loading")]
    NotAMapping { locale: String },
}
