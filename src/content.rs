//! Translation content definitions

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::LoadError;

/// Flat message key to localized string map.
pub type Messages = HashMap<String, String>;

/// Content registered for a locale in the translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationContent {
    /// Messages already resident in memory.
    Messages(Messages),
    /// Reference to a data file that is loaded when the locale is activated.
    File(PathBuf),
}

impl TranslationContent {
    /// Whether the content carries nothing to translate with.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Messages(messages) => messages.is_empty(),
            Self::File(path) => path.as_os_str().is_empty(),
        }
    }
}

impl From<Messages> for TranslationContent {
    fn from(messages: Messages) -> Self {
        Self::Messages(messages)
    }
}

impl From<PathBuf> for TranslationContent {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for TranslationContent
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::Messages(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Convert a loaded JSON value into messages.
///
/// Only an object is accepted. Nested objects are flattened into
/// separator-joined keys.
///
/// # Errors
/// Returns [`LoadError::NotAMapping`] when `value` is not an object.
pub fn into_messages(value: &Value, locale: &str, separator: &str) -> Result<Messages, LoadError> {
    if !value.is_object() {
        return Err(LoadError::NotAMapping { locale: locale.to_string() });
    }
    Ok(flatten_json(value, separator, None))
}

/// Flatten nested JSON object into separator-joined key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use locale_resolver::content::flatten_json;
///
/// let json = json!({
///     "menu": {
///         "open": "Open",
///         "close": "Close"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("menu.open"), Some(&"Open".to_string()));
/// assert_eq!(flattened.get("menu.close"), Some(&"Close".to_string()));
/// ```
#[must_use]
pub fn flatten_json(json: &Value, separator: &str, prefix: Option<&str>) -> Messages {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// Walk `json`, inserting every leaf under its joined key.
fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut Messages,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}
