//! Locale identifier helpers

/// Sentinel requesting automatic resolution instead of a concrete locale.
pub const AUTO: &str = "auto";

/// Normalize a locale identifier (trim and lowercase).
///
/// # Examples
/// ```
/// use locale_resolver::normalize_locale;
///
/// assert_eq!(normalize_locale(" EN "), "en");
/// assert_eq!(normalize_locale("Pt-BR"), "pt-br");
/// ```
#[must_use]
pub fn normalize_locale(locale: &str) -> String {
    locale.trim().to_lowercase()
}

/// Whether a normalized locale names a concrete language rather than `auto`.
#[must_use]
pub fn is_concrete(locale: &str) -> bool {
    !locale.is_empty() && locale != AUTO
}
