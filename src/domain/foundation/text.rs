//! Text folding shared by the gazetteer, the alias table and the matcher.
//!
//! Every comparison of user text against listing text goes through
//! [`normalize_text`], so "Ñuñoa", "ÑUÑOA " and "nunoa" are the same key.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercases, trims and strips diacritics.
///
/// # Examples
///
/// ```
/// use property_concierge::domain::foundation::normalize_text;
///
/// assert_eq!(normalize_text("  Ñuñoa "), "nunoa");
/// assert_eq!(normalize_text("Estación Central"), "estacion central");
/// ```
pub fn normalize_text(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Folds a field name for alias lookup: normalized, with spaces, dashes and
/// dots collapsed to underscores.
pub fn normalize_key(s: &str) -> String {
    normalize_text(s)
        .chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            other => other,
        })
        .collect()
}

/// Returns the value only if it is a finite number.
///
/// JSON has no representation for NaN or infinity, so every float leaving
/// the core passes through here.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Returns the value only if it is finite and strictly positive.
pub fn positive(value: f64) -> Option<f64> {
    finite(value).filter(|v| *v > 0.0)
}
