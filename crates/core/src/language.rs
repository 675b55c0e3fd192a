//! Target language code validation.
//!
//! Codes follow the provider's convention: a 2-3 letter primary subtag with
//! an optional region or script subtag, e.g. `es`, `fr-CA`, `zh-TW`.

use crate::error::CoreError;

/// Target language used when a translate request does not name one.
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

/// Validate a target language code.
pub fn validate_language_code(code: &str) -> Result<(), CoreError> {
    let mut parts = code.split('-');
    let primary = parts.next().unwrap_or_default();
    let region = parts.next();

    let primary_ok =
        (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    let region_ok = region.map_or(true, |r| {
        (2..=4).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric())
    });

    if primary_ok && region_ok && parts.next().is_none() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid target language code '{code}'"
        )))
    }
}
