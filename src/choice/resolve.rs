//! Naming and filtering rules applied to raw device identifiers.
//!
//! Pure lookups against [`Config`]. Identifiers are compared exactly,
//! with no normalization or case-folding.

use crate::config::Config;

/// Whether `identifier` is listed in `config.ignored`.
pub fn is_ignored(identifier: &str, config: &Config) -> bool {
    config.ignored.iter().any(|ignored| ignored == identifier)
}

/// Display label for `identifier`.
///
/// The configured friendly name when present and non-empty, otherwise
/// the identifier itself.
pub fn friendly_of<'a>(identifier: &'a str, config: &'a Config) -> &'a str {
    match config.friendly.get(identifier) {
        Some(label) if !label.is_empty() => label,
        _ => identifier,
    }
}
