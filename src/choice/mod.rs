//! Candidate set construction: raw device list to labelled choices.

pub mod resolve;

use crate::config::Config;

pub use resolve::{friendly_of, is_ignored};

/// One selectable output device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    /// What the user sees.
    pub label: String,
    /// The OS device name, used for switching.
    pub identifier: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            identifier: identifier.into(),
        }
    }
}

/// Build the ordered choice set for `devices`.
///
/// Ignored identifiers are dropped; everything else keeps its input
/// order and is labelled via [`friendly_of`]. Duplicates pass through.
/// An empty result is valid here; callers decide whether it is fatal.
pub fn build_choices<S: AsRef<str>>(devices: &[S], config: &Config) -> Vec<Choice> {
    let mut choices = Vec::with_capacity(devices.len());
    for device in devices {
        let device: &str = device.as_ref();
        if is_ignored(device, config) {
            tracing::debug!(device, "ignored device");
            continue;
        }
        choices.push(Choice::new(friendly_of(device, config), device));
    }
    choices
}
