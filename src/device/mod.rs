//! Device controller: query, list and set the active output.
//!
//! The selection logic never talks to the OS directly; the switcher
//! drives a [`DeviceController`] and hands its output to the choice
//! builder. [`SwitchAudioSource`] is the macOS implementation.

pub mod switch_audio_source;

pub use switch_audio_source::SwitchAudioSource;

use crate::process::ProcessError;

/// Device controller errors.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error(transparent)]
    Command(#[from] ProcessError),
    #[error("{operation} failed: {diagnostic}")]
    Failed {
        operation: &'static str,
        diagnostic: String,
    },
}

impl DeviceError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Command(ProcessError::Cancelled { .. }))
    }
}

/// Queries and switches the system's active output device.
///
/// Identifiers are opaque, case-sensitive device names exactly as the
/// OS reports them.
pub trait DeviceController {
    /// The currently active output device.
    async fn current(&self) -> Result<String, DeviceError>;

    /// Every output device, in the order the OS reports them.
    async fn list(&self) -> Result<Vec<String>, DeviceError>;

    /// Make `identifier` the active output device.
    async fn set(&self, identifier: &str) -> Result<(), DeviceError>;
}

/// Split a device listing into identifiers.
///
/// One device per line; surrounding whitespace is trimmed and blank
/// lines are dropped. Order and duplicates are preserved.
pub fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
