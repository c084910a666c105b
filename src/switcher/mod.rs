//! Output switching: one end-to-end invocation.
//!
//! Query current → list all → build choices → select → set current.
//! Every fatal condition is returned to `main.rs`, which owns user-facing
//! reporting and the exit status.

mod deps;

pub use deps::check_dependencies;

use crate::choice::{Choice, build_choices, friendly_of};
use crate::config::Config;
use crate::device::{DeviceController, DeviceError};
use crate::select::{self, Matcher, Mode, SelectError};

/// Switcher errors.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("missing dependency: {program} (hint: {hint})")]
    MissingDependency {
        program: &'static str,
        hint: &'static str,
    },
    #[error("{context}: {source}")]
    Device {
        context: &'static str,
        source: DeviceError,
    },
    #[error("no selectable output devices after filtering")]
    NoSelectableDevices,
    #[error(transparent)]
    Select(#[from] SelectError),
}

impl SwitchError {
    /// Whether the run was interrupted rather than failing on its own.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Select(SelectError::Cancelled) => true,
            Self::Device { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

/// How an invocation ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The output device was switched.
    Switched(Choice),
    /// The user backed out of the picker.
    NoSelection,
}

/// Run one selection and apply it.
pub async fn run<D, M>(
    devices: &D,
    matcher: &M,
    config: &Config,
    mode: Mode,
) -> Result<Outcome, SwitchError>
where
    D: DeviceController,
    M: Matcher,
{
    let current = devices
        .current()
        .await
        .map_err(|source| SwitchError::Device {
            context: "failed to query current output device",
            source,
        })?;
    tracing::info!(
        real = %current,
        friendly = %friendly_of(&current, config),
        "current device"
    );

    let all = devices.list().await.map_err(|source| SwitchError::Device {
        context: "failed to list output devices",
        source,
    })?;
    tracing::info!(count = all.len(), "devices found (pre-filter)");

    let choices = build_choices(&all, config);
    if choices.is_empty() {
        return Err(SwitchError::NoSelectableDevices);
    }
    tracing::info!(count = choices.len(), "choices (post-filter)");

    let Some(choice) = select::pick(&choices, &current, mode, config, matcher).await? else {
        tracing::info!("no selection; exiting");
        return Ok(Outcome::NoSelection);
    };
    tracing::info!(friendly = %choice.label, real = %choice.identifier, "selected");

    devices
        .set(&choice.identifier)
        .await
        .map_err(|source| SwitchError::Device {
            context: "failed to switch output device",
            source,
        })?;
    tracing::info!(to = %choice.label, "switched");

    Ok(Outcome::Switched(choice))
}
