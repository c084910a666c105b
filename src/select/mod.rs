//! Selection engine: resolve a choice set to one target device.
//!
//! Two modes: [`Mode::CyclicToggle`] is a pure function of the choices
//! and the current device; [`Mode::Interactive`] hands the choices to a
//! [`Matcher`] and parses what comes back. Neither keeps state between
//! invocations.

pub mod interactive;
pub mod toggle;

pub use interactive::{Fzf, Matcher};
pub use toggle::toggle_next;

use crate::choice::{Choice, friendly_of};
use crate::config::Config;

/// Selection engine errors.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("no choices to select from")]
    NoChoices,
    #[error("malformed selection: {0:?}")]
    MalformedSelection(String),
    #[error("matcher failed: {0}")]
    Collaborator(String),
    #[error("selection cancelled")]
    Cancelled,
}

/// How the target device is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ask the user through the fuzzy matcher.
    Interactive,
    /// Take the alphabetically-next device, wrapping around.
    CyclicToggle,
}

/// Resolve `choices` to a single target.
///
/// Returns `Ok(None)` only in interactive mode, when the user aborts
/// without picking. Toggle mode always selects something.
///
/// # Errors
///
/// [`SelectError::NoChoices`] if `choices` is empty, in either mode.
/// Interactive mode adds `MalformedSelection`, `Collaborator` and
/// `Cancelled`.
pub async fn pick<M: Matcher>(
    choices: &[Choice],
    current: &str,
    mode: Mode,
    config: &Config,
    matcher: &M,
) -> Result<Option<Choice>, SelectError> {
    if choices.is_empty() {
        return Err(SelectError::NoChoices);
    }

    match mode {
        Mode::CyclicToggle => toggle_next(choices, current).map(Some),
        Mode::Interactive => {
            interactive::pick(choices, friendly_of(current, config), matcher).await
        }
    }
}
