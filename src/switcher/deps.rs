//! Required external programs.

use super::SwitchError;
use crate::device::switch_audio_source;
use crate::select::{Mode, interactive};

/// A program that must be on `PATH`, with an install hint.
struct Dependency {
    program: &'static str,
    hint: &'static str,
}

const SWITCH_AUDIO_SOURCE: Dependency = Dependency {
    program: switch_audio_source::PROGRAM,
    hint: "brew install switchaudio-osx",
};

const FZF: Dependency = Dependency {
    program: interactive::PROGRAM,
    hint: "brew install fzf",
};

/// Fail fast if a program needed for `mode` is not installed.
///
/// `SwitchAudioSource` is always required; `fzf` only for the picker.
pub fn check_dependencies(mode: Mode) -> Result<(), SwitchError> {
    check_with(mode, |program| which::which(program).is_ok())
}

fn check_with(mode: Mode, present: impl Fn(&str) -> bool) -> Result<(), SwitchError> {
    let needed: &[&Dependency] = match mode {
        Mode::Interactive => &[&SWITCH_AUDIO_SOURCE, &FZF],
        Mode::CyclicToggle => &[&SWITCH_AUDIO_SOURCE],
    };
    for dep in needed {
        if !present(dep.program) {
            return Err(SwitchError::MissingDependency {
                program: dep.program,
                hint: dep.hint,
            });
        }
        tracing::debug!(program = dep.program, "dependency present");
    }
    Ok(())
}
