//! Interactive selection through an external fuzzy matcher (fzf).
//!
//! Choices go to the matcher as `label<TAB>identifier` lines. The
//! matcher displays and matches on the label field only, and echoes
//! the picked line back unchanged, so the identifier survives even
//! when two devices share a label.
//!
//! Outcome classification of a finished matcher:
//!
//! | exit     | stdout  | stderr    | result                  |
//! |----------|---------|-----------|-------------------------|
//! | 0        | record  | -         | `Some(choice)`          |
//! | 0        | empty   | -         | `None` (aborted)        |
//! | non-zero | empty   | empty     | `None` (aborted)        |
//! | non-zero | -       | non-empty | `Collaborator(stderr)`  |
//! | non-zero | record  | empty     | `Collaborator(status)`  |

use std::borrow::Cow;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::SelectError;
use crate::choice::Choice;
use crate::process::{self, CommandOutput, CommandSpec, ProcessError};

/// Binary name looked up on `PATH`.
pub const PROGRAM: &str = "fzf";

const PROMPT: &str = "🎧 Output: ";

/// Runs the fuzzy matcher once.
pub trait Matcher {
    /// Offer `input` records under `header` and wait for the result.
    async fn run(&self, input: &str, header: &str) -> Result<CommandOutput, ProcessError>;
}

/// fzf, restricted to matching on the label field.
pub struct Fzf {
    base: CommandSpec,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl Fzf {
    pub fn new(cancel: CancellationToken, timeout: Option<Duration>) -> Self {
        Self::with_command(CommandSpec::new(PROGRAM), cancel, timeout)
    }

    /// Use `base` as the program plus leading arguments; fzf's own
    /// flags are appended after them.
    pub fn with_command(
        base: CommandSpec,
        cancel: CancellationToken,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            base,
            cancel,
            timeout,
        }
    }

    fn command(&self, header: &str) -> CommandSpec {
        self.base.clone().args([
            "--prompt",
            PROMPT,
            "--header",
            header,
            "--height",
            "40%",
            "--reverse",
            "--delimiter",
            "\t",
            "--with-nth",
            "1",
            "--nth",
            "1",
            "--bind",
            "enter:accept",
            "--exact",
        ])
    }
}

impl Matcher for Fzf {
    async fn run(&self, input: &str, header: &str) -> Result<CommandOutput, ProcessError> {
        process::run(&self.command(header), Some(input), &self.cancel, self.timeout).await
    }
}

/// Ask the user to pick one of `choices`.
///
/// `current_label` is shown as context. Returns `Ok(None)` when the
/// user backs out without picking anything.
pub async fn pick<M: Matcher>(
    choices: &[Choice],
    current_label: &str,
    matcher: &M,
) -> Result<Option<Choice>, SelectError> {
    let input = encode_records(choices);
    let header = format!("Current: {current_label}");

    tracing::debug!(count = choices.len(), header = %header, "invoking matcher");
    let output = matcher.run(&input, &header).await.map_err(|e| match e {
        ProcessError::Cancelled { .. } => SelectError::Cancelled,
        other => SelectError::Collaborator(other.to_string()),
    })?;

    interpret(choices, &output)
}

/// Classify a finished matcher run. See the module table.
pub fn interpret(choices: &[Choice], output: &CommandOutput) -> Result<Option<Choice>, SelectError> {
    let line = output.stdout.trim_end_matches(['\n', '\r']);

    if !output.status.success() {
        return match (line.is_empty(), output.diagnostic()) {
            (true, "") => {
                tracing::debug!(status = %output.status, "matcher exited without a selection");
                Ok(None)
            }
            (_, "") => Err(SelectError::Collaborator(format!(
                "{PROGRAM} exited with {}",
                output.status
            ))),
            (_, diagnostic) => Err(SelectError::Collaborator(diagnostic.to_string())),
        };
    }

    if line.is_empty() {
        return Ok(None);
    }

    let picked = decode_record(line)?;
    // Hand back the offered choice so sanitised fields are restored.
    let original = choices
        .iter()
        .find(|c| sanitize(&c.identifier) == picked.identifier && sanitize(&c.label) == picked.label)
        .or_else(|| choices.iter().find(|c| sanitize(&c.identifier) == picked.identifier));
    Ok(Some(original.cloned().unwrap_or(picked)))
}

/// Serialize choices as `label<TAB>identifier` lines.
pub fn encode_records(choices: &[Choice]) -> String {
    let mut out = String::new();
    for choice in choices {
        out.push_str(&sanitize(&choice.label));
        out.push('\t');
        out.push_str(&sanitize(&choice.identifier));
        out.push('\n');
    }
    out
}

/// Parse one `label<TAB>identifier` line.
pub fn decode_record(line: &str) -> Result<Choice, SelectError> {
    match line.split_once('\t') {
        Some((label, identifier)) if !identifier.contains(['\t', '\n']) => {
            Ok(Choice::new(label, identifier))
        }
        _ => Err(SelectError::MalformedSelection(line.to_string())),
    }
}

/// Replace record separators (TAB, CR, LF) inside a field with spaces.
fn sanitize(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\n', '\r']) {
        Cow::Owned(field.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(field)
    }
}
