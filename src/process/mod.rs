//! External command runner with cancellation and timeouts.
//!
//! Both collaborators (`SwitchAudioSource` and `fzf`) are driven through
//! [`run`]. The child is raced against the process-wide cancellation
//! token and an optional deadline; whichever fires first wins. An
//! interrupted child gets SIGTERM, then SIGKILL after a short grace
//! period.

use std::ffi::OsString;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::time;
use tokio_util::sync::CancellationToken;

/// How long an interrupted child gets to exit after SIGTERM.
const TERMINATE_GRACE: Duration = Duration::from_millis(500);

/// Command runner errors.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("{program}: I/O error: {source}")]
    Io { program: String, source: io::Error },
    #[error("{program} cancelled")]
    Cancelled { program: String },
    #[error("{program} timed out after {}s", .after.as_secs_f32())]
    TimedOut { program: String, after: Duration },
}

/// Program and arguments for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name for logs and error messages.
    pub fn name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Captured result of a finished child.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stderr with surrounding whitespace removed.
    pub fn diagnostic(&self) -> &str {
        self.stderr.trim()
    }
}

/// Run `spec` to completion.
///
/// `input`, if any, is written to the child's stdin, which is then
/// closed; otherwise stdin is `/dev/null`. A child that exits without
/// draining stdin is not an error. Stdout and stderr are captured in
/// full. A non-zero exit is *not* an error at this layer.
///
/// # Errors
///
/// - [`ProcessError::Cancelled`] if `cancel` fires before the child exits
/// - [`ProcessError::TimedOut`] if `timeout` elapses first
/// - [`ProcessError::Spawn`] / [`ProcessError::Io`] on OS failures
pub async fn run(
    spec: &CommandSpec,
    input: Option<&str>,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<CommandOutput, ProcessError> {
    let program = spec.name();
    if cancel.is_cancelled() {
        return Err(ProcessError::Cancelled { program });
    }

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    tracing::debug!(program = %program, pid = ?child.id(), args = ?spec.args, "spawned");

    let interrupted = tokio::select! {
        result = collect(&mut child, input) => {
            let (status, stdout, stderr) = result.map_err(|source| ProcessError::Io {
                program: program.clone(),
                source,
            })?;
            tracing::debug!(program = %program, %status, "exited");
            return Ok(CommandOutput {
                status,
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }
        _ = cancel.cancelled() => ProcessError::Cancelled { program },
        _ = expire(timeout) => ProcessError::TimedOut {
            program,
            after: timeout.unwrap_or_default(),
        },
    };

    tracing::info!(error = %interrupted, "terminating child");
    terminate(&mut child).await;
    Err(interrupted)
}

/// Feed stdin, drain stdout/stderr, and wait for exit, concurrently.
async fn collect(
    child: &mut Child,
    input: Option<&str>,
) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (_, out, err, status) = tokio::try_join!(
        feed(stdin, input),
        read_all(stdout),
        read_all(stderr),
        child.wait(),
    )?;
    Ok((status, out, err))
}

async fn feed(stdin: Option<ChildStdin>, input: Option<&str>) -> io::Result<()> {
    let (Some(mut stdin), Some(input)) = (stdin, input) else {
        return Ok(());
    };
    match stdin.write_all(input.as_bytes()).await {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("child closed stdin before reading all input");
            Ok(())
        }
        other => other,
    }
    // Dropping `stdin` closes the pipe so the child sees EOF.
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(after) => time::sleep(after).await,
        None => std::future::pending().await,
    }
}

/// SIGTERM, wait up to [`TERMINATE_GRACE`], then SIGKILL.
///
/// fzf restores the terminal on SIGTERM but not on SIGKILL.
async fn terminate(child: &mut Child) {
    if let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) {
        if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
            tracing::debug!(pid, error = %e, "SIGTERM failed");
        }
        match time::timeout(TERMINATE_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(pid, %status, "child terminated");
                return;
            }
            Ok(Err(e)) => tracing::debug!(pid, error = %e, "wait after SIGTERM failed"),
            Err(_) => tracing::debug!(pid, "child ignored SIGTERM"),
        }
    }
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "failed to kill child");
    }
}
