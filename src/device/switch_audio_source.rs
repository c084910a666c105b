//! `SwitchAudioSource` adapter (switchaudio-osx).
//!
//! - current: `SwitchAudioSource -c -t output`
//! - list:    `SwitchAudioSource -a -t output`
//! - set:     `SwitchAudioSource -s <device> -t output`

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{DeviceController, DeviceError, parse_device_list};
use crate::process::{self, CommandOutput, CommandSpec};

/// Binary name looked up on `PATH`.
pub const PROGRAM: &str = "SwitchAudioSource";

/// Device controller backed by the `SwitchAudioSource` CLI.
pub struct SwitchAudioSource {
    base: CommandSpec,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl SwitchAudioSource {
    pub fn new(cancel: CancellationToken, timeout: Option<Duration>) -> Self {
        Self::with_command(CommandSpec::new(PROGRAM), cancel, timeout)
    }

    /// Use `base` as the program plus leading arguments; the
    /// operation flags are appended after them.
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

    async fn invoke(&self, operation: &'static str, args: &[&str]) -> Result<String, DeviceError> {
        let spec = self.base.clone().args(args.iter().copied());
        let output = process::run(&spec, None, &self.cancel, self.timeout).await?;
        check(operation, output)
    }
}

/// Turn a non-zero exit into [`DeviceError::Failed`].
fn check(operation: &'static str, output: CommandOutput) -> Result<String, DeviceError> {
    if output.status.success() {
        return Ok(output.stdout);
    }
    let diagnostic = match output.diagnostic() {
        "" => format!("exited with {}", output.status),
        text => text.to_string(),
    };
    Err(DeviceError::Failed {
        operation,
        diagnostic,
    })
}

impl DeviceController for SwitchAudioSource {
    async fn current(&self) -> Result<String, DeviceError> {
        let out = self.invoke("current", &["-c", "-t", "output"]).await?;
        Ok(out.trim().to_string())
    }

    async fn list(&self) -> Result<Vec<String>, DeviceError> {
        let out = self.invoke("list", &["-a", "-t", "output"]).await?;
        Ok(parse_device_list(&out))
    }

    async fn set(&self, identifier: &str) -> Result<(), DeviceError> {
        self.invoke("set", &["-s", identifier, "-t", "output"])
            .await
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stand-in `SwitchAudioSource`: `sh -c <script>` with the
    /// operation flags arriving as `$1..`.
    fn fake(script: &str) -> SwitchAudioSource {
        SwitchAudioSource::with_command(
            CommandSpec::new("sh").args(["-c", script, PROGRAM]),
            CancellationToken::new(),
            None,
        )
    }

    #[tokio::test]
    async fn current_is_trimmed() {
        let dev = fake("printf '  MacBook Pro Speakers \\n'");
        assert_eq!(dev.current().await.unwrap(), "MacBook Pro Speakers");
    }

    #[tokio::test]
    async fn current_passes_flags() {
        let dev = fake("echo \"$*\"");
        assert_eq!(dev.current().await.unwrap(), "-c -t output");
    }

    #[tokio::test]
    async fn list_splits_lines() {
        let dev = fake("printf 'UMC404HD 192k\\nZoomAudioDevice\\n\\nMacBook Pro Speakers\\n'");
        assert_eq!(
            dev.list().await.unwrap(),
            vec!["UMC404HD 192k", "ZoomAudioDevice", "MacBook Pro Speakers"]
        );
    }

    #[tokio::test]
    async fn set_passes_identifier_as_one_argument() {
        // Fails unless $2 is exactly the identifier, spaces included.
        let dev = fake("[ \"$1\" = -s ] && [ \"$2\" = 'UMC404HD 192k' ] && [ \"$4\" = output ]");
        dev.set("UMC404HD 192k").await.unwrap();
    }

    #[tokio::test]
    async fn failure_carries_stderr() {
        let dev = fake("echo 'Could not find an audio device named \"X\"' >&2; exit 1");
        let err = dev.set("X").await.unwrap_err();
        match err {
            DeviceError::Failed {
                operation,
                diagnostic,
            } => {
                assert_eq!(operation, "set");
                assert!(diagnostic.contains("Could not find"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_failure_reports_status() {
        let dev = fake("exit 4");
        let err = dev.list().await.unwrap_err();
        assert!(err.to_string().contains("list failed"));
        assert!(err.to_string().contains('4'));
    }

    #[tokio::test]
    async fn cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let dev = SwitchAudioSource::new(token, None);
        assert!(dev.current().await.unwrap_err().is_cancelled());
    }
}
