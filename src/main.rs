mod choice;
mod cli;
mod config;
mod device;
mod process;
mod select;
mod switcher;

use std::time::Duration;

use clap::Parser;
use cli::Cli;
use device::SwitchAudioSource;
use select::Fzf;
use switcher::{Outcome, SwitchError};
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit status after SIGINT/SIGTERM, per shell convention.
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = cli.mode();
    let config_path = config::resolve_path(
        cli.config.as_deref(),
        std::env::var_os(config::CONFIG_PATH_ENV),
    );
    tracing::info!(verbose = cli.verbose, ?mode, config = %config_path.display(), "start");

    let cancel = CancellationToken::new();
    if let Err(e) = cancel_on_signal(cancel.clone()) {
        tracing::warn!(error = %e, "failed to install signal handlers");
    }

    if let Err(e) = switcher::check_dependencies(mode) {
        fail(&e);
    }

    let config = config::load_or_default(&config_path);

    let timeout = cli.timeout.map(Duration::from_secs);
    let devices = SwitchAudioSource::new(cancel.clone(), timeout);
    let matcher = Fzf::new(cancel, timeout);

    match switcher::run(&devices, &matcher, &config, mode).await {
        Ok(Outcome::Switched(choice)) => println!("Output -> {}", choice.label),
        Ok(Outcome::NoSelection) => {}
        Err(e) if e.is_cancelled() => {
            tracing::info!(error = %e, "interrupted");
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => fail(&e),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `--verbose` picks debug
/// over the default of warnings only.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `token` on the first SIGINT or SIGTERM.
fn cancel_on_signal(token: CancellationToken) -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => tracing::info!("received SIGINT, cancelling"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, cancelling"),
        }
        token.cancel();
    });
    Ok(())
}

fn fail(e: &SwitchError) -> ! {
    tracing::error!(error = %e, "audiout failed");
    eprintln!("audiout: {e}");
    std::process::exit(1);
}
