use std::path::PathBuf;

use clap::Parser;

use crate::select::Mode;

#[derive(Parser)]
#[command(name = "audiout", about = "Pick or cycle the active audio output device")]
pub struct Cli {
    /// Verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Switch to the next device alphabetically instead of opening the picker
    #[arg(short, long)]
    pub toggle: bool,

    /// Configuration file (overrides $AUDIOUT_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Give up on any external command after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Selection mode implied by the flags.
    pub fn mode(&self) -> Mode {
        if self.toggle {
            Mode::CyclicToggle
        } else {
            Mode::Interactive
        }
    }
}
