use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for spotify-mute
#[derive(Parser, Debug)]
#[command(name = "spotify-mute")]
#[command(about = "Mutes the system sound while Spotify plays an advertisement")]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Path to the INI configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

/// Line printed by `--version` and logged at startup.
pub fn version_banner() -> String {
    format!("This is Spotify Mute version {}.", env!("CARGO_PKG_VERSION"))
}
