pub mod commands;

use clap::Parser;

pub use commands::{Commands, ReplayArgs};

/// Eir — report writer for the PHP vulnerability scanner
///
/// Turns the analysis engine's event stream into a text report and a
/// structured log.
#[derive(Parser, Debug)]
#[command(
    name = "eir",
    version,
    about = "Eir — vulnerability scanning report writer",
    long_about = "Eir replays the events emitted by the PHP analysis engine\ninto an append-only text report and an optional JSON-lines log."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
