use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a report from a recorded event stream
    Replay(ReplayArgs),

    /// Initialize an .eir.toml config file in the current directory
    Init,
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines event stream emitted by the analysis engine
    pub events: PathBuf,

    /// Text report to append to. Default: scan-report.txt
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also write structured JSON lines to this file
    #[arg(long)]
    pub structured: Option<PathBuf>,

    /// Function catalog (JSON) used to resolve call-stack frames
    #[arg(long)]
    pub functions: Option<PathBuf>,

    /// Ignore .eir.toml config files
    #[arg(long)]
    pub no_config: bool,
}
