mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReplayArgs};
use eir_report::config::{self, EirConfig};
use eir_report::engine::{ReplayOptions, Replayer};
use eir_report::report::terminal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("eir_report=debug,eir=debug")
    } else if cli.quiet {
        EnvFilter::new("eir_report=error,eir=error")
    } else {
        EnvFilter::new("eir_report=info,eir=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    info!("Eir v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        cli::Commands::Replay(args) => {
            let options = replay_options(args)?;
            let report_path = options.report.clone();
            let summary = Replayer::new(options)
                .run()
                .with_context(|| format!("Failed to replay {}", args.events.display()))?;

            if !cli.quiet {
                terminal::render(&summary, &report_path);
            }
        }
        cli::Commands::Init => {
            let dir = std::env::current_dir()?;
            if config::init_config(&dir)? {
                println!("✅ Created {}", config::CONFIG_FILE);
                println!("   Edit it to customize report output.");
            } else {
                println!("⚠️  {} already exists in this directory", config::CONFIG_FILE);
            }
        }
    }

    Ok(())
}

/// Merge CLI flags over .eir.toml values
fn replay_options(args: &ReplayArgs) -> Result<ReplayOptions> {
    let config = if args.no_config {
        EirConfig::default()
    } else {
        let cwd = std::env::current_dir()?;
        EirConfig::load(&cwd)?.unwrap_or_default()
    };

    Ok(ReplayOptions {
        events: args.events.clone(),
        report: args.out.clone().unwrap_or(config.report.file),
        structured: args.structured.clone().or(config.structured.file),
        functions: args.functions.clone().or(config.resolver.catalog),
    })
}
