//! RoadSpectra CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roadspectra_cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => {
            roadspectra_cli::execute_analyze(&args)?;
        }
        Commands::Version => {
            println!("roadspectra {}", env!("CARGO_PKG_VERSION"));
            println!("analyzer version: {}", roadspectra_analyzer::VERSION);
        }
    }

    Ok(())
}
