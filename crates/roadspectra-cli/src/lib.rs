//! # RoadSpectra CLI
//!
//! Batch spectral analysis of road-network snapshots: loads JSON network
//! files, runs the analyzer over them in parallel with per-network failure
//! isolation, and emits markdown reports, JSON metadata dumps, and rows of
//! a shared ML feature table.

use std::path::PathBuf;

use anyhow::bail;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use roadspectra_analyzer::{analyze_batch, SpectralAnalyzer};
use roadspectra_core::MemoryNetwork;

pub mod features;
pub mod input;
pub mod report;

use features::FeatureRow;
use input::NetworkFile;

/// Spectral stability diagnostics for directed road networks.
#[derive(Debug, Parser)]
#[command(name = "roadspectra", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one or more network snapshot files
    Analyze(AnalyzeArgs),
    /// Print version information
    Version,
}

/// Arguments of the `analyze` subcommand.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Network snapshot files (JSON)
    #[arg(required = true)]
    pub networks: Vec<PathBuf>,

    /// Directory for reports and metadata dumps
    #[arg(long, default_value = "reports")]
    pub report_dir: PathBuf,

    /// Master feature table to append rows to (CSV)
    #[arg(long)]
    pub features: Option<PathBuf>,

    /// Skip all file emission (reports, metadata, feature rows); analyze
    /// and print the summary only
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the `analyze` subcommand.
pub fn execute_analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let mut networks: Vec<(String, MemoryNetwork)> = Vec::with_capacity(args.networks.len());
    for path in &args.networks {
        match NetworkFile::load(path) {
            Ok(file) => networks.push(file.into_network()),
            Err(err) => {
                // A malformed file must not take the rest of the batch down
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable snapshot");
            }
        }
    }
    if networks.is_empty() {
        bail!("no readable network snapshots");
    }

    let analyzer = SpectralAnalyzer::new();
    let results = analyze_batch(&analyzer, &networks);

    let mut succeeded = 0usize;
    for (name, result) in &results {
        match result {
            Ok(metrics) => {
                succeeded += 1;
                tracing::info!(
                    network = %name,
                    spectral_radius = metrics.spectral_radius,
                    h_inf_norm = metrics.h_inf_norm,
                    kreiss_constant = metrics.kreiss_constant,
                    "analysis succeeded"
                );
                if !args.dry_run {
                    let now = Utc::now();
                    report::write_report(&args.report_dir, name, metrics, now)?;
                    report::write_metadata(&args.report_dir, name, metrics)?;
                    if let Some(table) = &args.features {
                        // Serial append: one writer for the shared table
                        features::append_feature_row(
                            table,
                            &FeatureRow::from_metrics(name, metrics),
                        )?;
                    }
                }
            }
            Err(err) => {
                tracing::warn!(network = %name, error = %err, "analysis failed");
            }
        }
    }

    println!(
        "analyzed {} network(s): {} succeeded, {} failed",
        results.len(),
        succeeded,
        results.len() - succeeded
    );
    if succeeded == 0 {
        bail!("every network failed to analyze");
    }
    Ok(())
}
