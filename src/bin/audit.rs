//! Audit binary.
//!
//! Runs the significance tests over a hand table written by `extract` and
//! prints the summary.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use allin_audit::analysis::AnalysisConfig;
use allin_audit::pipeline::audit;

#[derive(Debug, Parser)]
#[command(about = "Test heads-up all in outcomes against their equities")]
struct Cli {
    /// Hand table written by `extract`.
    table: PathBuf,
    /// JSON analysis config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of probability bins.
    #[arg(long)]
    num_bins: Option<usize>,
    /// Minimum hands for a bin to be tested.
    #[arg(long)]
    min_hands: Option<u64>,
    /// Write the per-bin series to this CSV file.
    #[arg(long)]
    bins_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("cannot load {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(num_bins) = cli.num_bins {
        config = config.with_num_bins(num_bins);
    }
    if let Some(min_hands) = cli.min_hands {
        config = config.with_min_hands(min_hands);
    }
    config.validate()?;

    let file = File::open(&cli.table)
        .with_context(|| format!("cannot open {}", cli.table.display()))?;
    let report = audit(BufReader::new(file), &config)?;

    println!();
    print!("{report}");

    if let Some(path) = &cli.bins_csv {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        report.write_bins_csv(BufWriter::new(file))?;
        info!("per-bin series written to {}", path.display());
    }

    Ok(())
}
