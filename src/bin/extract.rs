//! Hand history extraction binary.
//!
//! Reads hand histories, keeps the heads-up preflop all ins and writes one
//! CSV row per hand with the favoured hand's equity. Equities are kept in a
//! JSON store between runs.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::info;

use allin_audit::classify::ClassRanking;
use allin_audit::equity::{CacheSession, ExhaustiveEngine};
use allin_audit::history::{discover_logs, LogMarkers, LogParser};
use allin_audit::pipeline::{report_writer, ExtractStats, Extractor};

#[derive(Debug, Parser)]
#[command(about = "Extract heads-up preflop all ins from hand histories")]
struct Cli {
    /// Log files, or directories holding *.txt logs.
    #[arg(required = true)]
    logs: Vec<PathBuf>,
    /// Equity cache store, created if missing.
    #[arg(long, default_value = "equity_cache.json")]
    cache: PathBuf,
    /// Hand class ranking, one class per line, best first.
    #[arg(long)]
    class_order: Option<PathBuf>,
    /// Output table. Defaults to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Banner that opens each hand in the logs.
    #[arg(long, default_value = "Full Tilt Poker Game")]
    new_hand_marker: String,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let ranking = match &cli.class_order {
        Some(path) => ClassRanking::from_file(path)?,
        None => ClassRanking::default(),
    };
    let logs = discover_logs(&cli.logs)?;
    info!("{} log files to scan", logs.len());

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = report_writer(BufWriter::new(out)).context("cannot write hand table")?;

    // Saved on every exit path from here on, including errors.
    let mut session = CacheSession::open(&cli.cache, ExhaustiveEngine::new());
    info!("{} cached matchups in {}", session.len(), session.path().display());
    let markers = LogMarkers::full_tilt().with_new_hand(cli.new_hand_marker);

    let progress = ProgressBar::new(logs.len() as u64);

    let mut totals = ExtractStats::default();
    for path in &logs {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let mut parser = LogParser::new(markers.clone());
        let mut write_error = None;

        let stats = Extractor::new(&mut *session, &ranking).extract(
            &mut parser,
            BufReader::new(file),
            |report| {
                if write_error.is_none() {
                    write_error = writer.serialize(&report).err();
                }
            },
        )?;

        if let Some(e) = write_error {
            return Err(e).context("cannot write hand table");
        }
        log::debug!("{}: {} hands", path.display(), stats.reports);
        totals.merge(&stats);
        progress.inc(1);
    }
    progress.finish();

    writer.flush().context("cannot write hand table")?;
    let computed = session.computed();
    let cached = session.len();
    session.finish().context("cannot save equity cache")?;

    info!(
        "{} hand blocks, {} heads-up all ins, {} rows, {} skipped",
        totals.blocks, totals.hands, totals.reports, totals.skipped
    );
    info!(
        "{computed} equities computed, {cached} cached, done in {:.1}s",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
