//! End-to-end flow.
//!
//! ```text
//! logs ──LogParser──▶ HeadsUpAllIn ──EquityCache──▶ HandReport ──csv──▶ hand table
//!
//! hand table ──OutcomeRecorder──▶ Binner ──▶ SignificanceTester ──▶ AnalysisReport
//! ```
//!
//! Extraction and audit are separate steps joined by the CSV hand table, so
//! an audit can be rerun with other settings without touching the logs.

use std::io::{BufRead, Read, Write};

use serde::Serialize;

use crate::analysis::{AnalysisConfig, AnalysisReport, OutcomeRecorder, OutcomeRow, StatsError};
use crate::cards::HoleCards;
use crate::classify::{ClassRanking, HandClass};
use crate::equity::{EquityCache, EquityEngine, EquityError, EquityResult};
use crate::history::{HeadsUpAllIn, HistoryError, LogParser};

/// Error type for the extract and audit steps.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading a log failed.
    #[error(transparent)]
    History(#[from] HistoryError),
    /// Reading or writing the hand table failed.
    #[error("hand table: {0}")]
    Csv(#[from] csv::Error),
    /// A statistical test failed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// One row of the hand table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandReport {
    /// The winning hand, `Draw` for a split pot, empty if no winner was shown.
    #[serde(rename = "WinningHand")]
    pub winning_hand: String,
    /// Number of players who won the pot.
    #[serde(rename = "NumWinners")]
    pub num_winners: usize,
    /// Hand with the higher chance to win.
    #[serde(rename = "FavouredHand")]
    pub favored: HoleCards,
    /// The other hand.
    #[serde(rename = "UnfavouredHand")]
    pub unfavored: HoleCards,
    /// Class of the favoured hand.
    #[serde(rename = "FavouredHandClass")]
    pub favored_class: String,
    /// Class of the other hand.
    #[serde(rename = "UnfavouredHandClass")]
    pub unfavored_class: String,
    /// 1 if the favoured hand won alone, else 0.
    #[serde(rename = "FavouredWon")]
    pub favored_won: u8,
    /// Probability that the favoured hand wins.
    #[serde(rename = "P(FavouredWins)")]
    pub p_favored_wins: f64,
    /// Probability that the favoured hand loses.
    #[serde(rename = "P(FavouredLoses)")]
    pub p_favored_loses: f64,
    /// Probability of a split pot.
    #[serde(rename = "P(Tie)")]
    pub p_tie: f64,
    /// Probability of the outcome that was actually observed.
    #[serde(rename = "P(ThisOutcome)")]
    pub p_this_outcome: f64,
    /// Sum of the three probabilities.
    #[serde(rename = "Sum(Ps)")]
    pub sum_ps: f64,
    /// Both hands, best class first.
    #[serde(rename = "SortedHand1")]
    pub sorted_hand1: HoleCards,
    /// The worse ranked hand.
    #[serde(rename = "SortedHand2")]
    pub sorted_hand2: HoleCards,
}

impl HandReport {
    /// Row for `hand`, with its equity and class ranking.
    pub fn new(hand: &HeadsUpAllIn, equity: &EquityResult, ranking: &ClassRanking) -> Self {
        let winning_hand = if hand.is_draw() {
            "Draw".to_string()
        } else {
            hand.winner.map(|w| w.to_string()).unwrap_or_default()
        };

        let favored_won = hand.single_winner() == Some(equity.favored);
        let (p_win, p_lose, p_tie) = (
            equity.p_favored_wins(),
            equity.p_favored_loses(),
            equity.p_tie(),
        );
        let p_this_outcome = if favored_won {
            p_win
        } else if hand.is_draw() {
            p_tie
        } else {
            p_lose
        };

        let mut sorted = hand.hands;
        ranking.sort(&mut sorted);

        Self {
            winning_hand,
            num_winners: hand.winners,
            favored: equity.favored,
            unfavored: equity.unfavored,
            favored_class: HandClass::of(&equity.favored).to_string(),
            unfavored_class: HandClass::of(&equity.unfavored).to_string(),
            favored_won: favored_won as u8,
            p_favored_wins: p_win,
            p_favored_loses: p_lose,
            p_tie,
            p_this_outcome,
            sum_ps: p_win + p_lose + p_tie,
            sorted_hand1: sorted[0],
            sorted_hand2: sorted[1],
        }
    }
}

impl From<&HandReport> for OutcomeRow {
    fn from(report: &HandReport) -> Self {
        Self {
            num_winners: report.num_winners,
            p_favored_wins: Some(report.p_favored_wins),
            p_tie: Some(report.p_tie),
            favored_won: Some(report.favored_won),
        }
    }
}

/// Counters for an extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Hand banners seen.
    pub blocks: usize,
    /// Qualifying hands found by the parser.
    pub hands: usize,
    /// Rows produced.
    pub reports: usize,
    /// Qualifying hands whose equity could not be computed.
    pub skipped: usize,
}

impl ExtractStats {
    /// Add the counts of another run.
    pub fn merge(&mut self, other: &ExtractStats) {
        self.blocks += other.blocks;
        self.hands += other.hands;
        self.reports += other.reports;
        self.skipped += other.skipped;
    }
}

/// Turns hand histories into hand table rows.
pub struct Extractor<'a, E: EquityEngine> {
    cache: &'a mut EquityCache<E>,
    ranking: &'a ClassRanking,
}

impl<'a, E: EquityEngine> Extractor<'a, E> {
    /// Extractor drawing equities from `cache`.
    pub fn new(cache: &'a mut EquityCache<E>, ranking: &'a ClassRanking) -> Self {
        Self { cache, ranking }
    }

    /// Report for one extracted hand, looking up its equity.
    pub fn report(&mut self, hand: &HeadsUpAllIn) -> Result<HandReport, EquityError> {
        let [h1, h2] = hand.hands;
        let equity = self.cache.get_equity(&h1, &h2)?;
        Ok(HandReport::new(hand, &equity, self.ranking))
    }

    /// Parse one log and hand each row to `emit`.
    ///
    /// A hand whose equity cannot be computed (the log shows the same card
    /// twice) is skipped with a warning.
    pub fn extract<R, F>(
        &mut self,
        parser: &mut LogParser,
        reader: R,
        mut emit: F,
    ) -> Result<ExtractStats, PipelineError>
    where
        R: BufRead,
        F: FnMut(HandReport),
    {
        let mut stats = ExtractStats::default();

        let parsed = parser.parse_reader(reader, |hand| match self.report(&hand) {
            Ok(report) => {
                stats.reports += 1;
                emit(report);
            }
            Err(e) => {
                log::warn!("skipping hand {:?}: {e}", hand.hands);
                stats.skipped += 1;
            }
        })?;

        stats.blocks = parsed.blocks;
        stats.hands = parsed.emitted;
        Ok(stats)
    }
}

/// Column names of the hand table, in row order.
pub const REPORT_HEADER: [&str; 14] = [
    "WinningHand",
    "NumWinners",
    "FavouredHand",
    "UnfavouredHand",
    "FavouredHandClass",
    "UnfavouredHandClass",
    "FavouredWon",
    "P(FavouredWins)",
    "P(FavouredLoses)",
    "P(Tie)",
    "P(ThisOutcome)",
    "Sum(Ps)",
    "SortedHand1",
    "SortedHand2",
];

/// CSV writer for hand table rows.
///
/// The header goes out immediately, so a table with no rows still names its
/// columns.
pub fn report_writer<W: Write>(writer: W) -> Result<csv::Writer<W>, PipelineError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(REPORT_HEADER)?;
    Ok(csv)
}

/// Read a hand table into an outcome recorder.
///
/// Columns are found by header name and fields are trimmed, extra columns
/// are ignored.
pub fn read_outcomes<R: Read>(reader: R) -> Result<OutcomeRecorder, PipelineError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut recorder = OutcomeRecorder::new();
    for row in csv.deserialize::<OutcomeRow>() {
        recorder.record_row(&row?);
    }
    Ok(recorder)
}

/// Audit a hand table.
pub fn audit<R: Read>(reader: R, config: &AnalysisConfig) -> Result<AnalysisReport, PipelineError> {
    let recorder = read_outcomes(reader)?;
    Ok(AnalysisReport::build(&recorder, config)?)
}

/// Audit rows held in memory.
pub fn audit_reports(
    reports: &[HandReport],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, PipelineError> {
    let mut recorder = OutcomeRecorder::new();
    for report in reports {
        recorder.record_row(&OutcomeRow::from(report));
    }
    Ok(AnalysisReport::build(&recorder, config)?)
}
