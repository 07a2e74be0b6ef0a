//! # All-in Audit
//!
//! Looks for non-random deals in online poker hand histories.
//!
//! Hands that went to showdown heads-up with a player all in before the
//! flop are pulled out of the logs, each one is paired with its exact
//! preflop equity, and the results are tested against what the equities
//! predict.
//!
//! ## Features
//!
//! - **Log Extraction**: A line-oriented state machine over Full Tilt style
//!   hand histories, with configurable markers
//! - **Exact Equity**: Exhaustive enumeration of all 1,712,304 boards, split
//!   across threads with rayon
//! - **Persistent Memo**: Each unordered pair of hands is computed once and
//!   kept across runs in a JSON store
//! - **Statistics**: Per-bin binomial tests, Fisher's combined test and a
//!   normal approximation over all hands
//!
//! ## Quick Start
//!
//! ```ignore
//! use allin_audit::analysis::AnalysisConfig;
//! use allin_audit::classify::ClassRanking;
//! use allin_audit::equity::{CacheSession, ExhaustiveEngine};
//! use allin_audit::history::LogParser;
//! use allin_audit::pipeline::{audit_reports, Extractor};
//!
//! let mut cache = CacheSession::open("equity_cache.json", ExhaustiveEngine::new());
//! let ranking = ClassRanking::default();
//!
//! let mut reports = Vec::new();
//! Extractor::new(&mut cache, &ranking)
//!     .extract(&mut LogParser::default(), log_reader, |r| reports.push(r))?;
//!
//! let report = audit_reports(&reports, &AnalysisConfig::default())?;
//! println!("{report}");
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: Cards, hole cards and 7-card hand evaluation
//! - [`classify`]: The 169 starting hand classes and their ranking
//! - [`equity`]: Exhaustive equity engine and its cache
//! - [`history`]: Hand history parsing
//! - [`analysis`]: Binning and significance tests
//! - [`pipeline`]: Extraction and audit steps
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────────────┐
//! │  LogParser   │────▶│  Extractor   │────▶│  hand table (CSV)     │
//! │  (history)   │     │  (pipeline)  │     └───────────────────────┘
//! └──────────────┘     └──────────────┘                 │
//!                        │          │                   ▼
//!                        ▼          ▼       ┌───────────────────────┐
//!              ┌─────────────┐ ┌──────────┐ │   OutcomeRecorder     │
//!              │ EquityCache │ │ Class    │ │   Binner              │
//!              │ + Engine    │ │ Ranking  │ │   SignificanceTester  │
//!              └─────────────┘ └──────────┘ │   (analysis)          │
//!                     │                     └───────────────────────┘
//!                     ▼                                 │
//!              ┌─────────────┐                          ▼
//!              │ JSON store  │                   AnalysisReport
//!              └─────────────┘
//! ```

#![warn(missing_docs)]

pub mod analysis;
pub mod cards;
pub mod classify;
pub mod equity;
pub mod history;
pub mod pipeline;

pub use analysis::{AnalysisConfig, AnalysisReport};
pub use cards::{Card, HoleCards};
pub use equity::{EquityCache, EquityEngine, EquityResult, ExhaustiveEngine};
pub use history::{HeadsUpAllIn, LogParser};
