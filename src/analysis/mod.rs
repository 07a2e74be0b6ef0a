//! Statistical audit of showdown outcomes.
//!
//! Tests whether the favoured hand in heads-up preflop all ins won about as
//! often as its equity says it should.
//!
//! ## Modules
//!
//! - `config`: `AnalysisConfig`, bin count and significance levels
//! - `outcome`: Conditional win probability per hand and running sums
//! - `bins`: Equal-width probability bins
//! - `significance`: Per-bin binomial, Fisher and Lyapunov tests
//! - `report`: `AnalysisReport`, the summary and per-bin table

pub mod bins;
pub mod config;
pub mod outcome;
pub mod report;
pub mod significance;

pub use bins::{Bin, Binner};
pub use config::{AnalysisConfig, ConfigError};
pub use outcome::{OutcomeRecord, OutcomeRecorder, OutcomeRow, OutcomeTotals};
pub use report::AnalysisReport;
pub use significance::{
    binomial_cdf, BinTest, BinVerdict, FisherTest, LyapunovTest, SignificanceTester, StatsError,
    Verdict,
};
