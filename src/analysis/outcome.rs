//! Per-hand outcomes.
//!
//! Only hands with exactly one winner are tested. For those the favoured
//! hand's chance of winning given that the pot is not split is
//!
//! ```text
//! q = p(favoured wins) / (1 - p(tie))
//! ```
//!
//! and the hand counts as a win when the favoured hand took the pot.

use serde::Deserialize;

use crate::equity::EquityResult;
use crate::history::HeadsUpAllIn;

/// One row of the hand table, as read by the audit.
///
/// Only the columns the analysis needs are named, others are ignored.
/// Probability columns may be empty for rows that are not tested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutcomeRow {
    /// Number of players who won the pot.
    #[serde(rename = "NumWinners")]
    pub num_winners: usize,
    /// Probability that the favoured hand wins.
    #[serde(rename = "P(FavouredWins)")]
    pub p_favored_wins: Option<f64>,
    /// Probability of a split pot.
    #[serde(rename = "P(Tie)")]
    pub p_tie: Option<f64>,
    /// 1 if the favoured hand won, else 0.
    #[serde(rename = "FavouredWon")]
    pub favored_won: Option<u8>,
}

/// A tested hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeRecord {
    /// Probability the favoured hand wins, given no split.
    pub q: f64,
    /// The favoured hand won.
    pub won: bool,
}

impl OutcomeRecord {
    /// `None` when a split is certain and `q` is undefined.
    pub fn new(p_favored_wins: f64, p_tie: f64, won: bool) -> Option<Self> {
        let no_split = 1.0 - p_tie;
        if no_split <= 0.0 {
            return None;
        }
        Some(Self {
            q: p_favored_wins / no_split,
            won,
        })
    }

    /// Variance of this hand's win indicator.
    pub fn variance(&self) -> f64 {
        self.q * (1.0 - self.q)
    }
}

/// Sums over every tested hand, for the aggregate normal test.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutcomeTotals {
    /// Tested hands.
    pub hands: u64,
    /// Tested hands won by the favourite.
    pub wins: u64,
    /// Expected wins, the sum of q.
    pub sum_q: f64,
    /// Variance of the win count, the sum of q(1 - q).
    pub sum_variance: f64,
}

/// Collects tested hands and their running sums.
#[derive(Debug, Clone, Default)]
pub struct OutcomeRecorder {
    records: Vec<OutcomeRecord>,
    totals: OutcomeTotals,
    /// Rows skipped because they did not have exactly one winner.
    not_single_winner: u64,
    /// Single winner rows skipped because q is undefined or data is missing.
    excluded: u64,
}

impl OutcomeRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single-winner hand from its probabilities.
    pub fn record(&mut self, p_favored_wins: f64, p_tie: f64, won: bool) -> Option<OutcomeRecord> {
        let Some(record) = OutcomeRecord::new(p_favored_wins, p_tie, won) else {
            log::warn!("skipping hand with p(tie) = {p_tie}, win probability without a split is undefined");
            self.excluded += 1;
            return None;
        };

        self.totals.hands += 1;
        if won {
            self.totals.wins += 1;
        }
        self.totals.sum_q += record.q;
        self.totals.sum_variance += record.variance();
        self.records.push(record);

        Some(record)
    }

    /// Record an extracted hand with its equity.
    pub fn record_hand(
        &mut self,
        hand: &HeadsUpAllIn,
        equity: &EquityResult,
    ) -> Option<OutcomeRecord> {
        let Some(winner) = hand.single_winner() else {
            self.not_single_winner += 1;
            return None;
        };
        self.record(
            equity.p_favored_wins(),
            equity.p_tie(),
            winner == equity.favored,
        )
    }

    /// Record a row of the hand table.
    pub fn record_row(&mut self, row: &OutcomeRow) -> Option<OutcomeRecord> {
        if row.num_winners != 1 {
            self.not_single_winner += 1;
            return None;
        }

        match (row.p_favored_wins, row.p_tie, row.favored_won) {
            (Some(p_win), Some(p_tie), Some(won)) => self.record(p_win, p_tie, won == 1),
            _ => {
                log::warn!("skipping single winner row with missing probabilities");
                self.excluded += 1;
                None
            }
        }
    }

    /// Tested hands, in the order they were recorded.
    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    /// Running sums over the recorded hands.
    pub fn totals(&self) -> OutcomeTotals {
        self.totals
    }

    /// Rows that were not tested because they were draws or had no winner.
    pub fn not_single_winner(&self) -> u64 {
        self.not_single_winner
    }

    /// Single winner rows that could not be tested.
    pub fn excluded(&self) -> u64 {
        self.excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::HoleCards;
    use crate::equity::EquityCounts;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_conditional_probability() {
        let record = OutcomeRecord::new(0.6, 0.2, true).unwrap();
        assert_abs_diff_eq!(record.q, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(record.variance(), 0.1875, epsilon = 1e-12);

        assert!(OutcomeRecord::new(0.0, 1.0, false).is_none());
    }

    #[test]
    fn test_totals() {
        let mut recorder = OutcomeRecorder::new();
        recorder.record(0.6, 0.2, true).unwrap();
        recorder.record(0.5, 0.0, false).unwrap();
        assert!(recorder.record(0.0, 1.0, true).is_none());

        let totals = recorder.totals();
        assert_eq!(totals.hands, 2);
        assert_eq!(totals.wins, 1);
        assert_abs_diff_eq!(totals.sum_q, 1.25, epsilon = 1e-12);
        assert_abs_diff_eq!(totals.sum_variance, 0.1875 + 0.25, epsilon = 1e-12);
        assert_eq!(recorder.excluded(), 1);
        assert_eq!(recorder.records().len(), 2);
    }

    #[test]
    fn test_rows() {
        let row = |num_winners, won| OutcomeRow {
            num_winners,
            p_favored_wins: Some(0.8),
            p_tie: Some(0.0),
            favored_won: Some(won),
        };

        let mut recorder = OutcomeRecorder::new();
        assert!(recorder.record_row(&row(1, 1)).unwrap().won);
        assert!(!recorder.record_row(&row(1, 0)).unwrap().won);
        assert!(recorder.record_row(&row(2, 0)).is_none());
        assert!(recorder.record_row(&row(0, 0)).is_none());

        let missing = OutcomeRow {
            p_tie: None,
            ..row(1, 1)
        };
        assert!(recorder.record_row(&missing).is_none());

        assert_eq!(recorder.totals().hands, 2);
        assert_eq!(recorder.not_single_winner(), 2);
        assert_eq!(recorder.excluded(), 1);
    }

    #[test]
    fn test_record_hand() {
        let favored = HoleCards::parse("Qs Qd").unwrap();
        let underdog = HoleCards::parse("Ah Kh").unwrap();
        let equity = EquityResult::from_counts(
            favored,
            underdog,
            EquityCounts {
                win: 54,
                lose: 45,
                tie: 1,
                total: 100,
            },
        );

        let mut recorder = OutcomeRecorder::new();
        let upset = HeadsUpAllIn {
            hands: [underdog, favored],
            winner: Some(underdog),
            winners: 1,
        };
        let record = recorder.record_hand(&upset, &equity).unwrap();
        assert!(!record.won);
        assert_abs_diff_eq!(record.q, 54.0 / 99.0, epsilon = 1e-12);

        let draw = HeadsUpAllIn { winners: 2, ..upset };
        assert!(recorder.record_hand(&draw, &equity).is_none());
        assert_eq!(recorder.not_single_winner(), 1);
    }
}
