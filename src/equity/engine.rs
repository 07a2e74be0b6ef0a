//! Exhaustive preflop equity.
//!
//! With four hole cards dead there are C(48, 5) = 1,712,304 possible boards.
//! The engine ranks both hands on every one of them and counts how often the
//! first hand wins, loses and ties. The result is exact and deterministic.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::cards::{Deck, HandEvaluator, HoleCards};

use super::EquityError;

/// Number of run-outs for two hands and no board cards.
pub const PREFLOP_BOARDS: u64 = 1_712_304;

/// Raw outcome counts, from the point of view of one hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityCounts {
    /// Boards where the hand wins outright.
    pub win: u64,
    /// Boards where the hand loses.
    pub lose: u64,
    /// Boards where the pot is split.
    pub tie: u64,
    /// Total boards enumerated.
    pub total: u64,
}

impl EquityCounts {
    /// Same counts seen from the opponent's side.
    pub fn swapped(&self) -> Self {
        Self {
            win: self.lose,
            lose: self.win,
            ..*self
        }
    }

    /// Add two partial counts.
    pub fn merge(self, other: Self) -> Self {
        Self {
            win: self.win + other.win,
            lose: self.lose + other.lose,
            tie: self.tie + other.tie,
            total: self.total + other.total,
        }
    }

    /// Check the counts describe at least one board and add up.
    pub fn is_consistent(&self) -> bool {
        self.total > 0 && self.win + self.lose + self.tie == self.total
    }
}

/// Computes win/lose/tie counts for two hands with no board cards.
///
/// Implementations must be pure: the same two hands always give the same
/// counts, and swapping the hands swaps `win` and `lose`.
pub trait EquityEngine {
    /// Counts from the point of view of `hand1`.
    fn compute_equity(
        &self,
        hand1: &HoleCards,
        hand2: &HoleCards,
    ) -> Result<EquityCounts, EquityError>;
}

/// Enumerates every board from the undealt cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveEngine {
    evaluator: HandEvaluator,
}

impl ExhaustiveEngine {
    /// Create a new exhaustive engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EquityEngine for ExhaustiveEngine {
    fn compute_equity(
        &self,
        hand1: &HoleCards,
        hand2: &HoleCards,
    ) -> Result<EquityCounts, EquityError> {
        if hand1.conflicts_with(hand2) {
            return Err(EquityError::SharedCard {
                hand1: *hand1,
                hand2: *hand2,
            });
        }

        let deck = Deck::without(&[hand1.card1, hand1.card2, hand2.card1, hand2.card2]);
        let cards = deck.remaining_cards();
        let n = cards.len();
        let evaluator = &self.evaluator;

        // Split on the lowest board card, each task walks the boards above it.
        let counts = (0..n)
            .into_par_iter()
            .map(|a| {
                let mut counts = EquityCounts::default();
                for b in (a + 1)..n {
                    for c in (b + 1)..n {
                        for d in (c + 1)..n {
                            for e in (d + 1)..n {
                                let board = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                                match evaluator.compare(hand1, hand2, &board) {
                                    Ordering::Greater => counts.win += 1,
                                    Ordering::Less => counts.lose += 1,
                                    Ordering::Equal => counts.tie += 1,
                                }
                                counts.total += 1;
                            }
                        }
                    }
                }
                counts
            })
            .reduce(EquityCounts::default, EquityCounts::merge);

        log::debug!("enumerated {} boards for {hand1} vs {hand2}", counts.total);

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> HoleCards {
        HoleCards::parse(s).unwrap()
    }

    #[test]
    fn test_counts_helpers() {
        let counts = EquityCounts {
            win: 7,
            lose: 2,
            tie: 1,
            total: 10,
        };
        assert!(counts.is_consistent());
        assert_eq!(counts.swapped().win, 2);
        assert_eq!(counts.swapped().lose, 7);
        assert_eq!(counts.merge(counts).total, 20);
        assert!(!EquityCounts::default().is_consistent());
    }

    #[test]
    fn test_shared_card_rejected() {
        let engine = ExhaustiveEngine::new();
        let result = engine.compute_equity(&hand("Ah Kh"), &hand("Ah Qd"));
        assert!(matches!(result, Err(EquityError::SharedCard { .. })));
    }

    #[test]
    fn test_overpair_vs_underpair() {
        let engine = ExhaustiveEngine::new();
        let counts = engine.compute_equity(&hand("Ah Ad"), &hand("Kc Ks")).unwrap();

        assert_eq!(counts.total, PREFLOP_BOARDS);
        assert!(counts.is_consistent());

        let p_win = counts.win as f64 / counts.total as f64;
        assert!((0.80..0.84).contains(&p_win), "AA vs KK wins {p_win}");
    }

    #[test]
    fn test_suit_mirror_is_symmetric() {
        // Swapping spades and diamonds maps each board to one where the
        // hands trade places, so wins and losses balance exactly.
        let engine = ExhaustiveEngine::new();
        let counts = engine.compute_equity(&hand("As Ks"), &hand("Ad Kd")).unwrap();

        assert_eq!(counts.total, PREFLOP_BOARDS);
        assert_eq!(counts.win, counts.lose);
        assert!(counts.tie as f64 / counts.total as f64 > 0.9);
    }

    #[test]
    fn test_swapping_hands_swaps_counts() {
        let engine = ExhaustiveEngine::new();
        let (qq, aks) = (hand("Qs Qd"), hand("Ah Kh"));

        let forward = engine.compute_equity(&qq, &aks).unwrap();
        let backward = engine.compute_equity(&aks, &qq).unwrap();
        assert_eq!(forward, backward.swapped());

        // The classic coin flip, queens are a small favourite.
        let p_win = forward.win as f64 / forward.total as f64;
        assert!((0.52..0.56).contains(&p_win), "QQ vs AKs wins {p_win}");
    }
}
