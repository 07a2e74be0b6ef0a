//! Poker hand evaluation.
//!
//! This module provides hand ranking and comparison for 5-7 card poker hands.
//! The evaluator builds per-rank and per-suit bitmasks in a single pass over
//! the cards and reads the best category directly from them, so a 7 card
//! hand is ranked without trying all 21 five card subsets.

use super::card::{Card, HoleCards};
use std::cmp::Ordering;

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    /// No made hand.
    HighCard = 0,
    /// One pair.
    OnePair = 1,
    /// Two pairs.
    TwoPair = 2,
    /// Three cards of one rank.
    ThreeOfAKind = 3,
    /// Five ranks in a row.
    Straight = 4,
    /// Five cards of one suit.
    Flush = 5,
    /// Three of a kind and a pair.
    FullHouse = 6,
    /// Four cards of one rank.
    FourOfAKind = 7,
    /// A straight in one suit.
    StraightFlush = 8,
}

/// A hand rank that can be compared.
/// Higher values are better hands.
/// Format: category (4 bits) | kicker1 (4 bits) | kicker2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandRank(u32);

impl HandRank {
    fn new(category: HandCategory, kickers: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in kickers.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        match self.0 >> 20 {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            _ => HandCategory::StraightFlush,
        }
    }
}

/// Wheel straight mask: A-2-3-4-5.
const WHEEL: u16 = 0b1_0000_0000_1111;

/// Highest straight in a rank bitmask, as the index of its top card.
fn find_straight(rank_bits: u16) -> Option<u8> {
    for top in (4..13u8).rev() {
        let mask = 0b11111u16 << (top - 4);
        if rank_bits & mask == mask {
            return Some(top);
        }
    }

    (rank_bits & WHEEL == WHEEL).then_some(3)
}

/// Up to `N` highest ranks in a bitmask, best first.
fn top_ranks<const N: usize>(mut bits: u16) -> [u8; N] {
    let mut out = [0u8; N];
    let mut n = 0;
    while n < N && bits != 0 {
        let rank = 15 - bits.leading_zeros() as u8;
        out[n] = rank;
        bits &= !(1 << rank);
        n += 1;
    }
    out
}

/// Hand evaluator for poker hands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// Create a new hand evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a 5-card hand.
    pub fn evaluate_5(&self, cards: &[Card; 5]) -> HandRank {
        self.rank_cards(cards)
    }

    /// Evaluate a 7-card hand (best 5-card combination).
    pub fn evaluate_7(&self, cards: &[Card; 7]) -> HandRank {
        self.rank_cards(cards)
    }

    /// Evaluate hole cards with a complete five card board.
    pub fn evaluate(&self, hole_cards: &HoleCards, board: &[Card; 5]) -> HandRank {
        self.evaluate_7(&[
            hole_cards.card1,
            hole_cards.card2,
            board[0],
            board[1],
            board[2],
            board[3],
            board[4],
        ])
    }

    /// Rank the best five card hand out of 5 to 7 cards.
    fn rank_cards(&self, cards: &[Card]) -> HandRank {
        debug_assert!((5..=7).contains(&cards.len()));

        let mut rank_counts = [0u8; 13];
        let mut suit_bits = [0u16; 4];
        let mut rank_bits = 0u16;

        for card in cards {
            rank_counts[card.rank() as usize] += 1;
            suit_bits[card.suit() as usize] |= 1 << card.rank();
            rank_bits |= 1 << card.rank();
        }

        let flush_bits = suit_bits.iter().copied().find(|b| b.count_ones() >= 5);

        if let Some(bits) = flush_bits {
            if let Some(top) = find_straight(bits) {
                return HandRank::new(HandCategory::StraightFlush, &[top]);
            }
        }

        // Group ranks by multiplicity, best first.
        let (mut quads, mut trips, mut pairs) = (0u16, 0u16, 0u16);
        for (rank, &count) in rank_counts.iter().enumerate() {
            match count {
                4 => quads |= 1 << rank,
                3 => trips |= 1 << rank,
                2 => pairs |= 1 << rank,
                _ => {}
            }
        }

        if quads != 0 {
            let [quad] = top_ranks::<1>(quads);
            let [kicker] = top_ranks::<1>(rank_bits & !(1 << quad));
            return HandRank::new(HandCategory::FourOfAKind, &[quad, kicker]);
        }

        if trips != 0 {
            let [trip] = top_ranks::<1>(trips);
            let rest = (trips & !(1 << trip)) | pairs;
            if rest != 0 {
                let [pair] = top_ranks::<1>(rest);
                return HandRank::new(HandCategory::FullHouse, &[trip, pair]);
            }
        }

        if let Some(bits) = flush_bits {
            return HandRank::new(HandCategory::Flush, &top_ranks::<5>(bits));
        }

        if let Some(top) = find_straight(rank_bits) {
            return HandRank::new(HandCategory::Straight, &[top]);
        }

        if trips != 0 {
            let [trip] = top_ranks::<1>(trips);
            let [k1, k2] = top_ranks::<2>(rank_bits & !(1 << trip));
            return HandRank::new(HandCategory::ThreeOfAKind, &[trip, k1, k2]);
        }

        if pairs.count_ones() >= 2 {
            let [p1, p2] = top_ranks::<2>(pairs);
            let [kicker] = top_ranks::<1>(rank_bits & !(1 << p1) & !(1 << p2));
            return HandRank::new(HandCategory::TwoPair, &[p1, p2, kicker]);
        }

        if pairs != 0 {
            let [pair] = top_ranks::<1>(pairs);
            let [k1, k2, k3] = top_ranks::<3>(rank_bits & !(1 << pair));
            return HandRank::new(HandCategory::OnePair, &[pair, k1, k2, k3]);
        }

        HandRank::new(HandCategory::HighCard, &top_ranks::<5>(rank_bits))
    }

    /// Compare two hands on a complete board.
    pub fn compare(&self, hole1: &HoleCards, hole2: &HoleCards, board: &[Card; 5]) -> Ordering {
        self.evaluate(hole1, board).cmp(&self.evaluate(hole2, board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards_from_str(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| Card::parse(c).unwrap()).collect()
    }

    fn arr5(s: &str) -> [Card; 5] {
        cards_from_str(s).try_into().unwrap()
    }

    fn arr7(s: &str) -> [Card; 7] {
        cards_from_str(s).try_into().unwrap()
    }

    #[test]
    fn test_categories() {
        let eval = HandEvaluator::new();
        let cases = [
            ("As Kd Qh Jc 9s", HandCategory::HighCard),
            ("As Ad Kh Qc Js", HandCategory::OnePair),
            ("As Ad Kh Kc Js", HandCategory::TwoPair),
            ("As Ad Ah Kc Js", HandCategory::ThreeOfAKind),
            ("Ts 9d 8h 7c 6s", HandCategory::Straight),
            ("As Ks 9s 7s 2s", HandCategory::Flush),
            ("As Ad Ah Kc Kd", HandCategory::FullHouse),
            ("As Ad Ah Ac Ks", HandCategory::FourOfAKind),
            ("9s 8s 7s 6s 5s", HandCategory::StraightFlush),
        ];

        for (hand, category) in cases {
            assert_eq!(eval.evaluate_5(&arr5(hand)).category(), category, "{hand}");
        }
    }

    #[test]
    fn test_straight_edges() {
        let eval = HandEvaluator::new();

        let broadway = eval.evaluate_5(&arr5("As Kd Qh Jc Ts"));
        let wheel = eval.evaluate_5(&arr5("5s 4d 3h 2c As"));
        let six_high = eval.evaluate_5(&arr5("6s 5d 4h 3c 2s"));

        assert_eq!(broadway.category(), HandCategory::Straight);
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert_eq!(six_high.category(), HandCategory::Straight);
        assert!(broadway > six_high);
        assert!(six_high > wheel);

        let royal = eval.evaluate_5(&arr5("As Ks Qs Js Ts"));
        let steel_wheel = eval.evaluate_5(&arr5("5h 4h 3h 2h Ah"));
        assert_eq!(steel_wheel.category(), HandCategory::StraightFlush);
        assert!(royal > steel_wheel);
    }

    #[test]
    fn test_kickers() {
        let eval = HandEvaluator::new();

        let aces_king = eval.evaluate_5(&arr5("As Ad Kh 7c 2s"));
        let aces_queen = eval.evaluate_5(&arr5("Ac Ah Qh 7d 2d"));
        assert!(aces_king > aces_queen);

        let split_a = eval.evaluate_5(&arr5("As Ad Kh 7c 2s"));
        let split_b = eval.evaluate_5(&arr5("Ac Ah Kd 7d 2d"));
        assert_eq!(split_a, split_b);
    }

    #[test]
    fn test_7_card_evaluation() {
        let eval = HandEvaluator::new();

        let quads = eval.evaluate_7(&arr7("Ah As Ad Ac Kh Qs Jd"));
        assert_eq!(quads.category(), HandCategory::FourOfAKind);

        // Two trips make a full house.
        let boat = eval.evaluate_7(&arr7("Ah As Ad Kc Kh Ks 2d"));
        assert_eq!(boat.category(), HandCategory::FullHouse);
        assert_eq!(boat, eval.evaluate_5(&arr5("Ah As Ad Kc Kh")));

        // Three pairs play the best two plus the best kicker.
        let two_pair = eval.evaluate_7(&arr7("Ah As Kd Kc Qh Qs 2d"));
        assert_eq!(two_pair, eval.evaluate_5(&arr5("Ah As Kd Kc Qh")));

        // A flush beats the straight on the same board.
        let flush = eval.evaluate_7(&arr7("9h 8h 7c 6h 5d 2h Kh"));
        assert_eq!(flush.category(), HandCategory::Flush);
    }

    #[test]
    fn test_hand_comparison() {
        let eval = HandEvaluator::new();

        let aa = HoleCards::parse("Ah Ad").unwrap();
        let kk = HoleCards::parse("Kh Kd").unwrap();
        let board = arr5("Qs Jc 7d 3s 2h");

        assert_eq!(eval.compare(&aa, &kk, &board), Ordering::Greater);
        assert_eq!(eval.compare(&kk, &aa, &board), Ordering::Less);

        // Board plays for both.
        let board = arr5("As Ks Qs Js Ts");
        assert_eq!(eval.compare(&aa, &kk, &board), Ordering::Equal);
    }
}
