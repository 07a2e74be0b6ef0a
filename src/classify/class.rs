//! Canonical starting hand classes.
//!
//! There are 169 strategically distinct starting hands:
//! - 13 pairs (AA, KK, ..., 22)
//! - 78 suited hands (AKs, AQs, ..., 32s)
//! - 78 offsuit hands (AKo, AQo, ..., 32o)

use std::fmt;
use std::str::FromStr;

use crate::cards::card::RANK_CHARS;
use crate::cards::{rank_value, HoleCards};

use super::RankingError;

/// A canonical starting hand class, higher rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandClass {
    /// Rank of first card (higher)
    pub rank1: u8,
    /// Rank of second card (lower or equal)
    pub rank2: u8,
    /// Whether suited
    pub suited: bool,
}

/// Number of canonical hand classes.
pub const NUM_CLASSES: usize = 169;

impl HandClass {
    /// Classify two hole cards. The result does not depend on card order.
    pub fn of(hand: &HoleCards) -> Self {
        let (r1, r2) = (hand.card1.rank(), hand.card2.rank());
        Self {
            rank1: r1.max(r2),
            rank2: r1.min(r2),
            suited: hand.is_suited(),
        }
    }

    /// Get the hand class index (0-168).
    /// Pairs: 0-12 (22-AA), suited: 13-90, offsuit: 91-168.
    pub fn index(&self) -> u8 {
        if self.is_pair() {
            self.rank1
        } else if self.suited {
            13 + encode_triangular(self.rank1, self.rank2)
        } else {
            91 + encode_triangular(self.rank1, self.rank2)
        }
    }

    /// Check if the class is a pocket pair.
    pub fn is_pair(&self) -> bool {
        self.rank1 == self.rank2
    }
}

/// Encode two ranks (r1 > r2) to triangular index.
fn encode_triangular(r1: u8, r2: u8) -> u8 {
    debug_assert!(r1 > r2);
    r1 * (r1 - 1) / 2 + r2
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (c1, c2) = (RANK_CHARS[self.rank1 as usize], RANK_CHARS[self.rank2 as usize]);
        if self.is_pair() {
            write!(f, "{c1}{c2}")
        } else {
            let suffix = if self.suited { 's' } else { 'o' };
            write!(f, "{c1}{c2}{suffix}")
        }
    }
}

/// Parses "AKs", "AK s", "AKo", "AK" (offsuit) and "AA".
impl FromStr for HandClass {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RankingError::InvalidClass(s.to_string());
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();

        let (r1, r2, suffix) = match chars.as_slice() {
            [r1, r2] => (*r1, *r2, None),
            [r1, r2, suffix] => (*r1, *r2, Some(suffix.to_ascii_lowercase())),
            _ => return Err(invalid()),
        };

        let r1 = rank_value(r1).ok_or_else(invalid)? - 1;
        let r2 = rank_value(r2).ok_or_else(invalid)? - 1;
        let suited = match suffix {
            None | Some('o') => false,
            Some('s') => true,
            Some(_) => return Err(invalid()),
        };

        if r1 == r2 && suffix.is_some() {
            return Err(invalid());
        }

        Ok(Self {
            rank1: r1.max(r2),
            rank2: r1.min(r2),
            suited,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use rustc_hash::FxHashMap;

    /// Every two-card hand, 1326 in all.
    fn all_hands() -> Vec<HoleCards> {
        let mut hands = Vec::new();
        for a in 0..52u8 {
            for b in (a + 1)..52 {
                hands.push(HoleCards::new(Card::from_id(a), Card::from_id(b)));
            }
        }
        hands
    }

    #[test]
    fn test_pair_indices() {
        for rank in 0..13u8 {
            let hc = HandClass::of(&HoleCards::new(Card::new(rank, 0), Card::new(rank, 3)));
            assert!(hc.is_pair());
            assert!(!hc.suited);
            assert_eq!(hc.index(), rank);
        }
    }

    #[test]
    fn test_indices_cover_all_classes() {
        let mut combos: FxHashMap<u8, u32> = FxHashMap::default();
        for hand in all_hands() {
            let hc = HandClass::of(&hand);
            let idx = hc.index();
            assert!((idx as usize) < NUM_CLASSES, "{hc} has index {idx}");
            assert_eq!(idx < 91 && idx >= 13, hc.suited, "{hc}");
            *combos.entry(idx).or_default() += 1;
        }

        assert_eq!(combos.len(), NUM_CLASSES);
        assert_eq!(combos[&12], 6);
        assert_eq!(combos[&13], 4);
        assert_eq!(combos[&91], 12);
    }

    #[test]
    fn test_classify_hole_cards() {
        let cases = [
            ("Ah Kh", "AKs"),
            ("Kh Ah", "AKs"),
            ("Ah Kd", "AKo"),
            ("2c 7d", "72o"),
            ("Qs Qd", "QQ"),
            ("Ts 9s", "T9s"),
        ];
        for (hand, class) in cases {
            let hand = HoleCards::parse(hand).unwrap();
            assert_eq!(HandClass::of(&hand).to_string(), class);
        }
    }

    #[test]
    fn test_classify_ignores_card_order() {
        for (a, b) in [("Ah", "Kd"), ("7c", "7s"), ("2h", "9h")] {
            let h1 = HoleCards::parse(&format!("{a} {b}")).unwrap();
            let h2 = HoleCards::parse(&format!("{b} {a}")).unwrap();
            assert_eq!(HandClass::of(&h1), HandClass::of(&h2));
        }
    }

    #[test]
    fn test_parse_class() {
        let aks: HandClass = "AKs".parse().unwrap();
        assert!(aks.suited);
        assert_eq!("AK s".parse::<HandClass>().unwrap(), aks);
        assert_eq!("KAs".parse::<HandClass>().unwrap(), aks);

        let ako: HandClass = "AKo".parse().unwrap();
        assert!(!ako.suited);
        assert_eq!("AK".parse::<HandClass>().unwrap(), ako);

        assert!("QQ".parse::<HandClass>().unwrap().is_pair());
        assert!("QQs".parse::<HandClass>().is_err());
        assert!("AKx".parse::<HandClass>().is_err());
        assert!("A".parse::<HandClass>().is_err());
        assert!("A1".parse::<HandClass>().is_err());
    }
}
