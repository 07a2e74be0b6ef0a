//! Best-to-worst ordering of the starting hand classes.
//!
//! The ordering only decides how hands are listed in reports, it plays no
//! part in the statistics.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::cards::HoleCards;

use super::class::{HandClass, NUM_CLASSES};
use super::RankingError;

/// Built-in ranking, one class per line, best first.
const DEFAULT_RANKING: &str = include_str!("../../data/hand_classes.txt");

/// A total order over hand classes, best first.
#[derive(Debug, Clone)]
pub struct ClassRanking {
    /// Class index -> position in the ranking (0 is best).
    positions: FxHashMap<u8, usize>,
}

impl ClassRanking {
    /// Parse a ranking from text with one class per line.
    ///
    /// Blank lines are skipped, a class listed twice is an error.
    pub fn from_lines(text: &str) -> Result<Self, RankingError> {
        let mut positions = FxHashMap::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let class: HandClass = line.parse()?;
            let position = positions.len();
            if positions.insert(class.index(), position).is_some() {
                return Err(RankingError::DuplicateClass(class.to_string()));
            }
        }

        if positions.len() < NUM_CLASSES {
            log::warn!(
                "hand ranking lists {} of {} classes, missing classes sort last",
                positions.len(),
                NUM_CLASSES
            );
        }

        Ok(Self { positions })
    }

    /// Load a ranking file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RankingError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RankingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_lines(&text)
    }

    /// Number of ranked classes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the ranking is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a class, 0 is best. `None` if not ranked.
    pub fn position(&self, class: &HandClass) -> Option<usize> {
        self.positions.get(&class.index()).copied()
    }

    /// Compare two classes, `Less` means the left one is better.
    /// Unranked classes come after every ranked class.
    pub fn compare_classes(&self, c1: &HandClass, c2: &HandClass) -> Ordering {
        let key = |c: &HandClass| self.position(c).unwrap_or(usize::MAX);
        key(c1).cmp(&key(c2))
    }

    /// Compare two hands by their class.
    pub fn compare(&self, h1: &HoleCards, h2: &HoleCards) -> Ordering {
        self.compare_classes(&HandClass::of(h1), &HandClass::of(h2))
    }

    /// Sort hands best class first, keeping the input order between equal classes.
    pub fn sort(&self, hands: &mut [HoleCards]) {
        hands.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for ClassRanking {
    fn default() -> Self {
        Self::from_lines(DEFAULT_RANKING).expect("built-in hand ranking lists all 169 classes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    fn hand(s: &str) -> HoleCards {
        HoleCards::parse(s).unwrap()
    }

    #[test]
    fn test_default_ranking_is_complete() {
        let ranking = ClassRanking::default();
        assert_eq!(ranking.len(), NUM_CLASSES);
        for a in 0..52u8 {
            for b in (a + 1)..52 {
                let cards = HoleCards::new(Card::from_id(a), Card::from_id(b));
                let class = HandClass::of(&cards);
                assert!(ranking.position(&class).is_some(), "{class} not ranked");
            }
        }
        assert_eq!(ranking.position(&"AA".parse().unwrap()), Some(0));
        assert_eq!(ranking.position(&"72o".parse().unwrap()), Some(168));
    }

    #[test]
    fn test_compare_hands() {
        let ranking = ClassRanking::default();
        assert_eq!(ranking.compare(&hand("Ah Ad"), &hand("Kh Kd")), Ordering::Less);
        assert_eq!(ranking.compare(&hand("7c 2d"), &hand("Ah Kh")), Ordering::Greater);
        assert_eq!(ranking.compare(&hand("Ah Kh"), &hand("As Ks")), Ordering::Equal);
    }

    #[test]
    fn test_sort_hands() {
        let ranking = ClassRanking::from_lines("QQ\nAK s\n\nAK\n").unwrap();
        assert_eq!(ranking.len(), 3);

        let mut hands = [hand("Ah Kd"), hand("7c 2d"), hand("Ah Kh"), hand("Qs Qd")];
        ranking.sort(&mut hands);
        assert_eq!(hands, [hand("Qs Qd"), hand("Ah Kh"), hand("Ah Kd"), hand("7c 2d")]);
    }

    #[test]
    fn test_ranking_errors() {
        assert!(matches!(
            ClassRanking::from_lines("AA\nKK\nAA"),
            Err(RankingError::DuplicateClass(c)) if c == "AA"
        ));
        assert!(matches!(
            ClassRanking::from_lines("AA\nZZ"),
            Err(RankingError::InvalidClass(_))
        ));
        assert!(matches!(
            ClassRanking::from_file("/nonexistent/ranking.txt"),
            Err(RankingError::Io { .. })
        ));
    }
}
