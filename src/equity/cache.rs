//! Memoized equity lookups.
//!
//! A result is stored once per unordered pair of hands, from the side of the
//! favoured hand. Lookups in either order find the same entry.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::HoleCards;

use super::engine::{EquityCounts, EquityEngine, ExhaustiveEngine};
use super::EquityError;

/// Unordered pair of hands, used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandPair(HoleCards, HoleCards);

impl HandPair {
    /// Build the key, the argument order does not matter.
    pub fn new(h1: HoleCards, h2: HoleCards) -> Self {
        if h1 <= h2 {
            Self(h1, h2)
        } else {
            Self(h2, h1)
        }
    }

    /// The two hands in key order.
    pub fn hands(&self) -> (HoleCards, HoleCards) {
        (self.0, self.1)
    }
}

/// Equity of one matchup, seen from the favoured hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Hand with the higher win count.
    #[serde(rename = "favoured")]
    pub favored: HoleCards,
    /// The other hand.
    #[serde(rename = "unfavoured")]
    pub unfavored: HoleCards,
    /// Counts from the favoured hand's side.
    pub counts: EquityCounts,
}

impl EquityResult {
    /// Build a result from counts taken from `hand1`'s side.
    ///
    /// The favoured hand is the one that wins more boards. When both win
    /// equally often `hand1` is reported as favoured.
    pub fn from_counts(hand1: HoleCards, hand2: HoleCards, counts: EquityCounts) -> Self {
        if counts.win >= counts.lose {
            Self {
                favored: hand1,
                unfavored: hand2,
                counts,
            }
        } else {
            Self {
                favored: hand2,
                unfavored: hand1,
                counts: counts.swapped(),
            }
        }
    }

    /// Cache key of this result.
    pub fn pair(&self) -> HandPair {
        HandPair::new(self.favored, self.unfavored)
    }

    /// Probability that the favoured hand wins outright.
    pub fn p_favored_wins(&self) -> f64 {
        self.counts.win as f64 / self.counts.total as f64
    }

    /// Probability that the favoured hand loses.
    pub fn p_favored_loses(&self) -> f64 {
        self.counts.lose as f64 / self.counts.total as f64
    }

    /// Probability of a split pot.
    pub fn p_tie(&self) -> f64 {
        self.counts.tie as f64 / self.counts.total as f64
    }

    /// Check the stored counts are usable.
    pub fn is_valid(&self) -> bool {
        self.counts.is_consistent()
            && self.counts.win >= self.counts.lose
            && !self.favored.conflicts_with(&self.unfavored)
    }
}

/// Equity memo in front of an engine.
///
/// The engine is consulted at most once per unordered pair of hands over the
/// life of the cache, including entries loaded from a store.
pub struct EquityCache<E = ExhaustiveEngine> {
    engine: E,
    entries: FxHashMap<HandPair, EquityResult>,
    computed: usize,
}

impl<E: EquityEngine> EquityCache<E> {
    /// Create an empty cache.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            entries: FxHashMap::default(),
            computed: 0,
        }
    }

    /// Equity of `h1` against `h2`, computing it on a miss.
    pub fn get_equity(
        &mut self,
        h1: &HoleCards,
        h2: &HoleCards,
    ) -> Result<EquityResult, EquityError> {
        if let Some(result) = self.entries.get(&HandPair::new(*h1, *h2)) {
            return Ok(*result);
        }

        let counts = self.engine.compute_equity(h1, h2)?;
        if !counts.is_consistent() {
            return Err(EquityError::InconsistentCounts {
                hand1: *h1,
                hand2: *h2,
            });
        }

        let result = EquityResult::from_counts(*h1, *h2, counts);
        self.insert(result)?;
        self.computed += 1;

        log::debug!(
            "computed {} vs {}: win {:.4} tie {:.4}",
            result.favored,
            result.unfavored,
            result.p_favored_wins(),
            result.p_tie()
        );

        Ok(result)
    }

    /// Add a result. A second entry for the same pair is an error.
    pub fn insert(&mut self, result: EquityResult) -> Result<(), EquityError> {
        match self.entries.entry(result.pair()) {
            Entry::Occupied(_) => Err(EquityError::CacheCollision {
                hand1: result.favored,
                hand2: result.unfavored,
            }),
            Entry::Vacant(slot) => {
                slot.insert(result);
                Ok(())
            }
        }
    }

    /// Cached result, without computing.
    pub fn get(&self, h1: &HoleCards, h2: &HoleCards) -> Option<&EquityResult> {
        self.entries.get(&HandPair::new(*h1, *h2))
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pairs computed by the engine since the cache was built.
    pub fn computed(&self) -> usize {
        self.computed
    }

    /// Iterate over cached results.
    pub fn entries(&self) -> impl Iterator<Item = &EquityResult> {
        self.entries.values()
    }

    /// Access the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl Default for EquityCache<ExhaustiveEngine> {
    fn default() -> Self {
        Self::new(ExhaustiveEngine::new())
    }
}
