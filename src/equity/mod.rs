//! Heads-up preflop equity with a persistent memo.
//!
//! ## Modules
//!
//! - `engine`: The `EquityEngine` trait and the exhaustive board enumerator
//! - `cache`: `EquityCache`, memoizing one result per unordered hand pair
//! - `store`: JSON persistence and the save-on-exit `CacheSession`

pub mod cache;
pub mod engine;
pub mod store;

pub use cache::{EquityCache, EquityResult, HandPair};
pub use engine::{EquityCounts, EquityEngine, ExhaustiveEngine, PREFLOP_BOARDS};
pub use store::{load_cache, save_cache, CacheSession, StoreError};

use crate::cards::HoleCards;

/// Error type for equity computation and the cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquityError {
    /// The two hands hold a common card.
    #[error("hands {hand1} and {hand2} share a card")]
    SharedCard {
        /// First hand as given.
        hand1: HoleCards,
        /// Second hand as given.
        hand2: HoleCards,
    },
    /// A second result was inserted for a pair that is already cached.
    #[error("equity for {hand1} vs {hand2} is already cached")]
    CacheCollision {
        /// First hand as given.
        hand1: HoleCards,
        /// Second hand as given.
        hand2: HoleCards,
    },
    /// Engine returned counts that do not add up.
    #[error("inconsistent equity counts for {hand1} vs {hand2}")]
    InconsistentCounts {
        /// First hand as given.
        hand1: HoleCards,
        /// Second hand as given.
        hand2: HoleCards,
    },
}
