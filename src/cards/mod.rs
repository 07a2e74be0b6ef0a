//! Cards and hand ranking.
//!
//! ## Modules
//!
//! - `card`: Card, hole cards and deck representations
//! - `hand_eval`: Poker hand evaluation for 5-7 cards

pub mod card;
pub mod hand_eval;

pub use card::{rank_value, Card, CardParseError, Deck, HoleCards};
pub use hand_eval::{HandCategory, HandEvaluator, HandRank};
