//! Starting hand classification.
//!
//! Maps two hole cards to one of the 169 canonical classes and orders
//! classes with an externally supplied best-to-worst list.
//!
//! ## Modules
//!
//! - `class`: The `HandClass` type and its text form
//! - `ranking`: `ClassRanking`, a best-to-worst class order

pub mod class;
pub mod ranking;

pub use class::{HandClass, NUM_CLASSES};
pub use ranking::ClassRanking;

/// Error type for hand class parsing and ranking files.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// Text is not a hand class.
    #[error("invalid hand class: {0:?}")]
    InvalidClass(String),
    /// Class listed more than once.
    #[error("hand class {0} listed twice")]
    DuplicateClass(String),
    /// Ranking file could not be read.
    #[error("cannot read hand ranking {path}: {source}")]
    Io {
        /// Ranking file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
