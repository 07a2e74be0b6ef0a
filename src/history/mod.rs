//! Hand history extraction.
//!
//! Scans plain text hand histories for hands that went to showdown heads-up
//! with a player all in before the flop.
//!
//! ## Modules
//!
//! - `markers`: Literal log markers and the per-line scanner
//! - `parser`: The hand block state machine

pub mod markers;
pub mod parser;

pub use markers::{LogMarkers, Marker, MarkerScanner};
pub use parser::{LogParser, ParseStats, ParserState};

use std::fs;
use std::path::{Path, PathBuf};

use crate::cards::HoleCards;

/// Error type for reading hand histories.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// A log file or directory could not be opened.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading a line failed.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),
}

/// A heads-up preflop all in that reached showdown with two revealed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadsUpAllIn {
    /// Both hands, in the order they were revealed.
    pub hands: [HoleCards; 2],
    /// Last hand announced as a winner.
    pub winner: Option<HoleCards>,
    /// Number of hands announced as winners.
    pub winners: usize,
}

impl HeadsUpAllIn {
    /// Every revealed hand won, the pot was split.
    pub fn is_draw(&self) -> bool {
        self.winners == self.hands.len()
    }

    /// The winner, when exactly one hand won.
    pub fn single_winner(&self) -> Option<HoleCards> {
        if self.winners == 1 {
            self.winner
        } else {
            None
        }
    }
}

/// Expand input paths into the log files to parse.
///
/// Files are taken as given. Directories contribute their `*.txt` files,
/// sorted by name. A path that does not exist is an error.
pub fn discover_logs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, HistoryError> {
    let mut logs = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let io_error = |source| HistoryError::Io {
            path: path.display().to_string(),
            source,
        };

        if fs::metadata(path).map_err(io_error)?.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(path).map_err(io_error)? {
                let file = entry.map_err(io_error)?.path();
                if file.is_file() && file.extension().is_some_and(|ext| ext == "txt") {
                    found.push(file);
                }
            }
            found.sort();
            log::debug!("{} logs in {}", found.len(), path.display());
            logs.extend(found);
        } else {
            logs.push(path.to_path_buf());
        }
    }

    Ok(logs)
}
