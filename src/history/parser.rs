//! Hand history state machine.
//!
//! The parser walks a log line by line. Each hand block goes through
//! `Seeking -> InOpening -> InResolution` and is flushed when the next
//! banner appears or the input ends. A block is emitted when it is of
//! interest (two all ins, or an all in followed by a call, before the flop)
//! and exactly two hands were revealed in its summary.

use std::io::BufRead;
use std::mem;

use crate::cards::HoleCards;

use super::markers::{LogMarkers, Marker, MarkerScanner};
use super::{HeadsUpAllIn, HistoryError};

/// Where the parser is inside a hand block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Between the banner and the hole cards, or after the flop.
    #[default]
    Seeking,
    /// Preflop betting.
    InOpening,
    /// Hand summary, revealed hands are collected here.
    InResolution,
}

/// Everything tracked for the current hand block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Block {
    all_in_seen: bool,
    call_seen: bool,
    of_interest: bool,
    hands: Vec<HoleCards>,
    winner: Option<HoleCards>,
    winners: usize,
}

impl Block {
    fn committed(&self) -> bool {
        self.all_in_seen && self.call_seen
    }

    /// The record for this block, if it qualifies.
    fn qualifying(&self) -> Option<HeadsUpAllIn> {
        match (self.of_interest, self.hands.as_slice()) {
            (true, [h1, h2]) => Some(HeadsUpAllIn {
                hands: [*h1, *h2],
                winner: self.winner,
                winners: self.winners,
            }),
            _ => None,
        }
    }
}

/// Apply one marker. Returns the next state and the record of a block
/// closed by this marker, if it qualified.
fn transition(
    state: ParserState,
    marker: Marker,
    block: &mut Block,
) -> (ParserState, Option<HeadsUpAllIn>) {
    use ParserState::*;

    match (state, marker) {
        (_, Marker::HoleCards) => {
            *block = Block::default();
            (InOpening, None)
        }

        (InOpening, Marker::AllIn) => {
            if block.all_in_seen {
                block.of_interest = true;
            }
            block.all_in_seen = true;
            (InOpening, None)
        }

        (InOpening, Marker::Calls) => {
            if block.all_in_seen {
                block.call_seen = true;
            }
            (InOpening, None)
        }

        (state, Marker::Flop) => {
            if block.committed() {
                block.of_interest = true;
            }
            let next = if state == InOpening { Seeking } else { state };
            (next, None)
        }

        (_, Marker::Summary) => {
            if block.committed() {
                block.of_interest = true;
            }
            (InResolution, None)
        }

        (_, Marker::NewHand) => {
            let record = mem::take(block).qualifying();
            (Seeking, record)
        }

        (InResolution, Marker::Revealed { hand, won }) => {
            block.hands.push(hand);
            if won {
                block.winner = Some(hand);
                block.winners += 1;
            }
            (InResolution, None)
        }

        (state, _) => (state, None),
    }
}

/// Counters for one parsed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines read.
    pub lines: usize,
    /// Hand banners seen.
    pub blocks: usize,
    /// Records emitted.
    pub emitted: usize,
}

/// Extracts heads-up preflop all ins from hand histories.
#[derive(Debug, Clone)]
pub struct LogParser {
    scanner: MarkerScanner,
    state: ParserState,
    block: Block,
    pending: Vec<Marker>,
}

impl LogParser {
    /// Parser for logs using `markers`.
    pub fn new(markers: LogMarkers) -> Self {
        Self {
            scanner: MarkerScanner::new(markers),
            state: ParserState::Seeking,
            block: Block::default(),
            pending: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Feed one line. A line holds at most one banner, so at most one
    /// record can come out.
    pub fn feed_line(&mut self, line: &str) -> Option<HeadsUpAllIn> {
        self.pending.clear();
        self.scanner.scan(line, &mut self.pending);

        let mut emitted = None;
        for &marker in &self.pending {
            let (next, record) = transition(self.state, marker, &mut self.block);
            self.state = next;
            if record.is_some() {
                emitted = record;
            }
        }
        emitted
    }

    /// End of input: flush the open block and reset.
    pub fn finish(&mut self) -> Option<HeadsUpAllIn> {
        self.state = ParserState::Seeking;
        mem::take(&mut self.block).qualifying()
    }

    /// Parse a whole log, handing each record to `emit` as it is found.
    ///
    /// Any block still open when the reader runs out is flushed, so one
    /// parser should be used per log file.
    pub fn parse_reader<R, F>(&mut self, reader: R, mut emit: F) -> Result<ParseStats, HistoryError>
    where
        R: BufRead,
        F: FnMut(HeadsUpAllIn),
    {
        let mut stats = ParseStats::default();
        let banner = self.scanner.markers().new_hand.clone();

        for line in reader.lines() {
            let line = line.map_err(HistoryError::Read)?;
            stats.lines += 1;
            if line.contains(banner.as_str()) {
                stats.blocks += 1;
            }
            if let Some(record) = self.feed_line(&line) {
                stats.emitted += 1;
                emit(record);
            }
        }

        if let Some(record) = self.finish() {
            stats.emitted += 1;
            emit(record);
        }

        Ok(stats)
    }

    /// Parse a log held in memory.
    pub fn parse_str(&mut self, text: &str) -> Vec<HeadsUpAllIn> {
        let mut records = Vec::new();
        for line in text.lines() {
            records.extend(self.feed_line(line));
        }
        records.extend(self.finish());
        records
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(LogMarkers::default())
    }
}
