//! Literal markers of the hand history format.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cards::HoleCards;

/// Text that identifies each event in a hand history.
///
/// Matching is by substring, case sensitive. The defaults describe Full Tilt
/// Poker logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogMarkers {
    /// Banner that opens every hand.
    pub new_hand: String,
    /// Start of the preflop betting round.
    pub hole_cards: String,
    /// Start of the flop.
    pub flop: String,
    /// Start of the hand summary.
    pub summary: String,
    /// Action text of a player going all in.
    pub all_in: String,
    /// Action text of a call.
    pub calls: String,
    /// Word marking the winning hand in the summary.
    pub won: String,
    /// Lines containing this character are chat or seat lines, not actions.
    pub name_separator: char,
}

impl LogMarkers {
    /// Full Tilt Poker markers.
    pub fn full_tilt() -> Self {
        Self {
            new_hand: "Full Tilt Poker Game".to_string(),
            hole_cards: "*** HOLE CARDS ***".to_string(),
            flop: "*** FLOP ***".to_string(),
            summary: "*** SUMMARY ***".to_string(),
            all_in: "all in".to_string(),
            calls: "calls".to_string(),
            won: "won".to_string(),
            name_separator: ':',
        }
    }

    /// Replace the new hand banner.
    pub fn with_new_hand(mut self, banner: impl Into<String>) -> Self {
        self.new_hand = banner.into();
        self
    }
}

impl Default for LogMarkers {
    fn default() -> Self {
        Self::full_tilt()
    }
}

/// An event found on one line of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Hole cards were dealt.
    HoleCards,
    /// A player went all in.
    AllIn,
    /// A player called.
    Calls,
    /// The flop was dealt.
    Flop,
    /// The hand summary starts.
    Summary,
    /// A new hand starts.
    NewHand,
    /// Two cards shown in brackets, `won` when the line announces a win.
    Revealed {
        /// The cards shown.
        hand: HoleCards,
        /// The line announces a win.
        won: bool,
    },
}

lazy_static! {
    /// Two cards in brackets, as shown at showdown.
    static ref REVEALED_PATTERN: Regex = Regex::new(r"\[(\w\w \w\w)\]").unwrap();
}

/// Finds markers in log lines.
#[derive(Debug, Clone)]
pub struct MarkerScanner {
    markers: LogMarkers,
}

impl MarkerScanner {
    /// Scanner for the given markers.
    pub fn new(markers: LogMarkers) -> Self {
        Self { markers }
    }

    /// Markers this scanner looks for.
    pub fn markers(&self) -> &LogMarkers {
        &self.markers
    }

    /// Append every marker on `line` to `out`, in the order the parser must
    /// apply them.
    ///
    /// One line can carry several events, "calls 1,200, and is all in" is
    /// both a call and an all in.
    pub fn scan(&self, line: &str, out: &mut Vec<Marker>) {
        let m = &self.markers;

        if line.contains(m.hole_cards.as_str()) {
            out.push(Marker::HoleCards);
        }

        let is_action = !line.contains(m.name_separator);
        if is_action && line.contains(m.all_in.as_str()) {
            out.push(Marker::AllIn);
        }
        if is_action && line.contains(m.calls.as_str()) {
            out.push(Marker::Calls);
        }

        if line.contains(m.flop.as_str()) {
            out.push(Marker::Flop);
        }
        if line.contains(m.summary.as_str()) {
            out.push(Marker::Summary);
        }
        if line.contains(m.new_hand.as_str()) {
            out.push(Marker::NewHand);
        }

        if let Some(caps) = REVEALED_PATTERN.captures(line) {
            match HoleCards::parse(&caps[1]) {
                Ok(hand) => out.push(Marker::Revealed {
                    hand,
                    won: line.contains(m.won.as_str()),
                }),
                Err(e) => log::debug!("ignoring bracketed text {:?}: {e}", &caps[1]),
            }
        }
    }
}

impl Default for MarkerScanner {
    fn default() -> Self {
        Self::new(LogMarkers::default())
    }
}
