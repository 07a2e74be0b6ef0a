//! Card representation for hand histories.
//!
//! This module provides the card types shared by the parser, the equity
//! engine and the classifier:
//! - `Card`: A single playing card with rank and suit
//! - `HoleCards`: A player's two private cards, stored in canonical order
//! - `Deck`: The cards left after removing dead cards

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank characters, lowest to highest.
pub(crate) const RANK_CHARS: [char; 13] =
    ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display.
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// Numeric value of a rank symbol, 1 for a deuce up to 13 for an ace.
pub fn rank_value(symbol: char) -> Option<u8> {
    RANK_CHARS
        .iter()
        .position(|&c| c == symbol.to_ascii_uppercase())
        .map(|idx| idx as u8 + 1)
}

/// Error type for card parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardParseError {
    /// Not a two character card token.
    #[error("invalid card token: {0:?}")]
    InvalidCard(String),
    /// Unknown rank symbol.
    #[error("invalid rank character: {0}")]
    InvalidRank(char),
    /// Unknown suit symbol.
    #[error("invalid suit character: {0}")]
    InvalidSuit(char),
    /// Not exactly two cards.
    #[error("expected two cards, got {0:?}")]
    InvalidHand(String),
    /// Both cards are the same card.
    #[error("duplicate card in hand: {0}")]
    DuplicateCard(Card),
}

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit
    id: u8,
}

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self { id: rank * 4 + suit }
    }

    /// Create a card from its ID (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self { id }
    }

    /// Parse a card from a string like "As", "Kh", "2c".
    pub fn parse(s: &str) -> Result<Self, CardParseError> {
        let mut chars = s.chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::InvalidCard(s.to_string()));
        };

        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == r.to_ascii_uppercase())
            .ok_or(CardParseError::InvalidRank(r))?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == u.to_ascii_lowercase())
            .ok_or(CardParseError::InvalidSuit(u))?;

        Ok(Self::new(rank as u8, suit as u8))
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Get the card's rank (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Get the card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank() as usize]
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A player's two hole cards.
///
/// The cards are kept in canonical order (higher rank first, ties broken by
/// suit) so two hands holding the same cards always compare equal, whatever
/// order the log printed them in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HoleCards {
    /// First card (higher rank).
    pub card1: Card,
    /// Second card.
    pub card2: Card,
}

impl HoleCards {
    /// Create hole cards, ordering by rank (higher first).
    pub fn new(card1: Card, card2: Card) -> Self {
        if card1.id() >= card2.id() {
            Self { card1, card2 }
        } else {
            Self {
                card1: card2,
                card2: card1,
            }
        }
    }

    /// Parse hole cards from a string like "Ah Ks" or "AhKs".
    pub fn parse(s: &str) -> Result<Self, CardParseError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.chars().count() != 4 || !compact.is_ascii() {
            return Err(CardParseError::InvalidHand(s.to_string()));
        }

        let c1 = Card::parse(&compact[0..2])?;
        let c2 = Card::parse(&compact[2..4])?;
        if c1 == c2 {
            return Err(CardParseError::DuplicateCard(c1));
        }

        Ok(Self::new(c1, c2))
    }

    /// Check if hole cards are suited.
    pub fn is_suited(&self) -> bool {
        self.card1.suit() == self.card2.suit()
    }

    /// Check if a card conflicts with these hole cards.
    pub fn contains(&self, card: Card) -> bool {
        self.card1 == card || self.card2 == card
    }

    /// Check if two hands hold a common card.
    pub fn conflicts_with(&self, other: &HoleCards) -> bool {
        other.contains(self.card1) || other.contains(self.card2)
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.card1, self.card2)
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

impl std::str::FromStr for HoleCards {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HoleCards {
    type Error = CardParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<HoleCards> for String {
    fn from(hand: HoleCards) -> Self {
        hand.to_string()
    }
}

/// The cards left in a 52 cards deck once dead cards are removed.
#[derive(Clone)]
pub struct Deck {
    /// Live cards first, in id order.
    cards: [Card; 52],
    /// Number of live cards.
    size: usize,
}

impl Deck {
    /// Create a full deck in standard order.
    pub fn new() -> Self {
        let mut cards = [Card::from_id(0); 52];
        for (i, card) in cards.iter_mut().enumerate() {
            *card = Card::from_id(i as u8);
        }
        Self { cards, size: 52 }
    }

    /// Create a deck with specific cards removed.
    pub fn without(dead_cards: &[Card]) -> Self {
        let mut deck = Self::new();
        let mut write_idx = 0;
        for id in 0..52u8 {
            let card = Card::from_id(id);
            if !dead_cards.contains(&card) {
                deck.cards[write_idx] = card;
                write_idx += 1;
            }
        }
        deck.size = write_idx;
        deck
    }

    /// Get the number of live cards.
    pub fn remaining(&self) -> usize {
        self.size
    }

    /// Get the live cards as a slice.
    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[..self.size]
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} remaining)", self.remaining())
    }
}
