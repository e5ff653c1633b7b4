//! Move definitions and the win relation

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidMoveError;

/// A move in Rock, Paper, Scissors, Lizard, Spock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    Lizard,
    Spock,
}

impl Move {
    /// Every move, in prompt order.
    pub const ALL: [Move; 5] = [
        Move::Rock,
        Move::Paper,
        Move::Scissors,
        Move::Lizard,
        Move::Spock,
    ];

    /// The three-move classic game.
    pub const CLASSIC: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Moves this move defeats. The only place the rules live.
    pub const fn victims(self) -> &'static [Move] {
        match self {
            Move::Rock => &[Move::Scissors, Move::Lizard],
            Move::Paper => &[Move::Rock, Move::Spock],
            Move::Scissors => &[Move::Paper, Move::Lizard],
            Move::Lizard => &[Move::Paper, Move::Spock],
            Move::Spock => &[Move::Rock, Move::Scissors],
        }
    }

    pub fn beats(self, other: Move) -> bool {
        self.victims().contains(&other)
    }

    pub fn loses_to(self, other: Move) -> bool {
        other.beats(self)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
            Move::Lizard => "lizard",
            Move::Spock => "spock",
        }
    }

    /// Short form accepted at the prompt: r, p, sc, l, sp
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Move::Rock => "r",
            Move::Paper => "p",
            Move::Scissors => "sc",
            Move::Lizard => "l",
            Move::Spock => "sp",
        }
    }

    /// Parse a full label or its abbreviation.
    pub fn parse_abbreviated(input: &str) -> Result<Move, InvalidMoveError> {
        let needle = input.trim().to_ascii_lowercase();
        Move::ALL
            .into_iter()
            .find(|m| m.abbreviation() == needle)
            .map_or_else(|| input.parse(), Ok)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Move {
    type Err = InvalidMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Move::ALL
            .into_iter()
            .find(|m| m.label() == needle)
            .ok_or_else(|| InvalidMoveError(s.to_string()))
    }
}
