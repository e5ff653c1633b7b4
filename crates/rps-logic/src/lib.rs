//! Game logic for Rock, Paper, Scissors, Lizard, Spock
//!
//! Pure, I/O-free core shared by the console program:
//! - the move relation and round resolution
//! - computer personalities
//! - the match state machine, driven through a [`Terminal`]

mod error;
mod moves;
mod random;
mod strategy;
mod game;

pub use error::{parse_yes_no, ConfigError, InvalidMoveError, InvalidReplayAnswerError, StrategyError};
pub use moves::Move;
pub use random::{expand_seed, SeededRng};
pub use strategy::{MoveSet, Personality, Strategy, Weights};
pub use game::{
    history_json, Event, Match, MatchConfig, MatchState, Player, RoundRecord, Session,
    SessionSummary, Side, Terminal, CLASSIC_WINNING_SCORE, QUICK_WINNING_SCORE,
};

use serde::{Deserialize, Serialize};

/// Result of one round, from the human's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HumanWins,
    ComputerWins,
    Tie,
}

/// Resolve a round. Pure: scoring and history are the match's job.
pub fn resolve(human: Move, computer: Move) -> Outcome {
    if human.beats(computer) {
        Outcome::HumanWins
    } else if computer.beats(human) {
        Outcome::ComputerWins
    } else {
        Outcome::Tie
    }
}
