//! Computer opponent strategies and personalities

use std::collections::HashSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::error::StrategyError;
use crate::moves::Move;
use crate::random::SeededRng;

/// How the computer picks its move each round
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Strategy {
    /// Always the same move.
    Fixed(Move),
    /// Any of the five moves, equally likely.
    Uniform,
    /// Percent weights over a subset of moves.
    Weighted(Weights),
    /// Equally likely among a subset of moves.
    Restricted(MoveSet),
}

/// Percent weights that are known to total 100
#[derive(Clone, Debug, Serialize)]
pub struct Weights {
    entries: Vec<(Move, u8)>,
    #[serde(skip)]
    index: WeightedIndex<u32>,
}

impl PartialEq for Weights {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Weights {}

/// A non-empty set of distinct moves
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveSet(Vec<Move>);

impl Weights {
    pub fn entries(&self) -> &[(Move, u8)] {
        &self.entries
    }
}

impl MoveSet {
    pub fn moves(&self) -> &[Move] {
        &self.0
    }
}

fn check_distinct<'a>(moves: impl IntoIterator<Item = &'a Move>) -> Result<(), StrategyError> {
    let mut seen = HashSet::new();
    for m in moves {
        if !seen.insert(*m) {
            return Err(StrategyError::DuplicateMove(m.to_string()));
        }
    }
    Ok(())
}

impl Strategy {
    /// Weighted choice. Weights are percentages and must total exactly 100.
    pub fn weighted(entries: &[(Move, u8)]) -> Result<Self, StrategyError> {
        if entries.is_empty() {
            return Err(StrategyError::Empty);
        }
        check_distinct(entries.iter().map(|(m, _)| m))?;
        if let Some((m, _)) = entries.iter().find(|(_, w)| *w == 0) {
            return Err(StrategyError::ZeroWeight(m.to_string()));
        }
        let total: u32 = entries.iter().map(|(_, w)| *w as u32).sum();
        if total != 100 {
            return Err(StrategyError::WeightsNotTotal(total));
        }
        let index = WeightedIndex::new(entries.iter().map(|(_, w)| *w as u32))?;
        Ok(Strategy::Weighted(Weights { entries: entries.to_vec(), index }))
    }

    /// Uniform choice restricted to `moves`.
    pub fn restricted(moves: &[Move]) -> Result<Self, StrategyError> {
        if moves.is_empty() {
            return Err(StrategyError::Empty);
        }
        check_distinct(moves)?;
        Ok(Strategy::Restricted(MoveSet(moves.to_vec())))
    }

    /// Pick a move. Only consumes randomness; never fails.
    pub fn choose(&self, rng: &mut SeededRng) -> Move {
        match self {
            Strategy::Fixed(m) => *m,
            Strategy::Uniform => pick_move(&Move::ALL, rng),
            Strategy::Weighted(w) => w.entries[w.index.sample(rng)].0,
            Strategy::Restricted(set) => pick_move(&set.0, rng),
        }
    }
}

// Callers only pass non-empty slices.
fn pick_move(moves: &[Move], rng: &mut SeededRng) -> Move {
    moves.choose(rng).copied().unwrap_or(Move::Rock)
}

/// A named computer opponent bound to one strategy for a match
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Personality {
    pub name: String,
    pub strategy: Strategy,
}

impl Personality {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }

    /// The built-in opponents. Weighted entries are validated here.
    pub fn roster() -> Result<Vec<Personality>, StrategyError> {
        Ok(vec![
            Personality::new("R2D2", Strategy::Fixed(Move::Rock)),
            Personality::new(
                "Hal",
                Strategy::weighted(&[(Move::Scissors, 80), (Move::Rock, 20)])?,
            ),
            Personality::new(
                "Chappie",
                Strategy::weighted(&[
                    (Move::Rock, 10),
                    (Move::Paper, 20),
                    (Move::Scissors, 30),
                    (Move::Spock, 40),
                ])?,
            ),
            Personality::new("Sonny", Strategy::restricted(&[Move::Paper, Move::Spock])?),
            Personality::new("Number 5", Strategy::Fixed(Move::Lizard)),
            Personality::new("Wall-E", Strategy::Uniform),
        ])
    }

    /// Pick an opponent uniformly from `roster`. `None` only for an empty roster.
    pub fn pick(roster: &[Personality], rng: &mut SeededRng) -> Option<Personality> {
        let chosen = roster.choose(rng)?.clone();
        log::debug!("computer personality: {} ({:?})", chosen.name, chosen.strategy);
        Some(chosen)
    }

    pub fn choose(&self, rng: &mut SeededRng) -> Move {
        self.strategy.choose(rng)
    }

    /// One-line description shown when the opponent is introduced
    pub fn describe(&self) -> String {
        match &self.strategy {
            Strategy::Fixed(m) => format!("Always plays {}.", m),
            Strategy::Uniform => "Plays anything, equally often.".to_string(),
            Strategy::Weighted(w) => {
                let parts: Vec<String> = w
                    .entries()
                    .iter()
                    .map(|(m, p)| format!("{} {}%", m, p))
                    .collect();
                format!("Favours {}.", parts.join(", "))
            }
            Strategy::Restricted(set) => {
                let parts: Vec<&str> = set.moves().iter().map(|m| m.label()).collect();
                format!("Only ever plays {}.", parts.join(" or "))
            }
        }
    }
}
