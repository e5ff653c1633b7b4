//! Match state machine and the session loop

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::moves::Move;
use crate::random::SeededRng;
use crate::strategy::{Personality, Strategy};
use crate::{resolve, Outcome};

/// First to this many points wins (the original long game)
pub const CLASSIC_WINNING_SCORE: u32 = 10;

/// Short game
pub const QUICK_WINNING_SCORE: u32 = 3;

/// Configuration for a match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub winning_score: u32,
    /// Offer to show the round history after each match
    pub show_history: bool,
}

impl MatchConfig {
    pub fn classic() -> Self {
        Self { winning_score: CLASSIC_WINNING_SCORE, show_history: true }
    }

    pub fn quick() -> Self {
        Self { winning_score: QUICK_WINNING_SCORE, show_history: true }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.winning_score == 0 {
            return Err(ConfigError::ZeroWinningScore);
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// One side of the table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub score: u32,
    pub current_move: Option<Move>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), score: 0, current_move: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Human,
    Computer,
}

/// A completed round, with the score right after it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub human_move: Move,
    pub computer_move: Move,
    pub outcome: Outcome,
    pub human_score: u32,
    pub computer_score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchState {
    AwaitingRoundInput,
    RoundResolved,
    MatchComplete,
    AwaitingReplayDecision,
    Terminated,
}

/// Scores, round counter and history for the current match.
///
/// The only writer of score and history; every mutation goes through
/// [`Match::play_round`] or [`Match::new_match`].
#[derive(Clone, Debug)]
pub struct Match {
    config: MatchConfig,
    human: Player,
    computer: Player,
    personality: Personality,
    round: u32,
    history: Vec<RoundRecord>,
    state: MatchState,
}

impl Match {
    pub fn new(
        config: MatchConfig,
        human_name: impl Into<String>,
        personality: Personality,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config, human_name, personality))
    }

    fn with_valid_config(
        config: MatchConfig,
        human_name: impl Into<String>,
        personality: Personality,
    ) -> Self {
        Self {
            config,
            human: Player::new(human_name),
            computer: Player::new(personality.name.clone()),
            personality,
            round: 1,
            history: Vec::new(),
            state: MatchState::AwaitingRoundInput,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn human(&self) -> &Player {
        &self.human
    }

    pub fn computer(&self) -> &Player {
        &self.computer
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    /// Number of the next round to be played (1-based)
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.winner().is_some()
    }

    /// The side that reached the winning score, if any
    pub fn winner(&self) -> Option<Side> {
        let target = self.config.winning_score;
        if self.human.score >= target {
            Some(Side::Human)
        } else if self.computer.score >= target {
            Some(Side::Computer)
        } else {
            None
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Human => &self.human,
            Side::Computer => &self.computer,
        }
    }

    /// Whether a round may be played in the current state
    pub fn accepts_rounds(&self) -> bool {
        matches!(self.state, MatchState::AwaitingRoundInput | MatchState::RoundResolved)
    }

    /// Let the computer pick with its personality, then play the round.
    ///
    /// Returns `None`, without consuming randomness, once the match no longer
    /// accepts rounds.
    pub fn play_round(&mut self, human_move: Move, rng: &mut SeededRng) -> Option<&RoundRecord> {
        if !self.accepts_rounds() {
            return None;
        }
        let computer_move = self.personality.choose(rng);
        self.apply_moves(human_move, computer_move)
    }

    /// Resolve one round with both moves known.
    ///
    /// Returns `None` and leaves scores and history untouched once the match
    /// is complete, awaiting a replay decision, or terminated.
    pub fn apply_moves(&mut self, human_move: Move, computer_move: Move) -> Option<&RoundRecord> {
        if !self.accepts_rounds() {
            log::warn!("round ignored in state {:?}", self.state);
            return None;
        }

        self.human.current_move = Some(human_move);
        self.computer.current_move = Some(computer_move);

        let outcome = resolve(human_move, computer_move);
        match outcome {
            Outcome::HumanWins => self.human.score += 1,
            Outcome::ComputerWins => self.computer.score += 1,
            Outcome::Tie => {}
        }

        self.history.push(RoundRecord {
            round: self.round,
            human_move,
            computer_move,
            outcome,
            human_score: self.human.score,
            computer_score: self.computer.score,
        });
        self.round += 1;

        self.state = if self.is_complete() {
            MatchState::MatchComplete
        } else {
            MatchState::RoundResolved
        };

        log::debug!(
            "round {}: {} vs {} -> {:?} ({}-{})",
            self.round - 1,
            human_move,
            computer_move,
            outcome,
            self.human.score,
            self.computer.score
        );

        self.history.last()
    }

    pub fn await_replay_decision(&mut self) {
        debug_assert_eq!(self.state, MatchState::MatchComplete);
        self.state = MatchState::AwaitingReplayDecision;
    }

    /// Start over against `personality`: scores to zero, round to 1, history cleared.
    pub fn new_match(&mut self, personality: Personality) {
        self.human.score = 0;
        self.human.current_move = None;
        self.computer = Player::new(personality.name.clone());
        self.personality = personality;
        self.round = 1;
        self.history.clear();
        self.state = MatchState::AwaitingRoundInput;
        log::debug!("new match against {}", self.personality.name);
    }

    pub fn terminate(&mut self) {
        self.state = MatchState::Terminated;
    }
}

/// Serialize a match history as a JSON array
pub fn history_json(history: &[RoundRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(history)
}

/// Something the console should show. Purely presentational.
#[derive(Clone, Copy, Debug)]
pub enum Event<'a> {
    Welcome { winning_score: u32 },
    OpponentIntroduced { personality: &'a Personality },
    RoundPlayed { game: &'a Match, record: &'a RoundRecord },
    MatchWon { game: &'a Match, winner: Side },
    History { game: &'a Match },
    Goodbye,
}

/// The console collaborator. Inputs arrive already validated.
pub trait Terminal {
    type Error;

    /// A non-empty display name for the human
    fn read_player_name(&mut self) -> Result<String, Self::Error>;

    fn read_move_choice(&mut self) -> Result<Move, Self::Error>;

    fn read_yes_no(&mut self, prompt: &str) -> Result<bool, Self::Error>;

    fn announce(&mut self, event: Event<'_>) -> Result<(), Self::Error>;
}

/// Totals across every match of a session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub matches_played: u32,
    pub human_wins: u32,
    pub computer_wins: u32,
}

/// Runs matches until the player declines a replay
pub struct Session {
    config: MatchConfig,
    roster: Vec<Personality>,
    seed: [u8; 32],
}

impl Session {
    pub fn new(
        config: MatchConfig,
        roster: Vec<Personality>,
        seed: [u8; 32],
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, roster, seed })
    }

    // An empty roster falls back to a uniform opponent.
    fn pick_opponent(&self, rng: &mut SeededRng) -> Personality {
        Personality::pick(&self.roster, rng)
            .unwrap_or_else(|| Personality::new("Wall-E", Strategy::Uniform))
    }

    pub fn run<T: Terminal>(&self, terminal: &mut T) -> Result<SessionSummary, T::Error> {
        terminal.announce(Event::Welcome { winning_score: self.config.winning_score })?;
        let name = terminal.read_player_name()?;

        let mut summary = SessionSummary::default();
        let mut rng = SeededRng::new(&self.seed, 0);
        let personality = self.pick_opponent(&mut rng);
        let mut game = Match::with_valid_config(self.config.clone(), name, personality);

        loop {
            terminal.announce(Event::OpponentIntroduced { personality: game.personality() })?;

            let winner = loop {
                if let Some(side) = game.winner() {
                    break side;
                }
                let human_move = terminal.read_move_choice()?;
                let mut round_rng = rng.for_round(game.round());
                if game.play_round(human_move, &mut round_rng).is_none() {
                    continue;
                }
                if let Some(record) = game.history().last() {
                    terminal.announce(Event::RoundPlayed { game: &game, record })?;
                }
            };
            summary.matches_played += 1;
            match winner {
                Side::Human => summary.human_wins += 1,
                Side::Computer => summary.computer_wins += 1,
            }
            log::info!(
                "match {} won by {} in {} rounds",
                summary.matches_played,
                game.player(winner).name,
                game.history().len()
            );
            terminal.announce(Event::MatchWon { game: &game, winner })?;

            if self.config.show_history
                && terminal.read_yes_no("Would you like to see the round history?")?
            {
                terminal.announce(Event::History { game: &game })?;
            }

            game.await_replay_decision();
            if !terminal.read_yes_no("Would you like to play again?")? {
                game.terminate();
                break;
            }

            rng = SeededRng::new(&self.seed, summary.matches_played);
            let next = self.pick_opponent(&mut rng);
            game.new_match(next);
        }

        terminal.announce(Event::Goodbye)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{prop_assert, prop_assert_eq, proptest};
    use std::collections::VecDeque;

    fn fixed(name: &str, m: Move) -> Personality {
        Personality::new(name, Strategy::Fixed(m))
    }

    fn quick_match() -> Match {
        Match::new(MatchConfig::quick(), "Ada", fixed("R2D2", Move::Rock)).unwrap()
    }

    #[test]
    fn test_human_sweep_to_three() {
        let mut game = quick_match();

        game.apply_moves(Move::Rock, Move::Scissors);
        game.apply_moves(Move::Paper, Move::Rock);
        assert_eq!(game.state(), MatchState::RoundResolved);
        assert!(!game.is_complete());
        game.apply_moves(Move::Scissors, Move::Paper);

        assert_eq!(game.state(), MatchState::MatchComplete);
        assert_eq!(game.winner(), Some(Side::Human));
        assert_eq!(game.human().score, 3);
        assert_eq!(game.computer().score, 0);

        let rounds: Vec<u32> = game.history().iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
        assert_eq!(game.history()[2].outcome, Outcome::HumanWins);
        assert_eq!(game.history()[2].human_score, 3);
    }

    #[test]
    fn test_ties_never_end_match() {
        let mut game = quick_match();

        for i in 0..200 {
            let m = if i % 2 == 0 { Move::Rock } else { Move::Paper };
            let record = game.apply_moves(m, m).cloned().unwrap();
            assert_eq!(record.outcome, Outcome::Tie);
            assert_eq!((record.human_score, record.computer_score), (0, 0));
        }

        assert!(!game.is_complete());
        assert_eq!(game.round(), 201);
        assert_eq!(game.history().len(), 200);
    }

    #[test]
    fn test_computer_win_and_snapshot() {
        let mut game = quick_match();

        game.apply_moves(Move::Lizard, Move::Rock);
        game.apply_moves(Move::Spock, Move::Spock);
        let record = game.apply_moves(Move::Scissors, Move::Spock).cloned().unwrap();

        assert_eq!(record.round, 3);
        assert_eq!(record.outcome, Outcome::ComputerWins);
        assert_eq!((record.human_score, record.computer_score), (0, 2));
        assert_eq!(game.computer().current_move, Some(Move::Spock));
        assert_eq!(game.human().current_move, Some(Move::Scissors));
    }

    #[test]
    fn test_no_rounds_after_match_complete() {
        let mut game = quick_match();
        for _ in 0..3 {
            game.apply_moves(Move::Spock, Move::Rock);
        }
        assert_eq!(game.state(), MatchState::MatchComplete);
        assert!(!game.accepts_rounds());

        assert!(game.apply_moves(Move::Spock, Move::Rock).is_none());
        assert!(game.play_round(Move::Spock, &mut SeededRng::new(&[1u8; 32], 0)).is_none());
        assert_eq!(game.human().score, 3);
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.round(), 4);

        game.await_replay_decision();
        assert!(game.apply_moves(Move::Spock, Move::Rock).is_none());
        game.terminate();
        assert!(game.apply_moves(Move::Spock, Move::Rock).is_none());
        assert_eq!(game.human().score, 3);
    }

    #[test]
    fn test_new_match_resets() {
        let mut game = quick_match();
        for _ in 0..3 {
            game.apply_moves(Move::Paper, Move::Scissors);
        }
        assert_eq!(game.winner(), Some(Side::Computer));

        game.await_replay_decision();
        assert_eq!(game.state(), MatchState::AwaitingReplayDecision);
        game.new_match(fixed("Number 5", Move::Lizard));

        assert_eq!(game.state(), MatchState::AwaitingRoundInput);
        assert_eq!(game.human().score, 0);
        assert_eq!(game.computer().score, 0);
        assert_eq!(game.computer().name, "Number 5");
        assert_eq!(game.human().name, "Ada");
        assert_eq!(game.round(), 1);
        assert!(game.history().is_empty());
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_play_round_uses_personality() {
        let mut game = quick_match();
        let mut rng = SeededRng::new(&[1u8; 32], 0);

        let record = game.play_round(Move::Paper, &mut rng).cloned().unwrap();
        assert_eq!(record.computer_move, Move::Rock);
        assert_eq!(record.outcome, Outcome::HumanWins);
    }

    #[test]
    fn test_zero_winning_score_rejected() {
        let config = MatchConfig { winning_score: 0, show_history: false };
        assert_eq!(
            Match::new(config.clone(), "Ada", fixed("R2D2", Move::Rock)).unwrap_err(),
            ConfigError::ZeroWinningScore
        );
        assert!(Session::new(config, Vec::new(), [0u8; 32]).is_err());
    }

    #[test]
    fn test_history_json() {
        let mut game = quick_match();
        game.apply_moves(Move::Spock, Move::Rock);

        let json = history_json(game.history()).unwrap();
        let parsed: Vec<RoundRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, game.history());
        assert!(json.contains("\"human_wins\""));
        assert!(json.contains("\"spock\""));
    }

    proptest! {
        #[test]
        fn test_scores_move_by_at_most_one(
            rounds in proptest::collection::vec(
                (
                    proptest::sample::select(Move::ALL.to_vec()),
                    proptest::sample::select(Move::ALL.to_vec()),
                ),
                1..60,
            )
        ) {
            let mut game = quick_match();
            let mut previous = (0u32, 0u32);

            for (h, c) in rounds {
                if game.is_complete() {
                    break;
                }
                let record = game.apply_moves(h, c).cloned().unwrap();
                let gained = (record.human_score - previous.0) + (record.computer_score - previous.1);
                prop_assert!(gained <= 1);
                prop_assert_eq!(gained == 0, h == c);
                previous = (record.human_score, record.computer_score);
            }

            if let Some(side) = game.winner() {
                prop_assert_eq!(game.player(side).score, QUICK_WINNING_SCORE);
                let other = match side {
                    Side::Human => Side::Computer,
                    Side::Computer => Side::Human,
                };
                prop_assert!(game.player(other).score < QUICK_WINNING_SCORE);
            }
        }
    }

    /// Feeds canned input and records what was announced.
    struct ScriptedTerminal {
        moves: VecDeque<Move>,
        answers: VecDeque<bool>,
        events: Vec<String>,
        histories: Vec<usize>,
        opponents: Vec<String>,
        rounds: Vec<(String, Move)>,
    }

    impl ScriptedTerminal {
        fn new(moves: &[Move], answers: &[bool]) -> Self {
            Self {
                moves: moves.iter().copied().collect(),
                answers: answers.iter().copied().collect(),
                events: Vec::new(),
                histories: Vec::new(),
                opponents: Vec::new(),
                rounds: Vec::new(),
            }
        }
    }

    impl Terminal for ScriptedTerminal {
        type Error = String;

        fn read_player_name(&mut self) -> Result<String, String> {
            Ok("Ada".to_string())
        }

        fn read_move_choice(&mut self) -> Result<Move, String> {
            self.moves.pop_front().ok_or_else(|| "out of moves".to_string())
        }

        fn read_yes_no(&mut self, _prompt: &str) -> Result<bool, String> {
            self.answers.pop_front().ok_or_else(|| "out of answers".to_string())
        }

        fn announce(&mut self, event: Event<'_>) -> Result<(), String> {
            let line = match event {
                Event::Welcome { winning_score } => format!("welcome {}", winning_score),
                Event::OpponentIntroduced { personality } => {
                    self.opponents.push(personality.name.clone());
                    format!("vs {}", personality.name)
                }
                Event::RoundPlayed { game, record } => {
                    self.rounds.push((game.personality().name.clone(), record.computer_move));
                    format!("round {}", record.round)
                }
                Event::MatchWon { game, winner } => format!("won {}", game.player(winner).name),
                Event::History { game } => {
                    self.histories.push(game.history().len());
                    "history".to_string()
                }
                Event::Goodbye => "goodbye".to_string(),
            };
            self.events.push(line);
            Ok(())
        }
    }

    #[test]
    fn test_session_two_matches() {
        let session = Session::new(
            MatchConfig::quick(),
            vec![fixed("R2D2", Move::Rock)],
            [7u8; 32],
        )
        .unwrap();
        let mut terminal = ScriptedTerminal::new(
            &[
                Move::Paper, Move::Rock, Move::Paper, Move::Paper,
                Move::Scissors, Move::Scissors, Move::Scissors,
            ],
            // history?, replay?, history?, replay?
            &[true, true, false, false],
        );

        let summary = session.run(&mut terminal).unwrap();

        assert_eq!(
            summary,
            SessionSummary { matches_played: 2, human_wins: 1, computer_wins: 1 }
        );
        assert_eq!(terminal.histories, vec![4]);
        assert!(terminal.answers.is_empty());
        assert_eq!(terminal.events.first().map(String::as_str), Some("welcome 3"));
        assert_eq!(terminal.events.last().map(String::as_str), Some("goodbye"));
        assert!(terminal.events.contains(&"won Ada".to_string()));
        assert!(terminal.events.contains(&"won R2D2".to_string()));
        assert!(terminal.moves.is_empty());
    }

    #[test]
    fn test_session_without_history() {
        let config = MatchConfig { winning_score: 1, show_history: false };
        let session = Session::new(config, vec![fixed("Hal", Move::Scissors)], [3u8; 32]).unwrap();
        let mut terminal = ScriptedTerminal::new(&[Move::Spock], &[false]);

        let summary = session.run(&mut terminal).unwrap();

        assert_eq!(summary.human_wins, 1);
        assert!(terminal.histories.is_empty());
        assert_eq!(
            terminal.events,
            vec!["welcome 1", "vs Hal", "round 1", "won Ada", "goodbye"]
        );
    }

    #[test]
    fn test_session_propagates_terminal_error() {
        let session = Session::new(MatchConfig::quick(), Vec::new(), [0u8; 32]).unwrap();
        let mut terminal = ScriptedTerminal::new(&[Move::Rock], &[]);

        assert_eq!(session.run(&mut terminal), Err("out of moves".to_string()));
    }

    fn fixed_roster() -> Vec<Personality> {
        vec![
            fixed("Boulder", Move::Rock),
            fixed("Origami", Move::Paper),
            fixed("Shears", Move::Scissors),
            fixed("Gecko", Move::Lizard),
        ]
    }

    // Spock never ties against the roster, so every match lasts exactly two rounds.
    fn play_roster_session(seed: [u8; 32], matches: usize) -> ScriptedTerminal {
        let config = MatchConfig { winning_score: 2, show_history: false };
        let session = Session::new(config, fixed_roster(), seed).unwrap();
        let mut answers = vec![true; matches - 1];
        answers.push(false);
        let mut terminal = ScriptedTerminal::new(&vec![Move::Spock; matches * 2], &answers);

        let summary = session.run(&mut terminal).unwrap();
        assert_eq!(summary.matches_played as usize, matches);
        assert!(terminal.moves.is_empty());
        terminal
    }

    #[test]
    fn test_session_personality_fixed_within_match() {
        let roster = fixed_roster();
        let terminal = play_roster_session([42u8; 32], 12);

        assert_eq!(terminal.opponents.len(), 12);
        assert_eq!(terminal.rounds.len(), 24);
        for (i, pair) in terminal.rounds.chunks(2).enumerate() {
            let introduced = &terminal.opponents[i];
            let expected = roster.iter().find(|p| &p.name == introduced).unwrap();
            for (name, computer_move) in pair {
                assert_eq!(name, introduced, "match {} switched opponent", i + 1);
                assert_eq!(expected.strategy, Strategy::Fixed(*computer_move));
            }
        }
    }

    #[test]
    fn test_session_redraws_personality_per_match() {
        let first = play_roster_session([42u8; 32], 12);
        let distinct: std::collections::HashSet<_> = first.opponents.iter().collect();
        assert!(distinct.len() > 1, "same opponent every match: {:?}", first.opponents);

        let again = play_roster_session([42u8; 32], 12);
        assert_eq!(first.opponents, again.opponents);

        let other = play_roster_session([43u8; 32], 12);
        assert_ne!(first.opponents, other.opponents);
    }
}
