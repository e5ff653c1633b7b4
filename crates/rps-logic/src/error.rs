//! Error types for move parsing, replay answers and configuration

use rand::distributions::WeightedError;
use thiserror::Error;

/// A move label outside {rock, paper, scissors, lizard, spock}.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("invalid move `{0}`")]
pub struct InvalidMoveError(pub String);

/// A replay answer that is neither `y` nor `n`.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("answer must be y or n, got `{0}`")]
pub struct InvalidReplayAnswerError(pub String);

/// A malformed opponent strategy. Raised at construction, never while choosing.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum StrategyError {
    #[error("strategy has no moves to choose from")]
    Empty,
    #[error("move {0} is listed more than once")]
    DuplicateMove(String),
    #[error("weight for {0} must be positive")]
    ZeroWeight(String),
    #[error("weights sum to {0}%, expected 100%")]
    WeightsNotTotal(u32),
    #[error("weights rejected by sampler: {0}")]
    Sampler(#[from] WeightedError),
}

/// An unusable match configuration.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("winning score must be at least 1")]
    ZeroWinningScore,
}

/// Parse a yes/no answer, case-insensitive, ignoring surrounding whitespace.
pub fn parse_yes_no(input: &str) -> Result<bool, InvalidReplayAnswerError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(InvalidReplayAnswerError(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("y"), Ok(true));
        assert_eq!(parse_yes_no("N"), Ok(false));
        assert_eq!(parse_yes_no("  Y \n"), Ok(true));
    }

    #[test]
    fn test_parse_yes_no_rejects_words() {
        assert!(parse_yes_no("yes").is_err());
        assert!(parse_yes_no("").is_err());
        assert_eq!(
            parse_yes_no("maybe").unwrap_err().to_string(),
            "answer must be y or n, got `maybe`"
        );
    }
}
