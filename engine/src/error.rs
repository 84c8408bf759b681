//! Errors raised by the game engine.
//!
//! Every variant belongs to one [`ErrorKind`], which is what callers use to
//! decide whether a failure is a user mistake or a broken contract.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind
{
    /// Bad user input; the game state was left untouched.
    Validation,
    /// A ruleset source or snapshot could not be parsed.
    Format,
    /// The operation exists but is deliberately not supported.
    Unsupported,
    /// The game is not in a state where the operation is allowed.
    State,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameError
{
    // Validation
    EmptyPlayerName,
    EmptyRuleText,
    PlayerNotFound { name: String, players: Vec<String> },

    // Format
    InvalidCard { encoded: String },
    InvalidRank { line: usize, value: String },
    RuleCount { expected: usize, found: usize },
    DuplicateRule { rank: u8 },
    MalformedRuleset { line: usize, reason: &'static str },
    InvalidSnapshotField { field: &'static str, value: String },
    RulesetIo(String),

    // Unsupported
    Unsupported { operation: &'static str },

    // State
    NoPlayers,
    DeckExhausted,
    MissingRule { rank: u8 },
    TurnCounterOverflow,
}

impl GameError
{
    pub fn kind(&self) -> ErrorKind
    {
        match self
        {
            GameError::EmptyPlayerName
            | GameError::EmptyRuleText
            | GameError::PlayerNotFound { .. } => ErrorKind::Validation,

            GameError::InvalidCard { .. }
            | GameError::InvalidRank { .. }
            | GameError::RuleCount { .. }
            | GameError::DuplicateRule { .. }
            | GameError::MalformedRuleset { .. }
            | GameError::InvalidSnapshotField { .. }
            | GameError::RulesetIo(_) => ErrorKind::Format,

            GameError::Unsupported { .. } => ErrorKind::Unsupported,

            GameError::NoPlayers
            | GameError::DeckExhausted
            | GameError::MissingRule { .. }
            | GameError::TurnCounterOverflow => ErrorKind::State,
        }
    }
}

impl fmt::Display for GameError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            GameError::EmptyPlayerName => write!(f, "Error: Empty username."),
            GameError::EmptyRuleText => write!(f, "Error: Empty rule."),
            GameError::PlayerNotFound { name, players } =>
            {
                write!(
                    f,
                    "Error: Cannot remove unknown player: {} from player list: {}",
                    name,
                    players.join(", ")
                )
            }

            GameError::InvalidCard { encoded } => write!(f, "Invalid card encoding: {:?}", encoded),
            GameError::InvalidRank { line, value } =>
            {
                write!(f, "Invalid rank {:?} on ruleset line {}", value, line)
            }
            GameError::RuleCount { expected, found } =>
            {
                write!(f, "Expected {} rules, but only got {} rules.", expected, found)
            }
            GameError::DuplicateRule { rank } => write!(f, "Rank {} is defined more than once", rank),
            GameError::MalformedRuleset { line, reason } => write!(f, "Ruleset line {}: {}", line, reason),
            GameError::InvalidSnapshotField { field, value } =>
            {
                write!(f, "Invalid value {:?} for snapshot field '{}'", value, field)
            }
            GameError::RulesetIo(msg) => write!(f, "Could not read ruleset: {}", msg),

            GameError::Unsupported { operation } => write!(f, "Not supported: {}", operation),

            GameError::NoPlayers => write!(f, "Number of players must be greater than 0."),
            GameError::DeckExhausted => write!(f, "No cards left in the deck"),
            GameError::MissingRule { rank } => write!(f, "Ruleset has no rule for rank {}", rank),
            GameError::TurnCounterOverflow => write!(f, "Turn counter cannot go any higher"),
        }
    }
}

impl std::error::Error for GameError {}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn error_kinds()
    {
        assert_eq!(GameError::EmptyRuleText.kind(), ErrorKind::Validation);
        assert_eq!(GameError::RuleCount { expected: 13, found: 12 }.kind(), ErrorKind::Format);
        assert_eq!(GameError::Unsupported { operation: "x" }.kind(), ErrorKind::Unsupported);
        assert_eq!(GameError::NoPlayers.kind(), ErrorKind::State);
    }

    #[test]
    fn error_display()
    {
        let err = GameError::RuleCount { expected: 13, found: 12 };
        assert_eq!(err.to_string(), "Expected 13 rules, but only got 12 rules.");

        let err = GameError::PlayerNotFound { name: "X".into(), players: vec!["A".into(), "B".into()] };
        assert_eq!(err.to_string(), "Error: Cannot remove unknown player: X from player list: A, B");
    }
}
