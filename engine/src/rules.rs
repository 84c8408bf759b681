//! Static rank → rule table, loaded from a line-oriented text source.
//!
//! Each rule is a group of five lines:
//!
//! ```text
//! rank
//! name
//! text
//! makes_custom_rule   (case-insensitive "true", anything else is false)
//! <blank separator>
//! ```
//!
//! The last group may leave out its separator.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::card::{Card, HIGH_ACE, LOW_ACE};
use crate::error::{GameError, GameResult};

pub const EXPECTED_RULES: usize = 13;

const LINES_PER_RULE: usize = 5;
const BUILTIN_RULESET: &str = include_str!("../rules/kings_cup.txt");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule
{
    pub rank: u8,
    pub name: String,
    pub text: String,
    /// Drawing this rank prompts the drawer to add a custom rule.
    pub triggers_custom_rule: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSet
{
    rules: BTreeMap<u8, Rule>,
}

impl RuleSet
{
    /// The ruleset bundled with the engine.
    pub fn builtin() -> GameResult<RuleSet>
    {
        RuleSet::parse(BUILTIN_RULESET, EXPECTED_RULES)
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<RuleSet>
    {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| GameError::RulesetIo(format!("{}: {}", path.display(), e)))?;

        let rules = RuleSet::parse(&source, EXPECTED_RULES)?;
        tracing::info!("loaded {} rules from {}", rules.len(), path.display());
        Ok(rules)
    }

    /// Parses a whole source. Either every rule loads or the call fails.
    pub fn parse(source: &str, expected: usize) -> GameResult<RuleSet>
    {
        let mut lines: Vec<&str> = source.lines().map(str::trim_end).collect();
        while lines.last().is_some_and(|l| l.is_empty())
        {
            lines.pop();
        }

        let mut rules = BTreeMap::new();
        for (group, chunk) in lines.chunks(LINES_PER_RULE).enumerate()
        {
            let first_line = group * LINES_PER_RULE + 1;
            if chunk.len() < LINES_PER_RULE - 1
            {
                return Err(GameError::MalformedRuleset { line: first_line, reason: "incomplete rule record" });
            }
            if chunk.len() == LINES_PER_RULE && !chunk[4].trim().is_empty()
            {
                return Err(GameError::MalformedRuleset {
                    line: first_line + 4,
                    reason: "expected a blank line between rules",
                });
            }

            let rank = parse_rank(chunk[0], first_line)?;
            let rule = Rule
            {
                rank,
                name: chunk[1].trim().to_string(),
                text: chunk[2].trim().to_string(),
                triggers_custom_rule: chunk[3].trim().eq_ignore_ascii_case("true"),
            };

            if rules.insert(rank, rule).is_some()
            {
                return Err(GameError::DuplicateRule { rank });
            }
        }

        if rules.len() != expected
        {
            return Err(GameError::RuleCount { expected, found: rules.len() });
        }

        Ok(RuleSet { rules })
    }

    pub fn len(&self) -> usize
    {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.rules.is_empty()
    }

    pub fn get(&self, rank: u8) -> GameResult<&Rule>
    {
        self.rules.get(&rank).ok_or(GameError::MissingRule { rank })
    }

    /// Rule for a drawn card. A low ace (rank 1) uses the ace rule stored under 14.
    pub fn rule_for(&self, card: &Card) -> GameResult<&Rule>
    {
        let rank = if card.is_ace() { HIGH_ACE } else { card.rank() };
        self.get(rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule>
    {
        self.rules.values()
    }
}

fn parse_rank(value: &str, line: usize) -> GameResult<u8>
{
    let invalid = || GameError::InvalidRank { line, value: value.to_string() };
    let rank: u8 = value.trim().parse().map_err(|_| invalid())?;
    if !(LOW_ACE..=HIGH_ACE).contains(&rank)
    {
        return Err(invalid());
    }
    Ok(rank)
}
