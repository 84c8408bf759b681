//! Flat, string-keyed form of a [`GameState`](crate::game::GameState).
//!
//! A snapshot is what survives between requests. It is written field by field
//! into whatever key/value store the caller owns and read back on the next
//! request. Missing keys read as empty, so a brand new session restores to an
//! empty game instead of failing.
//!
//! Custom rules are stored as `author|text` records, each terminated by a
//! backtick. Player names never contain `|` or a backtick and rule text never
//! contains a backtick (see [`crate::game::sanitize_player_name`]), so records
//! split at the first `|` are unambiguous.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{GameError, GameResult};
use crate::game::CustomRule;

pub const RECORD_END: char = '`';
pub const AUTHOR_SEPARATOR: char = '|';

pub const KEY_PLAYERS: &str = "players";
pub const KEY_DECK: &str = "deck";
pub const KEY_CUSTOM_RULES: &str = "custom_rules";
pub const KEY_CURRENT_PLAYER: &str = "current_player";
pub const KEY_TOTAL_TURNS: &str = "total_turns";
pub const KEY_LAST_CARD: &str = "last_card";
pub const KEY_CURRENT_CARD: &str = "current_card";
pub const KEY_PLAYER_WHO_DREW_CARD: &str = "player_who_drew_card";

/// Get/set access to an external session store.
pub trait SnapshotStore
{
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

impl SnapshotStore for HashMap<String, String>
{
    fn get(&self, key: &str) -> Option<String>
    {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String)
    {
        self.insert(key.to_string(), value);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot
{
    /// Comma-joined sanitized player names.
    pub players: String,
    /// Comma-joined compact cards, see [`crate::deck::Deck::serialize`].
    pub deck: String,
    pub custom_rules: String,
    pub current_player: usize,
    pub total_turns: u32,
    pub last_card: String,
    pub current_card: String,
    pub player_who_drew_card: String,
}

impl Snapshot
{
    pub fn to_fields(&self) -> Vec<(&'static str, String)>
    {
        vec![
            (KEY_PLAYERS, self.players.clone()),
            (KEY_DECK, self.deck.clone()),
            (KEY_CUSTOM_RULES, self.custom_rules.clone()),
            (KEY_CURRENT_PLAYER, self.current_player.to_string()),
            (KEY_TOTAL_TURNS, self.total_turns.to_string()),
            (KEY_LAST_CARD, self.last_card.clone()),
            (KEY_CURRENT_CARD, self.current_card.clone()),
            (KEY_PLAYER_WHO_DREW_CARD, self.player_who_drew_card.clone()),
        ]
    }

    pub fn write_to<S: SnapshotStore + ?Sized>(&self, store: &mut S)
    {
        for (key, value) in self.to_fields()
        {
            store.set(key, value);
        }
    }

    pub fn read_from<S: SnapshotStore + ?Sized>(store: &S) -> GameResult<Snapshot>
    {
        let field = |key: &str| store.get(key).unwrap_or_default();

        Ok(Snapshot
        {
            players: field(KEY_PLAYERS),
            deck: field(KEY_DECK),
            custom_rules: field(KEY_CUSTOM_RULES),
            current_player: parse_counter(KEY_CURRENT_PLAYER, &field(KEY_CURRENT_PLAYER))?,
            total_turns: parse_counter(KEY_TOTAL_TURNS, &field(KEY_TOTAL_TURNS))?,
            last_card: field(KEY_LAST_CARD),
            current_card: field(KEY_CURRENT_CARD),
            player_who_drew_card: field(KEY_PLAYER_WHO_DREW_CARD),
        })
    }
}

fn parse_counter<T: FromStr + Default>(field: &'static str, value: &str) -> GameResult<T>
{
    let value = value.trim();
    if value.is_empty()
    {
        return Ok(T::default());
    }
    value.parse().map_err(|_| GameError::InvalidSnapshotField { field, value: value.to_string() })
}

pub fn encode_custom_rules(rules: &[CustomRule]) -> String
{
    rules
        .iter()
        .map(|r| format!("{}{}{}{}", r.author, AUTHOR_SEPARATOR, r.text, RECORD_END))
        .collect()
}

pub fn decode_custom_rules(encoded: &str) -> GameResult<Vec<CustomRule>>
{
    encoded
        .split(RECORD_END)
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .map(|record| match record.split_once(AUTHOR_SEPARATOR)
        {
            Some((author, text)) => Ok(CustomRule { author: author.to_string(), text: text.to_string() }),
            None => Err(GameError::InvalidSnapshotField { field: KEY_CUSTOM_RULES, value: record.to_string() }),
        })
        .collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn rule(author: &str, text: &str) -> CustomRule
    {
        CustomRule { author: author.to_string(), text: text.to_string() }
    }

    #[test]
    fn custom_rules_encoding()
    {
        let rules = vec![rule("Alice", "No pointing"), rule("Bob", "Say please | thanks")];
        let encoded = encode_custom_rules(&rules);
        assert_eq!(encoded, "Alice|No pointing`Bob|Say please | thanks`");
        assert_eq!(decode_custom_rules(&encoded).unwrap(), rules);
    }

    #[test]
    fn rule_without_author_survives()
    {
        let rules = vec![rule("", "Drink with your left hand")];
        assert_eq!(decode_custom_rules(&encode_custom_rules(&rules)).unwrap(), rules);
    }

    #[test]
    fn empty_custom_rules()
    {
        assert_eq!(encode_custom_rules(&[]), "");
        assert!(decode_custom_rules("").unwrap().is_empty());
    }

    #[test]
    fn record_without_separator_is_rejected()
    {
        assert!(decode_custom_rules("no separator here`").is_err());
    }

    #[test]
    fn empty_store_reads_as_default()
    {
        let store: HashMap<String, String> = HashMap::new();
        assert_eq!(Snapshot::read_from(&store).unwrap(), Snapshot::default());
    }

    #[test]
    fn store_round_trip()
    {
        let snapshot = Snapshot
        {
            players: "A,B".into(),
            deck: "020,143".into(),
            custom_rules: "A|x`".into(),
            current_player: 1,
            total_turns: 7,
            last_card: "2 of Hearts".into(),
            current_card: "A of Spades".into(),
            player_who_drew_card: "A".into(),
        };

        let mut store = HashMap::new();
        snapshot.write_to(&mut store);
        assert_eq!(store.get(KEY_TOTAL_TURNS).map(String::as_str), Some("7"));
        assert_eq!(Snapshot::read_from(&store).unwrap(), snapshot);
    }

    #[test]
    fn bad_counter_is_rejected()
    {
        let mut store = HashMap::new();
        store.insert(KEY_TOTAL_TURNS.to_string(), "lots".to_string());
        let err = Snapshot::read_from(&store).unwrap_err();
        assert!(matches!(err, GameError::InvalidSnapshotField { field: KEY_TOTAL_TURNS, .. }));
    }

    #[test]
    fn missing_json_fields_default()
    {
        let snapshot: Snapshot = serde_json::from_str(r#"{"players":"A"}"#).unwrap();
        assert_eq!(snapshot.players, "A");
        assert_eq!(snapshot.total_turns, 0);
        assert!(snapshot.deck.is_empty());
    }
}
