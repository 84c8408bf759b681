//! Plain data handed to whatever renders the table. No markup is produced here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::game::{CustomRule, GameState, TurnOutcome};
use crate::snapshot::SnapshotStore;

pub const KEY_RULE_NAME: &str = "current_rule_name";
pub const KEY_RULE_TEXT: &str = "current_rule_text";
pub const KEY_CARD: &str = "card_str";
pub const KEY_CARD_IMAGE: &str = "card_img";

/// The card and rule on display since the last draw. Kept in the session next to the
/// snapshot so that actions other than drawing keep showing the same card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDisplay
{
    pub rule_name: String,
    pub rule_text: String,
    pub card: String,
    pub image: String,
}

impl From<&TurnOutcome> for TurnDisplay
{
    fn from(outcome: &TurnOutcome) -> Self
    {
        TurnDisplay
        {
            rule_name: outcome.rule_name.clone(),
            rule_text: outcome.rule_text.clone(),
            card: outcome.card.clone(),
            image: outcome.image.clone(),
        }
    }
}

impl TurnDisplay
{
    pub fn write_to<S: SnapshotStore + ?Sized>(&self, store: &mut S)
    {
        store.set(KEY_RULE_NAME, self.rule_name.clone());
        store.set(KEY_RULE_TEXT, self.rule_text.clone());
        store.set(KEY_CARD, self.card.clone());
        store.set(KEY_CARD_IMAGE, self.image.clone());
    }

    pub fn read_from<S: SnapshotStore + ?Sized>(store: &S) -> Self
    {
        let field = |key: &str| store.get(key).unwrap_or_default();
        TurnDisplay
        {
            rule_name: field(KEY_RULE_NAME),
            rule_text: field(KEY_RULE_TEXT),
            card: field(KEY_CARD),
            image: field(KEY_CARD_IMAGE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry
{
    pub name: String,
    pub is_drawer: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRuleEntry
{
    /// Author name, with a running number from their second rule on ("Ann", "Ann 2", ...).
    pub label: String,
    pub author: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView
{
    pub drawer: String,
    pub card_image: String,
    pub card: String,
    pub rule_name: String,
    pub rule_text: String,
    pub turn_number: u32,
    pub cards_left: usize,
    pub last_card: String,
    pub roster: Vec<RosterEntry>,
    pub custom_rules: Vec<CustomRuleEntry>,
}

impl TableView
{
    pub fn new(game: &GameState, display: &TurnDisplay) -> Self
    {
        let drawer = game.player_who_drew_card();
        TableView
        {
            drawer: drawer.to_string(),
            card_image: display.image.clone(),
            card: display.card.clone(),
            rule_name: display.rule_name.clone(),
            rule_text: display.rule_text.clone(),
            turn_number: game.total_turns(),
            cards_left: game.deck().len(),
            last_card: game.last_card().to_string(),
            roster: roster(game.players(), drawer),
            custom_rules: label_custom_rules(game.custom_rules()),
        }
    }
}

pub fn roster(players: &[String], drawer: &str) -> Vec<RosterEntry>
{
    players
        .iter()
        .map(|name| RosterEntry { name: name.clone(), is_drawer: name == drawer })
        .collect()
}

pub fn label_custom_rules(rules: &[CustomRule]) -> Vec<CustomRuleEntry>
{
    let mut seen: HashMap<&str, u32> = HashMap::new();
    rules
        .iter()
        .map(|rule|
        {
            let count = seen.entry(rule.author.as_str()).or_insert(0);
            *count += 1;
            let label = if *count > 1 { format!("{} {}", rule.author, count) } else { rule.author.clone() };
            CustomRuleEntry { label, author: rule.author.clone(), text: rule.text.clone() }
        })
        .collect()
}
