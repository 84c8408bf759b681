use serde::Serialize;
use std::sync::Arc;

use crate::deck::Deck;
use crate::error::{GameError, GameResult};
use crate::rules::RuleSet;
use crate::snapshot::{self, Snapshot};

pub const COMMA_TOKEN: &str = "_comma_";
pub const PIPE_TOKEN: &str = "_pipe_";
pub const TICK_TOKEN: &str = "_tick_";

// Games always play aces high with an endless deck; snapshots do not record the mode.
const ACES_HIGH: bool = true;
const CYCLE: bool = true;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomRule
{
    pub author: String,
    pub text: String,
}

/// Everything the caller needs to show for one drawn card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnOutcome
{
    pub player: String,
    pub rule_name: String,
    pub rule_text: String,
    pub triggers_custom_rule: bool,
    pub card: String,
    pub image: String,
    pub turn: u32,
    pub remaining: usize,
    pub deck_reshuffled: bool,
}

/// Makes a name safe to store in the comma-joined roster and in custom rule records.
pub fn sanitize_player_name(name: &str) -> String
{
    name.replace(',', COMMA_TOKEN)
        .replace(snapshot::AUTHOR_SEPARATOR, PIPE_TOKEN)
        .replace(snapshot::RECORD_END, TICK_TOKEN)
        .trim()
        .to_string()
}

pub fn sanitize_player_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|n| sanitize_player_name(n.as_ref())).collect()
}

fn sanitize_rule_text(text: &str) -> String
{
    text.trim().replace(snapshot::RECORD_END, TICK_TOKEN)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState
{
    deck: Deck,
    players: Vec<String>,
    rules: Arc<RuleSet>,
    custom_rules: Vec<CustomRule>,
    total_turns: u32,
    current_player: usize,
    last_card: String,
    current_card: String,
    player_who_drew_card: String,
}

impl GameState
{
    /// Starts a game with a fresh shuffled deck. Names are sanitized and blanks dropped.
    pub fn new<I, S>(players: I, rules: Arc<RuleSet>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        GameState::with_deck(Deck::new(ACES_HIGH, CYCLE), players, rules)
    }

    /// Starts a game from the comma separated roster a player types in.
    pub fn from_roster(roster: &str, rules: Arc<RuleSet>) -> Self
    {
        let state = GameState::new(roster.split(','), rules);
        tracing::info!("new game with {} players", state.players.len());
        state
    }

    pub fn with_deck<I, S>(deck: Deck, players: I, rules: Arc<RuleSet>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let players = sanitize_player_names(players).into_iter().filter(|p| !p.is_empty()).collect();

        GameState
        {
            deck,
            players,
            rules,
            custom_rules: Vec::new(),
            total_turns: 0,
            current_player: 0,
            last_card: String::new(),
            current_card: String::new(),
            player_who_drew_card: String::new(),
        }
    }

    pub fn players(&self) -> &[String]
    {
        &self.players
    }

    pub fn deck(&self) -> &Deck
    {
        &self.deck
    }

    pub fn rules(&self) -> &RuleSet
    {
        &self.rules
    }

    pub fn custom_rules(&self) -> &[CustomRule]
    {
        &self.custom_rules
    }

    pub fn total_turns(&self) -> u32
    {
        self.total_turns
    }

    pub fn current_player(&self) -> usize
    {
        self.current_player
    }

    pub fn last_card(&self) -> &str
    {
        &self.last_card
    }

    pub fn current_card(&self) -> &str
    {
        &self.current_card
    }

    pub fn player_who_drew_card(&self) -> &str
    {
        &self.player_who_drew_card
    }

    pub fn add_player(&mut self, name: &str) -> GameResult<()>
    {
        let name = sanitize_player_name(name);
        if name.is_empty()
        {
            return Err(GameError::EmptyPlayerName);
        }

        tracing::info!(player = %name, "player added");
        self.players.push(name);
        Ok(())
    }

    /// Removes the first player with this name. If the turn pointer falls off the
    /// end of the shorter roster it goes back to the first player.
    pub fn remove_player(&mut self, name: &str) -> GameResult<()>
    {
        // Stored names went through the same sanitizing when they were added.
        let name = sanitize_player_name(name);
        if name.is_empty()
        {
            return Err(GameError::EmptyPlayerName);
        }

        let Some(pos) = self.players.iter().position(|p| *p == name) else
        {
            return Err(GameError::PlayerNotFound { name, players: self.players.clone() });
        };

        self.players.remove(pos);
        if self.current_player >= self.players.len()
        {
            self.current_player = 0;
        }

        tracing::info!(player = %name, remaining = self.players.len(), "player removed");
        Ok(())
    }

    pub fn can_take_turn(&self) -> GameResult<()>
    {
        if self.players.is_empty()
        {
            return Err(GameError::NoPlayers);
        }
        Ok(())
    }

    /// Draws a card for the current player and moves the turn on.
    ///
    /// Nothing is changed unless the whole turn succeeds: the draw happens on a copy
    /// of the deck that replaces the real one only after the rule lookup.
    pub fn take_turn(&mut self) -> GameResult<TurnOutcome>
    {
        self.can_take_turn()?;
        let player = self.players.get(self.current_player).ok_or(GameError::NoPlayers)?.clone();

        let turn = self.total_turns.checked_add(1).ok_or(GameError::TurnCounterOverflow)?;

        let mut deck = self.deck.clone();
        let draw = deck.draw().ok_or(GameError::DeckExhausted)?;
        let rule = self.rules.rule_for(&draw.card)?;

        let outcome = TurnOutcome
        {
            player: player.clone(),
            rule_name: rule.name.clone(),
            rule_text: rule.text.clone(),
            triggers_custom_rule: rule.triggers_custom_rule,
            card: draw.card.to_string(),
            image: draw.card.image_file_name(),
            turn,
            remaining: draw.remaining,
            deck_reshuffled: draw.reshuffled,
        };

        self.deck = deck;
        self.last_card = std::mem::replace(&mut self.current_card, outcome.card.clone());
        self.player_who_drew_card = player;
        self.total_turns = outcome.turn;
        self.current_player = (self.current_player + 1) % self.players.len();

        tracing::debug!(
            turn = outcome.turn,
            player = %outcome.player,
            card = %outcome.card,
            remaining = outcome.remaining,
            "card drawn"
        );
        Ok(outcome)
    }

    /// Adds a rule credited to whoever drew the most recent card.
    pub fn add_custom_rule(&mut self, text: &str) -> GameResult<()>
    {
        let text = sanitize_rule_text(text);
        if text.is_empty()
        {
            return Err(GameError::EmptyRuleText);
        }

        tracing::info!(author = %self.player_who_drew_card, "custom rule added");
        self.custom_rules.push(CustomRule { author: self.player_who_drew_card.clone(), text });
        Ok(())
    }

    pub fn delete_custom_rule(&mut self, _text: &str) -> GameResult<()>
    {
        Err(GameError::Unsupported { operation: "delete custom rule" })
    }

    pub fn serialize(&self) -> Snapshot
    {
        Snapshot
        {
            players: self.players.join(","),
            deck: self.deck.serialize(),
            custom_rules: snapshot::encode_custom_rules(&self.custom_rules),
            current_player: self.current_player,
            total_turns: self.total_turns,
            last_card: self.last_card.clone(),
            current_card: self.current_card.clone(),
            player_who_drew_card: self.player_who_drew_card.clone(),
        }
    }

    /// Rebuilds a game from a snapshot. Deck order is restored exactly. An empty deck
    /// field (a session with no game yet) gets a fresh shuffled deck.
    pub fn deserialize(snapshot: &Snapshot, rules: Arc<RuleSet>) -> GameResult<Self>
    {
        let deck = if snapshot.deck.trim().is_empty()
        {
            Deck::new(ACES_HIGH, CYCLE)
        }
        else
        {
            Deck::deserialize(&snapshot.deck, ACES_HIGH, CYCLE)?
        };

        let players: Vec<String> =
            snapshot.players.split(',').filter(|p| !p.is_empty()).map(str::to_string).collect();

        let current_player = if snapshot.current_player < players.len() { snapshot.current_player } else { 0 };

        Ok(GameState
        {
            deck,
            players,
            rules,
            custom_rules: snapshot::decode_custom_rules(&snapshot.custom_rules)?,
            total_turns: snapshot.total_turns,
            current_player,
            last_card: snapshot.last_card.clone(),
            current_card: snapshot.current_card.clone(),
            player_who_drew_card: snapshot.player_who_drew_card.clone(),
        })
    }
}
