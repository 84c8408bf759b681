use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::card::{Card, Suit, HIGH_ACE, LOW_ACE};
use crate::error::GameResult;

pub const DECK_SIZE: usize = 52;

/// Result of a successful draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Draw
{
    pub card: Card,
    pub remaining: usize,
    /// The deck ran out with this draw and was replaced by a fresh shuffled one.
    pub reshuffled: bool,
}

/// Ordered stack of cards. Draws take from the end of `cards`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck
{
    cards: Vec<Card>,
    aces_high: bool,
    cycle: bool,
}

impl Deck
{
    /// Full deck, shuffled.
    pub fn new(aces_high: bool, cycle: bool) -> Deck
    {
        Deck { cards: Deck::make_cards(aces_high, true), aces_high, cycle }
    }

    pub fn from_cards(cards: Vec<Card>, aces_high: bool, cycle: bool) -> Deck
    {
        Deck { cards, aces_high, cycle }
    }

    /// Builds 4 suits x 13 ranks. Ranks are 2..=14 with aces high, 1..=13 otherwise.
    pub fn make_cards(aces_high: bool, shuffled: bool) -> Vec<Card>
    {
        let (min_rank, max_rank) = if aces_high { (2, HIGH_ACE) } else { (LOW_ACE, HIGH_ACE - 1) };

        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL
        {
            for rank in min_rank..=max_rank
            {
                cards.push(Card::from_parts(rank, suit));
            }
        }

        if shuffled
        {
            cards.shuffle(&mut thread_rng());
        }
        cards
    }

    pub fn len(&self) -> usize
    {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card]
    {
        &self.cards
    }

    pub fn aces_high(&self) -> bool
    {
        self.aces_high
    }

    pub fn cycles(&self) -> bool
    {
        self.cycle
    }

    pub fn shuffle(&mut self)
    {
        self.cards.shuffle(&mut thread_rng());
    }

    /// Removes the top card without any refill.
    pub fn take_top(&mut self) -> Option<Card>
    {
        self.cards.pop()
    }

    /// Replaces the contents with a fresh shuffled deck when a cycling deck has run dry.
    /// Returns whether that happened.
    pub fn regenerate_if_exhausted(&mut self) -> bool
    {
        if self.cycle && self.cards.is_empty()
        {
            self.cards = Deck::make_cards(self.aces_high, true);
            tracing::debug!("deck exhausted, regenerated {} cards", self.cards.len());
            return true;
        }
        false
    }

    /// Draws the top card. A cycling deck never stays empty: after its last card is
    /// drawn it is regenerated, and the drawn card is not part of the new deck.
    /// A non-cycling deck returns `None` once empty.
    pub fn draw(&mut self) -> Option<Draw>
    {
        // A cycling deck restored from an empty snapshot still has cards to give.
        self.regenerate_if_exhausted();

        let card = self.take_top()?;
        let reshuffled = self.regenerate_if_exhausted();
        Some(Draw { card, remaining: self.cards.len(), reshuffled })
    }

    /// Comma-joined compact card strings, bottom of the deck first.
    pub fn serialize(&self) -> String
    {
        self.cards.iter().map(Card::to_compact_string).collect::<Vec<_>>().join(",")
    }

    /// Inverse of [`Deck::serialize`]. Order is kept exactly; nothing is shuffled.
    pub fn deserialize(s: &str, aces_high: bool, cycle: bool) -> GameResult<Deck>
    {
        let cards = s
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Card::from_compact_str)
            .collect::<GameResult<Vec<_>>>()?;

        Ok(Deck::from_cards(cards, aces_high, cycle))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_deck_has_52_distinct_cards()
    {
        let deck = Deck::new(true, false);
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<Card> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        assert!(deck.cards().iter().all(|c| (2..=14).contains(&c.rank())));
    }

    #[test]
    fn low_ace_deck_uses_ranks_1_to_13()
    {
        let cards = Deck::make_cards(false, false);
        assert_eq!(cards.len(), DECK_SIZE);
        assert!(cards.iter().all(|c| (1..=13).contains(&c.rank())));
    }

    #[test]
    fn make_cards_returns_independent_decks()
    {
        let mut a = Deck::make_cards(true, false);
        let b = Deck::make_cards(true, false);
        a.pop();
        assert_eq!(a.len(), 51);
        assert_eq!(b.len(), 52);
    }

    #[test]
    fn unshuffled_deck_is_in_suit_then_rank_order()
    {
        let cards = Deck::make_cards(true, false);
        assert_eq!(cards[0].to_compact_string(), "020");
        assert_eq!(cards[51].to_compact_string(), "143");
    }

    #[test]
    fn draw_takes_from_the_end()
    {
        let cards = Deck::make_cards(true, false);
        let top = *cards.last().unwrap();
        let mut deck = Deck::from_cards(cards, true, false);

        let draw = deck.draw().unwrap();
        assert_eq!(draw.card, top);
        assert_eq!(draw.remaining, 51);
        assert!(!draw.reshuffled);
    }

    #[test]
    fn non_cycling_deck_runs_out_after_52()
    {
        let mut deck = Deck::new(true, false);
        for i in 0..DECK_SIZE
        {
            let draw = deck.draw();
            assert!(draw.is_some(), "draw {} returned nothing", i + 1);
            assert_eq!(draw.unwrap().remaining, DECK_SIZE - i - 1);
        }
        assert!(deck.is_empty());
        assert!(deck.draw().is_none());
        assert!(deck.draw().is_none());
    }

    #[test]
    fn cycling_deck_regenerates_on_last_card()
    {
        let mut deck = Deck::new(true, true);
        for _ in 0..DECK_SIZE - 1
        {
            assert!(!deck.draw().unwrap().reshuffled);
        }

        let last = deck.draw().unwrap();
        assert!(last.reshuffled);
        assert_eq!(last.remaining, DECK_SIZE);
        assert_eq!(deck.len(), DECK_SIZE);

        let next = deck.draw().unwrap();
        assert_eq!(next.remaining, DECK_SIZE - 1);
    }

    #[test]
    fn empty_cycling_deck_refills_before_drawing()
    {
        let mut deck = Deck::from_cards(Vec::new(), true, true);
        let draw = deck.draw().unwrap();
        assert_eq!(draw.remaining, DECK_SIZE - 1);
    }

    #[test]
    fn shuffle_keeps_contents()
    {
        let mut deck = Deck::new(true, false);
        let before: HashSet<Card> = deck.cards().iter().copied().collect();
        deck.shuffle();
        let after: HashSet<Card> = deck.cards().iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn serialize_round_trip_keeps_order()
    {
        let deck = Deck::new(true, true);
        let restored = Deck::deserialize(&deck.serialize(), true, true).unwrap();
        assert_eq!(restored, deck);
    }

    #[test]
    fn deserialize_empty_string_gives_empty_deck()
    {
        let deck = Deck::deserialize("", true, false).unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn deserialize_rejects_garbage()
    {
        assert!(Deck::deserialize("020,zz1", true, true).is_err());
    }
}
