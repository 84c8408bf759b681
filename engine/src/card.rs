use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GameError, GameResult};

pub const LOW_ACE: u8 = 1;
pub const HIGH_ACE: u8 = 14;

const IMAGE_EXTENSION: &str = "svg";

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit
{
    Hearts = 0,
    Clubs = 1,
    Diamonds = 2,
    Spades = 3,
}

impl Suit
{
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

    pub fn from_index(index: u8) -> Option<Suit>
    {
        Suit::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8
    {
        self as u8
    }

    pub fn name(self) -> &'static str
    {
        match self
        {
            Suit::Hearts => "Hearts",
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Spades => "Spades",
        }
    }
}

/// Label printed for a rank. Both 1 and 14 are the Ace.
pub fn rank_label(rank: u8) -> &'static str
{
    match rank
    {
        1 | 14 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}

/// An immutable rank/suit pair. Ranks run 1..=14, with 1 and 14 both meaning Ace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card
{
    rank: u8,
    suit: Suit,
}

impl Card
{
    pub fn new(rank: u8, suit: Suit) -> GameResult<Card>
    {
        if !(LOW_ACE..=HIGH_ACE).contains(&rank)
        {
            return Err(GameError::InvalidCard { encoded: format!("{}{}", rank, suit.index()) });
        }
        Ok(Card { rank, suit })
    }

    pub(crate) fn from_parts(rank: u8, suit: Suit) -> Card
    {
        debug_assert!((LOW_ACE..=HIGH_ACE).contains(&rank));
        Card { rank, suit }
    }

    pub fn rank(&self) -> u8
    {
        self.rank
    }

    pub fn suit(&self) -> Suit
    {
        self.suit
    }

    pub fn is_ace(&self) -> bool
    {
        self.rank == LOW_ACE || self.rank == HIGH_ACE
    }

    /// Two-digit zero-padded rank followed by the suit index, e.g. `"102"` for the ten of diamonds.
    pub fn to_compact_string(&self) -> String
    {
        format!("{:02}{}", self.rank, self.suit.index())
    }

    pub fn from_compact_str(s: &str) -> GameResult<Card>
    {
        let invalid = || GameError::InvalidCard { encoded: s.to_string() };

        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let rank: u8 = s[..2].parse().map_err(|_| invalid())?;
        let suit = s[2..].parse::<u8>().ok().and_then(Suit::from_index).ok_or_else(invalid)?;
        Card::new(rank, suit).map_err(|_| invalid())
    }

    /// File name of the card face used by the renderer, e.g. `"10D.svg"` or `"AS.svg"`.
    pub fn image_file_name(&self) -> String
    {
        let initial = &self.suit.name()[..1];
        format!("{}{}.{}", rank_label(self.rank), initial, IMAGE_EXTENSION)
    }
}

impl fmt::Display for Card
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} of {}", rank_label(self.rank), self.suit.name())
    }
}

impl FromStr for Card
{
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Card>
    {
        Card::from_compact_str(s)
    }
}
