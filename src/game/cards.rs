use std::fmt::Display;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A single card. Wild ranks always carry `Color::Wild`, every other rank
/// carries one of the four base colors.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct UnoCard {
    color: Color,
    rank: Rank,
}

impl UnoCard {
    pub fn new(color: Color, rank: Rank) -> Result<UnoCard, CardParseError> {
        if rank.is_wild() != (color == Color::Wild) {
            return Err(CardParseError::Mismatch { color, rank });
        }
        Ok(UnoCard { color, rank })
    }

    pub fn number(color: Color, number: Number) -> Result<UnoCard, CardParseError> {
        UnoCard::new(color, Rank::Number(number))
    }

    pub fn wild() -> UnoCard {
        UnoCard {
            color: Color::Wild,
            rank: Rank::Wild,
        }
    }

    pub fn wild_draw_four() -> UnoCard {
        UnoCard {
            color: Color::Wild,
            rank: Rank::WildDrawFour,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn is_wild(&self) -> bool {
        self.color == Color::Wild
    }

    /// Penalty points a card left in hand is worth when a round ends.
    /// Number cards count their face value, action cards 20, wild cards 50.
    pub fn points(&self) -> u32 {
        match self.rank {
            Rank::Number(number) => number.to_u8() as u32,
            Rank::Skip | Rank::Reverse | Rank::DrawTwo => 20,
            Rank::Wild | Rank::WildDrawFour => 50,
        }
    }
}

impl Display for UnoCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.color, self.rank)
    }
}

impl FromStr for UnoCard {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, rank) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| CardParseError::Format(s.to_string()))?;
        UnoCard::new(color.parse()?, rank.parse()?)
    }
}

/// Whether `card` may be laid on a pile whose active color and rank are given.
pub fn can_play(card: &UnoCard, active_color: Color, active_rank: Rank) -> bool {
    card.is_wild() || card.color == active_color || card.rank == active_rank
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("expected COLOR:RANK, got `{0}`")]
    Format(String),
    #[error("unknown color `{0}`")]
    Color(String),
    #[error("unknown rank `{0}`")]
    Rank(String),
    #[error("rank {rank} cannot have color {color}")]
    Mismatch { color: Color, rank: Rank },
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Wild,
}

impl Color {
    pub const BASE: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
            Color::Yellow => "YELLOW",
            Color::Wild => "WILD",
        };
        f.write_str(s)
    }
}

impl FromStr for Color {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RED" => Ok(Color::Red),
            "GREEN" => Ok(Color::Green),
            "BLUE" => Ok(Color::Blue),
            "YELLOW" => Ok(Color::Yellow),
            "WILD" => Ok(Color::Wild),
            _ => Err(CardParseError::Color(s.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Number {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

impl Number {
    pub const ALL: [Number; 10] = [
        Number::Zero,
        Number::One,
        Number::Two,
        Number::Three,
        Number::Four,
        Number::Five,
        Number::Six,
        Number::Seven,
        Number::Eight,
        Number::Nine,
    ];

    pub fn from_u8(val: u8) -> Option<Number> {
        Number::ALL.get(val as usize).copied()
    }

    pub fn to_u8(&self) -> u8 {
        *self as u8
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Number(Number),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    pub fn is_wild(&self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }

    /// Anything but a plain number card has a side effect when played.
    pub fn has_effect(&self) -> bool {
        !matches!(self, Rank::Number(_))
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Number(n) => write!(f, "{}", n),
            Rank::Skip => f.write_str("SKIP"),
            Rank::Reverse => f.write_str("REVERSE"),
            Rank::DrawTwo => f.write_str("DRAW_TWO"),
            Rank::Wild => f.write_str("WILD"),
            Rank::WildDrawFour => f.write_str("WILD_DRAW4"),
        }
    }
}

impl FromStr for Rank {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "SKIP" => Ok(Rank::Skip),
            "REVERSE" => Ok(Rank::Reverse),
            "DRAW_TWO" => Ok(Rank::DrawTwo),
            "WILD" => Ok(Rank::Wild),
            "WILD_DRAW4" => Ok(Rank::WildDrawFour),
            digits => digits
                .parse::<u8>()
                .ok()
                .and_then(Number::from_u8)
                .map(Rank::Number)
                .ok_or_else(|| CardParseError::Rank(s.to_string())),
        }
    }
}

/// Draw pile. The top of the pile is the end of `cards`.
#[derive(Debug, Clone, Default)]
pub struct UnoDeck {
    cards: Vec<UnoCard>,
}

impl UnoDeck {
    /// The standard 108-card deck, unshuffled.
    pub fn new() -> UnoDeck {
        let mut cards = Vec::with_capacity(108);

        // 76 number cards: one zero, two of 1-9 per color
        for color in Color::BASE {
            for number in Number::ALL {
                let copies = if number == Number::Zero { 1 } else { 2 };
                for _ in 0..copies {
                    cards.push(UnoCard {
                        color,
                        rank: Rank::Number(number),
                    });
                }
            }
        }

        // 24 action cards
        for color in Color::BASE {
            for rank in [Rank::DrawTwo, Rank::Skip, Rank::Reverse] {
                for _ in 0..2 {
                    cards.push(UnoCard { color, rank });
                }
            }
        }

        // 8 wild cards
        for _ in 0..4 {
            cards.push(UnoCard::wild());
            cards.push(UnoCard::wild_draw_four());
        }

        UnoDeck { cards }
    }

    pub fn from_cards(cards: Vec<UnoCard>) -> UnoDeck {
        UnoDeck { cards }
    }

    pub fn shuffle(&mut self) {
        let mut rng = rand::thread_rng();
        self.cards.shuffle(&mut rng);
    }

    pub fn pop(&mut self) -> Option<UnoCard> {
        self.cards.pop()
    }

    pub fn push(&mut self, card: UnoCard) {
        self.cards.push(card);
    }

    pub fn extend<I: IntoIterator<Item = UnoCard>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[UnoCard] {
        &self.cards
    }
}
