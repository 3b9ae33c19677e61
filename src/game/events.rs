use std::fmt::Display;

use crate::game::cards::{Color, UnoCard};
use serde::{Deserialize, Serialize};

/// What happened inside the engine. Every successful mutation returns the
/// events it produced, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GameEvent {
    GameStarted {
        players: Vec<String>,
    },
    CardsDealt {
        player: String,
        count: usize,
    },
    TopCardChanged {
        top_card: UnoCard,
    },
    CardPlayed {
        player: String,
        card: UnoCard,
    },
    CardDrawn {
        player: String,
        card: UnoCard,
    },
    PlayerSkipped {
        player: String,
    },
    DirectionChanged {
        clockwise: bool,
    },
    DrawPenalty {
        target: String,
        count: usize,
    },
    WildColorRequested {
        player: String,
    },
    WildColorChosen {
        player: String,
        color: Color,
    },
    PlayerPassed {
        player: String,
    },
    PlayerTurn {
        player: String,
    },
    GameOver {
        winner: String,
        scores: Vec<(String, u32)>,
    },
}

impl Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::GameStarted { players } => {
                write!(f, "GameStarted: players={}", players.join(","))
            }
            GameEvent::CardsDealt { player, count } => {
                write!(f, "CardsDealt: player={}, count={}", player, count)
            }
            GameEvent::TopCardChanged { top_card } => {
                write!(f, "TopCardChanged: top_card={}", top_card)
            }
            GameEvent::CardPlayed { player, card } => {
                write!(f, "CardPlayed: player={}, card={}", player, card)
            }
            GameEvent::CardDrawn { player, card } => {
                write!(f, "CardDrawn: player={}, card={}", player, card)
            }
            GameEvent::PlayerSkipped { player } => write!(f, "PlayerSkipped: player={}", player),
            GameEvent::DirectionChanged { clockwise } => {
                write!(f, "DirectionChanged: clockwise={}", clockwise)
            }
            GameEvent::DrawPenalty { target, count } => {
                write!(f, "DrawPenalty: target={}, count={}", target, count)
            }
            GameEvent::WildColorRequested { player } => {
                write!(f, "WildColorRequested: player={}", player)
            }
            GameEvent::WildColorChosen { player, color } => {
                write!(f, "WildColorChosen: player={}, color={}", player, color)
            }
            GameEvent::PlayerPassed { player } => write!(f, "PlayerPassed: player={}", player),
            GameEvent::PlayerTurn { player } => write!(f, "PlayerTurn: player={}", player),
            GameEvent::GameOver { winner, scores } => {
                write!(f, "GameOver: winner={}, scores={:?}", winner, scores)
            }
        }
    }
}
