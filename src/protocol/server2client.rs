use std::fmt::{self, Display};

use crate::game::cards::{Color, UnoCard};
use crate::lobby::registry::ReadyState;

/// One line sent to a client. `Display` renders the exact wire form
/// (without the trailing newline, which the codec adds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Server2Client {
    JoinSuccess(String),
    ErrorTaken,
    ErrorGameInProgress,
    Ready(String),
    Unready(String),
    StartGame,
    UserList(Vec<(String, ReadyState)>),
    UserLeft(String),
    InitGame {
        top_card: UnoCard,
        current_player: String,
        opponents: Vec<(String, usize)>,
        hand: Vec<UnoCard>,
    },
    Top5(Vec<(String, u32)>),
    PlayResult {
        player: String,
        card: UnoCard,
        top_card: UnoCard,
        current_player: String,
        opponents: Vec<(String, usize)>,
        hand: Vec<UnoCard>,
    },
    Error(&'static str),
    Turn(String),
    Drew(UnoCard),
    Hand(Vec<UnoCard>),
    WildColor(Color),
    TopCard(UnoCard),
    Players(Vec<(String, usize)>),
    GameOver {
        winner: String,
        scores: Vec<(String, u32)>,
    },
    GameAborted(String),
    Ack,
    Bye,
}

/// Comma-joined list with no trailing separator; `-` stands in for an empty
/// list so every line keeps the same number of fields.
fn list<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let joined = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

fn pairs<V: Display>(entries: &[(String, V)]) -> String {
    list(entries.iter().map(|(name, value)| format!("{}:{}", name, value)))
}

impl Display for Server2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Server2Client::JoinSuccess(name) => write!(f, "JOIN_SUCCESS {}", name),
            Server2Client::ErrorTaken => f.write_str("ERROR_TAKEN"),
            Server2Client::ErrorGameInProgress => f.write_str("ERROR_GAME_IN_PROGRESS"),
            Server2Client::Ready(name) => write!(f, "READY {}", name),
            Server2Client::Unready(name) => write!(f, "UNREADY {}", name),
            Server2Client::StartGame => f.write_str("START_GAME"),
            Server2Client::UserList(users) => write!(f, "USERLIST {}", pairs(users)),
            Server2Client::UserLeft(name) => write!(f, "USER_LEFT {}", name),
            Server2Client::InitGame {
                top_card,
                current_player,
                opponents,
                hand,
            } => write!(
                f,
                "INIT_GAME {} {} {} {}",
                top_card,
                current_player,
                pairs(opponents),
                list(hand)
            ),
            Server2Client::Top5(entries) => write!(f, "TOP5 {}", pairs(entries)),
            Server2Client::PlayResult {
                player,
                card,
                top_card,
                current_player,
                opponents,
                hand,
            } => write!(
                f,
                "PLAY_RESULT {} {} {} {} {} {}",
                player,
                card,
                top_card,
                current_player,
                pairs(opponents),
                list(hand)
            ),
            Server2Client::Error(reason) => write!(f, "ERROR {}", reason),
            Server2Client::Turn(name) => write!(f, "TURN {}", name),
            Server2Client::Drew(card) => write!(f, "DREW {}", card),
            Server2Client::Hand(cards) => write!(f, "HAND {}", list(cards)),
            Server2Client::WildColor(color) => write!(f, "WILD_COLOR {}", color),
            Server2Client::TopCard(card) => write!(f, "TOP_CARD {}", card),
            Server2Client::Players(players) => write!(f, "PLAYERS {}", pairs(players)),
            Server2Client::GameOver { winner, scores } => {
                write!(f, "GAME_OVER {} {}", winner, pairs(scores))
            }
            Server2Client::GameAborted(name) => write!(f, "GAME_ABORTED {}", name),
            Server2Client::Ack => f.write_str("ACK"),
            Server2Client::Bye => f.write_str("Bye bye!"),
        }
    }
}
