use crate::game::cards::{CardParseError, UnoCard};

/// Every recoverable failure a client can provoke. None of these ever
/// leave the lobby or the game in a partially updated state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnoError {
    #[error("name `{0}` is already taken")]
    NameTaken(String),
    #[error("a game is already in progress")]
    GameInProgress,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("{0} does not match the active color or rank")]
    IllegalPlay(UnoCard),
    #[error("{0} is not in your hand")]
    CardNotInHand(UnoCard),
    #[error("no game in progress")]
    NoGameInProgress,
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    #[error("waiting for a wild color to be chosen")]
    WildColorPending,
    #[error("no wild color choice is pending")]
    NoWildColorPending,
    #[error("a wild color must be RED, GREEN, BLUE or YELLOW")]
    InvalidWildColor,
    #[error("no card available to draw")]
    NoCardAvailable,
    #[error("join the lobby first")]
    NotJoined,
    #[error("this connection already joined as `{0}`")]
    AlreadyJoined(String),
    #[error("a game needs 2 to 4 players, got {0}")]
    PlayerCount(usize),
}

impl UnoError {
    /// Token sent after `ERROR` on the wire.
    pub fn reason(&self) -> &'static str {
        match self {
            UnoError::NameTaken(_) => "NAME_TAKEN",
            UnoError::GameInProgress => "GAME_IN_PROGRESS",
            UnoError::NotYourTurn => "NOT_YOUR_TURN",
            UnoError::IllegalPlay(_) => "ILLEGAL_PLAY",
            UnoError::CardNotInHand(_) => "CARD_NOT_IN_HAND",
            UnoError::NoGameInProgress => "NO_GAME_IN_PROGRESS",
            UnoError::MalformedCommand(_) => "MALFORMED_COMMAND",
            UnoError::WildColorPending => "WILD_COLOR_PENDING",
            UnoError::NoWildColorPending => "NO_WILD_COLOR_PENDING",
            UnoError::InvalidWildColor => "INVALID_WILD_COLOR",
            UnoError::NoCardAvailable => "NO_CARD_AVAILABLE",
            UnoError::NotJoined => "NOT_JOINED",
            UnoError::AlreadyJoined(_) => "ALREADY_JOINED",
            UnoError::PlayerCount(_) => "PLAYER_COUNT",
        }
    }
}

impl From<CardParseError> for UnoError {
    fn from(err: CardParseError) -> Self {
        UnoError::MalformedCommand(err.to_string())
    }
}
