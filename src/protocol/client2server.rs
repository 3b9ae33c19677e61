use crate::error::UnoError;
use crate::game::cards::{Color, UnoCard};

pub const MAX_NAME_LEN: usize = 32;

/// One line sent by a client, already validated at the token level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Client2Server {
    Join { name: String },
    Ready { name: Option<String> },
    Unready { name: Option<String> },
    Exit { name: Option<String> },
    InitGame { name: Option<String> },
    List,
    Top5,
    Play { card: UnoCard },
    Draw,
    WildColor { color: Color },
    GetGameState,
    Quit,
    /// Anything we do not recognize; answered with a plain acknowledgement.
    Unknown(String),
}

impl Client2Server {
    pub fn parse(line: &str) -> Result<Client2Server, UnoError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Ok(Client2Server::Unknown(String::new()));
        };

        let msg = match verb {
            "JOIN" => Client2Server::Join {
                name: required_name(verb, args)?,
            },
            "READY" => Client2Server::Ready {
                name: optional_name(verb, args)?,
            },
            "UNREADY" => Client2Server::Unready {
                name: optional_name(verb, args)?,
            },
            "EXIT" => Client2Server::Exit {
                name: optional_name(verb, args)?,
            },
            "INIT_GAME" => Client2Server::InitGame {
                name: optional_name(verb, args)?,
            },
            "LIST" => Client2Server::List,
            "TOP5" => Client2Server::Top5,
            "PLAY" => Client2Server::Play {
                card: single_arg(verb, args)?.parse()?,
            },
            "DRAW" => Client2Server::Draw,
            "WILD_COLOR" => Client2Server::WildColor {
                color: single_arg(verb, args)?.parse()?,
            },
            "GET_GAME_STATE" => Client2Server::GetGameState,
            "quit" => Client2Server::Quit,
            _ => Client2Server::Unknown(line.trim().to_string()),
        };
        Ok(msg)
    }

    /// Whether a failed `line` should be answered with the current `TURN`
    /// as well, judged by its verb alone so unparseable lines count too.
    pub fn resyncs_turn(line: &str) -> bool {
        matches!(line.split_whitespace().next(), Some("PLAY" | "DRAW"))
    }
}

fn single_arg<'a>(verb: &str, args: &[&'a str]) -> Result<&'a str, UnoError> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(UnoError::MalformedCommand(format!(
            "{} takes exactly one argument",
            verb
        ))),
    }
}

fn required_name(verb: &str, args: &[&str]) -> Result<String, UnoError> {
    check_name(single_arg(verb, args)?)
}

fn optional_name(verb: &str, args: &[&str]) -> Result<Option<String>, UnoError> {
    match args {
        [] => Ok(None),
        _ => required_name(verb, args).map(Some),
    }
}

/// Names travel inside `name:value,...` lists, so the separators are banned,
/// as is the `-` placeholder used for empty lists.
fn check_name(name: &str) -> Result<String, UnoError> {
    if name == "-" || name.len() > MAX_NAME_LEN || name.contains([':', ',']) {
        return Err(UnoError::MalformedCommand(format!(
            "invalid name `{}`",
            name
        )));
    }
    Ok(name.to_string())
}
