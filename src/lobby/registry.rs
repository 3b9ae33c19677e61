//! Who is connected, who has claimed a name, and who is ready.

use std::collections::HashMap;
use std::fmt::Display;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::UnoError;
use crate::protocol::Server2Client;

pub type ConnId = u64;

/// Outbound queue of one connection, drained by its writer task.
pub type Outbox = mpsc::UnboundedSender<Server2Client>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Ready,
    NotReady,
}

impl Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadyState::Ready => f.write_str("READY"),
            ReadyState::NotReady => f.write_str("NOT_READY"),
        }
    }
}

#[derive(Debug)]
struct Participant {
    name: String,
    conn: ConnId,
    state: ReadyState,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    connections: HashMap<ConnId, Outbox>,
    // join order, which is also the turn order of the next game
    participants: Vec<Participant>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, conn: ConnId, outbox: Outbox) {
        self.connections.insert(conn, outbox);
    }

    /// Drops the connection's outbox. Its participant, if any, stays until
    /// `leave` is called.
    pub fn disconnect(&mut self, conn: ConnId) {
        self.connections.remove(&conn);
    }

    pub fn is_connected(&self, conn: ConnId) -> bool {
        self.connections.contains_key(&conn)
    }

    pub fn name_of(&self, conn: ConnId) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.conn == conn)
            .map(|p| p.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name == name)
    }

    /// Appends a not-ready participant. Uniqueness of the name and of the
    /// connection is checked by the lobby before calling this.
    pub fn join(&mut self, name: &str, conn: ConnId) {
        self.participants.push(Participant {
            name: name.to_string(),
            conn,
            state: ReadyState::NotReady,
        });
    }

    /// Releases the name. Returns false if it was not registered.
    pub fn leave(&mut self, name: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.name != name);
        self.participants.len() != before
    }

    pub fn set_state(&mut self, name: &str, state: ReadyState) -> Result<(), UnoError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or(UnoError::NotJoined)?;
        participant.state = state;
        Ok(())
    }

    pub fn reset_states(&mut self) {
        for p in &mut self.participants {
            p.state = ReadyState::NotReady;
        }
    }

    pub fn all_ready(&self) -> bool {
        !self.participants.is_empty()
            && self
                .participants
                .iter()
                .all(|p| p.state == ReadyState::Ready)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    pub fn roster(&self) -> Vec<(String, ReadyState)> {
        self.participants
            .iter()
            .map(|p| (p.name.clone(), p.state))
            .collect()
    }

    /// Best-effort send; a closed outbox means the connection is already
    /// going away and will be cleaned up by its own task.
    pub fn send_to(&self, conn: ConnId, msg: Server2Client) {
        if let Some(outbox) = self.connections.get(&conn) {
            if outbox.send(msg).is_err() {
                debug!(conn, "dropping message for closed connection");
            }
        }
    }

    pub fn send_to_player(&self, name: &str, msg: Server2Client) {
        if let Some(p) = self.participants.iter().find(|p| p.name == name) {
            self.send_to(p.conn, msg);
        }
    }

    /// Sends to every live connection, joined or not.
    pub fn broadcast(&self, msg: &Server2Client) {
        for (&conn, outbox) in &self.connections {
            if outbox.send(msg.clone()).is_err() {
                debug!(conn, "dropping broadcast for closed connection");
            }
        }
    }
}
