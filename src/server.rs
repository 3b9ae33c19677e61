//! TCP front end. Every connection gets a reader loop and a writer task; all
//! state changes go through one lobby task fed by a command channel.

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::UnoError;
use crate::lobby::registry::{ConnId, Outbox};
use crate::lobby::Lobby;
use crate::ports::bus::{EventBus, TracingLogger};
use crate::ports::leaderboard::MemoryLeaderboard;
use crate::protocol::{Client2Server, Server2Client};

const LOBBY_QUEUE: usize = 256;

#[derive(Debug)]
pub enum LobbyCmd {
    Connect { conn: ConnId, outbox: Outbox },
    Command { conn: ConnId, msg: Client2Server },
    /// A line that failed to parse; routed through the lobby so the error
    /// reply stays ordered with everything else sent to that connection.
    Rejected {
        conn: ConnId,
        error: UnoError,
        resync_turn: bool,
    },
    Disconnect { conn: ConnId },
}

#[derive(Clone)]
pub struct LobbyHandle {
    tx: mpsc::Sender<LobbyCmd>,
}

impl LobbyHandle {
    /// Spawns the lobby task and returns the handle that feeds it.
    pub fn spawn(lobby: Lobby) -> Self {
        let (tx, rx) = mpsc::channel(LOBBY_QUEUE);
        tokio::spawn(run_lobby(lobby, rx));
        LobbyHandle { tx }
    }

    pub async fn send(&self, cmd: LobbyCmd) -> anyhow::Result<()> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| anyhow::anyhow!("lobby task has stopped"))
    }
}

pub async fn run_lobby(mut lobby: Lobby, mut rx: mpsc::Receiver<LobbyCmd>) {
    info!("lobby task started");
    while let Some(cmd) = rx.recv().await {
        match cmd {
            LobbyCmd::Connect { conn, outbox } => lobby.connect(conn, outbox),
            LobbyCmd::Command { conn, msg } => {
                // the connection task closes itself after QUIT
                let _ = lobby.handle(conn, msg);
            }
            LobbyCmd::Rejected {
                conn,
                error,
                resync_turn,
            } => lobby.reject(conn, &error, resync_turn),
            LobbyCmd::Disconnect { conn } => lobby.disconnect(conn),
        }
    }
    info!("lobby task ended");
}

pub struct Server {
    listener: TcpListener,
    lobby: LobbyHandle,
    max_line_length: usize,
}

impl Server {
    /// Binds the listener and starts a fresh lobby with an in-memory
    /// leaderboard and event logging.
    pub async fn bind(config: &ServerConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;

        let mut bus = EventBus::new();
        bus.register_handler(Box::new(TracingLogger));
        let lobby = Lobby::new(Box::new(MemoryLeaderboard::new()), bus);

        Ok(Server {
            listener,
            lobby: LobbyHandle::spawn(lobby),
            max_line_length: config.max_line_length,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the listener fails.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(addr = %self.local_addr()?, "UNO server listening");
        let mut next_conn: ConnId = 0;
        loop {
            let (stream, peer) = self.listener.accept().await?;
            next_conn += 1;
            let conn = next_conn;
            info!(conn, %peer, "accepted connection");

            let lobby = self.lobby.clone();
            let max_line_length = self.max_line_length;
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, lobby, conn, max_line_length).await {
                    error!(conn, error = %e, "connection failed");
                }
                info!(conn, "connection closed");
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    lobby: LobbyHandle,
    conn: ConnId,
    max_line_length: usize,
) -> anyhow::Result<()> {
    let (r, w) = stream.into_split();
    let mut lines = FramedRead::new(r, LinesCodec::new_with_max_length(max_line_length));
    let (outbox, mut rx_client) = mpsc::unbounded_channel::<Server2Client>();

    // The lobby holds the only sender, so this ends once the lobby forgets
    // the connection and everything queued has been written.
    let writer = tokio::spawn(async move {
        let mut sink = FramedWrite::new(w, LinesCodec::new());
        while let Some(msg) = rx_client.recv().await {
            if let Err(e) = sink.send(msg.to_string()).await {
                debug!(conn, error = %e, "write failed");
                break;
            }
        }
    });

    lobby.send(LobbyCmd::Connect { conn, outbox }).await?;

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                // the framed reader ends after a decode error, so this is fatal
                warn!(conn, max_line_length, "line too long, closing");
                let error = UnoError::MalformedCommand("line too long".to_string());
                lobby
                    .send(LobbyCmd::Rejected {
                        conn,
                        error,
                        resync_turn: false,
                    })
                    .await?;
                break;
            }
            Err(LinesCodecError::Io(e)) => {
                warn!(conn, error = %e, "read failed");
                break;
            }
        };
        debug!(conn, line = %line, "received");

        match Client2Server::parse(&line) {
            Ok(Client2Server::Quit) => {
                lobby
                    .send(LobbyCmd::Command {
                        conn,
                        msg: Client2Server::Quit,
                    })
                    .await?;
                break;
            }
            Ok(msg) => lobby.send(LobbyCmd::Command { conn, msg }).await?,
            Err(error) => {
                let resync_turn = Client2Server::resyncs_turn(&line);
                lobby
                    .send(LobbyCmd::Rejected {
                        conn,
                        error,
                        resync_turn,
                    })
                    .await?
            }
        }
    }

    lobby.send(LobbyCmd::Disconnect { conn }).await?;
    writer.await?;
    Ok(())
}
