//! The lobby owns everything clients share: the session registry, the one
//! optional game, the leaderboard and the event bus. It is driven by a
//! single task (see `server::run_lobby`), so each command runs start to
//! finish without interleaving with any other.

pub mod registry;

use tracing::{debug, info};

use crate::error::UnoError;
use crate::game::cards::{Color, UnoCard};
use crate::game::uno_game::{UnoGame, MAX_PLAYERS, MIN_PLAYERS};
use crate::ports::bus::EventBus;
use crate::ports::leaderboard::Leaderboard;
use crate::protocol::{Client2Server, Server2Client};
use registry::{ConnId, Outbox, ReadyState, SessionRegistry};

/// Whether the connection should stay open after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

pub struct Lobby {
    registry: SessionRegistry,
    game: Option<UnoGame>,
    leaderboard: Box<dyn Leaderboard>,
    bus: EventBus,
}

impl Lobby {
    pub fn new(leaderboard: Box<dyn Leaderboard>, bus: EventBus) -> Self {
        Lobby {
            registry: SessionRegistry::new(),
            game: None,
            leaderboard,
            bus,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn game(&self) -> Option<&UnoGame> {
        self.game.as_ref()
    }

    /// Adopts a prepared game, e.g. a fixed layout. Every player in it must
    /// already have joined, and no other game may be running.
    pub fn install_game(&mut self, game: UnoGame) -> Result<(), UnoError> {
        if self.game.is_some() {
            return Err(UnoError::GameInProgress);
        }
        if !game.player_names().iter().all(|n| self.registry.contains(n)) {
            return Err(UnoError::NotJoined);
        }
        self.game = Some(game);
        Ok(())
    }

    pub fn connect(&mut self, conn: ConnId, outbox: Outbox) {
        debug!(conn, "connection registered");
        self.registry.connect(conn, outbox);
    }

    /// Connection loss counts as an `EXIT` for whoever the connection was.
    pub fn disconnect(&mut self, conn: ConnId) {
        let name = self.registry.name_of(conn).map(str::to_string);
        self.registry.disconnect(conn);
        debug!(conn, "connection removed");
        if let Some(name) = name {
            self.remove_participant(&name);
        }
    }

    pub fn handle_line(&mut self, conn: ConnId, line: &str) -> Flow {
        match Client2Server::parse(line) {
            Ok(msg) => self.handle(conn, msg),
            Err(err) => {
                self.reject(conn, &err, Client2Server::resyncs_turn(line));
                Flow::Continue
            }
        }
    }

    pub fn handle(&mut self, conn: ConnId, msg: Client2Server) -> Flow {
        debug!(conn, ?msg, "command");
        let is_join = matches!(msg, Client2Server::Join { .. });
        let resync_turn = matches!(msg, Client2Server::Play { .. } | Client2Server::Draw);

        let result = match msg {
            Client2Server::Join { name } => self.join(conn, &name),
            Client2Server::Ready { name } => {
                self.set_ready(conn, name.as_deref(), ReadyState::Ready)
            }
            Client2Server::Unready { name } => {
                self.set_ready(conn, name.as_deref(), ReadyState::NotReady)
            }
            Client2Server::Exit { name } => self.exit(conn, name.as_deref()),
            Client2Server::InitGame { name } => self.init_game(conn, name.as_deref()),
            Client2Server::List => {
                self.registry
                    .send_to(conn, Server2Client::UserList(self.registry.roster()));
                Ok(())
            }
            Client2Server::Top5 => {
                self.registry
                    .send_to(conn, Server2Client::Top5(self.leaderboard.top(5)));
                Ok(())
            }
            Client2Server::Play { card } => self.play(conn, card),
            Client2Server::Draw => self.draw(conn),
            Client2Server::WildColor { color } => self.wild_color(conn, color),
            Client2Server::GetGameState => self.game_state(conn),
            Client2Server::Quit => {
                self.registry.send_to(conn, Server2Client::Bye);
                self.disconnect(conn);
                return Flow::Close;
            }
            Client2Server::Unknown(_) => {
                self.registry.send_to(conn, Server2Client::Ack);
                Ok(())
            }
        };

        if let Err(err) = result {
            let reply = match (&err, is_join) {
                (UnoError::NameTaken(_), true) => Server2Client::ErrorTaken,
                (UnoError::GameInProgress, true) => Server2Client::ErrorGameInProgress,
                _ => Server2Client::Error(err.reason()),
            };
            debug!(conn, error = %err, "command rejected");
            self.registry.send_to(conn, reply);
            if resync_turn {
                self.send_turn(conn);
            }
        }
        Flow::Continue
    }

    /// Reports a line that never made it past parsing. A garbled `PLAY` or
    /// `DRAW` still gets the current turn, like any other failed move.
    pub fn reject(&mut self, conn: ConnId, err: &UnoError, resync_turn: bool) {
        debug!(conn, error = %err, "unparseable command");
        self.registry.send_to(conn, Server2Client::Error(err.reason()));
        if resync_turn {
            self.send_turn(conn);
        }
    }

    fn send_turn(&self, conn: ConnId) {
        if let Some(game) = &self.game {
            self.registry
                .send_to(conn, Server2Client::Turn(game.current_player().to_string()));
        }
    }

    /// The connection's joined name; a name given on the command line must
    /// agree with it.
    fn identify(&self, conn: ConnId, claimed: Option<&str>) -> Result<String, UnoError> {
        let name = self.registry.name_of(conn).ok_or(UnoError::NotJoined)?;
        match claimed {
            Some(claimed) if claimed != name => Err(UnoError::MalformedCommand(format!(
                "connection is joined as `{}`, not `{}`",
                name, claimed
            ))),
            _ => Ok(name.to_string()),
        }
    }

    fn join(&mut self, conn: ConnId, name: &str) -> Result<(), UnoError> {
        if let Some(existing) = self.registry.name_of(conn) {
            return Err(UnoError::AlreadyJoined(existing.to_string()));
        }
        if self.registry.contains(name) {
            return Err(UnoError::NameTaken(name.to_string()));
        }
        if self.game.is_some() {
            return Err(UnoError::GameInProgress);
        }
        self.registry.join(name, conn);
        info!(conn, name, "player joined");
        self.registry
            .send_to(conn, Server2Client::JoinSuccess(name.to_string()));
        self.registry
            .broadcast(&Server2Client::UserList(self.registry.roster()));
        Ok(())
    }

    fn set_ready(
        &mut self,
        conn: ConnId,
        claimed: Option<&str>,
        state: ReadyState,
    ) -> Result<(), UnoError> {
        let name = self.identify(conn, claimed)?;
        if self.game.is_some() {
            return Err(UnoError::GameInProgress);
        }
        self.registry.set_state(&name, state)?;
        let msg = match state {
            ReadyState::Ready => Server2Client::Ready(name),
            ReadyState::NotReady => Server2Client::Unready(name),
        };
        self.registry.broadcast(&msg);

        let count = self.registry.len();
        if self.registry.all_ready() && (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            self.start_game()?;
        }
        Ok(())
    }

    fn exit(&mut self, conn: ConnId, claimed: Option<&str>) -> Result<(), UnoError> {
        let name = self.identify(conn, claimed)?;
        self.remove_participant(&name);
        Ok(())
    }

    /// Frees the name. A running game that included the player cannot
    /// continue with a hole in its turn order, so it is abandoned.
    fn remove_participant(&mut self, name: &str) {
        if !self.registry.leave(name) {
            return;
        }
        info!(name, "player left");
        if self.game.as_ref().is_some_and(|g| g.is_playing(name)) {
            self.game = None;
            self.registry.reset_states();
            info!(name, "game aborted");
            self.registry
                .broadcast(&Server2Client::GameAborted(name.to_string()));
        }
        self.registry
            .broadcast(&Server2Client::UserList(self.registry.roster()));
        self.registry
            .broadcast(&Server2Client::UserLeft(name.to_string()));
    }

    /// Starts a game with everyone registered, ready or not, or re-sends the
    /// caller's opening view if their game is already running.
    fn init_game(&mut self, conn: ConnId, claimed: Option<&str>) -> Result<(), UnoError> {
        let name = self.identify(conn, claimed)?;
        if let Some(game) = &self.game {
            if !game.is_playing(&name) {
                return Err(UnoError::GameInProgress);
            }
            self.registry.send_to(conn, init_view(game, &name));
            return Ok(());
        }
        self.start_game()
    }

    fn start_game(&mut self) -> Result<(), UnoError> {
        let names = self.registry.names();
        let (game, events) = UnoGame::start(&names)?;
        self.bus.publish(events);
        info!(players = %names.join(","), "game started");

        self.registry.broadcast(&Server2Client::StartGame);
        for name in &names {
            self.registry.send_to_player(name, init_view(&game, name));
        }
        self.game = Some(game);
        Ok(())
    }

    fn play(&mut self, conn: ConnId, card: UnoCard) -> Result<(), UnoError> {
        let name = self.identify(conn, None)?;
        let game = self.game.as_mut().ok_or(UnoError::NoGameInProgress)?;
        let events = game.play_card(&name, card)?;
        self.bus.publish(events);

        let top_card = game.top_card();
        let current_player = game.current_player().to_string();
        for player in game.player_names() {
            let hand = game.hand(&player).unwrap_or_default().to_vec();
            let msg = Server2Client::PlayResult {
                player: name.clone(),
                card,
                top_card,
                current_player: current_player.clone(),
                opponents: game.opponents_of(&player),
                hand,
            };
            self.registry.send_to_player(&player, msg);
        }

        if let Some(winner) = game.winner().map(str::to_string) {
            self.finish_game(winner);
        }
        Ok(())
    }

    fn finish_game(&mut self, winner: String) {
        let scores = self
            .game
            .take()
            .map(|game| game.scores())
            .unwrap_or_default();
        self.leaderboard.record_win(&winner);
        self.registry.reset_states();
        info!(winner = %winner, "game over");
        self.registry
            .broadcast(&Server2Client::GameOver { winner, scores });
        self.registry
            .broadcast(&Server2Client::UserList(self.registry.roster()));
    }

    /// Draws one card for the current player and passes the turn. An empty
    /// deck still passes the turn so the table cannot stall.
    fn draw(&mut self, conn: ConnId) -> Result<(), UnoError> {
        let name = self.identify(conn, None)?;
        let game = self.game.as_mut().ok_or(UnoError::NoGameInProgress)?;
        match game.draw_card_for_player(&name) {
            Ok((card, events)) => {
                self.bus.publish(events);
                self.registry.send_to(conn, Server2Client::Drew(card));
                let hand = game.hand(&name).unwrap_or_default().to_vec();
                self.registry.send_to(conn, Server2Client::Hand(hand));
            }
            Err(UnoError::NoCardAvailable) => {
                self.registry.send_to(
                    conn,
                    Server2Client::Error(UnoError::NoCardAvailable.reason()),
                );
            }
            Err(err) => return Err(err),
        }
        let events = game.pass_turn(&name)?;
        self.bus.publish(events);
        self.registry
            .broadcast(&Server2Client::Turn(game.current_player().to_string()));
        Ok(())
    }

    fn wild_color(&mut self, conn: ConnId, color: Color) -> Result<(), UnoError> {
        let name = self.identify(conn, None)?;
        let game = self.game.as_mut().ok_or(UnoError::NoGameInProgress)?;
        let events = game.set_wild_color(&name, color)?;
        self.bus.publish(events);
        self.registry.broadcast(&Server2Client::WildColor(color));
        self.registry
            .broadcast(&Server2Client::Turn(game.current_player().to_string()));
        Ok(())
    }

    fn game_state(&mut self, conn: ConnId) -> Result<(), UnoError> {
        let name = self.identify(conn, None)?;
        let game = self.game.as_ref().ok_or(UnoError::NoGameInProgress)?;
        let hand = game.hand(&name).ok_or(UnoError::NoGameInProgress)?;
        self.registry
            .send_to(conn, Server2Client::Hand(hand.to_vec()));
        self.registry
            .send_to(conn, Server2Client::TopCard(game.top_card()));
        self.registry
            .send_to(conn, Server2Client::Players(game.cards_count()));
        self.registry
            .send_to(conn, Server2Client::Turn(game.current_player().to_string()));
        Ok(())
    }
}

fn init_view(game: &UnoGame, player: &str) -> Server2Client {
    Server2Client::InitGame {
        top_card: game.top_card(),
        current_player: game.current_player().to_string(),
        opponents: game.opponents_of(player),
        hand: game.hand(player).unwrap_or_default().to_vec(),
    }
}
