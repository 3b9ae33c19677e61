use tracing::debug;

use crate::error::UnoError;
use crate::game::cards::*;
use crate::game::events::GameEvent as GE;
use crate::game::player::Player;

pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingPlay(String),
    /// The named player played a wild card and still owes a color.
    AwaitingWildColor(String),
    Finished(String),
}

pub struct UnoGame {
    deck: UnoDeck,
    discard: Vec<UnoCard>,
    players: Vec<Player>,
    current_player: usize,
    direction: bool, // true for clockwise, false for counter-clockwise
    active_color: Color,
    active_rank: Rank,
    wild_chooser: Option<usize>,
    winner: Option<usize>,
}

fn check_player_count(count: usize) -> Result<(), UnoError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        Ok(())
    } else {
        Err(UnoError::PlayerCount(count))
    }
}

impl UnoGame {
    /// Shuffles a fresh deck, deals `HAND_SIZE` cards to each player in the
    /// given order and turns up a plain number card to start the pile.
    pub fn start<S: AsRef<str>>(names: &[S]) -> Result<(UnoGame, Vec<GE>), UnoError> {
        check_player_count(names.len())?;
        let mut deck = UnoDeck::new();
        deck.shuffle();
        let mut game = UnoGame {
            deck,
            discard: Vec::new(),
            players: names.iter().map(|n| Player::new(n.as_ref())).collect(),
            current_player: 0,
            direction: true,
            active_color: Color::Red,
            active_rank: Rank::Number(Number::Zero),
            wild_chooser: None,
            winner: None,
        };

        let mut ev = vec![GE::GameStarted {
            players: game.player_names(),
        }];
        for i in 0..game.players.len() {
            let count = game.deal(i, HAND_SIZE);
            ev.push(GE::CardsDealt {
                player: game.players[i].name.clone(),
                count,
            });
        }

        let top_card = game.reveal_starting_card()?;
        ev.push(GE::TopCardChanged { top_card });
        ev.push(GE::PlayerTurn {
            player: game.current_player().to_string(),
        });
        Ok((game, ev))
    }

    /// Builds a game from a fixed arrangement instead of a shuffled deal.
    /// The last card of `discard` is the top of the pile and sets the
    /// active color and rank. The first hand listed moves first.
    pub fn from_layout(
        hands: Vec<(String, Vec<UnoCard>)>,
        deck: Vec<UnoCard>,
        discard: Vec<UnoCard>,
    ) -> Result<UnoGame, UnoError> {
        check_player_count(hands.len())?;
        let top = *discard.last().ok_or(UnoError::NoCardAvailable)?;
        let players = hands
            .into_iter()
            .map(|(name, cards)| {
                let mut player = Player::new(&name);
                cards.into_iter().for_each(|c| player.push_card(c));
                player
            })
            .collect();
        Ok(UnoGame {
            deck: UnoDeck::from_cards(deck),
            discard,
            players,
            current_player: 0,
            direction: true,
            active_color: top.color(),
            active_rank: top.rank(),
            wild_chooser: None,
            winner: None,
        })
    }

    fn reveal_starting_card(&mut self) -> Result<UnoCard, UnoError> {
        loop {
            let card = self.deck.pop().ok_or(UnoError::NoCardAvailable)?;
            if !card.rank().has_effect() {
                self.discard.push(card);
                self.active_color = card.color();
                self.active_rank = card.rank();
                return Ok(card);
            }
            // only plain number cards may open the pile
            self.deck.push(card);
            self.deck.shuffle();
        }
    }

    /// Takes the top card of the deck, first recycling the discard pile
    /// (minus its top card) when the deck has run dry.
    pub fn draw(&mut self) -> Result<UnoCard, UnoError> {
        if self.deck.is_empty() {
            self.recycle_discard();
        }
        self.deck.pop().ok_or(UnoError::NoCardAvailable)
    }

    fn recycle_discard(&mut self) {
        let Some(top) = self.discard.pop() else {
            return;
        };
        let rest = std::mem::take(&mut self.discard);
        self.discard.push(top);
        if rest.is_empty() {
            return;
        }
        debug!(cards = rest.len(), "reshuffling discard pile into the deck");
        self.deck.extend(rest);
        self.deck.shuffle();
    }

    /// Gives up to `count` cards to a player, stopping early if nothing is
    /// left to draw. Returns how many were actually dealt.
    fn deal(&mut self, player_index: usize, count: usize) -> usize {
        let mut dealt = 0;
        for _ in 0..count {
            match self.draw() {
                Ok(card) => {
                    self.players[player_index].push_card(card);
                    dealt += 1;
                }
                Err(_) => {
                    debug!(
                        player = %self.players[player_index].name,
                        wanted = count,
                        dealt,
                        "ran out of cards while dealing"
                    );
                    break;
                }
            }
        }
        dealt
    }

    fn next_player(&self) -> usize {
        let len = self.players.len();
        if self.direction {
            (self.current_player + 1) % len
        } else {
            (self.current_player + len - 1) % len
        }
    }

    fn advance(&mut self) {
        self.current_player = self.next_player();
    }

    fn seat_of(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == player)
    }

    fn ensure_running(&self) -> Result<(), UnoError> {
        match self.winner {
            Some(_) => Err(UnoError::NoGameInProgress),
            None => Ok(()),
        }
    }

    fn ensure_turn(&self, player: &str) -> Result<usize, UnoError> {
        self.ensure_running()?;
        match self.seat_of(player) {
            Some(idx) if idx == self.current_player => Ok(idx),
            _ => Err(UnoError::NotYourTurn),
        }
    }

    fn ensure_no_wild_pending(&self) -> Result<(), UnoError> {
        match self.wild_chooser {
            Some(_) => Err(UnoError::WildColorPending),
            None => Ok(()),
        }
    }

    fn turn_event(&self) -> GE {
        GE::PlayerTurn {
            player: self.current_player().to_string(),
        }
    }

    pub fn play_card(&mut self, player: &str, card: UnoCard) -> Result<Vec<GE>, UnoError> {
        let idx = self.ensure_turn(player)?;
        self.ensure_no_wild_pending()?;
        if !can_play(&card, self.active_color, self.active_rank) {
            return Err(UnoError::IllegalPlay(card));
        }
        let card = self.players[idx]
            .remove_card(&card)
            .ok_or(UnoError::CardNotInHand(card))?;

        self.discard.push(card);
        self.active_color = card.color();
        self.active_rank = card.rank();
        let name = self.players[idx].name.clone();
        let mut ev = vec![
            GE::CardPlayed {
                player: name.clone(),
                card,
            },
            GE::TopCardChanged { top_card: card },
        ];

        match card.rank() {
            Rank::Number(_) => self.advance(),
            Rank::Skip => {
                self.advance();
                ev.push(GE::PlayerSkipped {
                    player: self.current_player().to_string(),
                });
                self.advance();
            }
            Rank::Reverse => {
                self.direction = !self.direction;
                ev.push(GE::DirectionChanged {
                    clockwise: self.direction,
                });
                if self.players.len() == 2 {
                    // with two players a reverse hands the turn straight back
                    self.advance();
                    ev.push(GE::PlayerSkipped {
                        player: self.current_player().to_string(),
                    });
                }
                self.advance();
            }
            Rank::DrawTwo => {
                self.advance();
                ev.extend(self.penalize_current(2));
                self.advance();
            }
            Rank::Wild => {
                self.wild_chooser = Some(idx);
                ev.push(GE::WildColorRequested { player: name.clone() });
                self.advance();
            }
            Rank::WildDrawFour => {
                self.advance();
                ev.extend(self.penalize_current(4));
                self.advance();
                self.wild_chooser = Some(idx);
                ev.push(GE::WildColorRequested { player: name.clone() });
            }
        }

        if self.players[idx].hand().is_empty() {
            self.winner = Some(idx);
            self.wild_chooser = None;
            ev.push(GE::GameOver {
                winner: name,
                scores: self.scores(),
            });
        } else {
            ev.push(self.turn_event());
        }
        Ok(ev)
    }

    fn penalize_current(&mut self, count: usize) -> Vec<GE> {
        let target = self.current_player;
        let dealt = self.deal(target, count);
        let player = self.players[target].name.clone();
        vec![
            GE::DrawPenalty {
                target: player.clone(),
                count: dealt,
            },
            GE::PlayerSkipped { player },
        ]
    }

    /// Resolves a pending wild card. Only the player who laid it may pick,
    /// and only one of the four base colors.
    pub fn set_wild_color(&mut self, player: &str, color: Color) -> Result<Vec<GE>, UnoError> {
        self.ensure_running()?;
        let chooser = self.wild_chooser.ok_or(UnoError::NoWildColorPending)?;
        if self.seat_of(player) != Some(chooser) {
            return Err(UnoError::NotYourTurn);
        }
        if color == Color::Wild {
            return Err(UnoError::InvalidWildColor);
        }
        self.active_color = color;
        self.wild_chooser = None;
        Ok(vec![
            GE::WildColorChosen {
                player: player.to_string(),
                color,
            },
            self.turn_event(),
        ])
    }

    /// Puts one card into the current player's hand. The turn stays with
    /// them; `pass_turn` moves it on.
    pub fn draw_card_for_player(&mut self, player: &str) -> Result<(UnoCard, Vec<GE>), UnoError> {
        let idx = self.ensure_turn(player)?;
        self.ensure_no_wild_pending()?;
        let card = self.draw()?;
        self.players[idx].push_card(card);
        Ok((
            card,
            vec![GE::CardDrawn {
                player: player.to_string(),
                card,
            }],
        ))
    }

    pub fn pass_turn(&mut self, player: &str) -> Result<Vec<GE>, UnoError> {
        self.ensure_turn(player)?;
        self.ensure_no_wild_pending()?;
        self.advance();
        Ok(vec![
            GE::PlayerPassed {
                player: player.to_string(),
            },
            self.turn_event(),
        ])
    }

    pub fn has_won(&self, player: &str) -> bool {
        self.seat_of(player)
            .map(|idx| self.players[idx].hand().is_empty())
            .unwrap_or(false)
    }

    /// Penalty points per player, lowest first.
    pub fn scores(&self) -> Vec<(String, u32)> {
        let mut scores: Vec<(String, u32)> = self
            .players
            .iter()
            .map(|p| (p.name.clone(), p.penalty_points()))
            .collect();
        scores.sort_by(|a, b| a.1.cmp(&b.1));
        scores
    }

    pub fn phase(&self) -> GamePhase {
        match (self.winner, self.wild_chooser) {
            (Some(w), _) => GamePhase::Finished(self.players[w].name.clone()),
            (None, Some(c)) => GamePhase::AwaitingWildColor(self.players[c].name.clone()),
            (None, None) => GamePhase::AwaitingPlay(self.current_player().to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.map(|w| self.players[w].name.as_str())
    }

    pub fn awaiting_wild_color(&self) -> bool {
        self.wild_chooser.is_some()
    }

    pub fn current_player(&self) -> &str {
        &self.players[self.current_player].name
    }

    pub fn direction(&self) -> bool {
        self.direction
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn active_rank(&self) -> Rank {
        self.active_rank
    }

    pub fn top_card(&self) -> UnoCard {
        *self
            .discard
            .last()
            .expect("discard pile always keeps its top card")
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn is_playing(&self, player: &str) -> bool {
        self.seat_of(player).is_some()
    }

    pub fn hand(&self, player: &str) -> Option<&[UnoCard]> {
        self.seat_of(player).map(|idx| self.players[idx].hand())
    }

    /// `(name, hand size)` for every player in turn order.
    pub fn cards_count(&self) -> Vec<(String, usize)> {
        self.players
            .iter()
            .map(|p| (p.name.clone(), p.hand().len()))
            .collect()
    }

    pub fn opponents_of(&self, player: &str) -> Vec<(String, usize)> {
        self.cards_count()
            .into_iter()
            .filter(|(name, _)| name != player)
            .collect()
    }
}
