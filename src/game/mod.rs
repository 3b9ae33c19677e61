pub mod cards;
pub mod events;
pub mod player;
pub mod uno_game;
pub use cards::*;
pub use player::Player;
pub use uno_game::{GamePhase, UnoGame};
