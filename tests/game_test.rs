use uno_server::error::UnoError;
use uno_server::game::events::GameEvent as GE;
use uno_server::game::*;

#[cfg(test)]
mod game_test {
    use super::*;

    fn card(s: &str) -> UnoCard {
        s.parse().unwrap()
    }

    fn cards(list: &[&str]) -> Vec<UnoCard> {
        list.iter().map(|s| card(s)).collect()
    }

    /// A fixed table: `hands` in turn order, `deck` drawn from the end,
    /// `discard` with its top card last.
    fn layout(hands: &[(&str, &[&str])], deck: &[&str], discard: &[&str]) -> UnoGame {
        let hands = hands
            .iter()
            .map(|(name, hand)| (name.to_string(), cards(hand)))
            .collect();
        UnoGame::from_layout(hands, cards(deck), cards(discard)).unwrap()
    }

    fn total_cards(game: &UnoGame) -> usize {
        game.deck_len()
            + game.discard_len()
            + game.cards_count().iter().map(|(_, n)| n).sum::<usize>()
    }

    #[test]
    fn test_start_deals_and_reveals() {
        let (game, events) = UnoGame::start(&["Alice", "Bob", "Charlie"]).unwrap();
        for (_, count) in game.cards_count() {
            assert_eq!(count, 7);
        }
        assert!(!game.top_card().rank().has_effect());
        assert_eq!(game.active_color(), game.top_card().color());
        assert_eq!(game.current_player(), "Alice");
        assert!(game.direction());
        assert_eq!(game.discard_len(), 1);
        assert_eq!(total_cards(&game), 108);
        assert_eq!(
            events.first(),
            Some(&GE::GameStarted {
                players: vec!["Alice".into(), "Bob".into(), "Charlie".into()]
            })
        );
        assert_eq!(game.phase(), GamePhase::AwaitingPlay("Alice".into()));
    }

    #[test]
    fn test_start_player_count() {
        assert_eq!(
            UnoGame::start(&["Alice"]).err(),
            Some(UnoError::PlayerCount(1))
        );
        assert_eq!(
            UnoGame::start(&["A", "B", "C", "D", "E"]).err(),
            Some(UnoError::PlayerCount(5))
        );
        assert!(UnoGame::start(&["A", "B", "C", "D"]).is_ok());
    }

    #[test]
    fn test_number_card_passes_turn() {
        let mut game = layout(
            &[("A", &["RED:7", "BLUE:1"]), ("B", &["GREEN:2"])],
            &["YELLOW:4"],
            &["RED:5"],
        );
        let events = game.play_card("A", card("RED:7")).unwrap();
        assert_eq!(game.current_player(), "B");
        assert_eq!(game.top_card(), card("RED:7"));
        assert_eq!(game.hand("A").unwrap(), &[card("BLUE:1")]);
        assert_eq!(events.last(), Some(&GE::PlayerTurn { player: "B".into() }));
    }

    #[test]
    fn test_same_rank_different_color() {
        let mut game = layout(
            &[("A", &["RED:5", "RED:1"]), ("B", &["GREEN:2"])],
            &[],
            &["BLUE:5"],
        );
        game.play_card("A", card("RED:5")).unwrap();
        assert_eq!(game.active_color(), Color::Red);
        assert_eq!(game.top_card(), card("RED:5"));
    }

    #[test]
    fn test_skip_jumps_next_player() {
        let mut game = layout(
            &[
                ("A", &["RED:SKIP", "RED:1"]),
                ("B", &["GREEN:2"]),
                ("C", &["GREEN:3"]),
            ],
            &[],
            &["RED:5"],
        );
        let events = game.play_card("A", card("RED:SKIP")).unwrap();
        assert_eq!(game.current_player(), "C");
        assert!(events.contains(&GE::PlayerSkipped { player: "B".into() }));
    }

    #[test]
    fn test_reverse_with_three_players() {
        let mut game = layout(
            &[
                ("A", &["RED:REVERSE", "RED:1"]),
                ("B", &["GREEN:2"]),
                ("C", &["GREEN:3"]),
            ],
            &[],
            &["RED:5"],
        );
        game.play_card("A", card("RED:REVERSE")).unwrap();
        assert!(!game.direction());
        assert_eq!(game.current_player(), "C");
    }

    #[test]
    fn test_reverse_with_two_players_acts_as_skip() {
        let mut game = layout(
            &[("A", &["RED:REVERSE", "RED:1"]), ("B", &["GREEN:2"])],
            &[],
            &["RED:5"],
        );
        game.play_card("A", card("RED:REVERSE")).unwrap();
        assert_eq!(game.current_player(), "A");
        assert!(game.play_card("A", card("RED:1")).is_ok());
    }

    #[test]
    fn test_draw_two_penalizes_and_skips() {
        let mut game = layout(
            &[
                ("A", &["RED:DRAW_TWO", "RED:1"]),
                ("B", &["GREEN:2"]),
                ("C", &["GREEN:3"]),
            ],
            &["YELLOW:1", "YELLOW:2", "YELLOW:3"],
            &["RED:5"],
        );
        let before = total_cards(&game);
        let events = game.play_card("A", card("RED:DRAW_TWO")).unwrap();
        assert_eq!(game.hand("B").unwrap().len(), 3);
        assert_eq!(game.current_player(), "C");
        assert_eq!(game.deck_len(), 1);
        assert!(events.contains(&GE::DrawPenalty {
            target: "B".into(),
            count: 2
        }));
        assert_eq!(total_cards(&game), before);
    }

    #[test]
    fn test_wild_requires_color_from_player_who_laid_it() {
        let mut game = layout(
            &[
                ("A", &["WILD:WILD", "RED:1"]),
                ("B", &["GREEN:3", "BLUE:3"]),
            ],
            &["YELLOW:9"],
            &["RED:5"],
        );
        game.play_card("A", card("WILD:WILD")).unwrap();
        assert!(game.awaiting_wild_color());
        assert_eq!(game.phase(), GamePhase::AwaitingWildColor("A".into()));
        assert_eq!(game.current_player(), "B");

        assert_eq!(
            game.play_card("B", card("GREEN:3")),
            Err(UnoError::WildColorPending)
        );
        assert_eq!(
            game.draw_card_for_player("B").err(),
            Some(UnoError::WildColorPending)
        );
        assert_eq!(
            game.set_wild_color("B", Color::Green),
            Err(UnoError::NotYourTurn)
        );
        assert_eq!(
            game.set_wild_color("A", Color::Wild),
            Err(UnoError::InvalidWildColor)
        );

        let events = game.set_wild_color("A", Color::Green).unwrap();
        assert!(events.contains(&GE::WildColorChosen {
            player: "A".into(),
            color: Color::Green
        }));
        assert_eq!(game.active_color(), Color::Green);
        assert_eq!(
            game.set_wild_color("A", Color::Blue),
            Err(UnoError::NoWildColorPending)
        );

        assert_eq!(
            game.play_card("B", card("BLUE:3")),
            Err(UnoError::IllegalPlay(card("BLUE:3")))
        );
        game.play_card("B", card("GREEN:3")).unwrap();
        assert_eq!(game.current_player(), "A");
    }

    #[test]
    fn test_wild_draw_four() {
        let mut game = layout(
            &[
                ("A", &["WILD:WILD_DRAW4", "RED:1"]),
                ("B", &["GREEN:2"]),
                ("C", &["GREEN:3"]),
            ],
            &["YELLOW:1", "YELLOW:2", "YELLOW:3", "YELLOW:4", "YELLOW:5"],
            &["BLUE:5"],
        );
        game.play_card("A", card("WILD:WILD_DRAW4")).unwrap();
        assert_eq!(game.hand("B").unwrap().len(), 5);
        assert_eq!(game.current_player(), "C");
        assert_eq!(game.phase(), GamePhase::AwaitingWildColor("A".into()));

        game.set_wild_color("A", Color::Yellow).unwrap();
        assert_eq!(game.active_color(), Color::Yellow);
        assert_eq!(
            game.play_card("C", card("GREEN:3")),
            Err(UnoError::IllegalPlay(card("GREEN:3")))
        );
    }

    #[test]
    fn test_rejected_plays_change_nothing() {
        let mut game = layout(
            &[("A", &["RED:1", "BLUE:7"]), ("B", &["RED:2"])],
            &["YELLOW:4"],
            &["RED:5"],
        );
        assert_eq!(
            game.play_card("B", card("RED:2")),
            Err(UnoError::NotYourTurn)
        );
        assert_eq!(
            game.play_card("A", card("BLUE:7")),
            Err(UnoError::IllegalPlay(card("BLUE:7")))
        );
        assert_eq!(
            game.play_card("A", card("RED:9")),
            Err(UnoError::CardNotInHand(card("RED:9")))
        );
        assert_eq!(
            game.play_card("Nobody", card("RED:1")),
            Err(UnoError::NotYourTurn)
        );
        assert_eq!(game.current_player(), "A");
        assert_eq!(game.hand("A").unwrap().len(), 2);
        assert_eq!(game.top_card(), card("RED:5"));
    }

    #[test]
    fn test_draw_then_pass() {
        let mut game = layout(
            &[("A", &["BLUE:1"]), ("B", &["GREEN:2"])],
            &["YELLOW:4"],
            &["RED:5"],
        );
        let (drawn, _) = game.draw_card_for_player("A").unwrap();
        assert_eq!(drawn, card("YELLOW:4"));
        assert_eq!(game.current_player(), "A");
        assert_eq!(game.hand("A").unwrap().len(), 2);

        game.pass_turn("A").unwrap();
        assert_eq!(game.current_player(), "B");
        assert_eq!(game.pass_turn("A"), Err(UnoError::NotYourTurn));
    }

    #[test]
    fn test_empty_deck_recycles_discard() {
        let mut game = layout(
            &[("A", &["RED:3"]), ("B", &["GREEN:2"])],
            &[],
            &["RED:1", "RED:2", "RED:5"],
        );
        let before = total_cards(&game);
        let (drawn, _) = game.draw_card_for_player("A").unwrap();
        assert!(drawn == card("RED:1") || drawn == card("RED:2"));
        assert_eq!(game.top_card(), card("RED:5"));
        assert_eq!(game.discard_len(), 1);
        assert_eq!(game.deck_len(), 1);
        assert_eq!(total_cards(&game), before);
    }

    #[test]
    fn test_no_card_available() {
        let mut game = layout(
            &[("A", &["BLUE:3"]), ("B", &["GREEN:2"])],
            &[],
            &["RED:5"],
        );
        assert_eq!(
            game.draw_card_for_player("A").err(),
            Some(UnoError::NoCardAvailable)
        );
        assert_eq!(game.hand("A").unwrap().len(), 1);
    }

    #[test]
    fn test_last_card_wins() {
        let mut game = layout(
            &[("A", &["RED:1"]), ("B", &["GREEN:2", "WILD:WILD"])],
            &["YELLOW:4"],
            &["RED:5"],
        );
        let events = game.play_card("A", card("RED:1")).unwrap();
        assert!(game.has_won("A"));
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some("A"));
        assert_eq!(game.phase(), GamePhase::Finished("A".into()));
        assert_eq!(
            events.last(),
            Some(&GE::GameOver {
                winner: "A".into(),
                scores: vec![("A".into(), 0), ("B".into(), 52)],
            })
        );
        assert_eq!(
            game.play_card("B", card("GREEN:2")),
            Err(UnoError::NoGameInProgress)
        );
    }

    #[test]
    fn test_action_card_effect_applies_before_win() {
        let mut game = layout(
            &[
                ("A", &["RED:DRAW_TWO"]),
                ("B", &["GREEN:2"]),
                ("C", &["GREEN:3"]),
            ],
            &["YELLOW:1", "YELLOW:2"],
            &["RED:5"],
        );
        game.play_card("A", card("RED:DRAW_TWO")).unwrap();
        assert_eq!(game.winner(), Some("A"));
        assert_eq!(game.hand("B").unwrap().len(), 3);
    }
}
