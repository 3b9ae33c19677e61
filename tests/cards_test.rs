use std::collections::HashMap;

use uno_server::game::*;

#[cfg(test)]
mod cards_test {
    use super::*;

    fn card(s: &str) -> UnoCard {
        s.parse().unwrap()
    }

    #[test]
    fn test_deck_composition() {
        let deck = UnoDeck::new();
        assert_eq!(deck.len(), 108);

        let mut counts: HashMap<UnoCard, usize> = HashMap::new();
        for c in deck.cards() {
            *counts.entry(*c).or_insert(0) += 1;
        }
        for color in Color::BASE {
            assert_eq!(counts[&UnoCard::number(color, Number::Zero).unwrap()], 1);
            for n in &Number::ALL[1..] {
                assert_eq!(counts[&UnoCard::number(color, *n).unwrap()], 2);
            }
            for rank in [Rank::Skip, Rank::Reverse, Rank::DrawTwo] {
                assert_eq!(counts[&UnoCard::new(color, rank).unwrap()], 2);
            }
        }
        assert_eq!(counts[&UnoCard::wild()], 4);
        assert_eq!(counts[&UnoCard::wild_draw_four()], 4);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = UnoDeck::new();
        let mut before = deck.cards().to_vec();
        deck.shuffle();
        let mut after = deck.cards().to_vec();
        before.sort_by_key(|c| c.to_string());
        after.sort_by_key(|c| c.to_string());
        assert_eq!(before, after);
    }

    #[test]
    fn test_card_text_form() {
        assert_eq!(card("RED:5").to_string(), "RED:5");
        assert_eq!(card("blue:skip").to_string(), "BLUE:SKIP");
        assert_eq!(card("GREEN:DRAW_TWO").rank(), Rank::DrawTwo);
        assert_eq!(card("YELLOW:REVERSE").color(), Color::Yellow);
        assert_eq!(card("WILD:WILD"), UnoCard::wild());
        assert_eq!(card("WILD:WILD_DRAW4").to_string(), "WILD:WILD_DRAW4");
    }

    #[test]
    fn test_card_parse_errors() {
        assert!(matches!("RED5".parse::<UnoCard>(), Err(CardParseError::Format(_))));
        assert!(matches!("PINK:5".parse::<UnoCard>(), Err(CardParseError::Color(_))));
        assert!(matches!("RED:10".parse::<UnoCard>(), Err(CardParseError::Rank(_))));
        assert!(matches!(
            "RED:WILD".parse::<UnoCard>(),
            Err(CardParseError::Mismatch { .. })
        ));
        assert!(matches!(
            "WILD:5".parse::<UnoCard>(),
            Err(CardParseError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_can_play() {
        let red_five = Rank::Number(Number::Five);
        assert!(can_play(&card("RED:9"), Color::Red, red_five));
        assert!(can_play(&card("BLUE:5"), Color::Red, red_five));
        assert!(can_play(&card("WILD:WILD"), Color::Red, red_five));
        assert!(can_play(&card("WILD:WILD_DRAW4"), Color::Green, Rank::Skip));
        assert!(!can_play(&card("BLUE:7"), Color::Red, red_five));
        assert!(can_play(&card("BLUE:SKIP"), Color::Green, Rank::Skip));
        // after a wild, only the chosen color matters
        assert!(can_play(&card("GREEN:3"), Color::Green, Rank::Wild));
        assert!(!can_play(&card("RED:3"), Color::Green, Rank::Wild));
    }

    #[test]
    fn test_points() {
        assert_eq!(card("RED:7").points(), 7);
        assert_eq!(card("RED:0").points(), 0);
        assert_eq!(card("GREEN:SKIP").points(), 20);
        assert_eq!(UnoCard::wild_draw_four().points(), 50);
    }
}
