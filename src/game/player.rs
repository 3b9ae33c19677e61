use crate::game::cards::UnoCard;

pub struct Player {
    pub name: String,
    hand: Vec<UnoCard>,
}

impl Player {
    pub fn new(name: &str) -> Player {
        Player {
            name: name.to_string(),
            hand: Vec::new(),
        }
    }

    pub fn push_card(&mut self, card: UnoCard) {
        self.hand.push(card);
    }

    pub fn hand(&self) -> &[UnoCard] {
        &self.hand
    }

    pub fn holds(&self, card: &UnoCard) -> bool {
        self.hand.contains(card)
    }

    /// Removes the first card equal to `card`. Identical cards are
    /// interchangeable, so which copy goes does not matter.
    pub fn remove_card(&mut self, card: &UnoCard) -> Option<UnoCard> {
        let idx = self.hand.iter().position(|c| c == card)?;
        Some(self.hand.remove(idx))
    }

    pub fn penalty_points(&self) -> u32 {
        self.hand.iter().map(UnoCard::points).sum()
    }
}
