use crate::model::Card;

/// Read-only gallery of unlocked reward cards.
#[derive(Debug, Default)]
pub struct CardsView {
    cards: Vec<Card>,
    pub scroll: usize,
}

impl CardsView {
    pub fn replace(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.scroll = 0;
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.cards.len().saturating_sub(1) as isize;
        self.scroll = (self.scroll as isize + delta).clamp(0, max) as usize;
    }
}

pub fn caption(card: &Card) -> String {
    format!("{} – {}", card.title, card.german_translation)
}

/// Secondary line with whatever extra fields the server sent.
pub fn details(card: &Card) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(latin) = card.latin_word.as_deref().filter(|l| *l != card.title) {
        parts.push(latin.to_string());
    }
    if let Some(rarity) = &card.rarity {
        parts.push(rarity.clone());
    }
    if let Some(acc) = card.accuracy_percent {
        parts.push(format!("{acc:.1}%"));
    }
    if let Some(desc) = card.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(desc.to_string());
    }
    (!parts.is_empty()).then(|| parts.join(" · "))
}
