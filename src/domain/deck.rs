use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Идентификатор карты внутри `CardArena`: просто индекс.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u8);

/// Арена неизменяемых карт.
///
/// Руки игроков и борд хранят только `CardId`, а сами значения живут здесь.
/// Перемешивание делает провайдер колоды (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardArena {
    cards: Vec<Card>,
}

impl CardArena {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades] {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        CardArena { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<Card> {
        self.cards.get(id.0 as usize).copied()
    }

    pub fn id_of(&self, card: Card) -> Option<CardId> {
        self.cards
            .iter()
            .position(|c| *c == card)
            .map(|idx| CardId(idx as u8))
    }

    /// Все id по порядку арены.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        (0..self.cards.len()).map(|idx| CardId(idx as u8))
    }

    /// Превратить список id в значения. Неизвестные id пропускаются.
    pub fn resolve(&self, ids: &[CardId]) -> Vec<Card> {
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }
}

impl Default for CardArena {
    fn default() -> Self {
        Self::standard_52()
    }
}
