use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

/// Категория покерной руки по силе (от слабой к сильной).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalStraightFlush = 9,
}

impl HandCategory {
    /// Сколько "главных" карт нужно сравнить, чтобы сравнить силу внутри категории.
    pub fn primary_count(self) -> usize {
        match self {
            HandCategory::TwoPair | HandCategory::FullHouse => 2,
            HandCategory::RoyalStraightFlush => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandCategory::HighCard => "High card",
            HandCategory::OnePair => "One pair",
            HandCategory::TwoPair => "Two pair",
            HandCategory::ThreeOfAKind => "Three of a kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full house",
            HandCategory::FourOfAKind => "Four of a kind",
            HandCategory::StraightFlush => "Straight flush",
            HandCategory::RoyalStraightFlush => "Royal straight flush",
        };
        f.write_str(s)
    }
}

/// Лучшая рука игрока на текущий момент.
///
/// Пересчитывается после каждого открытия борда и перезаписывается.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluatedHand {
    pub category: HandCategory,
    /// Карты, образующие категорию (для пары – 2, для стрита – 5 и т.д.).
    pub cards: Vec<Card>,
    /// Главная карта для сравнения (ранг каре/сета/пары, старшая карта стрита).
    pub primary: Card,
    /// Вторая главная карта: младшая пара в двух парах, пара в фулл-хаусе.
    pub secondary: Option<Card>,
    /// Остальные карты по убыванию ранга.
    pub kickers: Vec<Card>,
}

impl EvaluatedHand {
    pub fn kicker_values(&self) -> Vec<u8> {
        self.kickers.iter().map(Card::value).collect()
    }
}

/// Человеческое описание руки: "One pair (K)", "Straight (5)".
pub fn describe_hand(hand: &EvaluatedHand) -> String {
    match (hand.category, hand.secondary) {
        (HandCategory::RoyalStraightFlush, _) => hand.category.to_string(),
        (cat, Some(second)) => format!("{cat} ({}, {})", hand.primary.rank, second.rank),
        (cat, None) => format!("{cat} ({})", hand.primary.rank),
    }
}
