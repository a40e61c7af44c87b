use crate::domain::card::Card;
use crate::domain::deck::{CardArena, CardId};
use crate::engine::{DeckProvider, RandomSource};

/// Обычная колода: 52 id стандартной арены, перемешанные через `RandomSource`.
#[derive(Clone, Debug)]
pub struct ShuffledDeck<R: RandomSource> {
    rng: R,
    cards: Vec<CardId>,
}

impl<R: RandomSource> ShuffledDeck<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            cards: Vec::new(),
        }
    }
}

impl<R: RandomSource> DeckProvider for ShuffledDeck<R> {
    fn reset_and_shuffle(&mut self) {
        self.cards = CardArena::standard_52().ids().collect();
        self.rng.shuffle(&mut self.cards);
    }

    fn draw(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    fn remaining(&self) -> usize {
        self.cards.len()
    }
}

/// Колода с заранее заданным порядком (тесты, реплей).
///
/// Заданные карты выдаются первыми, затем остальные карты арены по порядку.
/// `reset_and_shuffle` восстанавливает тот же порядок.
#[derive(Clone, Debug)]
pub struct StackedDeck {
    order: Vec<CardId>,
    next: usize,
}

impl StackedDeck {
    /// Повтор карты в `top` – ошибка: в колоде каждая карта одна.
    pub fn from_cards(top: &[Card]) -> Result<Self, String> {
        let arena = CardArena::standard_52();
        let mut order: Vec<CardId> = Vec::with_capacity(52);
        for card in top {
            let id = arena
                .id_of(*card)
                .ok_or_else(|| format!("карты {card} нет в колоде"))?;
            if order.contains(&id) {
                return Err(format!("карта {card} повторяется"));
            }
            order.push(id);
        }
        let rest: Vec<CardId> = arena.ids().filter(|id| !order.contains(id)).collect();
        order.extend(rest);
        Ok(Self { order, next: 0 })
    }

    /// Разобрать "Ah Kd ..." – удобно в тестах.
    pub fn from_str_cards(s: &str) -> Result<Self, String> {
        let cards = crate::domain::card::parse_cards(s)?;
        Self::from_cards(&cards)
    }
}

impl DeckProvider for StackedDeck {
    fn reset_and_shuffle(&mut self) {
        self.next = 0;
    }

    fn draw(&mut self) -> Option<CardId> {
        let card = self.order.get(self.next).copied()?;
        self.next += 1;
        Some(card)
    }

    fn remaining(&self) -> usize {
        self.order.len() - self.next
    }
}
