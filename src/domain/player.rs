use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::deck::CardId;
use crate::domain::PlayerId;
use crate::eval::EvaluatedHand;

/// Флаги действий игрока на текущей улице.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionFlags {
    pub folded: bool,
    pub all_in: bool,
    pub checked: bool,
    pub called: bool,
    pub raised: bool,
}

impl ActionFlags {
    pub fn any(&self) -> bool {
        self.folded || self.all_in || self.checked || self.called || self.raised
    }
}

/// Игрок за столом.
///
/// Фолд и олл-ин фиксируются двухфазно: `continue_fold` / `continue_all_in`
/// ставятся в момент действия, а пропуск хода применяется, когда курсор
/// в следующий раз попадёт на игрока (тогда же ставится `flags.folded` /
/// `flags.all_in`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub stack: Chips,
    /// Сколько игрок поставил на текущей улице (суммарно).
    pub current_bet: Chips,
    /// Карманные карты (0 или 2).
    pub hole_cards: Vec<CardId>,
    pub flags: ActionFlags,
    pub continue_fold: bool,
    pub continue_all_in: bool,
    /// Текущая лучшая рука; перезаписывается после каждого открытия борда.
    pub hand: Option<EvaluatedHand>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, stack: Chips) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            current_bet: Chips::ZERO,
            hole_cards: Vec::with_capacity(2),
            flags: ActionFlags::default(),
            continue_fold: false,
            continue_all_in: false,
            hand: None,
        }
    }

    /// Сбросить всё, что живёт один раунд.
    pub fn reset_for_round(&mut self) {
        self.current_bet = Chips::ZERO;
        self.hole_cards.clear();
        self.flags = ActionFlags::default();
        self.continue_fold = false;
        self.continue_all_in = false;
        self.hand = None;
    }

    /// Сброс между улицами: ставка и флаги, защёлки остаются.
    pub fn reset_for_street(&mut self) {
        self.current_bet = Chips::ZERO;
        self.flags = ActionFlags::default();
    }

    pub fn has_folded(&self) -> bool {
        self.flags.folded || self.continue_fold
    }

    pub fn is_all_in(&self) -> bool {
        self.flags.all_in || self.continue_all_in
    }

    /// Игрок уже не может ходить в этом раунде.
    pub fn is_latched(&self) -> bool {
        self.continue_fold || self.continue_all_in
    }

    pub fn has_acted(&self) -> bool {
        self.flags.any()
    }

    pub fn is_busted(&self) -> bool {
        self.stack.is_zero()
    }

    /// Снять со стека до `amount` фишек. Возвращает реально снятое.
    pub fn take_from_stack(&mut self, amount: Chips) -> Chips {
        let taken = amount.min(self.stack);
        self.stack -= taken;
        taken
    }
}
