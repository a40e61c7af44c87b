use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{RoundId, SeatIndex};
use crate::engine::actions::LastAction;
use crate::engine::positions::{blind_positions, next_position};

/// Состояние одного раунда.
///
/// Все позиции (`dealer`, `turn`, `closing` и т.д.) – индексы в `seat_order`,
/// а не места за столом: в раунде участвуют только игроки с фишками.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundState {
    pub round_id: RoundId,
    pub street: Street,
    /// Места за столом участников раунда, в порядке рассадки.
    pub seat_order: Vec<SeatIndex>,
    pub dealer: usize,
    pub small_blind: usize,
    pub big_blind: usize,
    /// Чей сейчас ход.
    pub turn: usize,
    /// Чьё завершённое действие без рейза закрывает улицу.
    pub closing: usize,
    /// Минимум, до которого нужно дотянуть ставку ("bet base").
    pub bet_base: Chips,
    /// Текущий малый блайнд.
    pub forced_bet: Chips,
    pub last_action: Option<LastAction>,
}

impl RoundState {
    pub fn new(round_id: RoundId, seat_order: Vec<SeatIndex>, dealer_turn: usize, forced_bet: Chips) -> Self {
        let pos = blind_positions(dealer_turn, seat_order.len());
        Self {
            round_id,
            street: Street::Ante,
            seat_order,
            dealer: pos.dealer,
            small_blind: pos.small_blind,
            big_blind: pos.big_blind,
            turn: pos.first_to_act,
            closing: pos.big_blind,
            bet_base: forced_bet + forced_bet,
            forced_bet,
            last_action: None,
        }
    }

    pub fn len(&self) -> usize {
        self.seat_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seat_order.is_empty()
    }

    /// Место за столом для позиции раунда.
    pub fn seat_at(&self, pos: usize) -> SeatIndex {
        self.seat_order[pos]
    }

    pub fn turn_seat(&self) -> SeatIndex {
        self.seat_at(self.turn)
    }

    pub fn position_of(&self, seat: SeatIndex) -> Option<usize> {
        self.seat_order.iter().position(|s| *s == seat)
    }

    pub fn next_after(&self, pos: usize) -> usize {
        next_position(pos, self.len())
    }

    /// Открыть новую улицу: первым ходит SB, он же закрывающий.
    pub fn open_street(&mut self, street: Street) {
        self.street = street;
        self.turn = self.small_blind;
        self.closing = self.small_blind;
        self.bet_base = Chips::ZERO;
    }
}
