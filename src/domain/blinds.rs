use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Расписание форсированной ставки.
///
/// SB = `current`, BB = 2 × `current`. Перед раундом k (k > 0, k кратно
/// `every_rounds`) ставка растёт на `increase`, но не выше `cap`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindSchedule {
    pub current: Chips,
    pub increase: Chips,
    pub every_rounds: u32,
    pub cap: Chips,
    /// Сколько раундов уже начато по этому расписанию.
    pub rounds_started: u32,
}

impl BlindSchedule {
    pub fn new(initial: Chips, increase: Chips, every_rounds: u32, cap: Chips) -> Self {
        Self {
            current: initial,
            increase,
            every_rounds,
            cap,
            rounds_started: 0,
        }
    }

    pub fn small_blind(&self) -> Chips {
        self.current
    }

    pub fn big_blind(&self) -> Chips {
        self.current + self.current
    }

    /// Отметить начало очередного раунда.
    /// Возвращает `Some((было, стало))`, если ставка выросла.
    pub fn next_round(&mut self) -> Option<(Chips, Chips)> {
        let k = self.rounds_started;
        self.rounds_started += 1;

        if k == 0 || self.every_rounds == 0 || k % self.every_rounds != 0 {
            return None;
        }

        let before = self.current;
        let raised = (self.current + self.increase).min(self.cap.max(before));
        if raised == before {
            return None;
        }
        self.current = raised;
        Some((before, raised))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.current.is_zero() {
            return Err("BlindSchedule: forced bet = 0".into());
        }
        if self.every_rounds == 0 {
            return Err("BlindSchedule: every_rounds = 0".into());
        }
        if self.cap < self.current {
            return Err(format!(
                "BlindSchedule: cap ({}) < forced bet ({})",
                self.cap, self.current
            ));
        }
        Ok(())
    }
}
