use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, RoundId};
use crate::eval::{HandCategory, TiebreakStage};

/// Улица раунда. Переходы только вперёд.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Street {
    Ante,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Улицы, на которых идут ставки.
    pub const BETTING: [Street; 4] = [Street::Ante, Street::Flop, Street::Turn, Street::River];

    pub fn next(self) -> Street {
        match self {
            Street::Ante => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }

    /// Сколько карт борда открывается при входе на улицу.
    pub fn board_cards(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Ante | Street::Showdown => 0,
        }
    }

    pub fn is_betting(self) -> bool {
        self != Street::Showdown
    }
}

/// Результат игрока в раунде.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRoundResult {
    pub player_id: PlayerId,
    /// Категория руки (у сфолдивших None).
    pub category: Option<HandCategory>,
    /// Выигрыш из банка.
    pub won: Chips,
    /// Возврат непокрытой части ставок.
    pub refunded: Chips,
    pub is_winner: bool,
}

/// Итог завершённого раунда. Удобно для истории/реплеера.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_id: RoundId,
    pub street_reached: Street,
    pub board: Vec<Card>,
    pub total_pot: Chips,
    pub winners: Vec<PlayerId>,
    /// None – победа без вскрытия (все остальные сфолдили).
    pub decided_by: Option<TiebreakStage>,
    pub results: Vec<PlayerRoundResult>,
}

impl RoundSummary {
    pub fn result_of(&self, player_id: PlayerId) -> Option<&PlayerRoundResult> {
        self.results.iter().find(|r| r.player_id == player_id)
    }

    pub fn is_split(&self) -> bool {
        self.winners.len() > 1
    }
}
