//! Движок раунда: ставки, переход улиц, банк, шоудаун, матч из нескольких раундов.
//!
//! Высокоуровневые объекты: `RoundEngine` (один раунд) и `MatchManager` (серия раундов).
//! Основные операции:
//!   - `start_round` – посадить блайнды, раздать карты, открыть первый ход;
//!   - `submit_action` – применить действие игрока, чей сейчас ход.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod events;
pub mod game_loop;
pub mod hand_history;
pub mod match_manager;
pub mod positions;
pub mod pot;
pub mod side_pots;
pub mod validation;

pub use actions::{
    ActionTaken, DecisionContext, LastAction, LegalActions, PlayerAction, PlayerActionKind,
};
pub use betting::RoundState;
pub use errors::EngineError;
pub use events::{EventBus, EventSink, PokerEvent};
pub use game_loop::{RoundEngine, RoundStatus};
pub use hand_history::{HandEvent, HandHistory};
pub use match_manager::{MatchError, MatchManager, MatchStatus};
pub use pot::{split_evenly, PotAward, PotLedger, SubPot};
pub use side_pots::{compute_side_pots, SidePot};

use crate::domain::CardId;

/// RNG интерфейс для движка и политик. Реализации – в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Случайное число 0..=100 включительно.
    fn next_percent(&mut self) -> u32;
}

/// Колода снаружи ядра: ядро само не перемешивает.
pub trait DeckProvider {
    /// Собрать полную колоду и равномерно перемешать.
    fn reset_and_shuffle(&mut self);

    /// Следующая карта или None, если колода пуста.
    fn draw(&mut self) -> Option<CardId>;

    fn remaining(&self) -> usize;
}

/// Источник решений для игрока (человек или CPU).
pub trait DecisionPolicy {
    fn decide(&mut self, ctx: &DecisionContext) -> PlayerActionKind;
}
