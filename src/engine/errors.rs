use crate::domain::{Chips, PlayerId};

use thiserror::Error;

/// Ошибки движка раунда.
///
/// Отказ в действии или старте раунда приходит до любых изменений.
/// `DeckExhausted` и `Internal` посреди раунда прерывают его: вклады
/// возвращаются на стеки, раунд больше не активен.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Недостаточно игроков с фишками для раунда: {funded}")]
    NotEnoughPlayers { funded: usize },

    #[error("Игрок {0} не участвует в раунде")]
    UnknownPlayer(PlayerId),

    #[error("Сейчас не ход игрока с id={0}")]
    NotPlayersTurn(PlayerId),

    #[error("Raise до {amount} не больше текущей ставки {high_bet}")]
    RaiseTooSmall { amount: Chips, high_bet: Chips },

    #[error("Игрок {0} уже сфолдил или в олл-ине")]
    PlayerCannotAct(PlayerId),

    #[error("Раунд не активен")]
    RoundNotActive,

    #[error("Раунд уже идёт")]
    RoundAlreadyInProgress,

    #[error("В колоде закончились карты")]
    DeckExhausted,

    #[error("Некорректная конфигурация: {0}")]
    InvalidConfig(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
