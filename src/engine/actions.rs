use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId, Street};
use crate::eval::HandCategory;

/// Что игрок просит сделать.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    /// Check, если доплачивать нечего, иначе call до старшей ставки улицы.
    CheckOrCall,
    /// Raise до суммарной ставки на улице (не приращение).
    Raise(Chips),
    /// Поставить весь оставшийся стек.
    AllIn,
}

/// Конкретное действие игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(player_id: PlayerId, kind: PlayerActionKind) -> Self {
        Self { player_id, kind }
    }

    pub fn fold(player_id: PlayerId) -> Self {
        Self::new(player_id, PlayerActionKind::Fold)
    }

    pub fn check_or_call(player_id: PlayerId) -> Self {
        Self::new(player_id, PlayerActionKind::CheckOrCall)
    }

    pub fn raise(player_id: PlayerId, street_total: Chips) -> Self {
        Self::new(player_id, PlayerActionKind::Raise(street_total))
    }

    pub fn all_in(player_id: PlayerId) -> Self {
        Self::new(player_id, PlayerActionKind::AllIn)
    }
}

/// Что в итоге произошло (после зажима в олл-ин и т.п.).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionTaken {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

/// Последнее принятое действие за столом.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastAction {
    pub player_id: PlayerId,
    pub action: ActionTaken,
}

/// Сводка допустимых действий для игрока, чей сейчас ход.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegalActions {
    pub can_check: bool,
    /// Сколько нужно доплатить (уже ограничено стеком).
    pub call_amount: Chips,
    /// Минимальная суммарная ставка для raise.
    pub min_raise_total: Chips,
    /// Суммарная ставка при олл-ине.
    pub max_total: Chips,
}

impl LegalActions {
    /// Raise выше олл-ина всё равно превратится в олл-ин.
    pub fn raise_is_all_in(&self, total: Chips) -> bool {
        total >= self.max_total
    }
}

/// Всё, что видит политика принятия решений в момент своего хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionContext {
    pub player_id: PlayerId,
    pub street: Street,
    pub stack: Chips,
    pub current_bet: Chips,
    /// Старшая ставка улицы.
    pub bet_base: Chips,
    pub legal: LegalActions,
    pub last_action: Option<LastAction>,
    /// Последний ходивший уже зафиксирован в олл-ине.
    pub last_actor_all_in: bool,
    pub hand: Option<HandCategory>,
}
