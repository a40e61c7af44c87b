use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::engine::actions::{LegalActions, PlayerActionKind};
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок выполнить это действие при текущей старшей ставке улицы.
///
/// Ставка больше стека не ошибка: движок зажмёт её в олл-ин.
pub fn validate_action(
    player: &Player,
    action: &PlayerActionKind,
    high_bet: Chips,
) -> Result<(), EngineError> {
    if player.is_latched() || player.stack.is_zero() {
        return Err(EngineError::PlayerCannotAct(player.id));
    }

    match action {
        PlayerActionKind::Fold | PlayerActionKind::CheckOrCall | PlayerActionKind::AllIn => Ok(()),

        PlayerActionKind::Raise(total) => {
            if *total <= high_bet {
                return Err(EngineError::RaiseTooSmall {
                    amount: *total,
                    high_bet,
                });
            }
            Ok(())
        }
    }
}

/// Сводка допустимых действий игрока.
pub fn legal_actions(player: &Player, high_bet: Chips) -> LegalActions {
    let to_call = diff_to_call(player, high_bet);
    LegalActions {
        can_check: to_call.is_zero(),
        call_amount: to_call.min(player.stack),
        min_raise_total: high_bet + Chips(1),
        max_total: player.current_bet + player.stack,
    }
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять старшую ставку.
pub fn diff_to_call(player: &Player, high_bet: Chips) -> Chips {
    high_bet.saturating_sub(player.current_bet)
}
