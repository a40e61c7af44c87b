//! Оценка силы покерных рук (Texas Hold'em) и разрешение ничьих.
//!
//! Основные функции:
//!   `evaluate_best_hand(cards) -> EvaluatedHand`
//!   `resolve_winners(contenders) -> TiebreakOutcome`

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;
pub mod tiebreak;

pub use evaluator::evaluate_best_hand;
pub use hand_rank::{describe_hand, EvaluatedHand, HandCategory};
pub use tiebreak::{
    category_tiebreak, kicker_tiebreak, resolve_winners, Contender, TiebreakOutcome, TiebreakStage,
};
