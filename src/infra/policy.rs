use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::engine::actions::{ActionTaken, DecisionContext, PlayerActionKind};
use crate::engine::{DecisionPolicy, RandomSource};

/// Веса действий на одной улице, в процентах.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionWeights {
    pub fold: u32,
    pub check: u32,
    pub bet: u32,
    pub all_in: u32,
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self {
            fold: 20,
            check: 50,
            bet: 20,
            all_in: 10,
        }
    }
}

/// Таблица весов по улицам.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreetWeights {
    pub ante: ActionWeights,
    pub flop: ActionWeights,
    pub turn: ActionWeights,
    pub river: ActionWeights,
}

impl StreetWeights {
    pub fn for_street(&self, street: Street) -> ActionWeights {
        match street {
            Street::Ante | Street::Showdown => self.ante,
            Street::Flop => self.flop,
            Street::Turn => self.turn,
            Street::River => self.river,
        }
    }
}

/// Доли стека для случайного рейза.
const RAISE_DIVISORS: [u64; 5] = [10, 8, 6, 4, 2];
const RAISE_STEP: u64 = 50;

/// CPU-политика: бросок 0..=100 против таблицы весов.
///
/// - фолд только если есть что уравнивать;
/// - рейз только после check/call (или в начале улицы) и если прошлый
///   ходивший не зафиксирован в олл-ине;
/// - иначе check/call.
#[derive(Clone, Debug)]
pub struct ProbabilityTablePolicy<R: RandomSource> {
    pub weights: StreetWeights,
    rng: R,
}

impl<R: RandomSource> ProbabilityTablePolicy<R> {
    pub fn new(weights: StreetWeights, rng: R) -> Self {
        Self { weights, rng }
    }

    /// bet base + доля стека, округлённая до шага 50 (минимум один шаг).
    fn raise_total(&mut self, ctx: &DecisionContext) -> Chips {
        let bucket = (self.rng.next_percent() / 20).min(4) as usize;
        let raw = ctx.bet_base.0 + ctx.stack.0 / RAISE_DIVISORS[bucket];
        let steps = (raw / RAISE_STEP).max(1);
        Chips(ctx.bet_base.0 + steps * RAISE_STEP)
    }
}

impl<R: RandomSource> DecisionPolicy for ProbabilityTablePolicy<R> {
    fn decide(&mut self, ctx: &DecisionContext) -> PlayerActionKind {
        let w = self.weights.for_street(ctx.street);
        let roll = self.rng.next_percent();

        let facing_bet = !ctx.legal.can_check;
        let may_raise = !ctx.last_actor_all_in
            && matches!(
                ctx.last_action.map(|l| l.action),
                None | Some(ActionTaken::Check) | Some(ActionTaken::Call)
            );

        if roll < w.fold && facing_bet {
            return PlayerActionKind::Fold;
        }
        if roll < w.fold + w.check {
            return PlayerActionKind::CheckOrCall;
        }
        if roll < w.fold + w.check + w.bet && may_raise {
            return PlayerActionKind::Raise(self.raise_total(ctx));
        }
        if roll < w.fold + w.check + w.bet + w.all_in && !ctx.last_actor_all_in {
            return PlayerActionKind::AllIn;
        }
        // Кто-то, скорее всего, в олл-ине – просто уравниваем.
        PlayerActionKind::CheckOrCall
    }
}
