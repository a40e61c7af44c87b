//! Разрешение ничьих между руками.
//!
//! Порядок: категория → главные карты (primary/secondary) → кикеры по позициям.
//! Первая позиция, где значения различаются, решает; если различий нет – сплит.

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

use super::hand_rank::{EvaluatedHand, HandCategory};

/// Претендент на банк.
#[derive(Clone, Copy, Debug)]
pub struct Contender<'a> {
    pub player_id: PlayerId,
    pub hand: &'a EvaluatedHand,
}

/// На каком этапе определился победитель.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TiebreakStage {
    /// Хватило категории (или претендент один).
    Category,
    /// Решили главные карты категории.
    PrimaryCards,
    /// Решил кикер на позиции `position` (с нуля).
    Kicker { position: usize },
    /// Полное равенство – банк делится.
    Split,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TiebreakOutcome {
    /// Победители в исходном порядке претендентов.
    pub winners: Vec<PlayerId>,
    pub decided_by: TiebreakStage,
}

impl TiebreakOutcome {
    pub fn is_split(&self) -> bool {
        self.winners.len() > 1
    }
}

/// Выбрать победителя(ей) среди претендентов.
pub fn resolve_winners(contenders: &[Contender<'_>]) -> TiebreakOutcome {
    assert!(!contenders.is_empty(), "resolve_winners: нет претендентов");

    let best = contenders
        .iter()
        .map(|c| c.hand.category)
        .max()
        .unwrap_or(HandCategory::HighCard);

    let tied: Vec<Contender<'_>> = contenders
        .iter()
        .filter(|c| c.hand.category == best)
        .copied()
        .collect();

    if tied.len() == 1 {
        return outcome(&tied, TiebreakStage::Category);
    }
    if best == HandCategory::RoyalStraightFlush {
        return outcome(&tied, TiebreakStage::Split);
    }

    let tied = category_tiebreak(&tied);
    if tied.len() == 1 {
        return outcome(&tied, TiebreakStage::PrimaryCards);
    }

    match kicker_tiebreak(&tied) {
        (winners, Some(position)) => outcome(&winners, TiebreakStage::Kicker { position }),
        (winners, None) => outcome(&winners, TiebreakStage::Split),
    }
}

/// Сравнение главных карт внутри одной категории.
///
/// Одна главная карта: старшая, пара, сет, стрит, флеш, каре, стрит-флеш.
/// Две: две пары, фулл-хаус. Роял всегда ничья.
pub fn category_tiebreak<'a>(contenders: &[Contender<'a>]) -> Vec<Contender<'a>> {
    let Some(first) = contenders.first() else {
        return Vec::new();
    };

    let mut tied = contenders.to_vec();
    let primaries = first.hand.category.primary_count();

    if primaries >= 1 {
        tied = keep_max(tied, |c| Some(c.hand.primary.value()));
    }
    if primaries >= 2 {
        tied = keep_max(tied, |c| c.hand.secondary.map(|s| s.value()));
    }
    tied
}

/// Кикеры: идём по позициям, на первой позиции с различием оставляем
/// максимальных. Возвращает (победители, позиция или None при сплите).
pub fn kicker_tiebreak<'a>(contenders: &[Contender<'a>]) -> (Vec<Contender<'a>>, Option<usize>) {
    let len = contenders
        .iter()
        .map(|c| c.hand.kickers.len())
        .min()
        .unwrap_or(0);

    for position in 0..len {
        let values: Vec<u8> = contenders
            .iter()
            .map(|c| c.hand.kickers[position].value())
            .collect();

        let max = values.iter().copied().max().unwrap_or(0);
        if values.iter().all(|v| *v == max) {
            continue;
        }

        let winners = contenders
            .iter()
            .zip(values)
            .filter(|(_, v)| *v == max)
            .map(|(c, _)| *c)
            .collect();
        return (winners, Some(position));
    }

    (contenders.to_vec(), None)
}

fn keep_max<'a, F>(contenders: Vec<Contender<'a>>, key: F) -> Vec<Contender<'a>>
where
    F: Fn(&Contender<'a>) -> Option<u8>,
{
    let max = contenders.iter().filter_map(&key).max();
    contenders
        .into_iter()
        .filter(|c| key(c) == max)
        .collect()
}

fn outcome(winners: &[Contender<'_>], decided_by: TiebreakStage) -> TiebreakOutcome {
    TiebreakOutcome {
        winners: winners.iter().map(|c| c.player_id).collect(),
        decided_by,
    }
}
