use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Сайд-пот: часть банка, на которую претендуют только некоторые игроки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    /// Все, кто внёс хотя бы уровень этого пота (включая сфолдивших).
    pub eligible: Vec<PlayerId>,
}

/// Посчитать сайд-поты из суммарных вкладов игроков (за все улицы).
///
/// Выход: поты от основного (самого нижнего уровня) к старшим.
pub fn compute_side_pots(contributions: &BTreeMap<PlayerId, Chips>) -> Vec<SidePot> {
    let mut entries: Vec<(PlayerId, Chips)> = contributions
        .iter()
        .filter(|(_, chips)| !chips.is_zero())
        .map(|(player, chips)| (*player, *chips))
        .collect();

    if entries.is_empty() {
        return Vec::new();
    }

    // По размеру вклада (возрастание).
    entries.sort_by_key(|(_, c)| c.0);

    let mut pots = Vec::new();
    let mut prev_level = Chips::ZERO;

    for &(_, level) in &entries {
        if level == prev_level {
            continue;
        }
        let level_diff = level - prev_level;

        let eligible: Vec<PlayerId> = entries
            .iter()
            .filter(|(_, contrib)| *contrib >= level)
            .map(|(player, _)| *player)
            .collect();

        pots.push(SidePot {
            amount: Chips(level_diff.0 * eligible.len() as u64),
            eligible,
        });

        prev_level = level;
    }

    pots
}
