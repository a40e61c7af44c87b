use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::PlayerId;

/// Банк одной улицы: сколько внёс каждый игрок (суммарно за улицу).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubPot {
    pub street: Street,
    pub bets: BTreeMap<PlayerId, Chips>,
}

impl SubPot {
    fn new(street: Street) -> Self {
        Self {
            street,
            bets: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> Chips {
        self.bets.values().sum()
    }

    pub fn high_bet(&self) -> Chips {
        self.bets.values().copied().max().unwrap_or(Chips::ZERO)
    }
}

/// Итог `settle_pot`: сумма и доли победителей в порядке `winners`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PotAward {
    pub awarded: Chips,
    pub shares: Vec<(PlayerId, Chips)>,
}

impl PotAward {
    fn new(shares: Vec<(PlayerId, Chips)>) -> Self {
        Self {
            awarded: shares.iter().map(|(_, c)| *c).sum(),
            shares,
        }
    }

    pub fn share_of(&self, player: PlayerId) -> Chips {
        self.shares
            .iter()
            .find(|(p, _)| *p == player)
            .map(|(_, c)| *c)
            .unwrap_or(Chips::ZERO)
    }
}

/// Учёт фишек в банке: по одному под-банку на каждую улицу ставок.
///
/// Вклад игрока в под-банк внутри улицы только растёт;
/// уменьшается он только при выплате.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotLedger {
    pots: Vec<SubPot>,
}

impl PotLedger {
    pub fn new() -> Self {
        Self {
            pots: Street::BETTING.iter().map(|s| SubPot::new(*s)).collect(),
        }
    }

    pub fn sub_pots(&self) -> &[SubPot] {
        &self.pots
    }

    fn pot_mut(&mut self, street: Street) -> Option<&mut SubPot> {
        self.pots.iter_mut().find(|p| p.street == street)
    }

    fn pot(&self, street: Street) -> Option<&SubPot> {
        self.pots.iter().find(|p| p.street == street)
    }

    /// Записать новую суммарную ставку игрока на улице (не приращение).
    ///
    /// Уменьшить вклад нельзя: меньшая сумма игнорируется.
    pub fn add_bet(&mut self, street: Street, player: PlayerId, street_total: Chips) {
        let Some(pot) = self.pot_mut(street) else {
            warn!(?street, player, "ставка вне улицы ставок проигнорирована");
            return;
        };

        let slot = pot.bets.entry(player).or_insert(Chips::ZERO);
        if street_total < *slot {
            warn!(
                ?street,
                player,
                current = slot.0,
                requested = street_total.0,
                "попытка уменьшить вклад в банк"
            );
            return;
        }
        *slot = street_total;
    }

    /// Сумма всех вкладов по всем улицам.
    pub fn total_pot(&self) -> Chips {
        self.pots.iter().map(SubPot::total).sum()
    }

    pub fn street_total(&self, street: Street) -> Chips {
        self.pot(street).map(SubPot::total).unwrap_or(Chips::ZERO)
    }

    /// Старшая ставка улицы.
    pub fn high_bet(&self, street: Street) -> Chips {
        self.pot(street).map(SubPot::high_bet).unwrap_or(Chips::ZERO)
    }

    pub fn player_bet(&self, street: Street, player: PlayerId) -> Chips {
        self.pot(street)
            .and_then(|p| p.bets.get(&player).copied())
            .unwrap_or(Chips::ZERO)
    }

    /// Суммарный вклад каждого игрока за все улицы.
    pub fn contributions(&self) -> BTreeMap<PlayerId, Chips> {
        let mut totals: BTreeMap<PlayerId, Chips> = BTreeMap::new();
        for pot in &self.pots {
            for (player, chips) in &pot.bets {
                *totals.entry(*player).or_insert(Chips::ZERO) += *chips;
            }
        }
        totals
    }

    /// Забрать в пользу победителей то, что им причитается.
    ///
    /// Потолок каждого победителя = его собственный вклад в под-банк. Под-банк
    /// разыгрывается уровнями по этим потолкам: уровень до наименьшего потолка
    /// делят все победители, каждый следующий – только те, кто внёс не меньше.
    /// Выше наибольшего потолка фишки остаются в банке до `return_remainder`.
    pub fn settle_pot(&mut self, winners: &[PlayerId]) -> PotAward {
        let mut shares: Vec<(PlayerId, Chips)> =
            winners.iter().map(|w| (*w, Chips::ZERO)).collect();

        for pot in &mut self.pots {
            let caps: Vec<(PlayerId, Chips)> = winners
                .iter()
                .map(|w| (*w, pot.bets.get(w).copied().unwrap_or(Chips::ZERO)))
                .collect();

            let mut levels: Vec<Chips> = caps
                .iter()
                .map(|(_, cap)| *cap)
                .filter(|cap| !cap.is_zero())
                .collect();
            levels.sort_unstable();
            levels.dedup();
            if levels.is_empty() {
                continue;
            }

            let original = pot.bets.clone();
            let mut floor = Chips::ZERO;
            for level in &levels {
                let mut layer = Chips::ZERO;
                for (player, chips) in pot.bets.iter_mut() {
                    let put_in = original.get(player).copied().unwrap_or(Chips::ZERO);
                    let taken = put_in.min(*level).saturating_sub(put_in.min(floor));
                    *chips -= taken;
                    layer += taken;
                }

                let eligible: Vec<PlayerId> = caps
                    .iter()
                    .filter(|(_, cap)| cap >= level)
                    .map(|(w, _)| *w)
                    .collect();
                for (winner, share) in split_evenly(layer, &eligible) {
                    if let Some(slot) = shares.iter_mut().find(|(w, _)| *w == winner) {
                        slot.1 += share;
                    }
                }
                floor = *level;
            }
            debug!(street = ?pot.street, levels = levels.len(), "под-банк разыгран");
        }

        PotAward::new(shares)
    }

    /// Вернуть каждому участнику то, что осталось в банке, и обнулить банк.
    pub fn return_remainder(&mut self) -> Vec<(PlayerId, Chips)> {
        let refunds: Vec<(PlayerId, Chips)> = self
            .contributions()
            .into_iter()
            .filter(|(_, chips)| !chips.is_zero())
            .collect();
        self.clear();
        refunds
    }

    pub fn clear(&mut self) {
        for pot in &mut self.pots {
            pot.bets.clear();
        }
    }
}

impl Default for PotLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Поделить сумму поровну между победителями.
///
/// Нечётные фишки остатка уходят первым победителям по порядку (по одной).
pub fn split_evenly(total: Chips, winners: &[PlayerId]) -> Vec<(PlayerId, Chips)> {
    let (share, remainder) = total.split(winners.len());
    winners
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let extra = if (i as u64) < remainder.0 { Chips(1) } else { Chips::ZERO };
            (*w, share + extra)
        })
        .collect()
}
