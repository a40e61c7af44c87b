//! Банк: вклады по улицам, выплата с потолком, возврат остатка, сайд-поты.

use std::collections::BTreeMap;

use holdem_core::domain::{Chips, PlayerId, Street};
use holdem_core::engine::{compute_side_pots, split_evenly, PotLedger, SidePot};
use proptest::prelude::*;

#[test]
fn add_bet_is_an_upsert_of_the_street_total() {
    let mut ledger = PotLedger::new();
    assert_eq!(ledger.sub_pots().len(), 4);

    ledger.add_bet(Street::Ante, 1, Chips(100));
    ledger.add_bet(Street::Ante, 1, Chips(300));
    ledger.add_bet(Street::Ante, 2, Chips(300));

    assert_eq!(ledger.player_bet(Street::Ante, 1), Chips(300));
    assert_eq!(ledger.street_total(Street::Ante), Chips(600));
    assert_eq!(ledger.high_bet(Street::Ante), Chips(300));
    assert_eq!(ledger.total_pot(), Chips(600));
}

#[test]
fn add_bet_never_decreases_a_contribution() {
    let mut ledger = PotLedger::new();
    ledger.add_bet(Street::Flop, 7, Chips(250));
    ledger.add_bet(Street::Flop, 7, Chips(100));
    assert_eq!(ledger.player_bet(Street::Flop, 7), Chips(250));

    // Шоудаун – не улица ставок.
    ledger.add_bet(Street::Showdown, 7, Chips(1_000));
    assert_eq!(ledger.total_pot(), Chips(250));
}

#[test]
fn contributions_sum_over_streets() {
    let mut ledger = PotLedger::new();
    ledger.add_bet(Street::Ante, 1, Chips(100));
    ledger.add_bet(Street::Flop, 1, Chips(50));
    ledger.add_bet(Street::River, 2, Chips(20));

    let totals = ledger.contributions();
    assert_eq!(totals.get(&1), Some(&Chips(150)));
    assert_eq!(totals.get(&2), Some(&Chips(20)));
}

//
// ============= Выплата с потолком ============
//

#[test]
fn short_all_in_winner_takes_only_up_to_own_contribution() {
    let mut ledger = PotLedger::new();
    ledger.add_bet(Street::Ante, 1, Chips(100));
    ledger.add_bet(Street::Ante, 2, Chips(300));
    ledger.add_bet(Street::Ante, 3, Chips(300));

    let award = ledger.settle_pot(&[1]);
    assert_eq!(award.awarded, Chips(300), "победитель забирает по 100 с каждого");
    assert_eq!(award.shares, vec![(1, Chips(300))]);
    assert_eq!(ledger.total_pot(), Chips(400));

    let refunds = ledger.return_remainder();
    assert_eq!(refunds, vec![(2, Chips(200)), (3, Chips(200))]);
    assert!(ledger.total_pot().is_zero());
}

#[test]
fn cap_is_applied_per_street() {
    let mut ledger = PotLedger::new();
    // Префлоп: все по 100. Флоп: победитель не ставил.
    for p in [1, 2, 3] {
        ledger.add_bet(Street::Ante, p, Chips(100));
    }
    ledger.add_bet(Street::Flop, 2, Chips(200));
    ledger.add_bet(Street::Flop, 3, Chips(200));

    let award = ledger.settle_pot(&[1]);
    assert_eq!(award.awarded, Chips(300));

    let refunds = ledger.return_remainder();
    assert_eq!(refunds, vec![(2, Chips(200)), (3, Chips(200))]);
}

#[test]
fn short_co_winner_shares_only_the_level_it_covered() {
    let mut ledger = PotLedger::new();
    ledger.add_bet(Street::Ante, 1, Chips(100));
    ledger.add_bet(Street::Ante, 2, Chips(500));
    ledger.add_bet(Street::Ante, 3, Chips(500));

    // Уровень до 100: по 100 с каждого, 300 пополам.
    // Уровень 100..500: по 400 с P2 и P3, всё P2.
    let award = ledger.settle_pot(&[1, 2]);
    assert_eq!(award.awarded, Chips(1_100));
    assert_eq!(award.shares, vec![(1, Chips(150)), (2, Chips(950))]);
    assert!(award.share_of(1) <= Chips(300), "не больше 3 × собственный вклад");
    assert!(ledger.return_remainder().is_empty());
}

#[test]
fn co_winners_with_different_caps_leave_uncovered_excess() {
    let mut ledger = PotLedger::new();
    ledger.add_bet(Street::Ante, 1, Chips(50));
    ledger.add_bet(Street::Ante, 2, Chips(150));
    ledger.add_bet(Street::Ante, 3, Chips(400));

    let award = ledger.settle_pot(&[2, 1]);
    // 150 (по 50) пополам; 200 (по 100 с P2 и P3) – P2.
    assert_eq!(award.shares, vec![(2, Chips(275)), (1, Chips(75))]);
    assert_eq!(award.awarded, Chips(350));
    assert_eq!(ledger.return_remainder(), vec![(3, Chips(250))]);
}

#[test]
fn split_pot_of_300_pays_150_each() {
    let mut ledger = PotLedger::new();
    ledger.add_bet(Street::Ante, 1, Chips(150));
    ledger.add_bet(Street::Ante, 2, Chips(150));

    let award = ledger.settle_pot(&[1, 2]);
    assert_eq!(award.awarded, Chips(300));
    assert_eq!(award.shares, vec![(1, Chips(150)), (2, Chips(150))]);
    assert_eq!(
        split_evenly(award.awarded, &[1, 2]),
        award.shares,
        "равные вклады – обычный делёж поровну"
    );
}

#[test]
fn odd_chip_goes_to_first_winners() {
    assert_eq!(
        split_evenly(Chips(301), &[4, 2]),
        vec![(4, Chips(151)), (2, Chips(150))]
    );
    assert_eq!(
        split_evenly(Chips(101), &[1, 2, 3]),
        vec![(1, Chips(34)), (2, Chips(34)), (3, Chips(33))]
    );
    assert!(split_evenly(Chips(10), &[]).is_empty());
}

//
// ============= Сайд-поты по уровням ============
//

#[test]
fn side_pots_by_contribution_levels() {
    let contributions: BTreeMap<PlayerId, Chips> =
        [(1, Chips(100)), (2, Chips(300)), (3, Chips(300))].into_iter().collect();

    let pots = compute_side_pots(&contributions);
    assert_eq!(
        pots,
        vec![
            SidePot {
                amount: Chips(300),
                eligible: vec![1, 2, 3],
            },
            SidePot {
                amount: Chips(400),
                eligible: vec![2, 3],
            },
        ]
    );
}

#[test]
fn side_pots_three_levels_and_zero_contributions() {
    let contributions: BTreeMap<PlayerId, Chips> = [
        (1, Chips(500)),
        (2, Chips(0)),
        (3, Chips(200)),
        (4, Chips(1_000)),
    ]
    .into_iter()
    .collect();

    let pots = compute_side_pots(&contributions);
    let amounts: Vec<Chips> = pots.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![Chips(600), Chips(600), Chips(500)]);
    assert_eq!(pots[2].eligible, vec![4]);

    let total: Chips = amounts.iter().sum();
    assert_eq!(total, Chips(1_700));
    assert!(compute_side_pots(&BTreeMap::new()).is_empty());
}

//
// ============= Сохранение фишек ============
//

#[derive(Clone, Debug)]
enum Op {
    Bet { street: usize, player: PlayerId, total: u64 },
    Settle { winners: Vec<PlayerId> },
    Refund,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..4, 1u64..=4, 0u64..1_500)
            .prop_map(|(street, player, total)| Op::Bet { street, player, total }),
        1 => proptest::sample::subsequence(vec![1u64, 2, 3, 4], 1..=4)
            .prop_map(|winners| Op::Settle { winners }),
        1 => Just(Op::Refund),
    ]
}

proptest! {
    /// Стеки + банк постоянны при любой последовательности операций.
    #[test]
    fn ledger_conserves_chips(ops in proptest::collection::vec(op(), 1..60)) {
        let mut stacks: BTreeMap<PlayerId, Chips> =
            (1..=4).map(|p| (p, Chips(1_000))).collect();
        let initial: Chips = stacks.values().sum();
        let mut ledger = PotLedger::new();

        for op in ops {
            match op {
                Op::Bet { street, player, total } => {
                    let street = Street::BETTING[street];
                    let prev = ledger.player_bet(street, player);
                    let stack = stacks[&player];
                    // Движок никогда не просит больше стека.
                    let total = Chips(total).min(prev + stack);
                    if total > prev {
                        *stacks.get_mut(&player).unwrap() -= total - prev;
                    }
                    ledger.add_bet(street, player, total);
                }
                Op::Settle { winners } => {
                    let award = ledger.settle_pot(&winners);
                    for (player, share) in award.shares {
                        *stacks.get_mut(&player).unwrap() += share;
                    }
                }
                Op::Refund => {
                    for (player, chips) in ledger.return_remainder() {
                        *stacks.get_mut(&player).unwrap() += chips;
                    }
                }
            }

            let on_table: Chips = stacks.values().sum();
            prop_assert_eq!(on_table + ledger.total_pot(), initial);
        }
    }
}
