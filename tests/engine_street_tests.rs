//! Машина состояний раунда: раздача, очередь ходов, закрытие улиц,
//! победа без вскрытия и отказ в некорректных действиях.

use holdem_core::domain::{parse_cards, Card, CardId, Chips, Player, PlayerId, Street, Table};
use holdem_core::engine::{
    ActionTaken, DeckProvider, EngineError, HandHistory, PlayerAction, PokerEvent, RoundEngine,
    RoundStatus,
};
use holdem_core::infra::StackedDeck;

// Раздача для трёх игроков: P1 = As Ah, P2 = Ks Kh, P3 = 2c 7d,
// затем флоп 3d 8c 9h, тёрн Js, ривер 4d.
const THREE_HANDED: &str = "As Ks 2c Ah Kh 7d 3d 8c 9h Js 4d";

fn table(stacks: &[u64]) -> Table {
    Table::new(
        stacks
            .iter()
            .enumerate()
            .map(|(i, s)| Player::new(i as PlayerId + 1, format!("P{}", i + 1), Chips(*s)))
            .collect(),
    )
}

fn engine(cards: &str) -> RoundEngine {
    RoundEngine::new(Box::new(
        StackedDeck::from_str_cards(cards).expect("валидная колода в тесте"),
    ))
}

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("валидные карты в тесте")
}

fn hole(table: &Table, player_id: PlayerId) -> Vec<Card> {
    let player = table.player(player_id).expect("игрок за столом");
    table.arena.resolve(&player.hole_cards)
}

fn count(history: &HandHistory, pred: impl Fn(&PokerEvent) -> bool) -> usize {
    history.iter().filter(|e| pred(e)).count()
}

fn act(engine: &mut RoundEngine, table: &mut Table, action: PlayerAction) -> RoundStatus {
    engine
        .submit_action(table, action)
        .unwrap_or_else(|e| panic!("действие {action:?} должно быть принято: {e}"))
}

/// Начать раунд на трёх игроках: дилер P1, SB P2 (50), BB P3 (100), первым ходит P1.
fn start_three_handed(stacks: &[u64]) -> (RoundEngine, Table) {
    let mut engine = engine(THREE_HANDED);
    let mut table = table(stacks);
    let status = engine
        .start_round(&mut table, 1, 0, Chips(50))
        .expect("раунд должен начаться");
    assert!(!status.is_finished());
    (engine, table)
}

//
// ============= ТЕСТ 1: позиции, блайнды, раздача ============
//

#[test]
fn start_round_posts_blinds_and_deals_in_seat_order() {
    let (engine, table) = start_three_handed(&[1_000, 1_000, 1_000]);

    let state = engine.state().expect("раунд активен");
    assert_eq!(state.street, Street::Ante);
    assert_eq!(state.dealer, 0);
    assert_eq!(state.small_blind, 1);
    assert_eq!(state.big_blind, 2);
    assert_eq!(state.turn, 0, "первым ходит игрок после BB");
    assert_eq!(state.closing, 2);
    assert_eq!(state.bet_base, Chips(100));

    assert_eq!(hole(&table, 1), cards("As Ah"));
    assert_eq!(hole(&table, 2), cards("Ks Kh"));
    assert_eq!(hole(&table, 3), cards("2c 7d"));
    assert!(table.board.is_empty());

    assert_eq!(table.player(2).unwrap().stack, Chips(950));
    assert_eq!(table.player(3).unwrap().stack, Chips(900));
    assert_eq!(engine.ledger().total_pot(), Chips(150));
    assert_eq!(engine.current_player(&table), Some(1));

    let legal = engine.legal_actions(&table).unwrap();
    assert!(!legal.can_check);
    assert_eq!(legal.call_amount, Chips(100));
    assert_eq!(legal.min_raise_total, Chips(101));
    assert_eq!(legal.max_total, Chips(1_000));

    let history = engine.history();
    assert!(matches!(
        history.iter().next(),
        Some(PokerEvent::RoundStarted {
            dealer: 1,
            small_blind: 2,
            big_blind: 3,
            ..
        })
    ));
    assert_eq!(
        count(history, |e| matches!(e, PokerEvent::HandUpdated { .. })),
        3
    );
}

#[test]
fn board_is_dealt_three_one_one() {
    let (mut engine, mut table) = start_three_handed(&[1_000, 1_000, 1_000]);

    act(&mut engine, &mut table, PlayerAction::check_or_call(1));
    act(&mut engine, &mut table, PlayerAction::check_or_call(2));
    act(&mut engine, &mut table, PlayerAction::check_or_call(3));
    assert_eq!(table.board_cards(), cards("3d 8c 9h"));

    for id in [2, 3, 1] {
        act(&mut engine, &mut table, PlayerAction::check_or_call(id));
    }
    assert_eq!(table.board_cards(), cards("3d 8c 9h Js"));

    for id in [2, 3, 1] {
        act(&mut engine, &mut table, PlayerAction::check_or_call(id));
    }
    assert_eq!(table.board_cards(), cards("3d 8c 9h Js 4d"));
    assert_eq!(engine.state().unwrap().street, Street::River);
}

//
// ============= ТЕСТ 2: закрытие улицы ============
//

#[test]
fn big_blind_check_closes_preflop_exactly_once() {
    let (mut engine, mut table) = start_three_handed(&[1_000, 1_000, 1_000]);

    act(&mut engine, &mut table, PlayerAction::check_or_call(1));
    act(&mut engine, &mut table, PlayerAction::check_or_call(2));
    assert_eq!(engine.current_player(&table), Some(3), "опшен у BB");
    assert_eq!(
        count(engine.history(), |e| matches!(e, PokerEvent::StreetClosed { .. })),
        0
    );

    let status = act(&mut engine, &mut table, PlayerAction::check_or_call(3));
    assert!(!status.is_finished());

    let history = engine.history();
    assert_eq!(
        count(history, |e| matches!(e, PokerEvent::StreetClosed { street: Street::Ante })),
        1
    );
    assert_eq!(
        count(history, |e| matches!(e, PokerEvent::StreetChanged { street: Street::Flop, .. })),
        1
    );

    let state = engine.state().unwrap();
    assert_eq!(state.street, Street::Flop);
    assert_eq!(state.turn, state.small_blind);
    assert_eq!(state.bet_base, Chips::ZERO);
    assert_eq!(engine.current_player(&table), Some(2));
    assert_eq!(
        history.iter().last(),
        Some(&PokerEvent::PlayerTurnChanged {
            player_id: 2,
            street: Street::Flop
        })
    );

    // Ставки улицы сброшены, фишки остались в банке.
    assert!(table.players.iter().all(|p| p.current_bet.is_zero()));
    assert!(table.players.iter().all(|p| p.stack == Chips(900)));
    assert_eq!(engine.ledger().total_pot(), Chips(300));
    assert!(engine.legal_actions(&table).unwrap().can_check);
}

#[test]
fn raise_moves_the_closing_player() {
    let (mut engine, mut table) = start_three_handed(&[1_000, 1_000, 1_000]);

    act(&mut engine, &mut table, PlayerAction::check_or_call(1));
    act(&mut engine, &mut table, PlayerAction::check_or_call(2));
    act(&mut engine, &mut table, PlayerAction::raise(3, Chips(300)));

    let state = engine.state().unwrap();
    assert_eq!(state.street, Street::Ante, "после рейза BB улица продолжается");
    assert_eq!(state.closing, 2);
    assert_eq!(engine.current_player(&table), Some(1));
    assert_eq!(engine.legal_actions(&table).unwrap().call_amount, Chips(200));

    act(&mut engine, &mut table, PlayerAction::check_or_call(1));
    assert_eq!(engine.state().unwrap().street, Street::Ante);
    act(&mut engine, &mut table, PlayerAction::check_or_call(2));

    assert_eq!(engine.state().unwrap().street, Street::Flop);
    assert_eq!(engine.ledger().total_pot(), Chips(900));
    assert_eq!(
        count(engine.history(), |e| matches!(e, PokerEvent::StreetClosed { .. })),
        1
    );
}

#[test]
fn fold_of_closing_player_hands_closing_to_next_live_seat() {
    let (mut engine, mut table) = start_three_handed(&[1_000, 1_000, 1_000]);
    for id in [1, 2, 3] {
        act(&mut engine, &mut table, PlayerAction::check_or_call(id));
    }

    // Флоп: P2 (SB) ходит первым и закрывает улицу – и сразу фолдит.
    act(&mut engine, &mut table, PlayerAction::fold(2));
    let state = engine.state().unwrap();
    assert_eq!(state.closing, 2);
    assert_eq!(engine.current_player(&table), Some(3));

    act(&mut engine, &mut table, PlayerAction::check_or_call(3));
    act(&mut engine, &mut table, PlayerAction::check_or_call(1));

    // Тёрн: сфолдивший SB пропускается.
    assert_eq!(engine.state().unwrap().street, Street::Turn);
    assert_eq!(engine.current_player(&table), Some(3));
    assert!(table.player(2).unwrap().has_folded());
}

//
// ============= ТЕСТ 3: победа без вскрытия ============
//

#[test]
fn three_folds_end_round_for_last_player() {
    let mut engine = engine(THREE_HANDED);
    let mut table = table(&[1_000, 1_000, 1_000, 1_000]);
    engine
        .start_round(&mut table, 7, 0, Chips(50))
        .expect("раунд должен начаться");

    // Дилер P1, SB P2, BB P3, первым ходит P4.
    assert_eq!(engine.current_player(&table), Some(4));
    act(&mut engine, &mut table, PlayerAction::fold(4));
    act(&mut engine, &mut table, PlayerAction::fold(1));
    let status = act(&mut engine, &mut table, PlayerAction::fold(2));

    let RoundStatus::Finished(summary, history) = status else {
        panic!("раунд должен закончиться после третьего фолда");
    };
    assert!(!engine.is_active());

    assert_eq!(summary.round_id, 7);
    assert_eq!(summary.winners, vec![3]);
    assert_eq!(summary.street_reached, Street::Ante);
    assert_eq!(summary.decided_by, None);
    assert_eq!(summary.total_pot, Chips(150));
    assert!(summary.board.is_empty());

    let winner = summary.result_of(3).unwrap();
    assert!(winner.is_winner);
    assert_eq!(winner.won, Chips(150));
    assert_eq!(summary.result_of(2).unwrap().category, None);

    assert_eq!(table.player(3).unwrap().stack, Chips(1_050));
    assert_eq!(table.player(2).unwrap().stack, Chips(950));
    assert_eq!(table.total_stacks(), Chips(4_000));
    assert!(engine.ledger().total_pot().is_zero());

    assert_eq!(
        count(&history, |e| matches!(e, PokerEvent::StreetChanged { .. })),
        0,
        "без вскрытия новые улицы не открываются"
    );
    assert!(matches!(
        history.iter().last(),
        Some(PokerEvent::RoundFinished { winners, .. }) if winners == &vec![3]
    ));
    assert!(engine.history().is_empty(), "история передана вызывающему");
}

//
// ============= ТЕСТ 4: олл-ин и автоматический прогон ============
//

#[test]
fn lone_player_with_chips_stops_acting_and_board_runs_out() {
    let (mut engine, mut table) = start_three_handed(&[300, 1_000, 1_000]);

    act(&mut engine, &mut table, PlayerAction::all_in(1));
    assert_eq!(engine.state().unwrap().closing, 0);
    act(&mut engine, &mut table, PlayerAction::check_or_call(2));
    let status = act(&mut engine, &mut table, PlayerAction::fold(3));

    let RoundStatus::Finished(summary, history) = status else {
        panic!("против олл-ина больше некому ходить – раунд доигрывается сам");
    };
    assert_eq!(summary.street_reached, Street::Showdown);
    assert_eq!(summary.board, cards("3d 8c 9h Js 4d"));
    assert_eq!(summary.winners, vec![1]);
    assert_eq!(summary.total_pot, Chips(700));

    // Никаких ходов после фолда P3.
    let turns_after_fold = history
        .iter()
        .skip_while(|e| {
            !matches!(
                e,
                PokerEvent::ActionChosen {
                    player_id: 3,
                    action: ActionTaken::Fold
                }
            )
        })
        .filter(|e| matches!(e, PokerEvent::PlayerTurnChanged { .. }))
        .count();
    assert_eq!(turns_after_fold, 0);
    assert_eq!(
        count(&history, |e| matches!(e, PokerEvent::StreetClosed { .. })),
        4
    );

    assert_eq!(table.player(1).unwrap().stack, Chips(700));
    assert_eq!(table.player(2).unwrap().stack, Chips(700));
    assert_eq!(table.player(3).unwrap().stack, Chips(900));
    assert_eq!(table.total_stacks(), Chips(2_300));
}

#[test]
fn raise_beyond_stack_becomes_all_in() {
    let (mut engine, mut table) = start_three_handed(&[400, 1_000, 1_000]);

    act(&mut engine, &mut table, PlayerAction::raise(1, Chips(5_000)));
    let p1 = table.player(1).unwrap();
    assert!(p1.stack.is_zero());
    assert!(p1.is_all_in());
    assert_eq!(engine.ledger().player_bet(Street::Ante, 1), Chips(400));
    assert!(engine.history().iter().any(|e| matches!(
        e,
        PokerEvent::ActionChosen {
            player_id: 1,
            action: ActionTaken::AllIn
        }
    )));
}

#[test]
fn short_small_blind_is_posted_as_all_in() {
    // SB = P2 с 30 фишками при forced bet 50.
    let (mut engine, mut table) = start_three_handed(&[1_000, 30, 1_000]);

    let sb = table.player(2).unwrap();
    assert!(sb.stack.is_zero());
    assert!(sb.continue_all_in);
    assert_eq!(engine.ledger().player_bet(Street::Ante, 2), Chips(30));
    assert_eq!(engine.ledger().total_pot(), Chips(130));
    assert!(engine.history().iter().any(|e| matches!(
        e,
        PokerEvent::ActionChosen {
            player_id: 2,
            action: ActionTaken::AllIn
        }
    )));

    // P1 уравнивает, ход переходит сразу к BB мимо P2.
    assert_eq!(engine.current_player(&table), Some(1));
    act(&mut engine, &mut table, PlayerAction::check_or_call(1));
    assert_eq!(engine.current_player(&table), Some(3));

    let mut moves = 0;
    let summary = loop {
        let player = engine.current_player(&table).expect("есть игрок для хода");
        assert_ne!(player, 2, "олл-ин на блайнде не получает ход");
        moves += 1;
        assert!(moves < 20, "раунд не заканчивается");
        if let RoundStatus::Finished(summary, _) =
            act(&mut engine, &mut table, PlayerAction::check_or_call(player))
        {
            break summary;
        }
    };

    assert_eq!(summary.street_reached, Street::Showdown);
    assert_eq!(summary.total_pot, Chips(230));
    assert_eq!(table.total_stacks(), Chips(2_030));
}

//
// ============= ТЕСТ 5: некорректные действия ============
//

#[test]
fn illegal_actions_leave_state_untouched() {
    let (mut engine, mut table) = start_three_handed(&[1_000, 1_000, 1_000]);

    let state_before = engine.state().cloned();
    let ledger_before = engine.ledger().clone();
    let table_before = table.clone();
    let history_len = engine.history().len();

    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::check_or_call(2)).err(),
        Some(EngineError::NotPlayersTurn(2))
    );
    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::raise(1, Chips(100))).err(),
        Some(EngineError::RaiseTooSmall {
            amount: Chips(100),
            high_bet: Chips(100)
        })
    );
    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::fold(99)).err(),
        Some(EngineError::UnknownPlayer(99))
    );

    assert_eq!(engine.state().cloned(), state_before);
    assert_eq!(engine.ledger(), &ledger_before);
    assert_eq!(table, table_before);
    assert_eq!(engine.history().len(), history_len);
}

#[test]
fn actions_outside_a_round_are_rejected() {
    let mut engine = engine(THREE_HANDED);
    let mut table = table(&[1_000, 1_000]);

    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::fold(1)).err(),
        Some(EngineError::RoundNotActive)
    );
    assert!(engine.current_player(&table).is_none());

    engine.start_round(&mut table, 1, 0, Chips(10)).unwrap();
    assert_eq!(
        engine.start_round(&mut table, 2, 1, Chips(10)).err(),
        Some(EngineError::RoundAlreadyInProgress)
    );
}

#[test]
fn round_needs_two_funded_players() {
    let mut engine = engine(THREE_HANDED);
    let mut table = table(&[1_000, 0, 0]);

    assert_eq!(
        engine.start_round(&mut table, 1, 0, Chips(50)).err(),
        Some(EngineError::NotEnoughPlayers { funded: 1 })
    );
    assert!(!engine.is_active());
    assert_eq!(table.player(1).unwrap().stack, Chips(1_000));

    let mut table = self::table(&[1_000, 1_000]);
    assert!(matches!(
        engine.start_round(&mut table, 1, 0, Chips::ZERO),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn busted_seat_sits_out_and_heads_up_blinds_apply() {
    let mut engine = engine(THREE_HANDED);
    let mut table = table(&[1_000, 0, 1_000]);
    engine.start_round(&mut table, 1, 0, Chips(50)).unwrap();

    let state = engine.state().unwrap();
    assert_eq!(state.seat_order, vec![0, 2]);
    // Вдвоём: BB = дилер, первым ходит SB.
    assert_eq!(table.player(1).unwrap().current_bet, Chips(100));
    assert_eq!(table.player(3).unwrap().current_bet, Chips(50));
    assert_eq!(engine.current_player(&table), Some(3));
    assert!(table.player(2).unwrap().hole_cards.is_empty());

    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::fold(2)).err(),
        Some(EngineError::UnknownPlayer(2))
    );
}

#[test]
fn decision_context_reflects_current_turn() {
    let (mut engine, mut table) = start_three_handed(&[1_000, 1_000, 1_000]);
    act(&mut engine, &mut table, PlayerAction::raise(1, Chips(250)));

    let ctx = engine.decision_context(&table).expect("ход P2");
    assert_eq!(ctx.player_id, 2);
    assert_eq!(ctx.street, Street::Ante);
    assert_eq!(ctx.current_bet, Chips(50));
    assert_eq!(ctx.bet_base, Chips(250));
    assert_eq!(ctx.legal.call_amount, Chips(200));
    assert_eq!(ctx.last_action.map(|l| l.action), Some(ActionTaken::Raise));
    assert!(!ctx.last_actor_all_in);
    assert!(ctx.hand.is_some());
}

//
// ============= ТЕСТ 6: сбой колоды посреди раунда ============
//

/// Колода, которая обещает полный запас, но выдаёт только `limit` карт.
struct DryDeck {
    inner: StackedDeck,
    limit: usize,
    drawn: usize,
}

impl DeckProvider for DryDeck {
    fn reset_and_shuffle(&mut self) {
        self.inner.reset_and_shuffle();
        self.drawn = 0;
    }

    fn draw(&mut self) -> Option<CardId> {
        if self.drawn == self.limit {
            return None;
        }
        self.drawn += 1;
        self.inner.draw()
    }

    fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

#[test]
fn deck_running_dry_aborts_round_and_refunds_bets() {
    let deck = DryDeck {
        inner: StackedDeck::from_str_cards(THREE_HANDED).unwrap(),
        limit: 6,
        drawn: 0,
    };
    let mut engine = RoundEngine::new(Box::new(deck));
    let mut table = table(&[1_000, 1_000, 1_000]);
    engine.start_round(&mut table, 1, 0, Chips(50)).unwrap();

    act(&mut engine, &mut table, PlayerAction::check_or_call(1));
    // Чек BB закрывает префлоп, а на флоп карт нет.
    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::check_or_call(3)).err(),
        Some(EngineError::DeckExhausted)
    );

    assert!(!engine.is_active());
    assert!(engine.ledger().total_pot().is_zero());
    assert!(table.board.is_empty());
    for id in [1, 2, 3] {
        let player = table.player(id).unwrap();
        assert_eq!(player.stack, Chips(1_000), "вклад игрока {id} возвращён");
        assert!(!player.is_latched());
    }

    assert_eq!(
        engine.submit_action(&mut table, PlayerAction::fold(1)).err(),
        Some(EngineError::RoundNotActive)
    );
}
