use std::collections::BTreeMap;

use tracing::{debug, info, trace, warn};

use crate::domain::chips::Chips;
use crate::domain::hand::{PlayerRoundResult, RoundSummary, Street};
use crate::domain::player::Player;
use crate::domain::table::{PotSettlement, Table};
use crate::domain::{PlayerId, RoundId, SeatIndex};
use crate::engine::actions::{
    ActionTaken, DecisionContext, LastAction, LegalActions, PlayerAction, PlayerActionKind,
};
use crate::engine::betting::RoundState;
use crate::engine::errors::EngineError;
use crate::engine::events::{EventBus, EventSink, PokerEvent};
use crate::engine::hand_history::HandHistory;
use crate::engine::positions::next_position_where;
use crate::engine::pot::{split_evenly, PotLedger};
use crate::engine::side_pots::compute_side_pots;
use crate::engine::validation::{legal_actions, validate_action};
use crate::engine::DeckProvider;
use crate::eval::{
    evaluate_best_hand, resolve_winners, Contender, EvaluatedHand, TiebreakOutcome, TiebreakStage,
};

/// Статус раунда для внешнего кода.
#[derive(Debug)]
pub enum RoundStatus {
    Ongoing,
    Finished(RoundSummary, HandHistory),
}

impl RoundStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, RoundStatus::Finished(..))
    }
}

/// Машина состояний раунда.
///
/// Живёт дольше одного раунда: колода и подписчики переиспользуются,
/// а `RoundState` и банк создаются в `start_round` и сбрасываются по его окончании.
/// Все операции синхронные; `&mut self` исключает повторный вход.
pub struct RoundEngine {
    deck: Box<dyn DeckProvider>,
    bus: EventBus,
    settlement: PotSettlement,
    state: Option<RoundState>,
    ledger: PotLedger,
}

impl RoundEngine {
    pub fn new(deck: Box<dyn DeckProvider>) -> Self {
        Self {
            deck,
            bus: EventBus::new(),
            settlement: PotSettlement::default(),
            state: None,
            ledger: PotLedger::new(),
        }
    }

    pub fn with_settlement(mut self, settlement: PotSettlement) -> Self {
        self.settlement = settlement;
        self
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.bus.subscribe(sink);
    }

    /// Отправить событие уровня матча через ту же шину.
    pub fn emit(&mut self, event: PokerEvent) {
        self.bus.emit(event);
    }

    pub fn state(&self) -> Option<&RoundState> {
        self.state.as_ref()
    }

    pub fn ledger(&self) -> &PotLedger {
        &self.ledger
    }

    /// История с момента окончания прошлого раунда.
    pub fn history(&self) -> &HandHistory {
        self.bus.history()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Игрок, чей сейчас ход.
    pub fn current_player(&self, table: &Table) -> Option<PlayerId> {
        let state = self.state.as_ref()?;
        table.players.get(state.turn_seat()).map(|p| p.id)
    }

    /// Допустимые действия для игрока, чей сейчас ход.
    pub fn legal_actions(&self, table: &Table) -> Option<LegalActions> {
        let state = self.state.as_ref()?;
        let player = table.players.get(state.turn_seat())?;
        if player.is_latched() {
            return None;
        }
        Some(legal_actions(player, self.ledger.high_bet(state.street)))
    }

    /// Контекст для `DecisionPolicy` игрока, чей сейчас ход.
    pub fn decision_context(&self, table: &Table) -> Option<DecisionContext> {
        let state = self.state.as_ref()?;
        let player = table.players.get(state.turn_seat())?;
        let legal = self.legal_actions(table)?;
        let last_actor_all_in = state
            .last_action
            .and_then(|last| table.player(last.player_id))
            .map(|p| p.continue_all_in)
            .unwrap_or(false);

        Some(DecisionContext {
            player_id: player.id,
            street: state.street,
            stack: player.stack,
            current_bet: player.current_bet,
            bet_base: state.bet_base,
            legal,
            last_action: state.last_action,
            last_actor_all_in,
            hand: player.hand.as_ref().map(|h| h.category),
        })
    }

    /// Начать раунд.
    ///
    /// Участвуют только игроки с фишками. Дилер = `dealer_turn % участников`,
    /// SB = `forced_bet`, BB = 2 × `forced_bet`.
    pub fn start_round(
        &mut self,
        table: &mut Table,
        round_id: RoundId,
        dealer_turn: usize,
        forced_bet: Chips,
    ) -> Result<RoundStatus, EngineError> {
        if self.state.is_some() {
            return Err(EngineError::RoundAlreadyInProgress);
        }
        if forced_bet.is_zero() {
            return Err(EngineError::InvalidConfig("forced bet = 0".into()));
        }

        let seat_order: Vec<SeatIndex> = table
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.stack.is_zero())
            .map(|(seat, _)| seat)
            .collect();

        if seat_order.len() < 2 {
            warn!(funded = seat_order.len(), "раунд не может начаться");
            return Err(EngineError::NotEnoughPlayers {
                funded: seat_order.len(),
            });
        }

        self.deck.reset_and_shuffle();
        if self.deck.remaining() < seat_order.len() * 2 + 5 {
            return Err(EngineError::DeckExhausted);
        }

        for player in table.players.iter_mut() {
            player.reset_for_round();
        }
        table.board.clear();
        self.ledger.clear();
        self.state = Some(RoundState::new(round_id, seat_order, dealer_turn, forced_bet));

        let status = self.round(table)?.begin();
        self.settle_status(table, status)
    }

    /// Применить действие игрока. Отказ в действии ничего не меняет.
    pub fn submit_action(
        &mut self,
        table: &mut Table,
        action: PlayerAction,
    ) -> Result<RoundStatus, EngineError> {
        let state = self.state.as_ref().ok_or(EngineError::RoundNotActive)?;

        let pos = table
            .seat_of(action.player_id)
            .and_then(|seat| state.position_of(seat))
            .ok_or(EngineError::UnknownPlayer(action.player_id))?;

        if pos != state.turn {
            warn!(player = action.player_id, "ход вне очереди");
            return Err(EngineError::NotPlayersTurn(action.player_id));
        }

        let player = &table.players[state.seat_at(pos)];
        if let Err(err) = validate_action(player, &action.kind, self.ledger.high_bet(state.street)) {
            warn!(player = action.player_id, kind = ?action.kind, %err, "действие отклонено");
            return Err(err);
        }

        let status = self.round(table)?.apply(pos, action.kind);
        self.settle_status(table, status)
    }

    fn settle_status(
        &mut self,
        table: &mut Table,
        status: Result<RoundStatus, EngineError>,
    ) -> Result<RoundStatus, EngineError> {
        match status {
            Ok(status) => {
                if status.is_finished() {
                    self.state = None;
                }
                Ok(status)
            }
            Err(err) => {
                self.abort_round(table, &err);
                Err(err)
            }
        }
    }

    /// Сбой посреди раунда (колода, цикл ходов): раунд снимается,
    /// вклады возвращаются на стеки, борд очищается.
    fn abort_round(&mut self, table: &mut Table, err: &EngineError) {
        let round = self.state.take().map(|s| s.round_id);
        let total = self.ledger.total_pot();
        for (player_id, chips) in self.ledger.return_remainder() {
            if let Some(player) = table.player_mut(player_id) {
                player.stack += chips;
            }
        }
        table.board.clear();
        for player in table.players.iter_mut() {
            player.reset_for_round();
        }
        warn!(?round, %err, refunded = total.0, "раунд прерван, вклады возвращены");
        self.bus.emit(PokerEvent::PotAmountChanged {
            before: total,
            after: Chips::ZERO,
        });
    }

    fn round<'a>(&'a mut self, table: &'a mut Table) -> Result<Round<'a>, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::RoundNotActive)?;
        Ok(Round {
            table,
            state,
            ledger: &mut self.ledger,
            bus: &mut self.bus,
            deck: self.deck.as_mut(),
            settlement: self.settlement,
        })
    }
}

impl std::fmt::Debug for RoundEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEngine")
            .field("settlement", &self.settlement)
            .field("state", &self.state)
            .field("ledger", &self.ledger)
            .field("bus", &self.bus)
            .finish()
    }
}

/// Раунд на время одного вызова: всё, что мутирует машина состояний.
struct Round<'a> {
    table: &'a mut Table,
    state: &'a mut RoundState,
    ledger: &'a mut PotLedger,
    bus: &'a mut EventBus,
    deck: &'a mut dyn DeckProvider,
    settlement: PotSettlement,
}

impl Round<'_> {
    fn player(&self, pos: usize) -> &Player {
        &self.table.players[self.state.seat_at(pos)]
    }

    fn player_mut(&mut self, pos: usize) -> &mut Player {
        let seat = self.state.seat_at(pos);
        &mut self.table.players[seat]
    }

    fn positions(&self) -> std::ops::Range<usize> {
        0..self.state.len()
    }

    fn unfolded(&self) -> Vec<usize> {
        self.positions()
            .filter(|&pos| !self.player(pos).has_folded())
            .collect()
    }

    fn high_bet(&self) -> Chips {
        self.ledger.high_bet(self.state.street)
    }

    fn emit(&mut self, event: PokerEvent) {
        self.bus.emit(event);
    }

    /// Блайнды, раздача карманных карт, первый ход.
    fn begin(mut self) -> Result<RoundStatus, EngineError> {
        let dealer = self.player(self.state.dealer).id;
        let small_blind = self.player(self.state.small_blind).id;
        let big_blind = self.player(self.state.big_blind).id;
        let forced_bet = self.state.forced_bet;

        info!(
            round = self.state.round_id,
            players = self.state.len(),
            dealer,
            forced_bet = forced_bet.0,
            "раунд начат"
        );
        self.emit(PokerEvent::RoundStarted {
            round_id: self.state.round_id,
            dealer,
            small_blind,
            big_blind,
            forced_bet,
        });

        // Два круга по одной карте, в порядке рассадки.
        for _ in 0..2 {
            for pos in self.positions() {
                let card = self.deck.draw().ok_or(EngineError::DeckExhausted)?;
                self.player_mut(pos).hole_cards.push(card);
            }
        }

        let (sb, bb) = (self.state.small_blind, self.state.big_blind);
        self.make_bet(sb, forced_bet, None);
        self.make_bet(bb, forced_bet + forced_bet, None);
        self.state.bet_base = self.high_bet();

        self.refresh_hands();
        self.run_from_turn()
    }

    /// Применить уже проверенное действие игрока на позиции `pos`.
    fn apply(mut self, pos: usize, kind: PlayerActionKind) -> Result<RoundStatus, EngineError> {
        let player_id = self.player(pos).id;
        let high = self.high_bet();

        let taken = match kind {
            PlayerActionKind::Fold => {
                let player = self.player_mut(pos);
                player.continue_fold = true;
                player.flags.folded = true;
                self.emit(PokerEvent::ActionChosen {
                    player_id,
                    action: ActionTaken::Fold,
                });
                ActionTaken::Fold
            }
            PlayerActionKind::CheckOrCall => {
                if self.player(pos).current_bet >= high {
                    self.player_mut(pos).flags.checked = true;
                    self.emit(PokerEvent::ActionChosen {
                        player_id,
                        action: ActionTaken::Check,
                    });
                    ActionTaken::Check
                } else if self.make_bet(pos, high, Some(ActionTaken::Call)) {
                    ActionTaken::AllIn
                } else {
                    self.player_mut(pos).flags.called = true;
                    ActionTaken::Call
                }
            }
            PlayerActionKind::Raise(total) => {
                let flags = &mut self.player_mut(pos).flags;
                flags.checked = false;
                flags.called = false;
                if self.make_bet(pos, total, Some(ActionTaken::Raise)) {
                    ActionTaken::AllIn
                } else {
                    self.player_mut(pos).flags.raised = true;
                    ActionTaken::Raise
                }
            }
            PlayerActionKind::AllIn => {
                let player = self.player(pos);
                let total = player.current_bet + player.stack;
                self.make_bet(pos, total, Some(ActionTaken::AllIn));
                ActionTaken::AllIn
            }
        };

        debug!(player = player_id, ?taken, street = ?self.state.street, "действие принято");
        self.state.last_action = Some(LastAction {
            player_id,
            action: taken,
        });

        // Закрывающим становится только тот, кто поднял старшую ставку.
        if self.player(pos).current_bet > high {
            self.state.closing = pos;
        }

        if taken == ActionTaken::Fold {
            let unfolded = self.unfolded();
            if unfolded.len() == 1 {
                return Ok(self.finish_forced(unfolded[0]));
            }
            if pos == self.state.closing {
                let folded: Vec<bool> = self
                    .positions()
                    .map(|p| self.player(p).has_folded())
                    .collect();
                if let Some(next) = next_position_where(pos, folded.len(), |p| !folded[p]) {
                    self.state.closing = next;
                }
            }
        }

        self.advance_turn()
    }

    /// Поставить до `street_total` на улице. Ставка не по карману – олл-ин.
    /// Возвращает true, если игрок ушёл в олл-ин.
    fn make_bet(&mut self, pos: usize, street_total: Chips, intent: Option<ActionTaken>) -> bool {
        let street = self.state.street;
        let pot_before = self.ledger.total_pot();

        let player = self.player_mut(pos);
        let stack_before = player.stack;
        let needed = street_total.saturating_sub(player.current_bet);
        let all_in = needed >= player.stack;

        let paid = player.take_from_stack(needed);
        player.current_bet += paid;
        if all_in {
            player.continue_all_in = true;
            player.flags.all_in = true;
        }
        let (player_id, bet, stack_after) = (player.id, player.current_bet, player.stack);

        self.ledger.add_bet(street, player_id, bet);
        let pot_after = self.ledger.total_pot();

        let action = if all_in { Some(ActionTaken::AllIn) } else { intent };
        if let Some(action) = action {
            self.emit(PokerEvent::ActionChosen { player_id, action });
        }
        self.emit(PokerEvent::BetMade {
            player_id,
            amount: bet,
        });
        self.emit(PokerEvent::PotAmountChanged {
            before: pot_before,
            after: pot_after,
        });
        self.emit(PokerEvent::ChipsAmountChanged {
            player_id,
            before: stack_before,
            after: stack_after,
        });

        all_in
    }

    fn advance_turn(mut self) -> Result<RoundStatus, EngineError> {
        if let Some(done) = self.step_cursor()? {
            return Ok(done);
        }
        self.run_from_turn()
    }

    /// Отдать ход текущему игроку; зафиксированных в фолде/олл-ине пропускаем.
    fn run_from_turn(mut self) -> Result<RoundStatus, EngineError> {
        // Каждую улицу курсор обходит стол не больше двух раз.
        let limit = (self.state.len() * 2 + 2) * Street::BETTING.len();
        for _ in 0..limit {
            if self.open_turn() {
                return Ok(RoundStatus::Ongoing);
            }
            if let Some(done) = self.step_cursor()? {
                return Ok(done);
            }
        }
        Err(EngineError::Internal("цикл ходов не завершился"))
    }

    /// true – ход отдан игроку; false – игрок пропущен.
    fn open_turn(&mut self) -> bool {
        let pos = self.state.turn;
        let street = self.state.street;
        let player = self.player_mut(pos);

        if player.continue_fold {
            player.flags.folded = true;
            trace!(player = player.id, "пропуск хода: фолд");
            return false;
        }
        if player.continue_all_in {
            player.flags.all_in = true;
            trace!(player = player.id, "пропуск хода: олл-ин");
            return false;
        }

        let player_id = player.id;
        self.emit(PokerEvent::PlayerTurnChanged { player_id, street });
        true
    }

    /// Сдвинуть курсор после хода (или пропуска) игрока на `turn`.
    /// Закрывает улицу, если пора; Some – раунд закончился.
    fn step_cursor(&mut self) -> Result<Option<RoundStatus>, EngineError> {
        let prev = self.state.turn;
        let next = self.state.next_after(prev);
        let closing = self.state.closing;
        self.state.bet_base = self.high_bet();

        let back_to_closing = next == closing && self.player(closing).has_acted();

        // Префлоп: BB отыграл свой опшен без рейза.
        let last = self.player(prev);
        let big_blind_option = self.state.street == Street::Ante
            && closing == self.state.big_blind
            && prev == closing
            && last.has_acted()
            && !last.flags.raised
            && !last.flags.all_in;

        if back_to_closing || big_blind_option {
            return match self.close_street()? {
                RoundStatus::Ongoing => Ok(None),
                done => Ok(Some(done)),
            };
        }

        self.state.turn = next;
        Ok(None)
    }

    fn close_street(&mut self) -> Result<RoundStatus, EngineError> {
        let street = self.state.street;

        // Единственный не олл-ин среди живых дальше не ставит.
        let unfolded = self.unfolded();
        let not_all_in: Vec<usize> = unfolded
            .iter()
            .copied()
            .filter(|&pos| !self.player(pos).is_all_in())
            .collect();
        if unfolded.len() >= 2 && not_all_in.len() == 1 {
            let player = self.player_mut(not_all_in[0]);
            player.continue_all_in = true;
            debug!(player = player.id, "остальные в олл-ине: игрок больше не ходит");
        }

        self.emit(PokerEvent::StreetClosed { street });
        for pos in self.positions() {
            self.player_mut(pos).reset_for_street();
        }

        let next = street.next();
        if next == Street::Showdown {
            self.state.street = Street::Showdown;
            return Ok(self.showdown());
        }

        for _ in 0..next.board_cards() {
            let card = self.deck.draw().ok_or(EngineError::DeckExhausted)?;
            self.table.board.push(card);
        }
        self.state.open_street(next);
        self.refresh_hands();

        let board = self.table.board_cards();
        debug!(street = ?next, board = ?board, "новая улица");
        self.emit(PokerEvent::StreetChanged {
            street: next,
            board,
        });
        Ok(RoundStatus::Ongoing)
    }

    /// Пересчитать руки всех, кто не сфолдил.
    fn refresh_hands(&mut self) {
        for pos in self.unfolded() {
            let seat = self.state.seat_at(pos);
            let hand = evaluate_best_hand(&self.table.visible_cards(seat));
            let category = hand.category;
            let player = self.player_mut(pos);
            player.hand = Some(hand);
            let player_id = player.id;
            self.emit(PokerEvent::HandUpdated {
                player_id,
                category,
            });
        }
    }

    /// Все, кроме одного, сфолдили: он забирает весь банк без вскрытия.
    fn finish_forced(mut self, winner_pos: usize) -> RoundStatus {
        let total = self.ledger.total_pot();
        self.ledger.clear();

        let winner = self.player(winner_pos).id;
        let mut won = BTreeMap::new();
        won.insert(winner, total);

        self.pay_out(&won, &BTreeMap::new(), total);
        self.finish(vec![winner], None, won, BTreeMap::new(), total)
    }

    fn showdown(&mut self) -> RoundStatus {
        let total = self.ledger.total_pot();

        let hands: Vec<(PlayerId, EvaluatedHand)> = self
            .unfolded()
            .into_iter()
            .map(|pos| {
                let seat = self.state.seat_at(pos);
                let player = self.player(pos);
                let hand = player
                    .hand
                    .clone()
                    .unwrap_or_else(|| evaluate_best_hand(&self.table.visible_cards(seat)));
                (player.id, hand)
            })
            .collect();
        let contenders: Vec<Contender<'_>> = hands
            .iter()
            .map(|(player_id, hand)| Contender {
                player_id: *player_id,
                hand,
            })
            .collect();

        let best: TiebreakOutcome = resolve_winners(&contenders);
        let mut won: BTreeMap<PlayerId, Chips> = BTreeMap::new();
        let mut refunded: BTreeMap<PlayerId, Chips> = BTreeMap::new();

        match self.settlement {
            PotSettlement::PerStreetCapped => {
                let award = self.ledger.settle_pot(&best.winners);
                for (player, share) in award.shares {
                    *won.entry(player).or_default() += share;
                }
                for (player, rest) in self.ledger.return_remainder() {
                    *refunded.entry(player).or_default() += rest;
                }
            }
            PotSettlement::LayeredSidePots => {
                let pots = compute_side_pots(&self.ledger.contributions());
                self.ledger.clear();

                for pot in pots {
                    let live: Vec<Contender<'_>> = contenders
                        .iter()
                        .filter(|c| pot.eligible.contains(&c.player_id))
                        .copied()
                        .collect();

                    // Непокрытый излишек или уровень без живых – возврат внесшим.
                    if live.is_empty() || pot.eligible.len() == 1 {
                        for (player, share) in split_evenly(pot.amount, &pot.eligible) {
                            *refunded.entry(player).or_default() += share;
                        }
                        continue;
                    }

                    let outcome = resolve_winners(&live);
                    for (player, share) in split_evenly(pot.amount, &outcome.winners) {
                        *won.entry(player).or_default() += share;
                    }
                }
            }
        }

        let mut winners = best.winners.clone();
        for pos in self.positions() {
            let id = self.player(pos).id;
            if won.get(&id).is_some_and(|c| !c.is_zero()) && !winners.contains(&id) {
                winners.push(id);
            }
        }

        self.pay_out(&won, &refunded, total);
        self.finish(winners, Some(best.decided_by), won, refunded, total)
    }

    /// Зачислить выигрыши и возвраты на стеки.
    fn pay_out(
        &mut self,
        won: &BTreeMap<PlayerId, Chips>,
        refunded: &BTreeMap<PlayerId, Chips>,
        total: Chips,
    ) {
        for pos in self.positions() {
            let player = self.player_mut(pos);
            let amount = won.get(&player.id).copied().unwrap_or_default()
                + refunded.get(&player.id).copied().unwrap_or_default();
            if amount.is_zero() {
                continue;
            }
            let before = player.stack;
            player.stack += amount;
            let (player_id, after) = (player.id, player.stack);
            debug!(player = player_id, amount = amount.0, "выплата из банка");
            self.emit(PokerEvent::ChipsAmountChanged {
                player_id,
                before,
                after,
            });
        }
        self.emit(PokerEvent::PotAmountChanged {
            before: total,
            after: Chips::ZERO,
        });
    }

    fn finish(
        &mut self,
        winners: Vec<PlayerId>,
        decided_by: Option<TiebreakStage>,
        won: BTreeMap<PlayerId, Chips>,
        refunded: BTreeMap<PlayerId, Chips>,
        total: Chips,
    ) -> RoundStatus {
        let results = self
            .positions()
            .map(|pos| {
                let player = self.player(pos);
                let won_amount = won.get(&player.id).copied().unwrap_or_default();
                PlayerRoundResult {
                    player_id: player.id,
                    category: (!player.has_folded())
                        .then(|| player.hand.as_ref().map(|h| h.category))
                        .flatten(),
                    won: won_amount,
                    refunded: refunded.get(&player.id).copied().unwrap_or_default(),
                    is_winner: winners.contains(&player.id),
                }
            })
            .collect();

        let summary = RoundSummary {
            round_id: self.state.round_id,
            street_reached: self.state.street,
            board: self.table.board_cards(),
            total_pot: total,
            winners: winners.clone(),
            decided_by,
            results,
        };

        info!(
            round = summary.round_id,
            winners = ?summary.winners,
            pot = total.0,
            street = ?summary.street_reached,
            "раунд завершён"
        );
        self.emit(PokerEvent::RoundFinished {
            round_id: summary.round_id,
            winners,
            total_pot: total,
        });

        RoundStatus::Finished(summary, self.bus.take_history())
    }
}
