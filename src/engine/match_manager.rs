use thiserror::Error;
use tracing::info;

use crate::domain::blinds::BlindSchedule;
use crate::domain::chips::Chips;
use crate::domain::hand::RoundSummary;
use crate::domain::player::Player;
use crate::domain::table::{MatchConfig, Table};
use crate::domain::PlayerId;
use crate::engine::actions::{DecisionContext, LegalActions, PlayerAction};
use crate::engine::errors::EngineError;
use crate::engine::events::{EventSink, PokerEvent};
use crate::engine::game_loop::{RoundEngine, RoundStatus};
use crate::engine::hand_history::HandHistory;
use crate::engine::DeckProvider;
use crate::infra::ids::IdGenerator;

/// Ошибки уровня матча (над движком одного раунда).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Раунд уже идёт")]
    RoundInProgress,

    #[error("Нет активного раунда")]
    NoActiveRound,

    #[error("Матч окончен")]
    MatchOver,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Что произошло после очередного шага матча.
#[derive(Debug)]
pub enum MatchStatus {
    RoundInProgress,
    RoundFinished(RoundSummary),
    MatchOver {
        winner: PlayerId,
        last_round: RoundSummary,
    },
}

/// Матч: серия раундов за одним столом.
///
/// - рост блайндов по `BlindSchedule`;
/// - дилер сдвигается на одно место каждый раунд;
/// - игроки с нулевым стеком выбывают после раунда;
/// - матч окончен, когда остался один.
#[derive(Debug)]
pub struct MatchManager {
    config: MatchConfig,
    table: Table,
    engine: RoundEngine,
    blinds: BlindSchedule,
    ids: IdGenerator,
    /// Сколько раундов сыграно: он же счётчик дилерской кнопки.
    rounds_played: usize,
    winner: Option<PlayerId>,
    last_history: Option<HandHistory>,
}

impl MatchManager {
    pub fn new<S: AsRef<str>>(
        config: MatchConfig,
        names: &[S],
        deck: Box<dyn DeckProvider>,
    ) -> Result<Self, MatchError> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        if names.len() != config.player_count {
            return Err(EngineError::InvalidConfig(format!(
                "MatchManager: {} names for {} players",
                names.len(),
                config.player_count
            ))
            .into());
        }

        let ids = IdGenerator::new();
        let players = names
            .iter()
            .map(|name| Player::new(ids.next_player_id(), name.as_ref(), config.starting_stack))
            .collect();

        Ok(Self {
            blinds: config.blind_schedule(),
            engine: RoundEngine::new(deck).with_settlement(config.settlement),
            table: Table::new(players),
            config,
            ids,
            rounds_played: 0,
            winner: None,
            last_history: None,
        })
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.engine.subscribe(sink);
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn forced_bet(&self) -> Chips {
        self.blinds.current
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// История последнего завершённого раунда.
    pub fn last_history(&self) -> Option<&HandHistory> {
        self.last_history.as_ref()
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.engine.current_player(&self.table)
    }

    pub fn legal_actions(&self) -> Option<LegalActions> {
        self.engine.legal_actions(&self.table)
    }

    pub fn decision_context(&self) -> Option<DecisionContext> {
        self.engine.decision_context(&self.table)
    }

    /// Начать следующий раунд (с учётом роста блайндов).
    pub fn start_next_round(&mut self) -> Result<MatchStatus, MatchError> {
        if self.is_over() {
            return Err(MatchError::MatchOver);
        }
        if self.engine.is_active() {
            return Err(MatchError::RoundInProgress);
        }

        if let Some((before, after)) = self.blinds.next_round() {
            info!(before = before.0, after = after.0, "блайнды выросли");
            self.engine.emit(PokerEvent::BlindIncreased { before, after });
        }

        let round_id = self.ids.next_round_id();
        let status = self.engine.start_round(
            &mut self.table,
            round_id,
            self.rounds_played,
            self.blinds.current,
        )?;
        Ok(self.on_status(status))
    }

    /// Передать действие игрока в текущий раунд.
    pub fn submit_action(&mut self, action: PlayerAction) -> Result<MatchStatus, MatchError> {
        if self.is_over() {
            return Err(MatchError::MatchOver);
        }
        if !self.engine.is_active() {
            return Err(MatchError::NoActiveRound);
        }
        let status = self.engine.submit_action(&mut self.table, action)?;
        Ok(self.on_status(status))
    }

    fn on_status(&mut self, status: RoundStatus) -> MatchStatus {
        let (summary, history) = match status {
            RoundStatus::Ongoing => return MatchStatus::RoundInProgress,
            RoundStatus::Finished(summary, history) => (summary, history),
        };
        self.last_history = Some(history);
        self.rounds_played += 1;

        for busted in self.table.remove_busted() {
            info!(player = busted.id, name = %busted.name, "игрок выбыл");
            self.engine.emit(PokerEvent::PlayerEliminated {
                player_id: busted.id,
            });
        }

        if let [last] = self.table.players.as_slice() {
            let winner = last.id;
            info!(winner, rounds = self.rounds_played, "матч окончен");
            self.winner = Some(winner);
            self.engine.emit(PokerEvent::MatchEnd { winner });
            return MatchStatus::MatchOver {
                winner,
                last_round: summary,
            };
        }

        MatchStatus::RoundFinished(summary)
    }
}
