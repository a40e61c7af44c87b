use serde::{Deserialize, Serialize};

use crate::domain::blinds::BlindSchedule;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::{CardArena, CardId};
use crate::domain::player::Player;
use crate::domain::{PlayerId, SeatIndex};

/// Как делить банк на шоудауне.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PotSettlement {
    /// По каждой улице отдельно: вклад победителя ограничивает, сколько он
    /// забирает у каждого; остаток возвращается внесшим.
    #[default]
    PerStreetCapped,
    /// Полноценные сайд-поты по уровням олл-инов.
    LayeredSidePots,
}

/// Конфиг матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchConfig {
    /// Количество игроков (2–8).
    pub player_count: usize,
    pub starting_stack: Chips,
    /// Малый блайнд; большой = 2 × малый.
    pub initial_forced_bet: Chips,
    pub blind_increase: Chips,
    /// Каждые сколько раундов растёт блайнд.
    pub blind_increase_every_rounds: u32,
    /// Потолок форсированной ставки.
    pub blind_cap: Chips,
    pub settlement: PotSettlement,
}

impl MatchConfig {
    pub const MIN_PLAYERS: usize = 2;
    pub const MAX_PLAYERS: usize = 8;

    /// Конфиг по стартовому стеку: forced = stack / 20, cap = stack / 2.
    pub fn with_stack(player_count: usize, starting_stack: Chips) -> Self {
        let forced = Chips((starting_stack.0 + 10) / 20);
        Self {
            player_count,
            starting_stack,
            initial_forced_bet: forced,
            blind_increase: forced,
            blind_increase_every_rounds: 2,
            blind_cap: Chips(starting_stack.0 / 2),
            settlement: PotSettlement::PerStreetCapped,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let cfg: MatchConfig =
            serde_json::from_str(json).map_err(|e| format!("MatchConfig: bad json: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn blind_schedule(&self) -> BlindSchedule {
        BlindSchedule::new(
            self.initial_forced_bet,
            self.blind_increase,
            self.blind_increase_every_rounds,
            self.blind_cap,
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_PLAYERS..=Self::MAX_PLAYERS).contains(&self.player_count) {
            return Err(format!(
                "MatchConfig: player_count = {}, expected {}..={}",
                self.player_count,
                Self::MIN_PLAYERS,
                Self::MAX_PLAYERS
            ));
        }
        if self.starting_stack.is_zero() {
            return Err("MatchConfig: starting_stack = 0".into());
        }
        self.blind_schedule().validate()
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::with_stack(4, Chips(10_000))
    }
}

/// Состояние стола: игроки по местам, арена карт и борд.
///
/// Индекс в `players` = `SeatIndex`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub arena: CardArena,
    pub players: Vec<Player>,
    /// Общие карты (0–5).
    pub board: Vec<CardId>,
}

impl Table {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            arena: CardArena::standard_52(),
            players,
            board: Vec::with_capacity(5),
        }
    }

    pub fn seated_count(&self) -> usize {
        self.players.len()
    }

    pub fn funded_count(&self) -> usize {
        self.players.iter().filter(|p| !p.stack.is_zero()).count()
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn board_cards(&self) -> Vec<Card> {
        self.arena.resolve(&self.board)
    }

    /// Карманные карты игрока + борд.
    pub fn visible_cards(&self, seat: SeatIndex) -> Vec<Card> {
        let mut ids: Vec<CardId> = self
            .players
            .get(seat)
            .map(|p| p.hole_cards.clone())
            .unwrap_or_default();
        ids.extend_from_slice(&self.board);
        self.arena.resolve(&ids)
    }

    /// Сумма стеков всех игроков.
    pub fn total_stacks(&self) -> Chips {
        self.players.iter().map(|p| p.stack).sum()
    }

    /// Убрать игроков с нулевым стеком; возвращает убранных.
    pub fn remove_busted(&mut self) -> Vec<Player> {
        let (busted, alive): (Vec<Player>, Vec<Player>) =
            std::mem::take(&mut self.players)
                .into_iter()
                .partition(Player::is_busted);
        self.players = alive;
        busted
    }
}
