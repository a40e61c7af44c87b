//! Исходящие уведомления ядра.
//!
//! Ядро ничего не знает о UI: оно отдаёт события всем подписчикам синхронно,
//! в порядке отправки, и параллельно пишет их в `HandHistory` раунда.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, Chips, PlayerId, RoundId, Street};
use crate::engine::actions::ActionTaken;
use crate::engine::hand_history::HandHistory;
use crate::eval::HandCategory;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PokerEvent {
    RoundStarted {
        round_id: RoundId,
        dealer: PlayerId,
        small_blind: PlayerId,
        big_blind: PlayerId,
        forced_bet: Chips,
    },
    BlindIncreased {
        before: Chips,
        after: Chips,
    },
    PlayerTurnChanged {
        player_id: PlayerId,
        street: Street,
    },
    /// Улица закрыта (все уравняли или вышли).
    StreetClosed {
        street: Street,
    },
    /// Открыта новая улица; `board` – весь борд на этот момент.
    StreetChanged {
        street: Street,
        board: Vec<Card>,
    },
    ActionChosen {
        player_id: PlayerId,
        action: ActionTaken,
    },
    /// `amount` – суммарная ставка игрока на улице.
    BetMade {
        player_id: PlayerId,
        amount: Chips,
    },
    PotAmountChanged {
        before: Chips,
        after: Chips,
    },
    HandUpdated {
        player_id: PlayerId,
        category: HandCategory,
    },
    ChipsAmountChanged {
        player_id: PlayerId,
        before: Chips,
        after: Chips,
    },
    RoundFinished {
        round_id: RoundId,
        winners: Vec<PlayerId>,
        total_pot: Chips,
    },
    PlayerEliminated {
        player_id: PlayerId,
    },
    MatchEnd {
        winner: PlayerId,
    },
}

/// Подписчик на события ядра.
pub trait EventSink {
    fn on_event(&mut self, event: &PokerEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&PokerEvent),
{
    fn on_event(&mut self, event: &PokerEvent) {
        self(event)
    }
}

/// Рассылка событий подписчикам + история текущего раунда.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn EventSink>>,
    history: HandHistory,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.listeners.push(sink);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: PokerEvent) {
        for sink in self.listeners.iter_mut() {
            sink.on_event(&event);
        }
        self.history.push(event);
    }

    pub fn history(&self) -> &HandHistory {
        &self.history
    }

    /// Забрать историю и начать новую.
    pub fn take_history(&mut self) -> HandHistory {
        std::mem::take(&mut self.history)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("history", &self.history.len())
            .finish()
    }
}
