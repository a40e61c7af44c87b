use serde::{Deserialize, Serialize};

use crate::engine::events::PokerEvent;

/// Событие раунда с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub event: PokerEvent,
}

/// Полная история раунда: всё, что ушло наружу, в порядке отправки.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: PokerEvent) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, event });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PokerEvent> {
        self.events.iter().map(|e| &e.event)
    }

    /// Экспорт в JSON (для реплеера/отладки).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
