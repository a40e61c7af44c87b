use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{PlayerId, RoundId};

/// Простая генерация ID на основе монотонных счётчиков (с 1).
#[derive(Debug)]
pub struct IdGenerator {
    player_counter: AtomicU64,
    round_counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            player_counter: AtomicU64::new(1),
            round_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_player_id(&self) -> PlayerId {
        self.player_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_round_id(&self) -> RoundId {
        self.round_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
