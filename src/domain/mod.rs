//! Доменная модель: карты, фишки, игроки, стол, блайнды, конфиг матча.

pub mod blinds;
pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod table;

pub type PlayerId = u64;
pub type RoundId = u64;

/// Индекс места за столом (0..players.len()-1).
pub type SeatIndex = usize;

pub use blinds::*;
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use table::*;
