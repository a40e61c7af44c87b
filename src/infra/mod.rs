//! Инфраструктура вокруг движка:
//! - RNG-реализации (`rand`);
//! - колоды (перемешанная и заданная);
//! - генерация ID;
//! - CPU-политика по таблице вероятностей.

pub mod deck;
pub mod ids;
pub mod policy;
pub mod rng;

pub use deck::{ShuffledDeck, StackedDeck};
pub use ids::IdGenerator;
pub use policy::{ActionWeights, ProbabilityTablePolicy, StreetWeights};
pub use rng::{DeterministicRng, SystemRng};
