//! Движок правил одного раунда Texas Hold'em.
//!
//! Слои:
//! - `domain` – карты, фишки, игроки, стол, конфиг матча;
//! - `eval` – оценка лучшей руки и разрешение ничьих (кикеры, сплит);
//! - `engine` – машина состояний ставок, банк по улицам, события наружу, матч;
//! - `infra` – RNG, колоды, генерация ID, вероятностная политика CPU.
//!
//! Всё синхронно: одно действие за раз, ядро ничего не знает о таймингах UI.

pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
