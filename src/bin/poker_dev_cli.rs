//! Dev-CLI: матч CPU против CPU с печатью всех событий ядра.
//!
//! Запуск:
//!   poker_dev_cli [config.json] [seed]
//! Уровень логов – через `RUST_LOG` (по умолчанию `info`).

use std::env;
use std::fs;

use holdem_core::domain::table::MatchConfig;
use holdem_core::engine::{
    DecisionPolicy, MatchManager, MatchStatus, PlayerAction, PokerEvent,
};
use holdem_core::infra::{DeterministicRng, ProbabilityTablePolicy, ShuffledDeck, StreetWeights};
use tracing_subscriber::EnvFilter;

/// Страховка от бесконечного матча (блайнды упираются в потолок).
const MAX_ROUNDS: usize = 500;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => match fs::read_to_string(&path)
            .map_err(|e| format!("{path}: {e}"))
            .and_then(|json| MatchConfig::from_json_str(&json))
        {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("[CLI] ошибка конфига: {e}");
                std::process::exit(1);
            }
        },
        None => MatchConfig::default(),
    };
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    println!(
        "poker_dev_cli: {} игроков, стек {}, блайнд {}, seed {}",
        config.player_count, config.starting_stack, config.initial_forced_bet, seed
    );

    let names: Vec<String> = (1..=config.player_count).map(|i| format!("CPU {i}")).collect();
    let deck = ShuffledDeck::new(DeterministicRng::from_seed(seed));

    let mut manager = match MatchManager::new(config, names.as_slice(), Box::new(deck)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("[CLI] не удалось создать матч: {e}");
            std::process::exit(1);
        }
    };
    manager.subscribe(Box::new(|event: &PokerEvent| print_event(event)));

    let mut policy = ProbabilityTablePolicy::new(
        StreetWeights::default(),
        DeterministicRng::from_seed(seed.wrapping_add(1)),
    );

    for _ in 0..MAX_ROUNDS {
        let mut status = match manager.start_next_round() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("[CLI] start_next_round: {e}");
                break;
            }
        };

        while let MatchStatus::RoundInProgress = status {
            let Some(ctx) = manager.decision_context() else {
                eprintln!("[CLI] нет игрока для хода");
                return;
            };
            let kind = policy.decide(&ctx);
            status = match manager.submit_action(PlayerAction::new(ctx.player_id, kind)) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("[CLI] действие {kind:?} отклонено: {e}");
                    return;
                }
            };
        }

        match status {
            MatchStatus::RoundFinished(summary) => {
                println!(
                    "--- раунд {} окончен: победители {:?}, банк {} ---",
                    summary.round_id, summary.winners, summary.total_pot
                );
            }
            MatchStatus::MatchOver { winner, .. } => {
                println!("=== матч окончен, победитель: игрок {winner} ===");
                break;
            }
            MatchStatus::RoundInProgress => unreachable!(),
        }
    }

    println!("Сыграно раундов: {}", manager.rounds_played());
    for p in &manager.table().players {
        println!("  {} (id={}): {}", p.name, p.id, p.stack);
    }
}

fn print_event(event: &PokerEvent) {
    match event {
        PokerEvent::RoundStarted {
            round_id,
            dealer,
            forced_bet,
            ..
        } => println!("[round {round_id}] дилер {dealer}, блайнд {forced_bet}"),
        PokerEvent::BlindIncreased { before, after } => {
            println!("[blinds] {before} -> {after}")
        }
        PokerEvent::StreetChanged { street, board } => {
            let cards: Vec<String> = board.iter().map(ToString::to_string).collect();
            println!("[{street:?}] борд: {}", cards.join(" "));
        }
        PokerEvent::ActionChosen { player_id, action } => {
            println!("  игрок {player_id}: {action:?}")
        }
        PokerEvent::RoundFinished {
            winners, total_pot, ..
        } => println!("  банк {total_pot} -> {winners:?}"),
        PokerEvent::PlayerEliminated { player_id } => println!("[out] игрок {player_id}"),
        PokerEvent::MatchEnd { winner } => println!("[end] победитель {winner}"),
        _ => {}
    }
}
