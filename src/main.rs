//! Headless ZapZap runner (default binary).
//!
//! Drives the simulation at the fixed tick for a set duration, optionally with
//! the automated opponent on a background worker, and prints the final state.
//! Set `RUST_LOG=debug` to follow every event.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use zapzap::cli::{load_config, parse_run_args, RunArgs};
use zapzap::core::{GameEvent, GameState};
use zapzap::engine::{BotWorker, NoOpponent, Opponent, Session};
use zapzap::types::{Phase, TICK_MS};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = parse_run_args(&args)?;
    let config = load_config(&run)?;
    log::info!(
        "starting {}x{} board, seed {}, {:?}",
        config.width,
        config.height,
        config.seed,
        config.mode
    );

    let state = GameState::new(config);
    if state.automated_opponent() {
        let worker = BotWorker::start().context("failed to start bot worker")?;
        drive(Session::new(state, worker), &run)
    } else {
        drive(Session::new(state, NoOpponent), &run)
    }
}

fn drive<O: Opponent>(mut session: Session<O>, run: &RunArgs) -> Result<()> {
    let tick = Duration::from_millis(TICK_MS as u64);

    for _ in 0..run.duration_ms.div_ceil(TICK_MS) {
        let started = Instant::now();
        session.step();

        for event in session.drain_events() {
            match event {
                GameEvent::ScoreChanged { left, right } => log::info!("score {} / {}", left, right),
                GameEvent::GameOver { winner } => log::info!("game over, winner {:?}", winner),
                other => log::debug!("{:?}", other),
            }
        }
        if session.state().phase() == Phase::GameOver {
            break;
        }

        if run.realtime {
            if let Some(rest) = tick.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    let snapshot = session.snapshot();
    if run.dump {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        println!(
            "phase={} generation={} left={} right={}",
            snapshot.phase.as_str(),
            snapshot.generation,
            snapshot.scores.left,
            snapshot.scores.right
        );
    }
    Ok(())
}
