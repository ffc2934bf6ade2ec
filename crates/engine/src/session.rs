//! Fixed-rate session driver
//!
//! One [`Session::step`] is one tick: deliver finished bot replies, advance
//! the game, hand out a new evaluation job if the bot is due, then publish
//! the snapshot.

use std::sync::Arc;

use zapzap_core::types::{Command, TICK_MS};
use zapzap_core::{GameEvent, GameState, Rejection, RenderSnapshot};

use crate::worker::Opponent;

pub struct Session<O: Opponent> {
    state: GameState,
    opponent: O,
    published: Arc<RenderSnapshot>,
}

impl<O: Opponent> Session<O> {
    pub fn new(state: GameState, opponent: O) -> Self {
        let mut published = Arc::new(RenderSnapshot::default());
        state.publish(&mut published);
        Self {
            state,
            opponent,
            published,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn opponent(&self) -> &O {
        &self.opponent
    }

    /// Latest published snapshot; cheap to clone and safe to keep
    pub fn snapshot(&self) -> Arc<RenderSnapshot> {
        Arc::clone(&self.published)
    }

    pub fn handle(&mut self, command: Command) -> Result<(), Rejection> {
        self.state.handle(command)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events().collect()
    }

    /// Run one fixed tick
    pub fn step(&mut self) {
        while let Some(reply) = self.opponent.poll() {
            if let Some(command) = reply.to_command() {
                // Stale replies are dropped inside the state machine
                let _ = self.state.handle(command);
            }
        }

        self.state.tick(TICK_MS);

        if let Some(job) = self.state.take_bot_job() {
            self.opponent.request(job);
        }

        self.state.publish(&mut self.published);
    }

    /// Run whole ticks covering `ms`
    pub fn run_for(&mut self, ms: u32) {
        for _ in 0..ms.div_ceil(TICK_MS) {
            self.step();
        }
    }
}
