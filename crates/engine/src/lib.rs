//! Automated opponent and session driver
//!
//! - [`bot`]: exhaustive single-rotation search over board copies
//! - [`worker`]: runs the search off the tick thread behind the [`Opponent`] seam
//! - [`session`]: fixed-tick loop wiring a [`GameState`](zapzap_core::GameState) to an opponent

pub mod bot;
pub mod session;
pub mod worker;

pub use bot::{evaluate, evaluate_job, heuristic, BotCandidate, BotReply};
pub use session::Session;
pub use worker::{BotWorker, InlineOpponent, NoOpponent, Opponent};
