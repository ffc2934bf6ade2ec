//! ZapZap board simulation (workspace facade crate).
//!
//! Re-exports the member crates under `zapzap::{core,engine,types}` and hosts
//! the command-line plumbing shared by the headless runner.

pub mod cli;

pub use zapzap_core as core;
pub use zapzap_engine as engine;
pub use zapzap_types as types;
