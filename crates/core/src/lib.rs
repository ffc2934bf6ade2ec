//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains the board rules, the phase machine and everything the
//! machine drives. It has **zero dependencies** on rendering, audio, or I/O,
//! which keeps it:
//!
//! - **Deterministic**: the same seed and command stream produce the same game
//! - **Testable**: every rule is reachable from a plain function or a tick
//! - **Portable**: any front end can read the published [`RenderSnapshot`]
//!
//! # Module Structure
//!
//! - [`grid`]: W×H board with pin columns, tiles and placement operations
//! - [`rng`]: LCG and the tile-generation policy
//! - [`resolver`]: dual-origin connectivity markings
//! - [`gravity`]: removal patterns, column compaction, cascade guard
//! - [`scoring`]: pin multipliers and the two counters
//! - [`bonus`]: coin and power-up drops, inventories, collection
//! - [`animation`]: pooled cosmetic effects with freeze priority
//! - [`game_state`]: the phase machine tying it all together
//! - [`snapshot`] / [`events`]: the outputs
//! - [`config`]: defaults, JSON and environment overrides
//!
//! # Example
//!
//! ```
//! use zapzap_core::{GameState, Grid, SimConfig, Tile, TileSource};
//! use zapzap_core::types::{Command, Marking, Phase, Shape, TICK_MS};
//!
//! // Pins at columns 0 and 4; the middle straight stands upright
//! let grid = Grid::filled(5, 1, |x, _| Tile::new(Shape::Straight, if x == 2 { 1 } else { 0 }));
//! let mut game = GameState::with_grid(SimConfig::default(), grid, TileSource::fixed(Tile::new(Shape::Cross, 0)));
//! assert_eq!(game.marking(2, 0), Marking::None);
//!
//! game.handle(Command::Tap { x: 2, y: 0 }).unwrap();
//! while game.phase() == Phase::RotatingTile {
//!     game.tick(TICK_MS);
//! }
//! assert_eq!(game.marking(2, 0), Marking::Ok);
//! assert_eq!(game.phase(), Phase::FreezeDuringZap);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed time (nominally [`types::TICK_MS`]). A freeze phase suspends every
//! other timer until it ends.

pub mod animation;
pub mod bonus;
pub mod config;
pub mod events;
pub mod game_state;
pub mod gravity;
pub mod grid;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use zapzap_types as types;

// Re-export commonly used types for convenience
pub use animation::{Completion, Coordinator, Effect, EffectGate, EffectKind, Handle, PoolOverflow};
pub use bonus::{BonusDrop, DropKind, PowerUpInventory};
pub use config::SimConfig;
pub use events::GameEvent;
pub use game_state::{BotJob, GameState, Rejection};
pub use gravity::{settle, CascadeGuard, Fall};
pub use grid::{Cell, Grid, GridError, Tile};
pub use resolver::{resolve, resolve_with, Resolution};
pub use rng::{SimpleRng, TileSource};
pub use scoring::{PinMultipliers, Scores};
pub use snapshot::{RenderSnapshot, Sprite, TileView};
