//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! Everything here is plain data: usable from the core state machine, the bot
//! engine, and any presentation layer that reads snapshots.
//!
//! # Board Dimensions
//!
//! The legacy board is 12 columns by 10 rows. Column 0 and column 11 are the
//! immutable pin columns; columns 1..=10 hold rotatable tiles.
//!
//! # Connector Masks
//!
//! Tile edges are encoded as a 4-bit mask:
//!
//! | Edge | Bit |
//! |------|-----|
//! | North | `0b0001` |
//! | East | `0b0010` |
//! | South | `0b0100` |
//! | West | `0b1000` |
//!
//! A clockwise quarter turn maps N→E→S→W→N, which is a left rotation of the
//! 4-bit field.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 Hz) |
//! | `ROTATE_ANIM_MS` | 200 | Visual tile rotation |
//! | `FREEZE_ZAP_MS` | 2000 | Freeze after a zap is confirmed |
//! | `FREEZE_BOMB_MS` | 1000 | Freeze after a power-up detonates |
//! | `BOT_DELAY_MIN_MS` / `BOT_DELAY_MAX_MS` | 1000 / 2000 | Bot "thinking" delay |
//!
//! # Examples
//!
//! ```
//! use zapzap_types::{Direction, Shape, Side};
//!
//! assert_eq!(Direction::North.rotate_cw(), Direction::East);
//! assert_eq!(Direction::West.opposite(), Direction::East);
//! assert_eq!(Shape::Straight.mask(), Direction::East.bit() | Direction::West.bit());
//! assert_eq!(Side::Left.other(), Side::Right);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells, pin columns included (12 columns)
pub const BOARD_WIDTH: usize = 12;

/// Board height in cells (10 rows)
pub const BOARD_HEIGHT: usize = 10;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 Hz)
pub const TICK_MS: u32 = 16;

/// Duration of the cosmetic tile rotation
pub const ROTATE_ANIM_MS: u32 = 200;

/// Freeze after a zap, while the circuit is shown
pub const FREEZE_ZAP_MS: u32 = 2000;

/// Freeze after a bomb/arrow/cross detonation
pub const FREEZE_BOMB_MS: u32 = 1000;

/// Lower bound of the randomized bot delay
pub const BOT_DELAY_MIN_MS: u32 = 1000;

/// Upper bound of the randomized bot delay
pub const BOT_DELAY_MAX_MS: u32 = 2000;

/// Lifetime of a particle burst effect
pub const PARTICLE_BURST_MS: u32 = 800;

/// Lifetime of a floating score text
pub const FLOATING_TEXT_MS: u32 = 1000;

/// Percentage of dead-end ("missing link") tiles tolerated by the generator
pub const DEFAULT_MISSING_LINKS: u32 = 3;

/// First side to reach this score wins a VsBot game
pub const VS_BOT_SCORE_LIMIT: u32 = 100;

/// Bomb power-up clears a square of this radius around the target
pub const BOMB_RADIUS: usize = 2;

/// Tile edge with its connector bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four edges in mask-bit order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Connector bit for this edge
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::East => 0b0010,
            Direction::South => 0b0100,
            Direction::West => 0b1000,
        }
    }

    /// The edge a neighbour must expose for a wire to cross this one
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Rotate clockwise (90°)
    pub const fn rotate_cw(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Cell offset (dx, dy) toward this edge; y grows downward
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Rotate a 4-bit connector mask clockwise by `turns` quarter turns
///
/// # Examples
///
/// ```
/// use zapzap_types::rotate_mask;
///
/// assert_eq!(rotate_mask(0b0001, 1), 0b0010); // N -> E
/// assert_eq!(rotate_mask(0b1000, 1), 0b0001); // W -> N
/// assert_eq!(rotate_mask(0b0011, 4), 0b0011);
/// ```
pub const fn rotate_mask(mask: u8, turns: u8) -> u8 {
    let mask = mask & 0x0F;
    let t = turns % 4;
    ((mask << t) | (mask >> (4 - t))) & 0x0F
}

/// Tile shapes with their intrinsic connector masks (rotation 0)
///
/// - **Straight**: East + West, a horizontal wire
/// - **Elbow**: North + East
/// - **Tee**: East + South + West
/// - **Cross**: all four edges
/// - **DeadEnd**: East only, a "missing link"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Straight,
    Elbow,
    Tee,
    Cross,
    DeadEnd,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Straight,
        Shape::Elbow,
        Shape::Tee,
        Shape::Cross,
        Shape::DeadEnd,
    ];

    /// Intrinsic mask at rotation 0
    pub const fn mask(self) -> u8 {
        match self {
            Shape::Straight => 0b1010,
            Shape::Elbow => 0b0011,
            Shape::Tee => 0b1110,
            Shape::Cross => 0b1111,
            Shape::DeadEnd => 0b0010,
        }
    }

    /// Number of distinct orientations (rotations beyond this repeat a mask)
    pub const fn distinct_rotations(self) -> u8 {
        match self {
            Shape::Cross => 1,
            Shape::Straight => 2,
            Shape::Elbow | Shape::Tee | Shape::DeadEnd => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Straight => "straight",
            Shape::Elbow => "elbow",
            Shape::Tee => "tee",
            Shape::Cross => "cross",
            Shape::DeadEnd => "dead_end",
        }
    }
}

/// Pin side (also used for the two score counters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Edge through which a pin on this side feeds the board
    ///
    /// The left pin touches column 1 on that tile's West edge.
    pub const fn pin_edge(self) -> Direction {
        match self {
            Side::Left => Direction::West,
            Side::Right => Direction::East,
        }
    }
}

/// Per-cell reachability classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Marking {
    #[default]
    None,
    LeftOnly,
    RightOnly,
    Ok,
}

impl Marking {
    /// Combine the two frontier results for one cell
    pub const fn from_reach(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, true) => Marking::Ok,
            (true, false) => Marking::LeftOnly,
            (false, true) => Marking::RightOnly,
            (false, false) => Marking::None,
        }
    }

    pub const fn is_reached(self) -> bool {
        !matches!(self, Marking::None)
    }
}

/// Simulation phase; exactly one is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    WaitingForInput,
    RotatingTile,
    ResolvingConnections,
    FreezeDuringZap,
    RemovingAndFalling,
    FreezeDuringBomb,
    FallingBonuses,
    GameOver,
}

impl Phase {
    pub const fn is_freeze(self) -> bool {
        matches!(self, Phase::FreezeDuringZap | Phase::FreezeDuringBomb)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::WaitingForInput => "waiting_for_input",
            Phase::RotatingTile => "rotating_tile",
            Phase::ResolvingConnections => "resolving_connections",
            Phase::FreezeDuringZap => "freeze_during_zap",
            Phase::RemovingAndFalling => "removing_and_falling",
            Phase::FreezeDuringBomb => "freeze_during_bomb",
            Phase::FallingBonuses => "falling_bonuses",
            Phase::GameOver => "game_over",
        }
    }
}

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Single player; every point goes to both counters
    #[default]
    Zen,
    /// Player (left) versus bot (right), separate counters
    VsBot,
}

impl GameMode {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zen" => Some(GameMode::Zen),
            "vsbot" | "vs_bot" | "bot" => Some(GameMode::VsBot),
            _ => None,
        }
    }
}

/// Sound identifiers emitted for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEvent {
    /// A tile started rotating
    Rotate,
    /// Falling tiles came to rest
    Settle,
    /// A circuit closed
    Zap,
    /// The zapped chain was removed
    Explode,
    /// A bomb or arrow detonated
    Bomb,
    /// Coins were scored
    CoinDrop,
    /// A power-up was collected or applied
    PowerUp,
    /// A command was rejected
    Rejected,
}

/// Power-ups collected from bonus drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Clears a square around the target
    Bomb,
    /// Turns the target into a four-way tile
    Cross,
    /// Clears the whole target column
    Arrow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Bomb, PowerUpKind::Cross, PowerUpKind::Arrow];

    /// Drop chance denominator: a bomb drops with probability 1/5
    pub const fn drop_freq(self) -> u32 {
        match self {
            PowerUpKind::Bomb => 5,
            PowerUpKind::Cross => 3,
            PowerUpKind::Arrow => 8,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bomb" => Some(PowerUpKind::Bomb),
            "cross" => Some(PowerUpKind::Cross),
            "arrow" => Some(PowerUpKind::Arrow),
            _ => None,
        }
    }
}

/// Coin denominations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinKind {
    One,
    Two,
    Five,
}

impl CoinKind {
    pub const fn points(self) -> u32 {
        match self {
            CoinKind::One => 1,
            CoinKind::Two => 2,
            CoinKind::Five => 5,
        }
    }
}

/// Commands accepted by the simulation
///
/// Player input and the bot's synthetic moves share this one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Rotate the tile at (x, y) once, or apply an armed power-up there
    Tap { x: usize, y: usize },
    /// Enable or disable the automated opponent
    SetAutomatedOpponent(bool),
    /// Start a fresh board from `seed`
    Reset { seed: u32 },
    /// Arm (or disarm) a power-up held by `side`; the next tap applies it
    ArmPowerUp { kind: PowerUpKind, side: Side },
    /// Bot move computed against `generation`
    BotTap {
        x: usize,
        y: usize,
        turns: u8,
        generation: u64,
    },
}
