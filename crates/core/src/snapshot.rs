//! Render snapshot published at the end of each tick
//!
//! Positions are in cell units: `x` is the column, `y` the row (0 at the
//! top). A renderer scales them to pixels. The snapshot owns plain data only,
//! so holding one never keeps simulation state alive.

use serde::Serialize;

use crate::bonus::{DropKind, PowerUpInventory};
use crate::scoring::Scores;
use crate::types::{GameMode, Marking, Phase, PowerUpKind, Shape, Side};

/// What to draw for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sprite {
    Pin(Side),
    Tile { shape: Shape, rotation: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileView {
    pub column: usize,
    pub row: usize,
    pub x: f32,
    pub y: f32,
    /// Radians, clockwise
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
    pub sprite: Sprite,
    pub marking: Marking,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropView {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub kind: DropKind,
    pub landed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextView {
    pub x: f32,
    pub y: f32,
    pub value: u32,
    pub side: Side,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BurstView {
    pub x: usize,
    pub y: usize,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub width: usize,
    pub height: usize,
    /// Pins first, then live tiles in column-major order
    pub tiles: Vec<TileView>,
    pub drops: Vec<DropView>,
    pub texts: Vec<TextView>,
    pub bursts: Vec<BurstView>,
    pub scores: Scores,
    pub phase: Phase,
    pub mode: GameMode,
    pub generation: u64,
    pub left_power: PowerUpInventory,
    pub right_power: PowerUpInventory,
    pub armed: Option<(PowerUpKind, Side)>,
    pub automated_opponent: bool,
}

impl RenderSnapshot {
    /// Empty the lists while keeping their buffers
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.drops.clear();
        self.texts.clear();
        self.bursts.clear();
        self.scores = Scores::default();
        self.phase = Phase::WaitingForInput;
        self.generation = 0;
        self.armed = None;
    }

    pub fn tile(&self, column: usize, row: usize) -> Option<&TileView> {
        self.tiles.iter().find(|t| t.column == column && t.row == row)
    }
}

impl Default for RenderSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            tiles: Vec::new(),
            drops: Vec::new(),
            texts: Vec::new(),
            bursts: Vec::new(),
            scores: Scores::default(),
            phase: Phase::WaitingForInput,
            mode: GameMode::default(),
            generation: 0,
            left_power: PowerUpInventory::default(),
            right_power: PowerUpInventory::default(),
            armed: None,
            automated_opponent: false,
        }
    }
}
