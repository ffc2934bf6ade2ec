//! Bonus drops and power-up inventory
//!
//! A zap rains coins onto random cells; more lit pins means more and bigger
//! coins. Each power-up kind also has its own chance to drop. Landed drops
//! wait on their cell until a resolve pass marks it, then go to the side
//! whose frontier reached it.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::resolver::Resolution;
use crate::rng::SimpleRng;
use crate::types::{CoinKind, Marking, PowerUpKind, Side};

/// Tries at finding a free cell before stacking drops
const PLACEMENT_ATTEMPTS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropKind {
    Coin(CoinKind),
    PowerUp(PowerUpKind),
}

impl DropKind {
    pub fn points(self) -> u32 {
        match self {
            DropKind::Coin(coin) => coin.points(),
            DropKind::PowerUp(_) => 0,
        }
    }
}

/// A coin or power-up bound to a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BonusDrop {
    pub x: usize,
    pub y: usize,
    pub kind: DropKind,
}

/// Coin counts (ones, twos, fives) for a zap lighting the given pins
pub fn coin_counts(left_pins: usize, right_pins: usize) -> (usize, usize, usize) {
    let mut ones = 2;
    let mut twos = 0;
    let mut fives = 0;
    for pins in [left_pins, right_pins] {
        if pins > 6 {
            ones += 1;
            twos += 3;
            fives += pins - 6;
        } else if pins > 3 {
            ones += 1;
            twos += pins - 3;
        }
    }
    (ones, twos, fives)
}

/// Roll the drops for one zap onto interior cells of `grid`
pub fn roll_drops(grid: &Grid, left_pins: usize, right_pins: usize, rng: &mut SimpleRng) -> Vec<BonusDrop> {
    let (ones, twos, fives) = coin_counts(left_pins, right_pins);
    let mut kinds: Vec<DropKind> = std::iter::repeat(DropKind::Coin(CoinKind::One))
        .take(ones)
        .chain(std::iter::repeat(DropKind::Coin(CoinKind::Two)).take(twos))
        .chain(std::iter::repeat(DropKind::Coin(CoinKind::Five)).take(fives))
        .collect();
    for kind in PowerUpKind::ALL {
        if rng.next_range(kind.drop_freq()) == 0 {
            kinds.push(DropKind::PowerUp(kind));
        }
    }

    let columns = grid.interior_columns();
    let width = columns.len() as u32;
    let height = grid.height() as u32;
    let mut drops: Vec<BonusDrop> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let mut attempts = 0;
        let (x, y) = loop {
            let x = columns.start + rng.next_range(width) as usize;
            let y = rng.next_range(height) as usize;
            let taken = drops.iter().any(|d| d.x == x && d.y == y);
            if !taken || attempts >= PLACEMENT_ATTEMPTS {
                break (x, y);
            }
            attempts += 1;
        };
        drops.push(BonusDrop { x, y, kind });
    }
    drops
}

/// Power-ups held by one side; at most one of each kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerUpInventory {
    pub bomb: bool,
    pub cross: bool,
    pub arrow: bool,
}

impl PowerUpInventory {
    fn slot(&mut self, kind: PowerUpKind) -> &mut bool {
        match kind {
            PowerUpKind::Bomb => &mut self.bomb,
            PowerUpKind::Cross => &mut self.cross,
            PowerUpKind::Arrow => &mut self.arrow,
        }
    }

    pub fn has(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Bomb => self.bomb,
            PowerUpKind::Cross => self.cross,
            PowerUpKind::Arrow => self.arrow,
        }
    }

    pub fn grant(&mut self, kind: PowerUpKind) {
        *self.slot(kind) = true;
    }

    /// Consume `kind`; false if it was not held
    pub fn take(&mut self, kind: PowerUpKind) -> bool {
        std::mem::replace(self.slot(kind), false)
    }
}

/// What one collection pass picked up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub left_points: u32,
    pub right_points: u32,
    pub power_ups: Vec<(Side, PowerUpKind)>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.left_points == 0 && self.right_points == 0 && self.power_ups.is_empty()
    }
}

/// Take every landed drop whose cell is marked; the rest stay put
pub fn collect(landed: &mut Vec<BonusDrop>, res: &Resolution) -> Collection {
    let mut out = Collection::default();
    landed.retain(|drop| {
        let side = match res.marking(drop.x, drop.y) {
            Marking::LeftOnly | Marking::Ok => Side::Left,
            Marking::RightOnly => Side::Right,
            Marking::None => return true,
        };
        match (side, drop.kind) {
            (Side::Left, DropKind::Coin(c)) => out.left_points += c.points(),
            (Side::Right, DropKind::Coin(c)) => out.right_points += c.points(),
            (side, DropKind::PowerUp(kind)) => out.power_ups.push((side, kind)),
        }
        false
    });
    out
}
