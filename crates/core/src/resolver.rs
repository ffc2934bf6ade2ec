//! Connection resolver - dual-origin reachability over the grid
//!
//! Two frontiers grow independently: one seeded from the left pin column, one
//! from the right. A wire crosses between two cells only if both cells expose
//! a connector on the shared edge. Markings are always recomputed from
//! scratch; nothing here keeps state between calls.
//!
//! Propagation uses an explicit work queue, so board size never affects stack
//! depth.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::grid::{Cell, Grid};
use crate::types::{Direction, Marking, Side};

/// Result of one resolve pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: usize,
    height: usize,
    /// Column-major, same layout as the grid; pin cells included
    markings: Vec<Marking>,
    left_reach: usize,
    right_reach: usize,
}

impl Resolution {
    /// Resolution with nothing reached
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            markings: vec![Marking::None; width * height],
            left_reach: 0,
            right_reach: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Marking at (x, y); None outside the board
    pub fn marking(&self, x: usize, y: usize) -> Marking {
        if x < self.width && y < self.height {
            self.markings[x * self.height + y]
        } else {
            Marking::None
        }
    }

    /// Markings in column-major order
    pub fn markings(&self) -> &[Marking] {
        &self.markings
    }

    /// A zap exists iff some interior cell is reached from both sides
    pub fn is_zap(&self) -> bool {
        self.interior().any(|m| m == Marking::Ok)
    }

    /// Number of interior cells carrying `marking`
    pub fn count(&self, marking: Marking) -> usize {
        self.interior().filter(|&m| m == marking).count()
    }

    /// Interior cells in the closed circuit
    pub fn ok_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let h = self.height;
        (1..self.width.saturating_sub(1))
            .flat_map(move |x| (0..h).map(move |y| (x, y)))
            .filter(move |&(x, y)| self.marking(x, y) == Marking::Ok)
    }

    /// Whether the pin at `row` on `side` is lit
    pub fn pin_lit(&self, side: Side, row: usize) -> bool {
        let x = match side {
            Side::Left => 0,
            Side::Right => self.width - 1,
        };
        self.marking(x, row) == Marking::Ok
    }

    /// Rows whose pin on `side` is lit, top to bottom
    pub fn lit_pins(&self, side: Side) -> impl Iterator<Item = usize> + '_ {
        (0..self.height).filter(move |&y| self.pin_lit(side, y))
    }

    pub fn lit_pin_count(&self) -> usize {
        self.lit_pins(Side::Left).count() + self.lit_pins(Side::Right).count()
    }

    /// Columns the left frontier advanced inward (0 if it never started)
    pub fn left_reach(&self) -> usize {
        self.left_reach
    }

    /// Columns the right frontier advanced inward (0 if it never started)
    pub fn right_reach(&self) -> usize {
        self.right_reach
    }

    fn interior(&self) -> impl Iterator<Item = Marking> + '_ {
        let h = self.height;
        let end = self.width.saturating_sub(1) * h;
        self.markings[h.min(end)..end].iter().copied()
    }
}

/// Resolve with breadth-first frontier order
pub fn resolve(grid: &Grid) -> Resolution {
    resolve_with(grid, |_| 0)
}

/// Resolve, letting `pick` choose which queued cell expands next
///
/// `pick(len)` returns an index into the pending queue (taken modulo `len`).
/// The result does not depend on the choices made.
pub fn resolve_with(grid: &Grid, mut pick: impl FnMut(usize) -> usize) -> Resolution {
    let (w, h) = (grid.width(), grid.height());
    let left = flood(grid, Side::Left, &mut pick);
    let right = flood(grid, Side::Right, &mut pick);

    let mut markings = vec![Marking::None; w * h];
    let mut left_max = None;
    let mut right_min = None;
    for x in grid.interior_columns() {
        for y in 0..h {
            let i = x * h + y;
            markings[i] = Marking::from_reach(left[i], right[i]);
            if left[i] {
                left_max = Some(left_max.map_or(x, |m: usize| m.max(x)));
            }
            if right[i] {
                right_min = Some(right_min.map_or(x, |m: usize| m.min(x)));
            }
        }
    }

    // Pins light up when the neighbouring tile is in the circuit and wired to them
    for y in 0..h {
        for side in [Side::Left, Side::Right] {
            let (pin_x, tile_x) = match side {
                Side::Left => (0, 1),
                Side::Right => (w - 1, w - 2),
            };
            let wired = grid.mask(tile_x, y) & side.pin_edge().bit() != 0;
            if wired && markings[tile_x * h + y] == Marking::Ok {
                markings[pin_x * h + y] = Marking::Ok;
            }
        }
    }

    Resolution {
        width: w,
        height: h,
        markings,
        left_reach: left_max.unwrap_or(0),
        right_reach: right_min.map_or(0, |m| w - 1 - m),
    }
}

fn flood(grid: &Grid, side: Side, pick: &mut impl FnMut(usize) -> usize) -> Vec<bool> {
    let (w, h) = (grid.width(), grid.height());
    let mut seen = vec![false; w * h];
    let mut queue = VecDeque::new();

    let seed_x = match side {
        Side::Left => 1,
        Side::Right => w - 2,
    };
    let edge = side.pin_edge().bit();
    for y in 0..h {
        if matches!(grid.get(seed_x, y), Some(Cell::Tile(_))) && grid.mask(seed_x, y) & edge != 0 {
            seen[seed_x * h + y] = true;
            queue.push_back((seed_x, y));
        }
    }

    while !queue.is_empty() {
        let at = pick(queue.len()) % queue.len();
        let Some((x, y)) = queue.swap_remove_back(at) else {
            break;
        };
        for (nx, ny) in links(grid, x, y) {
            let i = nx * h + ny;
            if !seen[i] {
                seen[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    seen
}

/// Interior tiles that share a matched wire with (x, y)
pub fn links(grid: &Grid, x: usize, y: usize) -> ArrayVec<(usize, usize), 4> {
    let mut out = ArrayVec::new();
    let mask = grid.mask(x, y);
    for dir in Direction::ALL {
        if mask & dir.bit() == 0 {
            continue;
        }
        let Some((nx, ny)) = grid.neighbor(x, y, dir) else {
            continue;
        };
        if !grid.is_interior(nx, ny) {
            continue;
        }
        if let Some(Cell::Tile(tile)) = grid.get(nx, ny) {
            if tile.has_connection(dir.opposite()) {
                out.push((nx, ny));
            }
        }
    }
    out
}
