//! Gravity module - removal patterns, column compaction and refill
//!
//! Logical positions change instantly; the returned [`Fall`] plan only tells
//! the animation layer where each tile appears to come from.

use crate::grid::{Cell, Grid, GridError};
use crate::rng::TileSource;
use crate::types::PowerUpKind;

/// Cosmetic movement of one tile after compaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fall {
    pub column: usize,
    /// Visual start row; negative for tiles spawned above the board
    pub from_row: f32,
    pub to_row: usize,
    pub spawned: bool,
}

/// Cells cleared by a power-up centred on (x, y), clipped to the interior
///
/// Cross clears nothing; it converts the target instead.
pub fn power_up_cells(grid: &Grid, kind: PowerUpKind, x: usize, y: usize, radius: usize) -> Vec<(usize, usize)> {
    if !grid.is_interior(x, y) {
        return Vec::new();
    }
    match kind {
        PowerUpKind::Bomb => {
            let cols = x.saturating_sub(radius).max(1)..=(x + radius).min(grid.width() - 2);
            let rows = y.saturating_sub(radius)..=(y + radius).min(grid.height() - 1);
            cols.flat_map(|cx| rows.clone().map(move |cy| (cx, cy))).collect()
        }
        PowerUpKind::Arrow => (0..grid.height()).map(|cy| (x, cy)).collect(),
        PowerUpKind::Cross => Vec::new(),
    }
}

/// Vacate every listed cell; returns how many tiles were removed
pub fn remove_cells(grid: &mut Grid, cells: &[(usize, usize)]) -> usize {
    cells
        .iter()
        .filter(|&&(x, y)| matches!(grid.remove(x, y), Ok(Some(_))))
        .count()
}

/// Compact every interior column downward and refill from `source`
pub fn settle(grid: &mut Grid, source: &mut TileSource) -> Result<Vec<Fall>, GridError> {
    let mut falls = Vec::new();
    for x in grid.interior_columns() {
        let empty = compact_column(grid.column_mut(x), x, &mut falls);
        for k in 0..empty {
            let tile = source.next_tile();
            let row = grid.spawn_at_top(x, tile.shape, tile.rotation())?;
            debug_assert_eq!(row, empty - 1 - k);
            falls.push(Fall {
                column: x,
                from_row: row as f32 - empty as f32,
                to_row: row,
                spawned: true,
            });
        }
    }
    Ok(falls)
}

/// Shift tiles down over empty cells; returns the number of empty top slots
fn compact_column(col: &mut [Cell], x: usize, falls: &mut Vec<Fall>) -> usize {
    let mut write = col.len();
    for read in (0..col.len()).rev() {
        if let Cell::Tile(tile) = col[read] {
            write -= 1;
            if write != read {
                col[write] = Cell::Tile(tile);
                col[read] = Cell::Empty;
                falls.push(Fall {
                    column: x,
                    from_row: read as f32,
                    to_row: write,
                    spawned: false,
                });
            }
        }
    }
    write
}

/// Bounds consecutive zap cycles without player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeGuard {
    depth: u32,
    cap: u32,
}

impl CascadeGuard {
    pub fn new(cap: u32) -> Self {
        Self { depth: 0, cap: cap.max(1) }
    }

    /// Count one more cycle; false once the cap is reached
    pub fn step(&mut self) -> bool {
        if self.depth >= self.cap {
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use crate::types::Shape;

    fn numbered(y: usize) -> Tile {
        // Encode the original row in the tile so moves are observable
        Tile::new(Shape::Elbow, y as u8)
    }

    #[test]
    fn test_compaction_shifts_by_removed_below() {
        let mut grid = Grid::filled(3, 4, |_, y| numbered(y));
        grid.remove(1, 2).unwrap();
        let mut source = TileSource::fixed(Tile::new(Shape::Cross, 0));

        let falls = settle(&mut grid, &mut source).unwrap();

        assert_eq!(grid.tile(1, 3), Some(numbered(3)));
        assert_eq!(grid.tile(1, 2), Some(numbered(1)));
        assert_eq!(grid.tile(1, 1), Some(numbered(0)));
        assert_eq!(grid.tile(1, 0), Some(Tile::new(Shape::Cross, 0)));
        assert!(grid.is_full());

        let moved: Vec<_> = falls.iter().filter(|f| !f.spawned).collect();
        assert_eq!(moved.len(), 2);
        assert!(moved.iter().all(|f| f.to_row as f32 - f.from_row == 1.0));
        let spawned: Vec<_> = falls.iter().filter(|f| f.spawned).collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].to_row, 0);
        assert_eq!(spawned[0].from_row, -1.0);
    }

    #[test]
    fn test_full_column_refill_stacks_upward() {
        let mut grid = Grid::filled(3, 3, |_, y| numbered(y));
        for y in 0..3 {
            grid.remove(1, y).unwrap();
        }
        let mut source = TileSource::fixed(Tile::new(Shape::Tee, 2));
        let falls = settle(&mut grid, &mut source).unwrap();
        assert!(grid.is_full());
        let rows: Vec<_> = falls.iter().map(|f| (f.to_row, f.from_row)).collect();
        assert_eq!(rows, vec![(2, -1.0), (1, -2.0), (0, -3.0)]);
    }

    #[test]
    fn test_settle_without_gaps_is_noop() {
        let mut grid = Grid::filled(6, 4, |x, y| Tile::new(Shape::Tee, (x + y) as u8));
        let before = grid.clone();
        let falls = settle(&mut grid, &mut TileSource::random(1, 3)).unwrap();
        assert!(falls.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_bomb_is_clipped_to_interior() {
        let grid = Grid::filled(12, 10, |_, _| numbered(0));
        let cells = power_up_cells(&grid, PowerUpKind::Bomb, 1, 0, 2);
        // Columns 1..=3, rows 0..=2
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|&(x, _)| x >= 1 && x <= 10));

        let centre = power_up_cells(&grid, PowerUpKind::Bomb, 5, 5, 2);
        assert_eq!(centre.len(), 25);
    }

    #[test]
    fn test_arrow_clears_column_and_cross_clears_nothing() {
        let mut grid = Grid::filled(5, 4, |_, y| numbered(y));
        let cells = power_up_cells(&grid, PowerUpKind::Arrow, 2, 1, 2);
        assert_eq!(cells, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(remove_cells(&mut grid, &cells), 4);
        assert_eq!(grid.empty_in_column(2), 4);

        assert!(power_up_cells(&grid, PowerUpKind::Cross, 2, 1, 2).is_empty());
        assert!(power_up_cells(&grid, PowerUpKind::Bomb, 0, 1, 2).is_empty());
    }

    #[test]
    fn test_cascade_guard_caps() {
        let mut guard = CascadeGuard::new(3);
        assert!(guard.step());
        assert!(guard.step());
        assert!(guard.step());
        assert!(!guard.step());
        assert_eq!(guard.depth(), 3);
        guard.reset();
        assert!(guard.step());
    }
}
