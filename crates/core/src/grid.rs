//! Grid module - tile data and placement operations
//!
//! The grid is W×H cells in a flat, column-major vector so column compaction
//! touches contiguous memory. Coordinates: (x, y) where x is the column
//! (0 = left pin column, W-1 = right pin column) and y is the row, 0 at the top.

use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::types::{rotate_mask, Direction, Shape, Side};

/// A rotatable tile: a shape plus a quarter-turn count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub shape: Shape,
    rotation: u8,
}

impl Tile {
    pub fn new(shape: Shape, rotation: u8) -> Self {
        Self {
            shape,
            rotation: rotation % 4,
        }
    }

    /// Canonical tile for a non-zero connector mask
    ///
    /// Returns the shape and the smallest rotation that produces `mask`.
    pub fn from_mask(mask: u8) -> Option<Self> {
        let mask = mask & 0x0F;
        Shape::ALL.iter().find_map(|&shape| {
            (0..shape.distinct_rotations())
                .find(|&r| rotate_mask(shape.mask(), r) == mask)
                .map(|r| Tile::new(shape, r))
        })
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Effective connector mask after rotation
    pub fn mask(&self) -> u8 {
        rotate_mask(self.shape.mask(), self.rotation)
    }

    pub fn has_connection(&self, dir: Direction) -> bool {
        self.mask() & dir.bit() != 0
    }

    /// Advance one clockwise quarter turn
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % 4;
    }

    /// Copy rotated by `turns` quarter turns
    pub fn rotated(mut self, turns: u8) -> Self {
        self.rotation = (self.rotation + turns % 4) % 4;
        self
    }

    /// Single-connector "missing link"
    pub fn is_dead_end(&self) -> bool {
        self.shape == Shape::DeadEnd
    }
}

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Immutable terminal in a pin column
    Pin(Side),
    Tile(Tile),
    /// Vacated by a removal, waiting for compaction
    Empty,
}

impl Cell {
    /// Connector mask; a pin always points into the board
    pub fn mask(&self) -> u8 {
        match self {
            Cell::Pin(side) => side.pin_edge().opposite().bit(),
            Cell::Tile(tile) => tile.mask(),
            Cell::Empty => 0,
        }
    }

    pub fn tile(&self) -> Option<Tile> {
        match self {
            Cell::Tile(tile) => Some(*tile),
            _ => None,
        }
    }
}

/// Grid operation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("({x}, {y}) is a pin column or outside the board")]
    InvalidPosition { x: usize, y: usize },
    #[error("({x}, {y}) holds no tile")]
    Empty { x: usize, y: usize },
}

impl GridError {
    pub fn code(self) -> &'static str {
        match self {
            GridError::InvalidPosition { .. } => "invalid_position",
            GridError::Empty { .. } => "empty_cell",
        }
    }
}

/// The board grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Column-major: index = x * height + y
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with pin columns and every interior cell empty
    ///
    /// Width is clamped to at least 3 (two pins plus one interior column),
    /// height to at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(3);
        let height = height.max(1);
        let mut cells = vec![Cell::Empty; width * height];
        for y in 0..height {
            cells[y] = Cell::Pin(Side::Left);
            cells[(width - 1) * height + y] = Cell::Pin(Side::Right);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Create a grid with every interior cell filled by `fill(x, y)`
    pub fn filled(width: usize, height: usize, mut fill: impl FnMut(usize, usize) -> Tile) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..grid.height {
            for x in grid.interior_columns() {
                let i = grid.index(x, y);
                grid.cells[i] = Cell::Tile(fill(x, y));
            }
        }
        grid
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns holding rotatable tiles
    pub fn interior_columns(&self) -> std::ops::Range<usize> {
        1..self.width - 1
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        y < self.height && x >= 1 && x < self.width - 1
    }

    /// Get cell at position (x, y); None if out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.in_bounds(x, y).then(|| self.cells[self.index(x, y)])
    }

    /// Tile at (x, y), if the cell holds one
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.get(x, y).and_then(|c| c.tile())
    }

    /// Connector mask at (x, y); 0 for empty or out-of-bounds cells
    pub fn mask(&self, x: usize, y: usize) -> u8 {
        self.get(x, y).map_or(0, |c| c.mask())
    }

    /// Neighbour coordinates across `dir`, if inside the board
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.in_bounds(nx, ny).then_some((nx, ny))
    }

    fn check_interior(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if self.is_interior(x, y) {
            Ok(self.index(x, y))
        } else {
            Err(GridError::InvalidPosition { x, y })
        }
    }

    /// Rotate the tile at (x, y) one quarter turn clockwise
    pub fn rotate(&mut self, x: usize, y: usize) -> Result<Tile, GridError> {
        let i = self.check_interior(x, y)?;
        match &mut self.cells[i] {
            Cell::Tile(tile) => {
                tile.rotate();
                Ok(*tile)
            }
            _ => Err(GridError::Empty { x, y }),
        }
    }

    /// Place `tile` at an interior cell, replacing whatever is there
    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) -> Result<(), GridError> {
        let i = self.check_interior(x, y)?;
        self.cells[i] = Cell::Tile(tile);
        Ok(())
    }

    /// Vacate an interior cell and return the tile it held
    pub fn remove(&mut self, x: usize, y: usize) -> Result<Option<Tile>, GridError> {
        let i = self.check_interior(x, y)?;
        let old = std::mem::replace(&mut self.cells[i], Cell::Empty);
        Ok(old.tile())
    }

    /// Number of empty cells in an interior column
    pub fn empty_in_column(&self, x: usize) -> usize {
        if x == 0 || x >= self.width - 1 {
            return 0;
        }
        let start = self.index(x, 0);
        self.cells[start..start + self.height]
            .iter()
            .filter(|c| matches!(c, Cell::Empty))
            .count()
    }

    /// Drop a new tile in from the top of `column`
    ///
    /// The tile lands in the lowest empty slot, so after compaction repeated
    /// spawns stack upward. Returns the row filled. Fails if the column is a
    /// pin column or has no empty slot.
    pub fn spawn_at_top(&mut self, column: usize, shape: Shape, rotation: u8) -> Result<usize, GridError> {
        self.check_interior(column, 0)?;
        let start = self.index(column, 0);
        let col = &mut self.cells[start..start + self.height];
        let row = col
            .iter()
            .rposition(|c| matches!(c, Cell::Empty))
            .ok_or(GridError::Empty { x: column, y: 0 })?;
        col[row] = Cell::Tile(Tile::new(shape, rotation));
        Ok(row)
    }

    /// Slice of one column, top to bottom
    pub(crate) fn column_mut(&mut self, x: usize) -> &mut [Cell] {
        let start = self.index(x, 0);
        let h = self.height;
        &mut self.cells[start..start + h]
    }

    /// Iterate interior tiles as (x, y, tile)
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.interior_columns().flat_map(move |x| {
            (0..self.height).filter_map(move |y| self.tile(x, y).map(|t| (x, y, t)))
        })
    }

    /// True once no interior cell is empty
    pub fn is_full(&self) -> bool {
        self.interior_columns().all(|x| self.empty_in_column(x) == 0)
    }

    /// Stable 64-bit FNV-1a digest of the cell contents
    ///
    /// `DefaultHasher` is not guaranteed stable across Rust versions, so this
    /// uses a fixed hash for reproducible comparisons.
    pub fn content_hash(&self) -> u64 {
        let mut h = Fnv1aHasher::new();
        self.hash(&mut h);
        h.finish()
    }
}

/// 64-bit FNV-1a hasher
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_has_pin_columns() {
        let grid = Grid::new(5, 3);
        for y in 0..3 {
            assert_eq!(grid.get(0, y), Some(Cell::Pin(Side::Left)));
            assert_eq!(grid.get(4, y), Some(Cell::Pin(Side::Right)));
            for x in 1..4 {
                assert_eq!(grid.get(x, y), Some(Cell::Empty));
            }
        }
        assert_eq!(grid.get(5, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn test_pin_masks_point_inward() {
        assert_eq!(Cell::Pin(Side::Left).mask(), Direction::East.bit());
        assert_eq!(Cell::Pin(Side::Right).mask(), Direction::West.bit());
    }

    #[test]
    fn test_index_is_column_major() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.index(0, 0), 0);
        assert_eq!(grid.index(0, 2), 2);
        assert_eq!(grid.index(1, 0), 3);
        assert_eq!(grid.index(3, 2), 11);
    }

    #[test]
    fn test_straight_orientation() {
        let horizontal = Tile::new(Shape::Straight, 0);
        assert!(horizontal.has_connection(Direction::East));
        assert!(horizontal.has_connection(Direction::West));
        assert!(!horizontal.has_connection(Direction::North));

        let vertical = Tile::new(Shape::Straight, 1);
        assert!(vertical.has_connection(Direction::North));
        assert!(vertical.has_connection(Direction::South));
        assert!(!vertical.has_connection(Direction::East));
    }

    #[test]
    fn test_rotation_wraps() {
        let mut tile = Tile::new(Shape::Elbow, 7);
        assert_eq!(tile.rotation(), 3);
        tile.rotate();
        assert_eq!(tile.rotation(), 0);
        assert_eq!(tile.rotated(6).rotation(), 2);
    }

    #[test]
    fn test_from_mask_covers_every_nonzero_mask() {
        assert_eq!(Tile::from_mask(0), None);
        for mask in 1u8..16 {
            let tile = Tile::from_mask(mask).expect("every non-zero mask has a tile");
            assert_eq!(tile.mask(), mask, "mask {:04b}", mask);
        }
        assert_eq!(Tile::from_mask(0b0101), Some(Tile::new(Shape::Straight, 1)));
        assert_eq!(Tile::from_mask(0b1111), Some(Tile::new(Shape::Cross, 0)));
    }

    #[test]
    fn test_rotate_rejects_pins_and_out_of_bounds() {
        let mut grid = Grid::filled(5, 2, |_, _| Tile::new(Shape::Elbow, 0));
        assert_eq!(grid.rotate(0, 0), Err(GridError::InvalidPosition { x: 0, y: 0 }));
        assert_eq!(grid.rotate(4, 1), Err(GridError::InvalidPosition { x: 4, y: 1 }));
        assert_eq!(grid.rotate(2, 2), Err(GridError::InvalidPosition { x: 2, y: 2 }));
        assert_eq!(grid.rotate(9, 0), Err(GridError::InvalidPosition { x: 9, y: 0 }));
        assert_eq!(grid.rotate(2, 1).map(|t| t.rotation()), Ok(1));
    }

    #[test]
    fn test_remove_and_spawn_at_top() {
        let mut grid = Grid::filled(4, 3, |_, y| Tile::new(Shape::Elbow, y as u8));
        assert_eq!(grid.remove(1, 1), Ok(Some(Tile::new(Shape::Elbow, 1))));
        assert_eq!(grid.empty_in_column(1), 1);
        assert!(!grid.is_full());

        let row = grid.spawn_at_top(1, Shape::Cross, 0).unwrap();
        assert_eq!(row, 1);
        assert!(grid.is_full());
        assert_eq!(
            grid.spawn_at_top(1, Shape::Cross, 0),
            Err(GridError::Empty { x: 1, y: 0 })
        );
        assert_eq!(
            grid.spawn_at_top(0, Shape::Cross, 0),
            Err(GridError::InvalidPosition { x: 0, y: 0 })
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Grid::filled(5, 3, |_, _| Tile::new(Shape::Tee, 0));
        let mut copy = original.clone();
        copy.rotate(2, 1).unwrap();
        assert_eq!(original.tile(2, 1), Some(Tile::new(Shape::Tee, 0)));
        assert_ne!(original.content_hash(), copy.content_hash());
    }

    #[test]
    fn test_neighbor_bounds() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.neighbor(0, 0, Direction::North), None);
        assert_eq!(grid.neighbor(0, 0, Direction::West), None);
        assert_eq!(grid.neighbor(0, 0, Direction::East), Some((1, 0)));
        assert_eq!(grid.neighbor(3, 2, Direction::South), None);
    }
}
