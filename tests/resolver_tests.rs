//! Resolver properties over seeded random boards

use std::collections::{HashSet, VecDeque};

use zapzap::core::{resolve, resolve_with, Grid, SimpleRng, Tile, TileSource};
use zapzap::types::{Direction, Marking, Shape, Side};

fn random_board(seed: u32, width: usize, height: usize) -> Grid {
    let mut source = TileSource::random(seed, 3);
    Grid::filled(width, height, |_, _| source.next_tile())
}

/// Neighbours sharing a wire on both sides of the edge
fn matched_neighbours(grid: &Grid, x: usize, y: usize) -> Vec<(usize, usize)> {
    let Some(here) = grid.tile(x, y) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for dir in Direction::ALL {
        let (dx, dy) = match dir {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        };
        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
        if nx < 1 || ny < 0 || nx as usize >= grid.width() - 1 || ny as usize >= grid.height() {
            continue;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        let matched = grid
            .tile(nx, ny)
            .is_some_and(|there: Tile| here.has_connection(dir) && there.has_connection(dir.opposite()));
        if matched {
            out.push((nx, ny));
        }
    }
    out
}

/// Plain BFS from one pin column over matched wires
fn reachable(grid: &Grid, side: Side) -> HashSet<(usize, usize)> {
    let w = grid.width();
    let (column, wire) = match side {
        Side::Left => (1, Side::Left.pin_edge()),
        Side::Right => (w - 2, Side::Right.pin_edge()),
    };
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    for y in 0..grid.height() {
        if grid.tile(column, y).is_some_and(|t| t.has_connection(wire)) {
            seen.insert((column, y));
            queue.push_back((column, y));
        }
    }
    while let Some((x, y)) = queue.pop_front() {
        for next in matched_neighbours(grid, x, y) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn test_resolution_is_deterministic() {
    for seed in 1..40 {
        let grid = random_board(seed, 12, 10);
        assert_eq!(resolve(&grid), resolve(&grid), "seed {}", seed);
    }
}

#[test]
fn test_resolution_ignores_frontier_order() {
    for seed in 1..40 {
        let grid = random_board(seed, 12, 10);
        let expected = resolve(&grid);
        let mut rng = SimpleRng::new(seed.wrapping_mul(7919));
        let shuffled = resolve_with(&grid, |len| rng.next_range(len as u32) as usize);
        assert_eq!(shuffled, expected, "seed {}", seed);
    }
}

#[test]
fn test_markings_match_independent_search() {
    for seed in 1..60 {
        let grid = random_board(seed, 12, 10);
        let res = resolve(&grid);
        let left = reachable(&grid, Side::Left);
        let right = reachable(&grid, Side::Right);

        for x in grid.interior_columns() {
            for y in 0..grid.height() {
                let expected = Marking::from_reach(left.contains(&(x, y)), right.contains(&(x, y)));
                assert_eq!(res.marking(x, y), expected, "seed {} at ({}, {})", seed, x, y);
            }
        }
    }
}

#[test]
fn test_every_ok_cell_is_reachable_from_both_pins() {
    for seed in 1..60 {
        let grid = random_board(seed, 12, 10);
        let res = resolve(&grid);
        let left = reachable(&grid, Side::Left);
        let right = reachable(&grid, Side::Right);
        for (x, y) in res.ok_cells() {
            assert!(left.contains(&(x, y)) && right.contains(&(x, y)));
        }
        assert_eq!(res.is_zap(), res.count(Marking::Ok) > 0);
    }
}

#[test]
fn test_crosses_light_every_pin() {
    let grid = Grid::filled(12, 10, |_, _| Tile::new(Shape::Cross, 0));
    let res = resolve(&grid);
    assert_eq!(res.count(Marking::Ok), 10 * 10);
    assert_eq!(res.lit_pin_count(), 20);
}

#[test]
fn test_small_boards_resolve() {
    for (w, h) in [(3, 1), (3, 5), (4, 2), (20, 1)] {
        let grid = random_board(5, w, h);
        let res = resolve(&grid);
        assert_eq!(res.width(), w);
        assert_eq!(res.height(), h);
        assert_eq!(res.markings().len(), w * h);
    }
}
