//! Bot move evaluator
//!
//! Brute force over every interior tile and every rotation that changes its
//! wiring. A cross, or a straight turned half way, looks the same afterwards
//! and is skipped. Each candidate is tried on a private copy of the board, so
//! the board passed in is never touched.
//!
//! Scoring:
//!
//! | Outcome | Score |
//! |---------|-------|
//! | closes a circuit | `1000 + 10 × lit pins + 2 × Ok cells` |
//! | no circuit | `LeftOnly + RightOnly + 3 × (left reach + right reach)` |
//!
//! Reach is how many columns a frontier advanced from its pin column, which
//! rewards chains that are closer to meeting in the middle.

use zapzap_core::game_state::BotJob;
use zapzap_core::resolver::{resolve, Resolution};
use zapzap_core::Grid;
use zapzap_core::types::{Command, Marking};

const ZAP_BASE: i64 = 1000;

/// One evaluated move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BotCandidate {
    pub column: usize,
    pub row: usize,
    /// Quarter turns clockwise, 1..=3
    pub rotation_delta: u8,
    pub score: i64,
}

impl BotCandidate {
    /// Synthetic tap for the board generation this was computed against
    pub fn to_command(self, generation: u64) -> Command {
        Command::BotTap {
            x: self.column,
            y: self.row,
            turns: self.rotation_delta,
            generation,
        }
    }
}

/// Evaluator answer, tagged with the generation of the board it saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotReply {
    pub candidate: Option<BotCandidate>,
    pub generation: u64,
}

impl BotReply {
    pub fn to_command(self) -> Option<Command> {
        self.candidate.map(|c| c.to_command(self.generation))
    }
}

/// Score a resolved board
pub fn heuristic(res: &Resolution) -> i64 {
    if res.is_zap() {
        ZAP_BASE + 10 * res.lit_pin_count() as i64 + 2 * res.count(Marking::Ok) as i64
    } else {
        let partial = res.count(Marking::LeftOnly) + res.count(Marking::RightOnly);
        partial as i64 + 3 * (res.left_reach() + res.right_reach()) as i64
    }
}

/// Best single-tile rotation, or `None` if no rotation changes the board
///
/// Ties go to the lowest column, then the lowest row, then the smallest delta.
pub fn evaluate(grid: &Grid) -> Option<BotCandidate> {
    let mut best: Option<BotCandidate> = None;
    let mut sim = grid.clone();

    for x in grid.interior_columns() {
        for y in 0..grid.height() {
            let Some(original) = grid.tile(x, y) else {
                continue;
            };
            for delta in 1..=3u8 {
                if sim.rotate(x, y).is_err() {
                    break;
                }
                if sim.mask(x, y) == original.mask() {
                    continue;
                }
                let score = heuristic(&resolve(&sim));
                if best.map_or(true, |b| score > b.score) {
                    best = Some(BotCandidate {
                        column: x,
                        row: y,
                        rotation_delta: delta,
                        score,
                    });
                }
            }
            // Put the tile back before moving on
            if sim.set_tile(x, y, original).is_err() {
                return best;
            }
        }
    }

    best
}

/// Evaluate a job and echo its generation
pub fn evaluate_job(job: &BotJob) -> BotReply {
    BotReply {
        candidate: evaluate(&job.grid),
        generation: job.generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zapzap_core::types::Shape;
    use zapzap_core::Tile;

    #[test]
    fn test_finds_completing_move() {
        let grid = Grid::filled(5, 1, |x, _| Tile::new(Shape::Straight, if x == 2 { 1 } else { 0 }));
        let best = evaluate(&grid).unwrap();
        assert_eq!((best.column, best.row, best.rotation_delta), (2, 0, 1));
        // 2 lit pins, 3 Ok cells
        assert_eq!(best.score, 1000 + 20 + 6);
    }

    #[test]
    fn test_ties_go_to_scan_order() {
        // Turning either outer straight flat scores the same
        let grid = Grid::filled(5, 1, |_, _| Tile::new(Shape::Straight, 1));
        let best = evaluate(&grid).unwrap();
        assert_eq!((best.column, best.row, best.rotation_delta), (1, 0, 1));
        assert_eq!(best.score, 4);
    }

    #[test]
    fn test_rotations_without_effect_are_skipped() {
        let crosses = Grid::filled(4, 2, |_, _| Tile::new(Shape::Cross, 0));
        assert_eq!(evaluate(&crosses), None);

        // A straight only has two distinct orientations
        let grid = Grid::filled(3, 1, |_, _| Tile::new(Shape::Straight, 1));
        let best = evaluate(&grid).unwrap();
        assert_eq!(best.rotation_delta, 1);
    }

    #[test]
    fn test_reply_carries_generation() {
        let grid = Grid::filled(5, 1, |_, _| Tile::new(Shape::Elbow, 0));
        let reply = evaluate_job(&BotJob { grid, generation: 42 });
        assert_eq!(reply.generation, 42);
        match reply.to_command() {
            Some(Command::BotTap { generation, .. }) => assert_eq!(generation, 42),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_board_has_no_move() {
        assert_eq!(evaluate(&Grid::new(5, 3)), None);
    }
}
