//! Scoring module - pin multipliers and per-side counters
//!
//! Every pin row carries a multiplier on each side, starting at 1. When a zap
//! lights a pin, that side scores the multiplier and the multiplier goes up by
//! one, so rows that keep closing circuits become more valuable.
//!
//! How points reach the two counters depends on the mode:
//!
//! | Mode | Left pin points | Right pin points |
//! |------|-----------------|------------------|
//! | Zen | both counters | both counters |
//! | VsBot | left counter | right counter |

use serde::{Deserialize, Serialize};

use crate::resolver::Resolution;
use crate::types::{GameMode, Side};

/// Per-row multipliers for both pin columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMultipliers {
    left: Vec<u32>,
    right: Vec<u32>,
}

impl PinMultipliers {
    pub fn new(height: usize) -> Self {
        Self {
            left: vec![1; height],
            right: vec![1; height],
        }
    }

    pub fn reset(&mut self) {
        self.left.iter_mut().for_each(|m| *m = 1);
        self.right.iter_mut().for_each(|m| *m = 1);
    }

    pub fn get(&self, side: Side, row: usize) -> u32 {
        let rows = match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        };
        rows.get(row).copied().unwrap_or(1)
    }

    pub fn side(&self, side: Side) -> &[u32] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Score every lit pin and bump its multiplier
    pub fn score_zap(&mut self, res: &Resolution) -> PinScore {
        let mut score = PinScore::default();
        for (side, rows) in [(Side::Left, &mut self.left), (Side::Right, &mut self.right)] {
            for y in res.lit_pins(side) {
                let Some(mult) = rows.get_mut(y) else {
                    continue;
                };
                match side {
                    Side::Left => {
                        score.left += *mult;
                        score.left_pins += 1;
                    }
                    Side::Right => {
                        score.right += *mult;
                        score.right_pins += 1;
                    }
                }
                *mult += 1;
            }
        }
        score
    }
}

/// Points produced by one zap, before mode rules apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinScore {
    pub left: u32,
    pub right: u32,
    pub left_pins: usize,
    pub right_pins: usize,
}

/// The two score counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    pub left: u32,
    pub right: u32,
}

impl Scores {
    /// Credit side-attributed points according to `mode`
    ///
    /// Returns true if either counter changed.
    pub fn award(&mut self, mode: GameMode, left: u32, right: u32) -> bool {
        match mode {
            GameMode::Zen => {
                let total = left.saturating_add(right);
                self.left = self.left.saturating_add(total);
                self.right = self.right.saturating_add(total);
            }
            GameMode::VsBot => {
                self.left = self.left.saturating_add(left);
                self.right = self.right.saturating_add(right);
            }
        }
        left > 0 || right > 0
    }

    pub fn limit_reached(&self, limit: Option<u32>) -> bool {
        limit.is_some_and(|l| self.left >= l || self.right >= l)
    }

    /// Side ahead on points, if any
    pub fn leader(&self) -> Option<Side> {
        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}
