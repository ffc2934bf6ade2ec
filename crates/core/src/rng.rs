//! RNG module - tile generation policy
//!
//! New tiles come from a [`TileSource`]. The random policy draws a uniformly
//! distributed connector mask in 1..=15 and keeps the share of dead-end
//! ("missing link") tiles at or below a configured percentage by rerolling
//! dead ends once the share has been exceeded. The fixed policy always yields
//! the same tile, which makes cascades reproducible in tests.
//!
//! Also provides a simple LCG for deterministic sequences.

use crate::grid::Tile;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u32() >> 8) % max
    }

    /// Random value in [lo, hi] (inclusive)
    pub fn next_between(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_range(hi - lo + 1)
    }
}

/// Where replacement tiles come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSource {
    Random {
        rng: SimpleRng,
        /// Highest tolerated share of dead ends, in percent
        missing_links: u32,
        generated: u64,
        dead_ends: u64,
    },
    Fixed(Tile),
}

impl TileSource {
    pub fn random(seed: u32, missing_links: u32) -> Self {
        TileSource::Random {
            rng: SimpleRng::new(seed),
            missing_links,
            generated: 0,
            dead_ends: 0,
        }
    }

    pub fn fixed(tile: Tile) -> Self {
        TileSource::Fixed(tile)
    }

    /// Produce the next tile
    pub fn next_tile(&mut self) -> Tile {
        match self {
            TileSource::Fixed(tile) => *tile,
            TileSource::Random {
                rng,
                missing_links,
                generated,
                dead_ends,
            } => {
                let mut mask = Self::draw_mask(rng);
                *generated += 1;

                if 100 * *dead_ends / *generated > u64::from(*missing_links) {
                    while mask.count_ones() == 1 {
                        mask = Self::draw_mask(rng);
                    }
                }
                if mask.count_ones() == 1 {
                    *dead_ends += 1;
                }

                // draw_mask never yields 0, so a tile always exists
                Tile::from_mask(mask).unwrap_or(Tile::new(crate::types::Shape::Cross, 0))
            }
        }
    }

    fn draw_mask(rng: &mut SimpleRng) -> u8 {
        (rng.next_range(15) + 1) as u8
    }
}
