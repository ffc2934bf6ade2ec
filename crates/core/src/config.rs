//! Simulation configuration
//!
//! Defaults reproduce the legacy game. Every field can be overridden from a
//! JSON document (missing fields keep their default) or from `ZAPZAP_*`
//! environment variables.

use serde::{Deserialize, Serialize};

use crate::animation::PoolOverflow;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Board width including both pin columns
    pub width: usize,
    pub height: usize,
    pub mode: GameMode,
    pub seed: u32,
    /// Score that ends the game; `None` uses the mode default
    pub score_limit: Option<u32>,
    /// Tolerated share of dead-end tiles, in percent
    pub missing_links: u32,
    pub rotate_ms: u32,
    pub freeze_zap_ms: u32,
    pub freeze_bomb_ms: u32,
    pub bot_delay_min_ms: u32,
    pub bot_delay_max_ms: u32,
    /// Longest zap chain without player input; `None` means width × height
    pub cascade_cap: Option<u32>,
    /// Slots preallocated per effect kind
    pub pool_capacity: usize,
    pub pool_overflow: PoolOverflow,
    pub automated_opponent: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            mode: GameMode::Zen,
            seed: 1,
            score_limit: None,
            missing_links: DEFAULT_MISSING_LINKS,
            rotate_ms: ROTATE_ANIM_MS,
            freeze_zap_ms: FREEZE_ZAP_MS,
            freeze_bomb_ms: FREEZE_BOMB_MS,
            bot_delay_min_ms: BOT_DELAY_MIN_MS,
            bot_delay_max_ms: BOT_DELAY_MAX_MS,
            cascade_cap: None,
            pool_capacity: 32,
            pool_overflow: PoolOverflow::Grow,
            automated_opponent: false,
        }
    }
}

impl SimConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Apply `ZAPZAP_*` overrides on top of `self`
    pub fn with_env(mut self) -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        if let Some(w) = parsed("ZAPZAP_WIDTH") {
            self.width = w;
        }
        if let Some(h) = parsed("ZAPZAP_HEIGHT") {
            self.height = h;
        }
        if let Some(mode) = env::var("ZAPZAP_MODE").ok().and_then(|s| GameMode::from_str(s.trim())) {
            self.mode = mode;
        }
        if let Some(seed) = parsed("ZAPZAP_SEED") {
            self.seed = seed;
        }
        if let Some(limit) = parsed("ZAPZAP_SCORE_LIMIT") {
            self.score_limit = Some(limit);
        }
        if let Some(pct) = parsed("ZAPZAP_MISSING_LINKS") {
            self.missing_links = pct;
        }
        if let Some(cap) = parsed("ZAPZAP_CASCADE_CAP") {
            self.cascade_cap = Some(cap);
        }
        if let Some(policy) = env::var("ZAPZAP_POOL_OVERFLOW")
            .ok()
            .and_then(|s| PoolOverflow::from_str(s.trim()))
        {
            self.pool_overflow = policy;
        }
        self
    }

    /// Score limit after applying the mode default
    pub fn effective_score_limit(&self) -> Option<u32> {
        match (self.score_limit, self.mode) {
            (Some(limit), _) => Some(limit),
            (None, GameMode::VsBot) => Some(VS_BOT_SCORE_LIMIT),
            (None, GameMode::Zen) => None,
        }
    }

    /// Cascade cap after applying the board-area default
    pub fn effective_cascade_cap(&self) -> u32 {
        self.cascade_cap
            .unwrap_or((self.width * self.height) as u32)
            .max(1)
    }
}
