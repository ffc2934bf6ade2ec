//! Game state module - the phase machine
//!
//! [`GameState`] owns the board and is the only place that decides what may
//! happen next. Commands go through [`GameState::handle`]; time goes through
//! [`GameState::tick`]. Timed phases wait on the completion of the effects
//! they started in the animation coordinator.
//!
//! | Phase | Leaves when | Next |
//! |-------|-------------|------|
//! | WaitingForInput | valid tap / fresh bot move | RotatingTile |
//! | RotatingTile | rotate effect complete | ResolvingConnections |
//! | ResolvingConnections | same tick | FreezeDuringZap or WaitingForInput |
//! | FreezeDuringZap | freeze effect complete | RemovingAndFalling |
//! | RemovingAndFalling | fall effects complete | FallingBonuses or ResolvingConnections |
//! | FallingBonuses | drops landed | ResolvingConnections |
//! | FreezeDuringBomb | freeze effect complete | RemovingAndFalling |
//! | GameOver | reset | WaitingForInput |

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use thiserror::Error;

use crate::animation::{fall_duration_ms, fall_row, rotate_lag, Completion, Coordinator, Effect, EffectGate, EffectKind};
use crate::bonus::{self, roll_drops, BonusDrop, PowerUpInventory};
use crate::config::SimConfig;
use crate::events::GameEvent;
use crate::gravity::{power_up_cells, remove_cells, settle, CascadeGuard};
use crate::grid::{Grid, GridError, Tile};
use crate::resolver::{resolve, Resolution};
use crate::rng::{SimpleRng, TileSource};
use crate::scoring::{PinMultipliers, Scores};
use crate::snapshot::{BurstView, DropView, RenderSnapshot, Sprite, TextView, TileView};
use crate::types::*;

/// Why a command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("input is not accepted during {}", .0.as_str())]
    Busy(Phase),
    #[error("the game is over")]
    GameOver,
    #[error("{side:?} holds no {kind:?} power-up")]
    NoPowerUp { kind: PowerUpKind, side: Side },
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Rejection::Grid(e) => e.code(),
            Rejection::Busy(_) => "busy",
            Rejection::GameOver => "game_over",
            Rejection::NoPowerUp { .. } => "no_power_up",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::Grid(GridError::InvalidPosition { .. }) => "tap outside the rotatable interior",
            Rejection::Grid(GridError::Empty { .. }) => "no tile at the tapped cell",
            Rejection::Busy(_) => "input is locked until the board settles",
            Rejection::GameOver => "game is over; reset to play again",
            Rejection::NoPowerUp { .. } => "power-up not in inventory",
        }
    }
}

/// Board handed to the move evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotJob {
    pub grid: Grid,
    pub generation: u64,
}

const fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    config: SimConfig,
    grid: Grid,
    /// Markings of the last resolve pass; empty while tiles are falling
    resolution: Resolution,
    source: TileSource,
    /// Drops and bot delays
    rng: SimpleRng,
    phase: Phase,
    /// Effects the current phase is waiting on
    phase_gate: EffectGate,
    generation: u64,
    scores: Scores,
    multipliers: PinMultipliers,
    cascade: CascadeGuard,
    /// Lit pins (left, right) of the zap being shown
    pending_pins: (usize, usize),
    pending_power: Option<(PowerUpKind, usize, usize)>,
    falling_drops: Vec<BonusDrop>,
    landed_drops: Vec<BonusDrop>,
    drops_gate: EffectGate,
    power: [PowerUpInventory; 2],
    armed: Option<(PowerUpKind, Side)>,
    automated_opponent: bool,
    bot_timer_ms: Option<u32>,
    bot_job_due: bool,
    effects: Coordinator,
    completions: Vec<Completion>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game with a random board drawn from `config.seed`
    pub fn new(config: SimConfig) -> Self {
        let mut source = TileSource::random(config.seed, config.missing_links);
        let grid = Grid::filled(config.width, config.height, |_, _| source.next_tile());
        Self::with_grid(config, grid, source)
    }

    /// Default configuration with the given seed
    pub fn with_seed(seed: u32) -> Self {
        Self::new(SimConfig {
            seed,
            ..SimConfig::default()
        })
    }

    /// Start from a prepared board; `source` supplies every refill
    ///
    /// The board is resolved immediately, so a board that already closes a
    /// circuit starts in `FreezeDuringZap`.
    pub fn with_grid(config: SimConfig, grid: Grid, source: TileSource) -> Self {
        let mut state = Self::build(config, grid, source, 0);
        state.start();
        state
    }

    fn build(mut config: SimConfig, grid: Grid, source: TileSource, generation: u64) -> Self {
        config.width = grid.width();
        config.height = grid.height();
        let (w, h) = (grid.width(), grid.height());
        Self {
            rng: SimpleRng::new(config.seed.rotate_left(16) ^ 0x9e37_79b9),
            resolution: Resolution::empty(w, h),
            multipliers: PinMultipliers::new(h),
            cascade: CascadeGuard::new(config.effective_cascade_cap()),
            effects: Coordinator::new(config.pool_capacity, config.pool_overflow),
            automated_opponent: config.automated_opponent,
            config,
            grid,
            source,
            phase: Phase::WaitingForInput,
            phase_gate: EffectGate::default(),
            generation,
            scores: Scores::default(),
            pending_pins: (0, 0),
            pending_power: None,
            falling_drops: Vec::new(),
            landed_drops: Vec::new(),
            drops_gate: EffectGate::default(),
            power: [PowerUpInventory::default(); 2],
            armed: None,
            bot_timer_ms: None,
            bot_job_due: false,
            completions: Vec::new(),
            events: Vec::new(),
        }
    }

    fn start(&mut self) {
        if self.automated_opponent {
            self.arm_bot_timer();
        }
        self.enter_resolving();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn marking(&self, x: usize, y: usize) -> Marking {
        self.resolution.marking(x, y)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn multipliers(&self) -> &PinMultipliers {
        &self.multipliers
    }

    pub fn cascade_depth(&self) -> u32 {
        self.cascade.depth()
    }

    pub fn power(&self, side: Side) -> PowerUpInventory {
        self.power[side_index(side)]
    }

    pub fn armed(&self) -> Option<(PowerUpKind, Side)> {
        self.armed
    }

    pub fn automated_opponent(&self) -> bool {
        self.automated_opponent
    }

    /// Remaining bot "thinking" time, if a move is scheduled
    pub fn bot_timer_ms(&self) -> Option<u32> {
        self.bot_timer_ms
    }

    pub fn falling_drops(&self) -> &[BonusDrop] {
        &self.falling_drops
    }

    pub fn landed_drops(&self) -> &[BonusDrop] {
        &self.landed_drops
    }

    pub fn effects(&self) -> &Coordinator {
        &self.effects
    }

    /// Effects that finished during the last tick
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Give `side` a power-up outside normal collection
    pub fn grant_power_up(&mut self, side: Side, kind: PowerUpKind) {
        self.power[side_index(side)].grant(kind);
    }

    /// Apply one command
    ///
    /// Refused commands leave the state untouched apart from a
    /// `Sound(Rejected)` event. Bot moves that no longer apply are dropped
    /// without an error.
    pub fn handle(&mut self, command: Command) -> Result<(), Rejection> {
        let result = match command {
            Command::Tap { x, y } => self.tap(x, y),
            Command::BotTap {
                x,
                y,
                turns,
                generation,
            } => {
                self.bot_tap(x, y, turns, generation);
                Ok(())
            }
            Command::SetAutomatedOpponent(enabled) => {
                self.set_automated_opponent(enabled);
                Ok(())
            }
            Command::Reset { seed } => {
                self.reset(seed);
                Ok(())
            }
            Command::ArmPowerUp { kind, side } => self.arm_power_up(kind, side),
        };
        if let Err(e) = result {
            log::debug!("rejected {:?} ({}): {}", command, e.code(), e.message());
            self.events.push(GameEvent::Sound(SoundEvent::Rejected));
        }
        result
    }

    fn tap(&mut self, x: usize, y: usize) -> Result<(), Rejection> {
        if self.phase.is_terminal() {
            return Err(Rejection::GameOver);
        }
        if let Some((kind, side)) = self.armed {
            return self.apply_power_up(kind, side, x, y);
        }
        if self.phase != Phase::WaitingForInput {
            return Err(Rejection::Busy(self.phase));
        }
        self.grid.rotate(x, y)?;
        self.cascade.reset();
        self.begin_rotation(x, y, 1);
        Ok(())
    }

    fn bot_tap(&mut self, x: usize, y: usize, turns: u8, generation: u64) {
        if !self.automated_opponent || generation != self.generation || self.phase != Phase::WaitingForInput {
            log::debug!(
                "dropping bot move computed for generation {} (now {}, {})",
                generation,
                self.generation,
                self.phase.as_str()
            );
            return;
        }
        let turns = turns % 4;
        if turns == 0 || self.grid.tile(x, y).is_none() || !self.grid.is_interior(x, y) {
            log::debug!("dropping bot move at ({}, {}) x{}", x, y, turns);
            return;
        }
        for _ in 0..turns {
            if let Err(e) = self.grid.rotate(x, y) {
                log::debug!("bot rotation failed: {}", e);
                return;
            }
        }
        self.cascade.reset();
        self.begin_rotation(x, y, turns);
    }

    fn begin_rotation(&mut self, x: usize, y: usize, turns: u8) {
        self.generation += 1;
        self.bot_timer_ms = None;
        self.bot_job_due = false;
        self.wait_on(Effect::Rotate { x, y, turns }, self.config.rotate_ms);
        self.events.push(GameEvent::Sound(SoundEvent::Rotate));
        self.set_phase(Phase::RotatingTile);
    }

    fn set_automated_opponent(&mut self, enabled: bool) {
        self.automated_opponent = enabled;
        if !enabled {
            self.bot_timer_ms = None;
            self.bot_job_due = false;
        } else if self.phase == Phase::WaitingForInput && self.bot_timer_ms.is_none() {
            self.arm_bot_timer();
        }
    }

    fn arm_power_up(&mut self, kind: PowerUpKind, side: Side) -> Result<(), Rejection> {
        if self.phase.is_terminal() {
            return Err(Rejection::GameOver);
        }
        if self.armed == Some((kind, side)) {
            self.armed = None;
            return Ok(());
        }
        if !self.power[side_index(side)].has(kind) {
            return Err(Rejection::NoPowerUp { kind, side });
        }
        self.armed = Some((kind, side));
        Ok(())
    }

    fn apply_power_up(&mut self, kind: PowerUpKind, side: Side, x: usize, y: usize) -> Result<(), Rejection> {
        if self.phase.is_freeze() {
            return Err(Rejection::Busy(self.phase));
        }
        if !self.grid.is_interior(x, y) {
            return Err(GridError::InvalidPosition { x, y }.into());
        }
        self.armed = None;
        if !self.power[side_index(side)].take(kind) {
            return Err(Rejection::NoPowerUp { kind, side });
        }

        // Logical state is already settled; only the visuals catch up
        self.effects.clear_kind(EffectKind::Rotate);
        self.effects.clear_kind(EffectKind::Fall);
        self.land_drops();

        self.cascade.reset();
        self.bot_timer_ms = None;
        self.bot_job_due = false;
        self.pending_power = Some((kind, x, y));
        self.wait_on(Effect::Freeze, self.config.freeze_bomb_ms);
        self.events.push(GameEvent::Sound(match kind {
            PowerUpKind::Cross => SoundEvent::PowerUp,
            PowerUpKind::Bomb | PowerUpKind::Arrow => SoundEvent::Bomb,
        }));
        self.set_phase(Phase::FreezeDuringBomb);
        Ok(())
    }

    /// Start over on a fresh board; scores and inventories are cleared
    ///
    /// The generation keeps counting up so replies computed before the reset
    /// are recognised as stale.
    pub fn reset(&mut self, seed: u32) {
        log::info!("resetting board with seed {}", seed);
        let mut config = self.config.clone();
        config.seed = seed;
        config.automated_opponent = self.automated_opponent;

        let mut source = match &self.source {
            TileSource::Fixed(tile) => TileSource::Fixed(*tile),
            TileSource::Random { .. } => TileSource::random(seed, config.missing_links),
        };
        let grid = Grid::filled(config.width, config.height, |_, _| source.next_tile());

        let from = self.phase;
        let events = std::mem::take(&mut self.events);
        *self = Self::build(config, grid, source, self.generation + 1);
        self.events = events;
        if from != Phase::WaitingForInput {
            self.events.push(GameEvent::PhaseChanged {
                from,
                to: Phase::WaitingForInput,
            });
        }
        self.events.push(GameEvent::ScoreChanged { left: 0, right: 0 });
        self.start();
    }

    /// Take the pending evaluation request, if the bot is due to move
    pub fn take_bot_job(&mut self) -> Option<BotJob> {
        if !self.bot_job_due || self.phase != Phase::WaitingForInput {
            return None;
        }
        self.bot_job_due = false;
        // Re-arm so a lost reply never stalls the bot
        self.arm_bot_timer();
        Some(BotJob {
            grid: self.grid.clone(),
            generation: self.generation,
        })
    }

    fn arm_bot_timer(&mut self) {
        let delay = self
            .rng
            .next_between(self.config.bot_delay_min_ms, self.config.bot_delay_max_ms);
        self.bot_timer_ms = Some(delay);
    }

    /// Advance the simulation by `elapsed_ms`
    ///
    /// Returns true if the phase changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let before = self.phase;

        self.completions.clear();
        self.effects.advance_into(elapsed_ms, &mut self.completions);

        match self.phase {
            Phase::GameOver | Phase::ResolvingConnections => {}
            Phase::WaitingForInput => self.tick_bot(elapsed_ms),
            Phase::RotatingTile => {
                if self.phase_gate.advance(&self.completions, elapsed_ms) {
                    self.enter_resolving();
                }
            }
            Phase::FreezeDuringZap => {
                if self.phase_gate.advance(&self.completions, elapsed_ms) {
                    self.finish_zap();
                }
            }
            Phase::FreezeDuringBomb => {
                if self.phase_gate.advance(&self.completions, elapsed_ms) {
                    self.finish_power_up();
                }
            }
            Phase::RemovingAndFalling => {
                let landed = self.drops_gate.advance(&self.completions, elapsed_ms);
                if self.phase_gate.advance(&self.completions, elapsed_ms) {
                    self.events.push(GameEvent::Sound(SoundEvent::Settle));
                    if !self.falling_drops.is_empty() && !landed {
                        self.set_phase(Phase::FallingBonuses);
                    } else {
                        self.land_drops();
                        self.enter_resolving();
                    }
                }
            }
            Phase::FallingBonuses => {
                if self.drops_gate.advance(&self.completions, elapsed_ms) {
                    self.land_drops();
                    self.enter_resolving();
                }
            }
        }

        self.phase != before
    }

    /// Start an effect and make the current phase wait for it
    fn wait_on(&mut self, effect: Effect, duration_ms: u32) {
        self.phase_gate.clear();
        let handle = self.effects.acquire(effect, duration_ms);
        self.phase_gate.track(handle, duration_ms);
    }

    fn tick_bot(&mut self, elapsed_ms: u32) {
        if !self.automated_opponent {
            return;
        }
        if let Some(remaining) = self.bot_timer_ms {
            let remaining = remaining.saturating_sub(elapsed_ms);
            if remaining == 0 {
                self.bot_timer_ms = None;
                self.bot_job_due = true;
            } else {
                self.bot_timer_ms = Some(remaining);
            }
        }
    }

    fn set_phase(&mut self, to: Phase) {
        if self.phase != to {
            self.events.push(GameEvent::PhaseChanged { from: self.phase, to });
            self.phase = to;
        }
    }

    fn enter_waiting(&mut self) {
        self.set_phase(Phase::WaitingForInput);
        if self.automated_opponent && self.bot_timer_ms.is_none() && !self.bot_job_due {
            self.arm_bot_timer();
        }
    }

    fn enter_resolving(&mut self) {
        self.set_phase(Phase::ResolvingConnections);
        self.resolution = resolve(&self.grid);
        self.collect_drops();
        if self.check_game_over() {
            return;
        }

        if !self.resolution.is_zap() {
            self.enter_waiting();
            return;
        }

        if !self.cascade.step() {
            let depth = self.cascade.depth();
            log::warn!("cascade stopped after {} consecutive zaps", depth);
            self.events.push(GameEvent::CascadeCapped { depth });
            self.cascade.reset();
            self.enter_waiting();
            return;
        }

        self.score_zap();
        self.events.push(GameEvent::Sound(SoundEvent::Zap));
        if self.check_game_over() {
            return;
        }

        self.wait_on(Effect::Freeze, self.config.freeze_zap_ms);
        self.set_phase(Phase::FreezeDuringZap);
    }

    fn score_zap(&mut self) {
        let right_x = (self.grid.width() - 1) as f32;
        for side in [Side::Left, Side::Right] {
            let x = match side {
                Side::Left => 0.0,
                Side::Right => right_x,
            };
            for y in self.resolution.lit_pins(side) {
                let value = self.multipliers.get(side, y);
                self.effects.acquire(
                    Effect::FloatingText {
                        x,
                        y: y as f32,
                        value,
                        side,
                    },
                    FLOATING_TEXT_MS,
                );
            }
        }

        let pins = self.multipliers.score_zap(&self.resolution);
        self.pending_pins = (pins.left_pins, pins.right_pins);
        if self.scores.award(self.config.mode, pins.left, pins.right) {
            self.push_score();
        }
    }

    fn collect_drops(&mut self) {
        if self.landed_drops.is_empty() {
            return;
        }
        let got = bonus::collect(&mut self.landed_drops, &self.resolution);
        if self.scores.award(self.config.mode, got.left_points, got.right_points) {
            self.events.push(GameEvent::Sound(SoundEvent::CoinDrop));
            self.push_score();
        }
        for (side, kind) in got.power_ups {
            self.power[side_index(side)].grant(kind);
            self.events.push(GameEvent::PowerUpCollected { side, kind });
            self.events.push(GameEvent::Sound(SoundEvent::PowerUp));
        }
    }

    fn push_score(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            left: self.scores.left,
            right: self.scores.right,
        });
    }

    fn check_game_over(&mut self) -> bool {
        if !self.scores.limit_reached(self.config.effective_score_limit()) {
            return false;
        }
        let winner = match self.config.mode {
            GameMode::VsBot => self.scores.leader(),
            GameMode::Zen => None,
        };
        self.armed = None;
        self.bot_timer_ms = None;
        self.bot_job_due = false;
        self.set_phase(Phase::GameOver);
        self.events.push(GameEvent::GameOver { winner });
        true
    }

    fn finish_zap(&mut self) {
        let cells: Vec<(usize, usize)> = self.resolution.ok_cells().collect();
        self.burst(&cells);
        remove_cells(&mut self.grid, &cells);
        self.events.push(GameEvent::Sound(SoundEvent::Explode));

        let (left, right) = self.pending_pins;
        let drops = roll_drops(&self.grid, left, right, &mut self.rng);
        self.start_drops(drops);
        self.start_falling();
    }

    fn finish_power_up(&mut self) {
        if let Some((kind, x, y)) = self.pending_power.take() {
            match kind {
                PowerUpKind::Cross => {
                    if let Err(e) = self.grid.set_tile(x, y, Tile::new(Shape::Cross, 0)) {
                        log::debug!("cross power-up missed: {}", e);
                    }
                    self.burst(&[(x, y)]);
                }
                PowerUpKind::Bomb | PowerUpKind::Arrow => {
                    let cells = power_up_cells(&self.grid, kind, x, y, BOMB_RADIUS);
                    self.burst(&cells);
                    remove_cells(&mut self.grid, &cells);
                    self.events.push(GameEvent::Sound(SoundEvent::Explode));
                }
            }
        }
        self.start_falling();
    }

    fn burst(&mut self, cells: &[(usize, usize)]) {
        for &(x, y) in cells {
            self.effects.acquire(Effect::ParticleBurst { x, y }, PARTICLE_BURST_MS);
        }
    }

    fn start_drops(&mut self, drops: Vec<BonusDrop>) {
        self.landed_drops.clear();
        self.effects.clear_kind(EffectKind::BonusFall);
        self.drops_gate.clear();
        let duration = fall_duration_ms(self.grid.height() as f32 / 2.0);
        for d in &drops {
            let handle = self.effects.acquire(
                Effect::BonusFall {
                    x: d.x,
                    y: d.y,
                    kind: d.kind,
                },
                duration,
            );
            self.drops_gate.track(handle, duration);
        }
        self.falling_drops = drops;
    }

    fn land_drops(&mut self) {
        self.landed_drops.append(&mut self.falling_drops);
        self.drops_gate.clear();
        self.effects.clear_kind(EffectKind::BonusFall);
    }

    /// Compact, refill and schedule the cosmetic falls
    fn start_falling(&mut self) {
        self.generation += 1;
        self.resolution = Resolution::empty(self.grid.width(), self.grid.height());

        let falls = match settle(&mut self.grid, &mut self.source) {
            Ok(falls) => falls,
            Err(e) => {
                log::error!("refill failed: {}", e);
                Vec::new()
            }
        };

        self.phase_gate.clear();
        for f in &falls {
            let duration = fall_duration_ms(f.to_row as f32 - f.from_row);
            let handle = self.effects.acquire(
                Effect::Fall {
                    x: f.column,
                    from_row: f.from_row,
                    to_row: f.to_row,
                },
                duration,
            );
            self.phase_gate.track(handle, duration);
        }
        self.set_phase(Phase::RemovingAndFalling);
    }

    /// Write the render view of the current tick into `out`
    pub fn snapshot_into(&self, out: &mut RenderSnapshot) {
        out.clear();
        let (w, h) = (self.grid.width(), self.grid.height());
        out.width = w;
        out.height = h;

        for (column, side) in [(0, Side::Left), (w - 1, Side::Right)] {
            for row in 0..h {
                out.tiles.push(TileView {
                    column,
                    row,
                    x: column as f32,
                    y: row as f32,
                    rotation: 0.0,
                    scale: 1.0,
                    alpha: 1.0,
                    sprite: Sprite::Pin(side),
                    marking: self.resolution.marking(column, row),
                });
            }
        }

        for (column, row, tile) in self.grid.tiles() {
            let mut y = row as f32;
            let mut rotation = f32::from(tile.rotation()) * FRAC_PI_2;
            for r in self.effects.running(EffectKind::Fall) {
                if let Effect::Fall { x, from_row, to_row } = r.effect {
                    if x == column && to_row == row {
                        y = fall_row(from_row, to_row, r.elapsed_ms);
                    }
                }
            }
            for r in self.effects.running(EffectKind::Rotate) {
                if let Effect::Rotate { x, y: ry, turns } = r.effect {
                    if x == column && ry == row {
                        rotation -= rotate_lag(turns, r.progress());
                    }
                }
            }
            out.tiles.push(TileView {
                column,
                row,
                x: column as f32,
                y,
                rotation,
                scale: 1.0,
                alpha: 1.0,
                sprite: Sprite::Tile {
                    shape: tile.shape,
                    rotation: tile.rotation(),
                },
                marking: self.resolution.marking(column, row),
            });
        }

        for d in &self.landed_drops {
            out.drops.push(DropView {
                x: d.x as f32,
                y: d.y as f32,
                scale: 1.0,
                kind: d.kind,
                landed: true,
            });
        }
        let drop_height = h as f32 / 2.0;
        for r in self.effects.running(EffectKind::BonusFall) {
            if let Effect::BonusFall { x, y, kind } = r.effect {
                let vy = fall_row(y as f32 - drop_height, y, r.elapsed_ms);
                out.drops.push(DropView {
                    x: x as f32,
                    y: vy,
                    scale: 1.0 + 0.5 * (y as f32 - vy),
                    kind,
                    landed: false,
                });
            }
        }

        for r in self.effects.running(EffectKind::FloatingText) {
            if let Effect::FloatingText { x, y, value, side } = r.effect {
                let p = r.progress();
                out.texts.push(TextView {
                    x,
                    y: y - 0.5 * p,
                    value,
                    side,
                    alpha: 1.0 - p,
                });
            }
        }
        for r in self.effects.running(EffectKind::ParticleBurst) {
            if let Effect::ParticleBurst { x, y } = r.effect {
                out.bursts.push(BurstView {
                    x,
                    y,
                    progress: r.progress(),
                });
            }
        }

        out.scores = self.scores;
        out.phase = self.phase;
        out.mode = self.config.mode;
        out.generation = self.generation;
        out.left_power = self.power(Side::Left);
        out.right_power = self.power(Side::Right);
        out.armed = self.armed;
        out.automated_opponent = self.automated_opponent;
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let mut s = RenderSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Publish into a shared snapshot, reusing its buffers when no reader holds it
    pub fn publish(&self, out: &mut Arc<RenderSnapshot>) {
        self.snapshot_into(Arc::make_mut(out));
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
