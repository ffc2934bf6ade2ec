//! Animation coordinator - cosmetic timers only
//!
//! Effects are a closed set of kinds, each stored in its own arena of slots.
//! A [`Handle`] names a slot plus the generation it was issued for, so a
//! handle kept past its release can never reach a newer effect.
//!
//! Nothing here reads or writes the grid. The phase machine waits on the
//! completions of the effects it started through an [`EffectGate`]; an effect
//! the pool refused is stood in for by a logical clock of the same duration,
//! so play continues under [`PoolOverflow::Reject`].
//!
//! While a freeze effect is live, only freeze effects advance.

use serde::{Deserialize, Serialize};

use crate::bonus::DropKind;
use crate::types::Side;

/// Cosmetic fall acceleration in rows per second squared
///
/// 9.8 px per frame per second at 60 Hz over 50 px tiles.
pub const FALL_ACCEL_ROWS: f32 = 11.76;

/// What to do when a pool has no free slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolOverflow {
    /// Allocate another slot
    #[default]
    Grow,
    /// Refuse the effect
    Reject,
}

impl PoolOverflow {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grow" => Some(PoolOverflow::Grow),
            "reject" | "drop" => Some(PoolOverflow::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Rotate,
    Fall,
    ParticleBurst,
    Freeze,
    BonusFall,
    FloatingText,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Rotate,
        EffectKind::Fall,
        EffectKind::ParticleBurst,
        EffectKind::Freeze,
        EffectKind::BonusFall,
        EffectKind::FloatingText,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// One cosmetic effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Tile at (x, y) turning; starts `turns` quarter turns behind its logical rotation
    Rotate { x: usize, y: usize, turns: u8 },
    /// Tile sliding down column `x` to `to_row`
    Fall { x: usize, from_row: f32, to_row: usize },
    /// Sparks over a removed cell
    ParticleBurst { x: usize, y: usize },
    Freeze,
    /// Drop falling onto its cell from half a board above
    BonusFall { x: usize, y: usize, kind: DropKind },
    /// Score popup in cell coordinates
    FloatingText { x: f32, y: f32, value: u32, side: Side },
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Rotate { .. } => EffectKind::Rotate,
            Effect::Fall { .. } => EffectKind::Fall,
            Effect::ParticleBurst { .. } => EffectKind::ParticleBurst,
            Effect::Freeze => EffectKind::Freeze,
            Effect::BonusFall { .. } => EffectKind::BonusFall,
            Effect::FloatingText { .. } => EffectKind::FloatingText,
        }
    }
}

/// Generation-tagged reference to a pooled effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    kind: EffectKind,
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn kind(&self) -> EffectKind {
        self.kind
    }
}

/// A live effect and its clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Running {
    pub effect: Effect,
    pub elapsed_ms: u32,
    pub duration_ms: u32,
}

impl Running {
    /// Completion fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            1.0
        } else {
            (self.elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
        }
    }
}

/// An effect that ran to the end of its duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    pub handle: Handle,
    pub effect: Effect,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    running: Option<Running>,
}

#[derive(Debug, Clone)]
struct Pool {
    kind: EffectKind,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Pool {
    fn new(kind: EffectKind, capacity: usize) -> Self {
        Self {
            kind,
            slots: (0..capacity)
                .map(|_| Slot {
                    generation: 0,
                    running: None,
                })
                .collect(),
            free: (0..capacity as u32).rev().collect(),
        }
    }

    fn acquire(&mut self, running: Running, overflow: PoolOverflow) -> Option<Handle> {
        let index = match self.free.pop() {
            Some(i) => i,
            None => match overflow {
                PoolOverflow::Grow => {
                    self.slots.push(Slot {
                        generation: 0,
                        running: None,
                    });
                    (self.slots.len() - 1) as u32
                }
                PoolOverflow::Reject => return None,
            },
        };
        let slot = &mut self.slots[index as usize];
        slot.running = Some(running);
        Some(Handle {
            kind: self.kind,
            index,
            generation: slot.generation,
        })
    }

    fn release_index(&mut self, index: u32) -> Option<Effect> {
        let slot = self.slots.get_mut(index as usize)?;
        let running = slot.running.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(running.effect)
    }

    fn get(&self, handle: Handle) -> Option<&Running> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.running.as_ref())
    }

    fn live(&self) -> impl Iterator<Item = &Running> + '_ {
        self.slots.iter().filter_map(|s| s.running.as_ref())
    }
}

/// Owns every cosmetic timer
#[derive(Debug, Clone)]
pub struct Coordinator {
    pools: [Pool; 6],
    overflow: PoolOverflow,
}

impl Coordinator {
    pub fn new(capacity: usize, overflow: PoolOverflow) -> Self {
        Self {
            pools: EffectKind::ALL.map(|kind| Pool::new(kind, capacity)),
            overflow,
        }
    }

    pub fn overflow(&self) -> PoolOverflow {
        self.overflow
    }

    /// Start an effect; `None` if the pool is full and rejecting
    pub fn acquire(&mut self, effect: Effect, duration_ms: u32) -> Option<Handle> {
        let kind = effect.kind();
        let running = Running {
            effect,
            elapsed_ms: 0,
            duration_ms,
        };
        let handle = self.pools[kind.index()].acquire(running, self.overflow);
        if handle.is_none() {
            log::debug!("{:?} pool full, effect rejected", kind);
        }
        handle
    }

    /// Stop an effect early; stale handles are ignored
    pub fn release(&mut self, handle: Handle) -> Option<Effect> {
        let pool = &mut self.pools[handle.kind.index()];
        pool.get(handle)?;
        pool.release_index(handle.index)
    }

    pub fn get(&self, handle: Handle) -> Option<&Running> {
        self.pools[handle.kind.index()].get(handle)
    }

    /// Live effects of one kind
    pub fn running(&self, kind: EffectKind) -> impl Iterator<Item = &Running> + '_ {
        self.pools[kind.index()].live()
    }

    pub fn live_count(&self, kind: EffectKind) -> usize {
        self.running(kind).count()
    }

    /// Allocated slots of one kind, live or free
    pub fn slot_count(&self, kind: EffectKind) -> usize {
        self.pools[kind.index()].slots.len()
    }

    pub fn freeze_active(&self) -> bool {
        self.live_count(EffectKind::Freeze) > 0
    }

    /// Release every live effect of one kind
    pub fn clear_kind(&mut self, kind: EffectKind) {
        let pool = &mut self.pools[kind.index()];
        for i in 0..pool.slots.len() as u32 {
            pool.release_index(i);
        }
    }

    pub fn clear(&mut self) {
        for kind in EffectKind::ALL {
            self.clear_kind(kind);
        }
    }

    /// Advance timers by `dt_ms`, appending finished effects to `out`
    ///
    /// Finished effects are released before they are reported.
    pub fn advance_into(&mut self, dt_ms: u32, out: &mut Vec<Completion>) {
        let frozen = self.freeze_active();
        for pool in self.pools.iter_mut() {
            if frozen && pool.kind != EffectKind::Freeze {
                continue;
            }
            for i in 0..pool.slots.len() {
                let slot = &mut pool.slots[i];
                let Some(running) = slot.running.as_mut() else {
                    continue;
                };
                running.elapsed_ms = running.elapsed_ms.saturating_add(dt_ms);
                if running.elapsed_ms >= running.duration_ms {
                    let handle = Handle {
                        kind: pool.kind,
                        index: i as u32,
                        generation: slot.generation,
                    };
                    if let Some(effect) = pool.release_index(i as u32) {
                        out.push(Completion { handle, effect });
                    }
                }
            }
        }
    }

    pub fn advance(&mut self, dt_ms: u32) -> Vec<Completion> {
        let mut out = Vec::new();
        self.advance_into(dt_ms, &mut out);
        out
    }
}

/// Effects a phase is waiting on
///
/// Opens once every tracked handle has been reported complete and the
/// fallback clock for refused effects has run out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectGate {
    handles: Vec<Handle>,
    fallback_ms: u32,
}

impl EffectGate {
    pub fn clear(&mut self) {
        self.handles.clear();
        self.fallback_ms = 0;
    }

    /// Wait on the result of [`Coordinator::acquire`]
    pub fn track(&mut self, handle: Option<Handle>, duration_ms: u32) {
        match handle {
            Some(h) => self.handles.push(h),
            None => self.fallback_ms = self.fallback_ms.max(duration_ms),
        }
    }

    /// Consume this tick's completions; true once the gate is open
    pub fn advance(&mut self, completions: &[Completion], dt_ms: u32) -> bool {
        self.handles
            .retain(|h| !completions.iter().any(|c| c.handle == *h));
        self.fallback_ms = self.fallback_ms.saturating_sub(dt_ms);
        self.is_open()
    }

    pub fn is_open(&self) -> bool {
        self.handles.is_empty() && self.fallback_ms == 0
    }

    pub fn pending(&self) -> usize {
        self.handles.len()
    }
}

/// Time for a cosmetic fall over `rows` rows, starting at rest
pub fn fall_duration_ms(rows: f32) -> u32 {
    if rows <= 0.0 {
        return 0;
    }
    ((2.0 * rows / FALL_ACCEL_ROWS).sqrt() * 1000.0).ceil() as u32
}

/// Visual row of a falling tile after `elapsed_ms`
pub fn fall_row(from_row: f32, to_row: usize, elapsed_ms: u32) -> f32 {
    let t = elapsed_ms as f32 / 1000.0;
    (from_row + 0.5 * FALL_ACCEL_ROWS * t * t).min(to_row as f32)
}

/// Visual angle of a rotating tile, in radians behind its logical rotation
pub fn rotate_lag(turns: u8, progress: f32) -> f32 {
    f32::from(turns) * std::f32::consts::FRAC_PI_2 * (1.0 - progress.clamp(0.0, 1.0))
}
