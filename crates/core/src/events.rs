//! Events emitted by the simulation for audio and UI collaborators

use serde::{Deserialize, Serialize};

use crate::types::{Phase, PowerUpKind, Side, SoundEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEvent),
    ScoreChanged { left: u32, right: u32 },
    PhaseChanged { from: Phase, to: Phase },
    /// Cascading stopped after `depth` consecutive zaps
    CascadeCapped { depth: u32 },
    PowerUpCollected { side: Side, kind: PowerUpKind },
    GameOver { winner: Option<Side> },
}
