//! Game state and core simulation types
//!
//! Entities, phases, difficulty, and the snapshot published to external
//! readers between ticks.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::HighScores;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// External assets not yet ready
    Load,
    /// Waiting for an explicit start request
    Ready,
    /// One-tick setup phase; becomes Alive on the next tick
    Init,
    /// Active gameplay
    Alive,
    /// Run ended; terminal until an external INIT request
    Dead,
    /// Game is paused; the pre-pause phase is remembered for restoration
    Paused,
}

/// Game difficulty, controls the gap size of future pipe spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Vertical extent of the passable gap on the field scale
    pub fn gap_size(&self) -> f32 {
        match self {
            Difficulty::Easy => GAP_EASY,
            Difficulty::Normal => GAP_NORMAL,
            Difficulty::Hard => GAP_HARD,
        }
    }
}

/// Externally-relevant run state, attached to phase/difficulty change events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameInfo {
    pub score: u32,
}

/// The player entity. Horizontal position is fixed; vertical position is
/// overwritten every tick from the pitch input, so there is no velocity or
/// inertia state here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl Player {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            x: PLAYER_X,
            y: INPUT_FALLBACK_POS,
        }
    }
}

/// A pipe entity: a vertical barrier with a passable gap, scrolling left.
/// `x` is the left edge of the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    pub x: f32,
    /// Vertical center of the gap, quantized to a grid line at spawn
    pub gap_center: f32,
    /// Vertical extent of the gap, fixed at spawn from the difficulty
    pub gap_size: f32,
    /// One-shot scoring flag; flips false -> true at most once
    pub awarded_points: bool,
}

impl Pipe {
    pub fn new(id: u32, gap_center: f32, gap_size: f32) -> Self {
        Self {
            id,
            x: FIELD_MAX,
            gap_center,
            gap_size,
            awarded_points: false,
        }
    }

    /// Advance scroll motion
    pub fn tick(&mut self, dt: f32) {
        self.x -= PIPE_SPEED * dt;
    }

    /// True once the body has fully exited the left edge of the field
    pub fn should_remove(&self) -> bool {
        self.x + PIPE_WIDTH < 0.0
    }

    /// True if `(px, py)` is inside the pipe body but outside the gap band
    pub fn in_danger_zone(&self, px: f32, py: f32) -> bool {
        let horizontally_within = px >= self.x && px <= self.x + PIPE_WIDTH;
        let in_gap = (py - self.gap_center).abs() <= self.gap_size / 2.0;
        horizontally_within && !in_gap
    }

    /// True once the whole body has scrolled past the given x
    pub fn passed(&self, px: f32) -> bool {
        self.x + PIPE_WIDTH < px
    }
}

/// Polymorphic game object. Flat tagged union; the session owns all entities
/// and drives them through the shared tick/removal contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Player(Player),
    Pipe(Pipe),
}

impl Entity {
    /// Unique, monotonically assigned within a session lifetime
    pub fn id(&self) -> u32 {
        match self {
            Entity::Player(p) => p.id,
            Entity::Pipe(p) => p.id,
        }
    }

    /// Advance internal motion state. The player has no autonomous motion;
    /// its `y` is assigned by the session before collision checks.
    pub fn tick(&mut self, dt: f32) {
        match self {
            Entity::Player(_) => {}
            Entity::Pipe(p) => p.tick(dt),
        }
    }

    /// Pure removal query, no side effects
    pub fn should_remove(&self) -> bool {
        match self {
            Entity::Player(_) => false,
            Entity::Pipe(p) => p.should_remove(),
        }
    }
}

/// Consistent view of session state, published once per mutation boundary.
/// External readers (renderer, UI) never observe a partially ticked state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub info: GameInfo,
    pub entities: Vec<Entity>,
    /// MIDI pitch numbers bounding the vertical scale, lo < hi
    pub lo_pitch: i64,
    pub hi_pitch: i64,
    pub high_scores: HighScores,
}
