//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Single-writer ticking, one tick in flight at a time
//! - External readers see only the published snapshot
//! - No rendering or audio-capture dependencies

pub mod session;
pub mod state;

pub use session::{
    GameSession, MemoryStore, NameProvider, PhaseRequest, PitchSource, ScoreStore, SessionEvent,
};
pub use state::{Difficulty, Entity, GameInfo, GamePhase, Pipe, Player, Snapshot};
