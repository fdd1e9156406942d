//! Pitch Pipes - a sing-to-fly obstacle game core
//!
//! The player's vertical position is driven by the pitch of an external audio
//! signal; pipes with gaps scroll in from the right and must be threaded
//! without touching them or leaving the play field.
//!
//! Core modules:
//! - `pitch`: MIDI-number / note-letter / frequency conversions
//! - `sim`: Deterministic simulation (phases, entities, collision, scoring)
//! - `highscores`: Ranked top-3 leaderboard with blob persistence
//!
//! Pitch estimation, rendering, and UI chrome are external collaborators;
//! the simulation talks to them only through the traits in [`sim::session`].

pub mod highscores;
pub mod pitch;
pub mod sim;

pub use highscores::{HighScoreEntry, HighScores};
pub use pitch::NoteError;
pub use sim::{Difficulty, GameInfo, GamePhase, GameSession, PhaseRequest, SessionEvent};

/// Game configuration constants
pub mod consts {
    /// Field extent; all entity coordinates are percentages of this scale.
    pub const FIELD_MAX: f32 = 100.0;

    /// Fixed horizontal position of the player.
    pub const PLAYER_X: f32 = 20.0;

    /// Pipe body width on the field scale.
    pub const PIPE_WIDTH: f32 = 5.0;

    /// Horizontal scroll speed shared by all pipes, field units per second.
    pub const PIPE_SPEED: f32 = 25.0;

    /// A new pipe spawns once the rightmost pipe has scrolled left of this.
    pub const SPAWN_THRESHOLD_X: f32 = 75.0;

    /// Gap sizes per difficulty, on the field scale.
    pub const GAP_EASY: f32 = 30.0;
    pub const GAP_NORMAL: f32 = 20.0;
    pub const GAP_HARD: f32 = 10.0;

    /// Player vertical position before the first confident pitch estimate.
    pub const INPUT_FALLBACK_POS: f32 = 50.0;

    /// Default note range; overridable before INIT via
    /// [`crate::sim::GameSession::set_note_range`].
    pub const DEFAULT_LO_NOTE: &str = "C3";
    pub const DEFAULT_HI_NOTE: &str = "C4";

    /// MIDI numbers for the default note range, used before the first INIT
    /// validates and applies the requested strings.
    pub const DEFAULT_LO_PITCH: i64 = 48;
    pub const DEFAULT_HI_PITCH: i64 = 60;
}
