//! Pitch Pipes headless demo
//!
//! Drives the simulation with a scripted pitch source (a slow sine sweep
//! across the note range) instead of a live microphone, and prints the
//! events the session emits. Useful for watching a run end to end without
//! any audio or rendering stack attached.

use pitch_pipes::pitch::freq_from_pitch;
use pitch_pipes::sim::{GameSession, MemoryStore, PhaseRequest, PitchSource};
use pitch_pipes::{GamePhase, SessionEvent, consts};

const DT: f32 = 1.0 / 60.0;

/// Sweeps a "sung" pitch sinusoidally between the range bounds
struct SweepSource {
    t: f32,
    lo_pitch: f64,
    hi_pitch: f64,
}

impl PitchSource for SweepSource {
    fn current_hz(&mut self) -> Option<f32> {
        self.t += DT;
        let mid = (self.lo_pitch + self.hi_pitch) / 2.0;
        let amp = (self.hi_pitch - self.lo_pitch) / 2.0;
        let pitch = mid + amp * (self.t as f64 * 0.8).sin();
        Some(freq_from_pitch(pitch) as f32)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let sweep = SweepSource {
        t: 0.0,
        lo_pitch: consts::DEFAULT_LO_PITCH as f64,
        hi_pitch: consts::DEFAULT_HI_PITCH as f64,
    };
    let names = |score: u32| format!("sweep-bot ({score})");
    let mut session = GameSession::new(0xC0FFEE, sweep, names, MemoryStore::new());

    // No assets to load in a headless run; ready immediately
    session.notify_assets_ready();
    session.request_phase(PhaseRequest::Init);

    // Run until death or a 5 minute cap, whichever comes first
    let mut events = Vec::new();
    for _ in 0..(5 * 60 * 60) {
        events.extend(session.tick(DT));
        if session.phase() == GamePhase::Dead {
            break;
        }
    }

    for event in &events {
        match event {
            SessionEvent::PhaseChanged { last, new, info } => {
                println!("phase {last:?} -> {new:?} (score {})", info.score);
            }
            SessionEvent::DifficultyChanged { last, new, .. } => {
                println!("difficulty {last:?} -> {new:?}");
            }
            SessionEvent::InitRejected { message } => println!("init rejected: {message}"),
            SessionEvent::ScoreRecorded { rank, score } => {
                println!("score {score} recorded at rank {rank}");
            }
        }
    }

    println!("final score: {}", session.score());
    for (i, entry) in session.high_scores().entries.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, entry.name, entry.score);
    }
}
