//! Game session state machine
//!
//! Owns the entity list, phase, difficulty, score, pitch range, and the
//! high-score ledger. An external frame driver calls [`GameSession::tick`]
//! once per frame; pitch estimation, naming, and durable storage are
//! injected through the collaborator traits below.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Difficulty, Entity, GameInfo, GamePhase, Pipe, Player, Snapshot};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::pitch;

/// Pull accessor for the latest estimated input frequency in Hz. `None`
/// means no confident estimate this frame; the session holds the last
/// known position.
pub trait PitchSource {
    fn current_hz(&mut self) -> Option<f32>;
}

impl<F: FnMut() -> Option<f32>> PitchSource for F {
    fn current_hz(&mut self) -> Option<f32> {
        self()
    }
}

/// Collaborator queried for a player name on a qualifying high score.
/// Re-queried until it returns a non-empty name.
pub trait NameProvider {
    fn request_name(&mut self, score: u32) -> String;
}

impl<F: FnMut(u32) -> String> NameProvider for F {
    fn request_name(&mut self, score: u32) -> String {
        self(score)
    }
}

/// Durable storage for the serialized high-score ledger. Read once at
/// session construction, written after every qualifying death.
pub trait ScoreStore {
    fn read(&mut self) -> Option<String>;
    fn write(&mut self, blob: &str);
}

/// In-memory [`ScoreStore`] for tests and headless runs. Clones share the
/// same blob, so a caller can keep a handle and inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: std::rc::Rc<std::cell::RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self) -> Option<String> {
        self.inner.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&mut self) -> Option<String> {
        self.inner.borrow().clone()
    }

    fn write(&mut self, blob: &str) {
        *self.inner.borrow_mut() = Some(blob.to_string());
    }
}

/// Externally requested phase change, polled once per tick. Requests with
/// no valid transition from the current phase are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequest {
    /// Restart the game; honored from Ready, Alive, Dead, and Paused
    Init,
    /// Pause, remembering the current phase for restoration
    Paused,
    /// Resume the remembered phase; only valid while Paused
    Unpaused,
}

/// Notification emitted once per accepted transition or recorded score,
/// drained from [`GameSession::tick`]. Replaces callback-driven control
/// flow with a single-consumer queue.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged {
        last: GamePhase,
        new: GamePhase,
        info: GameInfo,
    },
    DifficultyChanged {
        last: Difficulty,
        new: Difficulty,
        info: GameInfo,
    },
    /// INIT validation failed; the session fell back to Ready
    InitRejected { message: String },
    /// A qualifying score was inserted into the ledger at `rank` (1-indexed)
    ScoreRecorded { rank: usize, score: u32 },
}

/// The deterministic game session. Single-writer: exactly one `tick` runs
/// at a time, and external readers only see [`GameSession::snapshot`],
/// which is republished whole at each mutation boundary.
pub struct GameSession {
    phase: GamePhase,
    pre_pause_phase: Option<GamePhase>,
    difficulty: Difficulty,

    requested_phase: Option<PhaseRequest>,
    requested_difficulty: Option<Difficulty>,
    lo_note: String,
    hi_note: String,

    /// Active pitch range, MIDI numbers, lo < hi
    lo_pitch: i64,
    hi_pitch: i64,

    entities: Vec<Entity>,
    next_id: u32,
    info: GameInfo,
    /// Last computed input position, held across no-estimate frames
    last_input_pos: f32,

    rng: Pcg32,
    high_scores: HighScores,

    pitch_source: Box<dyn PitchSource>,
    name_provider: Box<dyn NameProvider>,
    store: Box<dyn ScoreStore>,

    events: Vec<SessionEvent>,
    published: Snapshot,
}

impl GameSession {
    /// Create a session in the Load phase. The store is read immediately
    /// for the persisted high-score ledger; a missing or corrupt blob
    /// starts an empty one.
    pub fn new(
        seed: u64,
        pitch_source: impl PitchSource + 'static,
        name_provider: impl NameProvider + 'static,
        store: impl ScoreStore + 'static,
    ) -> Self {
        let mut store: Box<dyn ScoreStore> = Box::new(store);
        let high_scores = HighScores::load(store.read().as_deref());

        let mut session = Self {
            phase: GamePhase::Load,
            pre_pause_phase: None,
            difficulty: Difficulty::default(),
            requested_phase: None,
            requested_difficulty: None,
            lo_note: DEFAULT_LO_NOTE.to_string(),
            hi_note: DEFAULT_HI_NOTE.to_string(),
            lo_pitch: DEFAULT_LO_PITCH,
            hi_pitch: DEFAULT_HI_PITCH,
            entities: Vec::new(),
            next_id: 0,
            info: GameInfo::default(),
            last_input_pos: INPUT_FALLBACK_POS,
            rng: Pcg32::seed_from_u64(seed),
            high_scores,
            pitch_source: Box::new(pitch_source),
            name_provider: Box::new(name_provider),
            store,
            events: Vec::new(),
            published: Snapshot {
                phase: GamePhase::Load,
                difficulty: Difficulty::default(),
                info: GameInfo::default(),
                entities: Vec::new(),
                lo_pitch: DEFAULT_LO_PITCH,
                hi_pitch: DEFAULT_HI_PITCH,
                high_scores: HighScores::new(),
            },
        };
        session.publish();
        session
    }

    /// Consistent state as of the last mutation boundary
    pub fn snapshot(&self) -> &Snapshot {
        &self.published
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.info.score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// External loader signal permitting Load -> Ready. Ignored in any
    /// other phase.
    pub fn notify_assets_ready(&mut self) {
        if self.phase == GamePhase::Load {
            self.transition_phase(GamePhase::Ready);
            self.publish();
        }
    }

    /// Queue a phase request, applied at the start of the next tick
    pub fn request_phase(&mut self, request: PhaseRequest) {
        self.requested_phase = Some(request);
    }

    /// Queue a difficulty request. Mid-run changes only affect the gap
    /// size of future pipe spawns.
    pub fn request_difficulty(&mut self, difficulty: Difficulty) {
        self.requested_difficulty = Some(difficulty);
    }

    /// Set the note range validated and applied at the next INIT
    pub fn set_note_range(&mut self, lo_note: &str, hi_note: &str) {
        self.lo_note = lo_note.to_string();
        self.hi_note = hi_note.to_string();
    }

    /// Advance the simulation by `dt` seconds, returning the events this
    /// tick produced (including any queued by requests since the last one).
    pub fn tick(&mut self, dt: f32) -> Vec<SessionEvent> {
        self.apply_requests();

        match self.phase {
            // Load/Ready idle; Dead and Paused sit until an external request
            GamePhase::Load | GamePhase::Ready | GamePhase::Dead | GamePhase::Paused => {}
            GamePhase::Init => self.run_init(),
            GamePhase::Alive => self.run_alive(dt),
        }

        self.publish();
        std::mem::take(&mut self.events)
    }

    /// Apply externally requested transitions per the phase table
    fn apply_requests(&mut self) {
        if let Some(difficulty) = self.requested_difficulty.take() {
            if difficulty != self.difficulty {
                let last = self.difficulty;
                self.difficulty = difficulty;
                log::info!("Difficulty {last:?} -> {difficulty:?}");
                self.events.push(SessionEvent::DifficultyChanged {
                    last,
                    new: difficulty,
                    info: self.info,
                });
            }
        }

        let Some(request) = self.requested_phase.take() else {
            return;
        };
        match request {
            PhaseRequest::Init => match self.phase {
                GamePhase::Ready | GamePhase::Alive | GamePhase::Dead | GamePhase::Paused => {
                    self.pre_pause_phase = None;
                    self.transition_phase(GamePhase::Init);
                }
                // Assets not ready yet, or already initializing
                GamePhase::Load | GamePhase::Init => {}
            },
            PhaseRequest::Paused => {
                if self.phase != GamePhase::Paused {
                    self.pre_pause_phase = Some(self.phase);
                    self.transition_phase(GamePhase::Paused);
                }
            }
            PhaseRequest::Unpaused => {
                // Only valid from Paused; everything else is a no-op
                if self.phase == GamePhase::Paused {
                    if let Some(prior) = self.pre_pause_phase.take() {
                        self.transition_phase(prior);
                    }
                } else {
                    log::debug!("Ignoring unpause request while {:?}", self.phase);
                }
            }
        }
    }

    fn transition_phase(&mut self, next: GamePhase) {
        let last = self.phase;
        self.phase = next;
        log::info!("Phase {last:?} -> {next:?} (score {})", self.info.score);
        self.events.push(SessionEvent::PhaseChanged {
            last,
            new: next,
            info: self.info,
        });
    }

    /// INIT: validate the requested note range, then reset the run. An
    /// invalid or inverted range aborts back to Ready with the simulation
    /// otherwise untouched.
    fn run_init(&mut self) {
        let lo = match pitch::pitch_from_letter(&self.lo_note) {
            Ok(p) => p,
            Err(err) => {
                self.reject_init(format!("Invalid low note {:?}: {err}", self.lo_note));
                return;
            }
        };
        let hi = match pitch::pitch_from_letter(&self.hi_note) {
            Ok(p) => p,
            Err(err) => {
                self.reject_init(format!("Invalid high note {:?}: {err}", self.hi_note));
                return;
            }
        };
        if lo >= hi {
            self.reject_init(format!(
                "Low note {:?} is not below high note {:?}",
                self.lo_note, self.hi_note
            ));
            return;
        }

        self.lo_pitch = lo;
        self.hi_pitch = hi;
        self.entities.clear();
        self.info = GameInfo::default();
        self.last_input_pos = INPUT_FALLBACK_POS;

        let id = self.next_entity_id();
        self.entities.push(Entity::Player(Player::new(id)));

        self.transition_phase(GamePhase::Alive);
    }

    fn reject_init(&mut self, message: String) {
        log::warn!("Init rejected: {message}");
        self.events.push(SessionEvent::InitRejected { message });
        self.transition_phase(GamePhase::Ready);
    }

    /// One ALIVE frame: input, collision, spawn, scoring, motion, cleanup
    fn run_alive(&mut self, dt: f32) {
        // 1. Pull input and place the player
        if let Some(hz) = self.pitch_source.current_hz() {
            self.last_input_pos = self.position_for_freq(hz);
        }
        let input_pos = self.last_input_pos;
        let Some(player) = self.player_mut() else {
            return;
        };
        player.y = input_pos;
        let (px, py) = (player.x, player.y);

        // 2. Bounds and danger-zone check
        let collided = py < 0.0
            || py > FIELD_MAX
            || self
                .pipes()
                .any(|pipe| pipe.in_danger_zone(px, py));
        if collided {
            self.handle_death();
            return;
        }

        // 3. Spawn once the rightmost pipe clears the threshold
        let rightmost = self
            .pipes()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max);
        if rightmost < SPAWN_THRESHOLD_X {
            let gap_center = self.random_gap_center();
            let gap_size = self.difficulty.gap_size();
            let id = self.next_entity_id();
            log::debug!("Spawning pipe {id} with gap at {gap_center:.1} size {gap_size}");
            self.entities
                .push(Entity::Pipe(Pipe::new(id, gap_center, gap_size)));
        }

        // 4. Score every pipe fully passed that hasn't awarded yet
        for entity in &mut self.entities {
            if let Entity::Pipe(pipe) = entity {
                if pipe.passed(px) && !pipe.awarded_points {
                    pipe.awarded_points = true;
                    self.info.score += 1;
                    log::debug!("Passed pipe {}, score {}", pipe.id, self.info.score);
                }
            }
        }

        // 5. Advance motion, then drop fully exited pipes
        for entity in &mut self.entities {
            entity.tick(dt);
        }
        self.entities.retain(|e| !e.should_remove());
    }

    /// DEAD side effect: consult the ledger and persist on a qualifying
    /// score. The name collaborator is re-queried until it supplies a
    /// non-empty name; the transition does not complete before that.
    fn handle_death(&mut self) {
        self.transition_phase(GamePhase::Dead);

        let score = self.info.score;
        if !self.high_scores.qualifies(score) {
            return;
        }

        let name = loop {
            let name = self.name_provider.request_name(score);
            if !name.trim().is_empty() {
                break name;
            }
            log::warn!("Empty high-score name, asking again");
        };

        let rank = self.high_scores.insert(name, score);
        self.store.write(&self.high_scores.serialize());
        self.events.push(SessionEvent::ScoreRecorded { rank, score });
    }

    /// Map a frequency to a vertical field position: linear in pitch
    /// between `lo_pitch` and `hi_pitch`, clamped to the field.
    fn position_for_freq(&self, hz: f32) -> f32 {
        let span = (self.hi_pitch - self.lo_pitch) as f64;
        let pos = (pitch::pitch_from_freq(hz as f64) - self.lo_pitch as f64) * 100.0 / span;
        pos.clamp(0.0, FIELD_MAX as f64) as f32
    }

    /// Pick a gap center on one of the interior grid lines, excluding the
    /// outermost lines at the field edges.
    fn random_gap_center(&mut self) -> f32 {
        let span = self.hi_pitch - self.lo_pitch;
        if span < 3 {
            // Degenerate range with no interior lines to choose from
            return FIELD_MAX / 2.0;
        }
        let line = self.rng.random_range(1..=span - 2);
        line as f32 * FIELD_MAX / span as f32
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn player_mut(&mut self) -> Option<&mut Player> {
        self.entities.iter_mut().find_map(|e| match e {
            Entity::Player(p) => Some(p),
            _ => None,
        })
    }

    fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Pipe(p) => Some(p),
            _ => None,
        })
    }

    /// Republish the externally visible snapshot. Mutations inside a tick
    /// are never observable; readers only ever see the last published copy.
    fn publish(&mut self) {
        self.published = Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            info: self.info,
            entities: self.entities.clone(),
            lo_pitch: self.lo_pitch,
            hi_pitch: self.hi_pitch,
            high_scores: self.high_scores.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::freq_from_pitch;
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    /// Pitch source whose frequency a test can change mid-run
    #[derive(Clone, Default)]
    struct TestPitch(Rc<Cell<Option<f32>>>);

    impl TestPitch {
        fn at(hz: f32) -> Self {
            let pitch = Self::default();
            pitch.0.set(Some(hz));
            pitch
        }

        fn set(&self, hz: Option<f32>) {
            self.0.set(hz);
        }
    }

    impl PitchSource for TestPitch {
        fn current_hz(&mut self) -> Option<f32> {
            self.0.get()
        }
    }

    /// Name provider that fails a fixed number of times before answering
    struct FlakyNames {
        failures_left: u32,
        calls: Rc<Cell<u32>>,
    }

    impl NameProvider for FlakyNames {
        fn request_name(&mut self, _score: u32) -> String {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left > 0 {
                self.failures_left -= 1;
                String::new()
            } else {
                "bud".to_string()
            }
        }
    }

    fn ready_session(pitch: TestPitch, store: MemoryStore) -> GameSession {
        let mut session = GameSession::new(7, pitch, |_: u32| "ace".to_string(), store);
        session.notify_assets_ready();
        session
    }

    fn snapshot_player(session: &GameSession) -> Player {
        session
            .snapshot()
            .entities
            .iter()
            .find_map(|e| match e {
                Entity::Player(p) => Some(*p),
                _ => None,
            })
            .expect("player entity missing")
    }

    fn snapshot_pipes(session: &GameSession) -> Vec<Pipe> {
        session
            .snapshot()
            .entities
            .iter()
            .filter_map(|e| match e {
                Entity::Pipe(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_load_to_alive_flow() {
        let mut session =
            GameSession::new(1, TestPitch::at(220.0), |_: u32| "ace".to_string(), MemoryStore::new());
        assert_eq!(session.phase(), GamePhase::Load);

        // Init is not honored before assets are ready
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Load);

        session.notify_assets_ready();
        assert_eq!(session.phase(), GamePhase::Ready);

        session.request_phase(PhaseRequest::Init);
        let events = session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Alive);
        assert_eq!(session.score(), 0);
        assert_eq!(
            session
                .snapshot()
                .entities
                .iter()
                .filter(|e| matches!(e, Entity::Player(_)))
                .count(),
            1
        );
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::PhaseChanged {
                last: GamePhase::Init,
                new: GamePhase::Alive,
                ..
            }
        )));
    }

    #[test]
    fn test_init_rejected_on_inverted_range() {
        let mut session = ready_session(TestPitch::at(220.0), MemoryStore::new());
        session.set_note_range("C4", "C3");
        session.request_phase(PhaseRequest::Init);
        let events = session.tick(DT);

        assert_eq!(session.phase(), GamePhase::Ready);
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::InitRejected { .. })));
    }

    #[test]
    fn test_init_rejected_on_invalid_letter() {
        let mut session = ready_session(TestPitch::at(220.0), MemoryStore::new());
        session.set_note_range("H9", "C4");
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Ready);

        // Simulation state untouched; a valid range still starts the game
        session.set_note_range("C3", "C4");
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Alive);
    }

    #[test]
    fn test_input_maps_linearly_and_clamps() {
        // Default range C3..C4 (48..60); pitch 54 sits exactly mid-field
        let pitch = TestPitch::at(freq_from_pitch(54.0) as f32);
        let mut session = ready_session(pitch.clone(), MemoryStore::new());
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        session.tick(DT);
        assert!((snapshot_player(&session).y - 50.0).abs() < 0.01);

        // Way above the range clamps to the top edge rather than dying
        pitch.set(Some(freq_from_pitch(80.0) as f32));
        session.tick(DT);
        assert_eq!(snapshot_player(&session).y, 100.0);
        assert_eq!(session.phase(), GamePhase::Alive);
    }

    #[test]
    fn test_sentinel_holds_last_position() {
        let pitch = TestPitch::at(freq_from_pitch(54.0) as f32);
        let mut session = ready_session(pitch.clone(), MemoryStore::new());
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        session.tick(DT);
        let held = snapshot_player(&session).y;

        pitch.set(None);
        session.tick(DT);
        session.tick(DT);
        assert_eq!(snapshot_player(&session).y, held);
    }

    #[test]
    fn test_pause_preserves_state_and_restores_alive() {
        let mut session = ready_session(TestPitch::at(220.0), MemoryStore::new());
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        for _ in 0..10 {
            session.tick(DT);
        }

        session.request_phase(PhaseRequest::Paused);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Paused);
        let frozen = session.snapshot().entities.clone();

        // Paused frames advance nothing
        for _ in 0..20 {
            session.tick(DT);
        }
        assert_eq!(session.snapshot().entities, frozen);

        session.request_phase(PhaseRequest::Unpaused);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Alive);
    }

    #[test]
    fn test_unpause_is_noop_outside_paused() {
        let mut session = ready_session(TestPitch::at(220.0), MemoryStore::new());
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);

        session.request_phase(PhaseRequest::Unpaused);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Alive);
    }

    #[test]
    fn test_death_records_score_and_persists() {
        // Hard gaps never reach the bottom edge, so a floor-hugging player
        // dies on the first pipe that arrives.
        let pitch = TestPitch::at(freq_from_pitch(20.0) as f32);
        let store = MemoryStore::new();
        let mut session = ready_session(pitch, store.clone());
        session.request_difficulty(Difficulty::Hard);
        session.request_phase(PhaseRequest::Init);

        for _ in 0..2000 {
            session.tick(DT);
            if session.phase() == GamePhase::Dead {
                break;
            }
        }
        assert_eq!(session.phase(), GamePhase::Dead);

        let ledger = HighScores::load(store.blob().as_deref());
        assert_eq!(ledger.entries.len(), 1);
        assert_eq!(ledger.entries[0].name, "ace");
        assert_eq!(ledger.entries[0].score, session.score());
    }

    #[test]
    fn test_empty_names_are_requeried() {
        let pitch = TestPitch::at(freq_from_pitch(20.0) as f32);
        let store = MemoryStore::new();
        let calls = Rc::new(Cell::new(0));
        let names = FlakyNames {
            failures_left: 2,
            calls: calls.clone(),
        };
        let mut session = GameSession::new(7, pitch, names, store.clone());
        session.notify_assets_ready();
        session.request_difficulty(Difficulty::Hard);
        session.request_phase(PhaseRequest::Init);

        for _ in 0..2000 {
            session.tick(DT);
            if session.phase() == GamePhase::Dead {
                break;
            }
        }
        assert_eq!(session.phase(), GamePhase::Dead);
        assert_eq!(calls.get(), 3);

        let ledger = HighScores::load(store.blob().as_deref());
        assert_eq!(ledger.entries[0].name, "bud");
    }

    #[test]
    fn test_init_from_dead_restarts_without_reusing_ids() {
        let pitch = TestPitch::at(freq_from_pitch(20.0) as f32);
        let mut session = ready_session(pitch.clone(), MemoryStore::new());
        session.request_difficulty(Difficulty::Hard);
        session.request_phase(PhaseRequest::Init);

        let first_player_id = {
            session.tick(DT);
            snapshot_player(&session).id
        };
        for _ in 0..2000 {
            session.tick(DT);
            if session.phase() == GamePhase::Dead {
                break;
            }
        }
        assert_eq!(session.phase(), GamePhase::Dead);

        pitch.set(Some(freq_from_pitch(54.0) as f32));
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        assert_eq!(session.phase(), GamePhase::Alive);
        assert_eq!(session.score(), 0);
        assert!(snapshot_player(&session).id > first_player_id);
    }

    #[test]
    fn test_difficulty_change_affects_future_spawns_only() {
        let mut session = ready_session(TestPitch::at(220.0), MemoryStore::new());
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);
        session.tick(DT);
        assert_eq!(snapshot_pipes(&session)[0].gap_size, GAP_NORMAL);

        session.request_difficulty(Difficulty::Hard);
        for _ in 0..2000 {
            session.tick(DT);
            if snapshot_pipes(&session).len() >= 2 || session.phase() != GamePhase::Alive {
                break;
            }
        }
        let pipes = snapshot_pipes(&session);
        assert!(pipes.len() >= 2, "second pipe never spawned");
        assert_eq!(pipes[0].gap_size, GAP_NORMAL);
        assert_eq!(pipes[1].gap_size, GAP_HARD);
    }

    #[test]
    fn test_scoring_awards_each_pipe_exactly_once() {
        // Range C4..D#4 has a single interior grid line at 33.3, so every
        // gap is centered there; holding pitch 61 keeps the player inside
        // every gap and alive indefinitely.
        let pitch = TestPitch::at(freq_from_pitch(61.0) as f32);
        let mut session = ready_session(pitch, MemoryStore::new());
        session.request_difficulty(Difficulty::Easy);
        session.set_note_range("C4", "D#4");
        session.request_phase(PhaseRequest::Init);
        session.tick(DT);

        let mut awarded_ids = std::collections::HashSet::new();
        for _ in 0..1200 {
            session.tick(DT);
            for pipe in snapshot_pipes(&session) {
                if pipe.awarded_points {
                    awarded_ids.insert(pipe.id);
                }
            }
        }
        assert_eq!(session.phase(), GamePhase::Alive);
        assert!(session.score() >= 2, "expected several pipes passed");
        assert_eq!(session.score() as usize, awarded_ids.len());
    }

    #[test]
    fn test_determinism_same_seed_same_run() {
        let run = || {
            let mut session = ready_session(TestPitch::at(220.0), MemoryStore::new());
            session.request_phase(PhaseRequest::Init);
            for _ in 0..300 {
                session.tick(DT);
            }
            (session.snapshot().entities.clone(), session.score())
        };
        assert_eq!(run(), run());
    }
}
