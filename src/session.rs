//! Session state machine
//!
//! A [`Session`] owns one run at a time: Playing <-> Paused, Playing ->
//! GameOver. It feeds fixed ticks from its [`Clock`] into the simulation,
//! queues player commands so each tick sees one consistent input set,
//! publishes a fresh [`RenderSnapshot`] after every tick and, on GameOver,
//! flushes the run to the persistence gateway exactly once.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::achievements::Unlocked;
use crate::highscores::{HighScores, now_timestamp};
use crate::persistence::{FlushReport, PersistenceGateway, record_session};
use crate::settings::GameSettings;
use crate::sim::{Clock, GameEvent, GameState, LaneMove, SessionPhase, TickInput, tick};
use crate::snapshot::RenderSnapshot;

/// Logical player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Jump,
    TogglePause,
}

/// What a finished (or aborted) run reports to the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub score: u64,
    pub coins: u32,
    pub level: u32,
    /// Simulated play time survived
    pub elapsed_ms: f64,
}

impl SessionResults {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            coins: state.coins,
            level: state.level,
            elapsed_ms: state.elapsed_ms,
        }
    }
}

/// Everything written when a run ended
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverReport {
    pub results: SessionResults,
    /// `None` when the session has no gateway
    pub flush: Option<FlushReport>,
    pub leaderboard_rank: Option<usize>,
    pub new_achievements: Vec<&'static str>,
}

pub type EndCallback = Box<dyn FnMut(&SessionResults) + Send>;

pub struct Session {
    settings: GameSettings,
    state: GameState,
    clock: Clock,
    /// Commands received since the last tick
    pending: TickInput,
    gateway: Option<Box<dyn PersistenceGateway + Send>>,
    on_end: Option<EndCallback>,
    snapshot: Arc<RenderSnapshot>,
    /// Between `start` and `back_to_menu`
    active: bool,
    /// GameOver already handled for the current run
    finished: bool,
    report: Option<GameOverReport>,
}

impl Session {
    /// Create an idle session; nothing ticks until [`Session::start`]
    pub fn new(settings: GameSettings) -> Self {
        let settings = settings.validate();
        let state = GameState::new(settings.seed.unwrap_or(0), &settings);
        let snapshot = Arc::new(RenderSnapshot::capture(&state, false));
        Self {
            clock: Clock::from_settings(&settings),
            settings,
            state,
            pending: TickInput::default(),
            gateway: None,
            on_end: None,
            snapshot,
            active: false,
            finished: false,
            report: None,
        }
    }

    pub fn with_gateway(mut self, gateway: impl PersistenceGateway + Send + 'static) -> Self {
        self.gateway = Some(Box::new(gateway));
        self
    }

    /// Called once per run, on entering GameOver
    pub fn on_end(mut self, callback: impl FnMut(&SessionResults) + Send + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    /// Reset all run state and begin ticking. Also used to restart from
    /// Paused or GameOver; every call begins a brand-new run.
    pub fn start(&mut self) {
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        self.state = GameState::new(seed, &self.settings);
        self.pending.clear();
        self.active = true;
        self.finished = false;
        self.report = None;
        self.clock.start();
        self.publish();
        log::info!(
            "Session started (seed {}, difficulty {})",
            seed,
            self.settings.difficulty.as_str()
        );
    }

    /// Accept a command from the input layer.
    ///
    /// Movement is queued for the next tick and only while Playing.
    /// TogglePause takes effect immediately.
    pub fn command(&mut self, command: Command) {
        if !self.active {
            return;
        }
        match command {
            Command::TogglePause => self.toggle_pause(),
            _ if self.state.phase != SessionPhase::Playing => {}
            Command::MoveLeft => self.pending.lane_moves.push(LaneMove::Left),
            Command::MoveRight => self.pending.lane_moves.push(LaneMove::Right),
            Command::Jump => self.pending.jump = true,
        }
    }

    pub fn pause(&mut self) {
        if !self.active || self.state.phase != SessionPhase::Playing {
            return;
        }
        self.state.phase = SessionPhase::Paused;
        self.clock.stop();
        self.pending.clear();
        self.publish();
        log::info!("Paused at tick {}", self.state.time_ticks);
    }

    pub fn resume(&mut self) {
        if !self.active || self.state.phase != SessionPhase::Paused {
            return;
        }
        self.state.phase = SessionPhase::Playing;
        self.clock.start();
        self.publish();
        log::info!("Resumed at tick {}", self.state.time_ticks);
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            SessionPhase::Playing => self.pause(),
            SessionPhase::Paused => self.resume(),
            SessionPhase::GameOver => {}
        }
    }

    /// Report host time and run every tick that has come due
    pub fn advance(&mut self, now: Duration) -> Vec<GameEvent> {
        let due = self.clock.frame(now);
        let mut events = Vec::new();
        for _ in 0..due {
            if !self.is_playing() {
                break;
            }
            events.extend(self.step());
        }
        events
    }

    /// Run exactly one tick (no-op unless Playing)
    pub fn step(&mut self) -> Vec<GameEvent> {
        if !self.is_playing() {
            return Vec::new();
        }

        let events = tick(
            &mut self.state,
            &self.pending,
            &self.settings,
            self.clock.tick_ms(),
        );
        self.pending.clear();

        if self.state.phase == SessionPhase::GameOver {
            self.finish();
        }
        self.publish();
        events
    }

    /// Abort the run: stop ticking without persisting or calling back
    pub fn back_to_menu(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.clock.stop();
        self.pending.clear();
        self.publish();
        if !self.finished {
            log::info!(
                "Session abandoned at tick {} (score {})",
                self.state.time_ticks,
                self.state.score
            );
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.clock.stop();

        let results = SessionResults::from_state(&self.state);
        log::info!(
            "Game over: score {}, coins {}, level {}, {:.1}s",
            results.score,
            results.coins,
            results.level,
            results.elapsed_ms / 1000.0
        );

        let report = self.flush(results);
        self.report = Some(report);
        if let Some(callback) = self.on_end.as_mut() {
            callback(&results);
        }
    }

    fn flush(&mut self, results: SessionResults) -> GameOverReport {
        let Some(gateway) = self.gateway.as_deref_mut() else {
            return GameOverReport {
                results,
                flush: None,
                leaderboard_rank: None,
                new_achievements: Vec::new(),
            };
        };

        let flush = record_session(&mut *gateway, &results);

        let mut leaderboard = HighScores::load(&*gateway);
        let leaderboard_rank = leaderboard.add(&results, now_timestamp());
        if leaderboard_rank.is_some() {
            if let Err(e) = leaderboard.save(&mut *gateway) {
                log::warn!("Leaderboard write failed: {}", e);
            }
        }

        let mut unlocked = Unlocked::load(&*gateway);
        let new_achievements = unlocked.evaluate(&flush.record, &results);
        if !new_achievements.is_empty() {
            log::info!("Achievements unlocked: {}", new_achievements.join(", "));
            if let Err(e) = unlocked.save(gateway) {
                log::warn!("Achievements write failed: {}", e);
            }
        }

        GameOverReport {
            results,
            flush: Some(flush),
            leaderboard_rank,
            new_achievements,
        }
    }

    fn publish(&mut self) {
        self.snapshot = Arc::new(RenderSnapshot::capture(&self.state, self.active));
    }

    fn is_playing(&self) -> bool {
        self.active && self.state.phase == SessionPhase::Playing
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<RenderSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Phase of the current or most recent run.
    ///
    /// An idle session (never started, or after [`Session::back_to_menu`])
    /// keeps reporting the last phase; use [`Session::is_active`] to tell
    /// whether a run is live.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// True between [`Session::start`] and [`Session::back_to_menu`]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn results(&self) -> SessionResults {
        SessionResults::from_state(&self.state)
    }

    /// Set once the current run has reached GameOver
    pub fn game_over_report(&self) -> Option<&GameOverReport> {
        self.report.as_ref()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn gateway(&self) -> Option<&dyn PersistenceGateway> {
        self.gateway.as_deref().map(|g| g as &dyn PersistenceGateway)
    }
}
