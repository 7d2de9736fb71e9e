//! Dedicated session loop thread (native only)
//!
//! [`SessionRunner`] moves a [`Session`] onto its own thread. Input arrives
//! over a channel and is queued inside the session, so every tick observes
//! the commands received before it as one set. The latest snapshot is
//! shared with readers after every loop iteration.
//!
//! Stopping is deterministic: [`SessionRunner::stop`] signals the thread,
//! joins it and hands the session back. Nothing runs after it returns.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};

use crate::session::{Command, Session};
use crate::snapshot::RenderSnapshot;

/// Messages from the host to the loop thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerMessage {
    Command(Command),
    /// Begin a brand-new run
    Restart,
    /// Abort the run and exit the loop
    Stop,
}

type SharedSnapshot = Arc<Mutex<Arc<RenderSnapshot>>>;

pub struct SessionRunner {
    tx: Sender<RunnerMessage>,
    snapshot: SharedSnapshot,
    handle: Option<JoinHandle<Session>>,
}

impl SessionRunner {
    /// Start the session and spawn its loop thread
    pub fn spawn(mut session: Session) -> std::io::Result<Self> {
        let (tx, rx) = unbounded();
        session.start();
        let snapshot = Arc::new(Mutex::new(session.snapshot()));
        let shared = Arc::clone(&snapshot);

        let handle = thread::Builder::new()
            .name("session-loop".to_string())
            .spawn(move || run_loop(session, rx, shared))?;

        Ok(Self {
            tx,
            snapshot,
            handle: Some(handle),
        })
    }

    /// Queue a command; false once the loop has exited
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(RunnerMessage::Command(command)).is_ok()
    }

    pub fn restart(&self) -> bool {
        self.tx.send(RunnerMessage::Restart).is_ok()
    }

    /// Most recently published snapshot
    pub fn snapshot(&self) -> Arc<RenderSnapshot> {
        let guard = self.snapshot.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the loop and return the session. Only the first call returns it.
    pub fn stop(&mut self) -> Option<Session> {
        let handle = self.handle.take()?;
        let _ = self.tx.send(RunnerMessage::Stop);
        match handle.join() {
            Ok(session) => Some(session),
            Err(_) => {
                log::error!("Session loop panicked");
                None
            }
        }
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(mut session: Session, rx: Receiver<RunnerMessage>, shared: SharedSnapshot) -> Session {
    let origin = Instant::now();
    let wait = Duration::from_micros((session.settings().tick_ms * 1000.0) as u64);
    log::info!("Session loop started");

    'outer: loop {
        let mut next = match rx.recv_timeout(wait) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        // Drain everything already queued before ticking
        while let Some(message) = next {
            match message {
                RunnerMessage::Command(command) => session.command(command),
                RunnerMessage::Restart => session.start(),
                RunnerMessage::Stop => break 'outer,
            }
            next = match rx.try_recv() {
                Ok(message) => Some(message),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break 'outer,
            };
        }

        session.advance(origin.elapsed());

        let latest = session.snapshot();
        let mut guard = shared.lock().unwrap_or_else(|p| p.into_inner());
        if !Arc::ptr_eq(&guard, &latest) {
            *guard = latest;
        }
    }

    session.back_to_menu();
    log::info!("Session loop stopped");
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameSettings;
    use crate::sim::SessionPhase;

    fn quiet() -> GameSettings {
        GameSettings {
            obstacle_frequency: 0.0,
            coin_frequency: 0.0,
            power_up_frequency: 0.0,
            seed: Some(8),
            ..Default::default()
        }
    }

    #[test]
    fn test_runner_ticks_and_stops() {
        let mut runner = SessionRunner::spawn(Session::new(quiet())).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while runner.snapshot().tick < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(runner.snapshot().tick >= 3);

        let session = runner.stop().unwrap();
        assert!(!session.is_active());
        assert!(!session.is_clock_running());
        assert!(runner.is_finished());

        // Idempotent
        assert!(runner.stop().is_none());
        assert!(!runner.send(Command::Jump));
    }

    #[test]
    fn test_runner_pause_is_visible_in_snapshot() {
        let mut runner = SessionRunner::spawn(Session::new(quiet())).unwrap();
        assert!(runner.send(Command::TogglePause));

        let deadline = Instant::now() + Duration::from_secs(5);
        while runner.snapshot().phase != SessionPhase::Paused && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        let paused = runner.snapshot();
        assert_eq!(paused.phase, SessionPhase::Paused);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(runner.snapshot().tick, paused.tick);

        let session = runner.stop().unwrap();
        assert_eq!(session.state().time_ticks, paused.tick);
    }
}
