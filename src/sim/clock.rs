//! Fixed-rate tick clock
//!
//! The host reports wall time once per frame; the clock turns that into a
//! whole number of fixed ticks. A stopped clock yields nothing, and the first
//! frame after (re)starting only establishes a baseline, so time spent
//! stopped or paused never turns into ticks.

use std::time::Duration;

use crate::settings::GameSettings;

#[derive(Debug, Clone)]
pub struct Clock {
    tick_ms: f32,
    max_frame_ms: f32,
    max_substeps: u32,
    running: bool,
    last: Option<Duration>,
    accumulator: f32,
    ticks: u64,
}

impl Clock {
    pub fn new(tick_ms: f32, max_frame_ms: f32, max_substeps: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1.0),
            max_frame_ms: max_frame_ms.max(tick_ms),
            max_substeps: max_substeps.max(1),
            running: false,
            last: None,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(
            settings.tick_ms,
            settings.max_frame_ms,
            settings.max_substeps,
        )
    }

    /// Begin (or resume) delivering ticks
    pub fn start(&mut self) {
        self.running = true;
        self.last = None;
        self.accumulator = 0.0;
    }

    /// Stop delivering ticks. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.running = false;
        self.last = None;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Length of one tick in ms
    pub fn tick_ms(&self) -> f32 {
        self.tick_ms
    }

    /// Total ticks delivered since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Account for host time `now` and return how many ticks are due
    pub fn frame(&mut self, now: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        let Some(last) = self.last.replace(now) else {
            return 0;
        };

        let elapsed_ms = now.saturating_sub(last).as_micros() as f32 / 1000.0;
        self.accumulator += elapsed_ms.min(self.max_frame_ms);

        let mut due = 0;
        while self.accumulator >= self.tick_ms && due < self.max_substeps {
            self.accumulator -= self.tick_ms;
            due += 1;
        }
        // Drop what could not be caught up
        if due == self.max_substeps {
            self.accumulator = self.accumulator.min(self.tick_ms);
        }

        self.ticks += due as u64;
        due
    }
}
