//! # Phonation Stopwatch Module
//!
//! Manual stopwatch for timing phonation and breath exercises during a
//! session, with recorded lap times in the clinical `MM:SS.cc` format.

use std::time::{Duration, Instant};

/// A pausable stopwatch with recorded lap times.
#[derive(Debug, Default)]
pub struct Stopwatch {
    /// Set while the stopwatch is running.
    started_at: Option<Instant>,
    /// Time accumulated across previous run intervals.
    accumulated: Duration,
    recorded: Vec<String>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts or resumes timing. Calling `start` while running is a no-op.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Pauses timing, keeping the accumulated elapsed time.
    pub fn pause(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += started_at.elapsed();
        }
    }

    /// Stops timing and clears the elapsed time and all recorded laps.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total elapsed time, including the currently running interval.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.accumulated + started_at.elapsed(),
            None => self.accumulated,
        }
    }

    /// Records the current elapsed time as a lap and returns it formatted.
    pub fn record(&mut self) -> String {
        let lap = format_time(self.elapsed());
        self.recorded.push(lap.clone());
        lap
    }

    /// All recorded laps, oldest first.
    pub fn recorded(&self) -> &[String] {
        &self.recorded
    }
}

/// Formats a duration as `MM:SS.cc` (minutes, seconds, centiseconds).
pub fn format_time(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let centis = (total_ms % 1_000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}
