//! # Session Metrics Module
//!
//! Rolling vocal metrics for one analysis session: the lowest, highest,
//! and average fundamental frequency across all voiced observations.
//! Silent ticks are never fed in; the session controller owns a single
//! aggregator and calls it from one thread.

use serde::Serialize;

use crate::tuning::NoteReading;

/// One end of the observed pitch range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchExtreme {
    /// Fundamental frequency in Hz.
    pub hz: f32,
    /// Note name at the time of the observation (e.g. "A", "C#").
    pub note_name: &'static str,
    /// Octave of that note.
    pub octave: i32,
}

/// Point-in-time snapshot of the session's vocal metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionMetrics {
    /// Lowest voiced pitch observed, `None` before the first observation.
    pub min_pitch: Option<PitchExtreme>,
    /// Highest voiced pitch observed, `None` before the first observation.
    pub max_pitch: Option<PitchExtreme>,
    /// Arithmetic mean of all voiced observations, 0.0 while empty.
    pub avg_pitch_hz: f32,
    /// Number of voiced observations so far.
    pub sample_count: usize,
}

/// Accumulates min/max/average pitch over a session.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    min_pitch: Option<PitchExtreme>,
    max_pitch: Option<PitchExtreme>,
    /// Running sum in f64; sessions run for thousands of ticks and f32
    /// accumulation would visibly drift the average.
    sum_hz: f64,
    count: usize,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one voiced observation.
    ///
    /// The first observation initializes both extremes; later ones widen
    /// them by strict comparison on `hz`.
    pub fn observe(&mut self, hz: f32, reading: &NoteReading) {
        let extreme = PitchExtreme {
            hz,
            note_name: reading.note_name,
            octave: reading.octave,
        };

        match &self.min_pitch {
            Some(current) if hz >= current.hz => {}
            _ => self.min_pitch = Some(extreme.clone()),
        }
        match &self.max_pitch {
            Some(current) if hz <= current.hz => {}
            _ => self.max_pitch = Some(extreme),
        }

        self.sum_hz += hz as f64;
        self.count += 1;
    }

    /// Clears all metrics back to the empty state in a single assignment,
    /// so no consumer can observe a partially reset aggregator.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> SessionMetrics {
        SessionMetrics {
            min_pitch: self.min_pitch.clone(),
            max_pitch: self.max_pitch.clone(),
            avg_pitch_hz: if self.count > 0 {
                (self.sum_hz / self.count as f64) as f32
            } else {
                0.0
            },
            sample_count: self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::note_from_frequency;

    fn observe_hz(aggregator: &mut SessionAggregator, hz: f32) {
        let reading = note_from_frequency(hz);
        aggregator.observe(hz, &reading);
    }

    #[test]
    fn empty_session_has_no_metrics() {
        let aggregator = SessionAggregator::new();
        let metrics = aggregator.snapshot();
        assert!(metrics.min_pitch.is_none());
        assert!(metrics.max_pitch.is_none());
        assert_eq!(metrics.avg_pitch_hz, 0.0);
        assert_eq!(metrics.sample_count, 0);
    }

    #[test]
    fn first_observation_initializes_both_extremes() {
        let mut aggregator = SessionAggregator::new();
        observe_hz(&mut aggregator, 220.0);
        let metrics = aggregator.snapshot();
        assert_eq!(metrics.min_pitch.as_ref().unwrap().hz, 220.0);
        assert_eq!(metrics.max_pitch.as_ref().unwrap().hz, 220.0);
        assert_eq!(metrics.min_pitch.unwrap().note_name, "A");
    }

    #[test]
    fn min_max_and_average_widen_correctly() {
        let mut aggregator = SessionAggregator::new();
        observe_hz(&mut aggregator, 100.0);
        observe_hz(&mut aggregator, 50.0);
        observe_hz(&mut aggregator, 200.0);

        let metrics = aggregator.snapshot();
        assert_eq!(metrics.min_pitch.as_ref().unwrap().hz, 50.0);
        assert_eq!(metrics.max_pitch.as_ref().unwrap().hz, 200.0);
        assert!((metrics.avg_pitch_hz - 116.67).abs() < 0.01);
        assert_eq!(metrics.sample_count, 3);
        // The range invariant holds whenever both ends are set.
        assert!(metrics.min_pitch.unwrap().hz <= metrics.max_pitch.unwrap().hz);
    }

    #[test]
    fn reset_returns_to_the_empty_state() {
        let mut aggregator = SessionAggregator::new();
        observe_hz(&mut aggregator, 100.0);
        observe_hz(&mut aggregator, 200.0);
        aggregator.reset();

        let metrics = aggregator.snapshot();
        assert!(metrics.min_pitch.is_none());
        assert!(metrics.max_pitch.is_none());
        assert_eq!(metrics.avg_pitch_hz, 0.0);
        assert_eq!(metrics.sample_count, 0);
    }
}
