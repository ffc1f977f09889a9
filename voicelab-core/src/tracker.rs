//! # Pitch Tracker Module
//!
//! Per-tick analysis pipeline: one captured frame goes through the pitch
//! detector, a voiced estimate is mapped to a note and fed to the session
//! metrics and the timeline history, and the resulting reading is kept as
//! the latest value for the display layer to poll.
//!
//! The tracker is single-owner state. It does no locking; a capture
//! pipeline with multiple threads must serialize calls into
//! [`PitchTracker::process_frame`].

use crate::AnalysisResult;
use crate::history::{DEFAULT_HISTORY_CAPACITY, HistoryEntry, HistoryRing};
use crate::pitch::{DEFAULT_AMPLITUDE_THRESHOLD, PitchDetector};
use crate::session::{SessionAggregator, SessionMetrics};
use crate::tuning;

/// Drives pitch detection over a stream of audio frames and maintains the
/// session state derived from it.
pub struct PitchTracker {
    sample_rate: u32,
    amplitude_threshold: f32,
    detector: PitchDetector,
    session: SessionAggregator,
    history: HistoryRing,
    latest: AnalysisResult,
}

impl PitchTracker {
    /// Creates a tracker for frames of `frame_size` samples captured at
    /// `sample_rate` Hz, with the default noise gate and history capacity.
    pub fn new(sample_rate: u32, frame_size: usize) -> Self {
        PitchTracker {
            sample_rate,
            amplitude_threshold: DEFAULT_AMPLITUDE_THRESHOLD,
            detector: PitchDetector::new(frame_size),
            session: SessionAggregator::new(),
            history: HistoryRing::new(DEFAULT_HISTORY_CAPACITY),
            latest: AnalysisResult::unvoiced(),
        }
    }

    /// Overrides the RMS noise gate.
    pub fn with_amplitude_threshold(mut self, amplitude_threshold: f32) -> Self {
        self.amplitude_threshold = amplitude_threshold;
        self
    }

    /// Overrides the number of history entries retained for the timeline.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = HistoryRing::new(capacity);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Processes one captured frame and returns its analysis result.
    ///
    /// Every call appends exactly one history entry, voiced or not; only
    /// voiced results feed the session metrics. Frames must arrive in
    /// capture order.
    pub fn process_frame(&mut self, frame: &[f32]) -> AnalysisResult {
        let result = match self
            .detector
            .detect(frame, self.sample_rate, self.amplitude_threshold)
        {
            Some(frequency) => {
                let reading = tuning::note_from_frequency(frequency);
                self.session.observe(frequency, &reading);
                self.history.push(HistoryEntry {
                    cents: reading.cents,
                    note_index: reading.note_index,
                });
                AnalysisResult {
                    frequency_hz: frequency,
                    voiced: true,
                    reading,
                }
            }
            None => {
                self.history.push(HistoryEntry::unvoiced());
                AnalysisResult::unvoiced()
            }
        };

        self.latest = result.clone();
        result
    }

    /// The most recent analysis result.
    pub fn latest(&self) -> &AnalysisResult {
        &self.latest
    }

    /// Current session metrics snapshot.
    pub fn metrics(&self) -> SessionMetrics {
        self.session.snapshot()
    }

    /// The most recent `max_items` timeline entries, oldest first.
    pub fn history(&self, max_items: usize) -> Vec<HistoryEntry> {
        self.history.snapshot(max_items)
    }

    /// Clears session metrics, the timeline, and the latest reading.
    /// Valid at any point, including mid-stream.
    pub fn reset(&mut self) {
        self.session.reset();
        self.history.clear();
        self.latest = AnalysisResult::unvoiced();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::UNVOICED_NOTE_INDEX;

    const SAMPLE_RATE: u32 = 44100;
    const FRAME_SIZE: usize = 2048;

    fn sine_frame(frequency: f32) -> Vec<f32> {
        (0..FRAME_SIZE)
            .map(|i| {
                0.8 * (2.0 * std::f32::consts::PI * frequency * i as f32 / SAMPLE_RATE as f32)
                    .sin()
            })
            .collect()
    }

    #[test]
    fn voiced_frames_feed_metrics_and_history() {
        let mut tracker = PitchTracker::new(SAMPLE_RATE, FRAME_SIZE);
        let result = tracker.process_frame(&sine_frame(220.0));

        assert!(result.voiced);
        assert_eq!(result.reading.note_name, "A");
        assert_eq!(result.reading.octave, 3);

        let metrics = tracker.metrics();
        assert_eq!(metrics.sample_count, 1);
        assert_eq!(tracker.history(usize::MAX).len(), 1);
        assert_eq!(tracker.latest().reading.note_index, 57);
    }

    #[test]
    fn silent_frames_tick_the_history_but_not_the_metrics() {
        let mut tracker = PitchTracker::new(SAMPLE_RATE, FRAME_SIZE);
        tracker.process_frame(&vec![0.0; FRAME_SIZE]);
        tracker.process_frame(&vec![0.0; FRAME_SIZE]);

        assert_eq!(tracker.metrics().sample_count, 0);
        let history = tracker.history(usize::MAX);
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.note_index == UNVOICED_NOTE_INDEX));
        assert!(!tracker.latest().voiced);
    }

    #[test]
    fn reset_clears_all_derived_state() {
        let mut tracker = PitchTracker::new(SAMPLE_RATE, FRAME_SIZE);
        tracker.process_frame(&sine_frame(220.0));
        tracker.reset();

        assert_eq!(tracker.metrics().sample_count, 0);
        assert!(tracker.metrics().min_pitch.is_none());
        assert!(tracker.history(usize::MAX).is_empty());
        assert!(!tracker.latest().voiced);
    }

    #[test]
    fn history_capacity_override_applies() {
        let mut tracker =
            PitchTracker::new(SAMPLE_RATE, FRAME_SIZE).with_history_capacity(2);
        for _ in 0..5 {
            tracker.process_frame(&vec![0.0; FRAME_SIZE]);
        }
        assert_eq!(tracker.history(usize::MAX).len(), 2);
    }
}
