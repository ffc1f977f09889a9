// voicelab-core/src/lib.rs

//! The core logic for the real-time vocal pitch tracker.
//! This crate is responsible for audio capture, fundamental-frequency
//! estimation, note mapping, and session statistics. It is completely
//! headless and contains no UI code.

pub mod audio;
pub mod history;
pub mod pitch;
pub mod session;
pub mod stopwatch;
pub mod tracker;
pub mod tuning;

use serde::Serialize;

use crate::tuning::NoteReading;

/// Represents the result of a single audio analysis frame.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// The detected fundamental frequency in Hz, 0.0 when unvoiced.
    pub frequency_hz: f32,
    /// Whether the frame contained a detectable voiced pitch.
    pub voiced: bool,
    /// The nearest equal-tempered note, or the unvoiced sentinel reading.
    pub reading: NoteReading,
}

impl AnalysisResult {
    /// The result reported for silent, out-of-band, or degenerate frames.
    pub fn unvoiced() -> Self {
        AnalysisResult {
            frequency_hz: 0.0,
            voiced: false,
            reading: NoteReading::unvoiced(),
        }
    }
}
