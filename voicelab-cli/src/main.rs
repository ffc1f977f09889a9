//! # VoiceLab - Real-Time Vocal Pitch Tracker
//!
//! Terminal frontend for the voicelab-core analysis pipeline. Captures
//! microphone audio on a CPAL stream, runs each frame through the pitch
//! tracker, and renders the current note, cent deviation, and frequency as
//! a live status line. On exit it prints the session's vocal metrics and
//! can export them, together with the recent pitch timeline, as JSON.
//!
//! ## Architecture
//! - **Capture**: CPAL input stream framing samples in the audio callback
//! - **Analysis**: this thread, draining the frame channel in capture order
//! - **Communication**: crossbeam channel between the two

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use cpal::traits::StreamTrait;
use crossbeam_channel::RecvTimeoutError;
use serde::Serialize;
use voicelab_core::audio::{self, FRAME_SIZE};
use voicelab_core::history::HistoryEntry;
use voicelab_core::pitch::DEFAULT_AMPLITUDE_THRESHOLD;
use voicelab_core::session::SessionMetrics;
use voicelab_core::stopwatch::format_time;
use voicelab_core::tracker::PitchTracker;
use voicelab_core::tuning::note_from_frequency;

#[derive(Parser, Debug)]
#[command(name = "voicelab", about = "Real-time vocal pitch tracker", version)]
struct Args {
    /// How long to listen, in seconds
    #[arg(long, default_value_t = 30)]
    duration: u64,

    /// RMS amplitude gate below which frames count as silence
    #[arg(long, default_value_t = DEFAULT_AMPLITUDE_THRESHOLD)]
    threshold: f32,

    /// Number of timeline entries to include in the exported report
    #[arg(long, default_value_t = 100)]
    history: usize,

    /// Write the session report as JSON to this file on exit
    #[arg(long)]
    export: Option<PathBuf>,
}

/// Everything the persistence side consumes, as plain data.
#[derive(Debug, Serialize)]
struct SessionReport {
    metrics: SessionMetrics,
    history: Vec<HistoryEntry>,
    elapsed: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Vec<f32>>(8);
    let (stream, sample_rate) =
        audio::start_audio_capture(frame_tx).context("failed to start audio capture")?;

    let mut tracker =
        PitchTracker::new(sample_rate, FRAME_SIZE).with_amplitude_threshold(args.threshold);

    eprintln!(
        "[MAIN] Listening for {} s (frame size {}, gate {})",
        args.duration, FRAME_SIZE, args.threshold
    );

    let started = Instant::now();
    let deadline = started + Duration::from_secs(args.duration);

    while Instant::now() < deadline {
        match frame_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(frame) => {
                let result = tracker.process_frame(&frame);
                let line = if result.voiced {
                    format!(
                        "{}{}  {:+6.1} cents  {:7.1} Hz",
                        result.reading.note_name,
                        result.reading.octave,
                        result.reading.cents,
                        result.frequency_hz
                    )
                } else {
                    "...".to_string()
                };
                print!("\r{:<40}", line);
                io::stdout().flush()?;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                eprintln!("\n[MAIN] Capture channel closed");
                break;
            }
        }
    }

    // Stop the stream before reporting so no further ticks arrive.
    if let Err(e) = stream.pause() {
        eprintln!("[MAIN] Error pausing stream: {}", e);
    }
    drop(stream);

    let elapsed = format_time(started.elapsed());
    let metrics = tracker.metrics();
    println!();
    print_summary(&metrics, &elapsed);

    if let Some(path) = args.export {
        let report = SessionReport {
            metrics,
            history: tracker.history(args.history),
            elapsed,
        };
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("Session report written to {}", path.display());
    }

    Ok(())
}

fn print_summary(metrics: &SessionMetrics, elapsed: &str) {
    println!("--- Session summary ({} elapsed) ---", elapsed);
    match (&metrics.min_pitch, &metrics.max_pitch) {
        (Some(min), Some(max)) => {
            println!("Lowest pitch:  {}{}  {:.1} Hz", min.note_name, min.octave, min.hz);
            println!("Highest pitch: {}{}  {:.1} Hz", max.note_name, max.octave, max.hz);
            let avg_reading = note_from_frequency(metrics.avg_pitch_hz);
            println!(
                "Average F0:    {:.1} Hz (near {}{})",
                metrics.avg_pitch_hz, avg_reading.note_name, avg_reading.octave
            );
            println!("Voiced samples: {}", metrics.sample_count);
        }
        _ => println!("No voiced pitch was detected."),
    }
}
