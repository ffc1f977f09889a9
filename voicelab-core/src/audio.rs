//! # Audio Capture Module
//!
//! Real-time microphone capture via CPAL, framed for the analysis
//! pipeline. The stream callback accumulates incoming samples, downmixes
//! to mono if needed, and hands off fixed-size frames over a channel.
//! Frames are dropped rather than queued when the consumer falls behind,
//! so the audio callback never blocks.

use anyhow::{Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;

/// Samples per analysis frame.
///
/// 2048 samples at 44.1 kHz is roughly 46 ms per frame, enough to hold
/// several periods of even the lowest voiced pitches in the 80-1000 Hz
/// band the detector accepts.
pub const FRAME_SIZE: usize = 2048;

/// Preferred capture sample rate in Hz.
const TARGET_SAMPLE_RATE: u32 = 44100;

/// Starts audio capture from the default input device.
///
/// Frames of [`FRAME_SIZE`] mono samples are delivered through `sender`
/// until the returned stream is paused or dropped. Dropping the stream
/// guarantees no further frames reach the consumer.
///
/// # Arguments
/// * `sender` - Channel sender feeding the analysis thread
///
/// # Returns
/// * `Ok((stream, sample_rate))` - Live stream handle and its actual rate
/// * `Err(e)` - No usable input device or stream setup failed
pub fn start_audio_capture(sender: Sender<Vec<f32>>) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    eprintln!("[AUDIO] Using input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("No suitable f32 input format found"))?;

    // Clamp the target into the device's supported range instead of
    // assuming 44.1 kHz is available.
    let sample_rate = TARGET_SAMPLE_RATE.clamp(
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let config = supported_config.with_sample_rate(cpal::SampleRate(sample_rate));
    let channels = config.channels() as usize;
    let config: cpal::StreamConfig = config.into();

    eprintln!("[AUDIO] Capturing at {} Hz, {} channel(s)", sample_rate, channels);

    let err_fn = |err| eprintln!("[AUDIO] Stream error: {}", err);

    // Accumulates callback data until a full frame is available.
    let mut pending = Vec::with_capacity(FRAME_SIZE * 2);

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            if channels == 1 {
                pending.extend_from_slice(data);
            } else {
                // Average interleaved channels down to mono.
                pending.extend(
                    data.chunks_exact(channels)
                        .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                );
            }

            while pending.len() >= FRAME_SIZE {
                let frame: Vec<f32> = pending.drain(..FRAME_SIZE).collect();
                // Drop the frame if the consumer is behind; blocking here
                // would glitch the capture stream.
                let _ = sender.try_send(frame);
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Picks the input configuration closest to our needs: f32 samples, as
/// few channels as possible (mono preferred), sample rate range nearest
/// the target.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32 && c.channels() >= 1)
        .min_by_key(|c| {
            let (min_rate, max_rate) = (c.min_sample_rate().0, c.max_sample_rate().0);
            // Distance from the target to the supported range, zero when
            // the range contains it.
            let distance = if (min_rate..=max_rate).contains(&target_rate) {
                0
            } else {
                (min_rate as i64 - target_rate as i64)
                    .abs()
                    .min((max_rate as i64 - target_rate as i64).abs())
            };
            // Rate proximity dominates; channel count breaks ties.
            distance * 64 + c.channels() as i64
        })
}
