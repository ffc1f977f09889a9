//! # Pitch Detection Module
//!
//! Time-domain autocorrelation pitch detection tuned for the human voice.
//!
//! ## Features
//! - RMS noise gate to reject silence before the expensive correlation
//! - Autocorrelation computed through a zero-padded FFT
//! - Zero-lag slope skip and first-maximum lag search
//! - Plausibility band of 80-1000 Hz for voiced speech and song

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Default RMS amplitude gate below which a frame is treated as silence.
pub const DEFAULT_AMPLITUDE_THRESHOLD: f32 = 0.01;

/// Lower edge of the accepted voice band in Hz (exclusive).
pub const VOICE_BAND_MIN_HZ: f32 = 80.0;
/// Upper edge of the accepted voice band in Hz (exclusive).
pub const VOICE_BAND_MAX_HZ: f32 = 1000.0;

/// Autocorrelation-based pitch detector for fixed-size audio frames.
///
/// The detector owns its FFT plans and scratch buffers so that per-frame
/// detection performs no allocation. Detection itself is a pure function
/// of the frame and sample rate; the buffers carry no state between calls.
pub struct PitchDetector {
    frame_size: usize,
    fft: Arc<dyn Fft<f32>>,
    inv_fft: Arc<dyn Fft<f32>>,
    /// Zero-padded complex workspace, length `2 * frame_size`.
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Autocorrelation values for lags `0..frame_size`.
    autocorr: Vec<f32>,
}

impl PitchDetector {
    /// Creates a detector for frames of exactly `frame_size` samples.
    pub fn new(frame_size: usize) -> Self {
        assert!(frame_size > 1, "frame_size must be at least 2");

        // Padding to 2N makes the circular FFT correlation equal to the
        // linear autocorrelation sum on lags 0..N.
        let padded_len = 2 * frame_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(padded_len);
        let inv_fft = planner.plan_fft_inverse(padded_len);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len());

        PitchDetector {
            frame_size,
            fft,
            inv_fft,
            spectrum: vec![Complex { re: 0.0, im: 0.0 }; padded_len],
            scratch: vec![Complex { re: 0.0, im: 0.0 }; scratch_len],
            autocorr: vec![0.0; frame_size],
        }
    }

    /// The frame size this detector was built for.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Estimates the fundamental frequency of one audio frame.
    ///
    /// The frame is gated on RMS energy first; frames below
    /// `amplitude_threshold` are reported as unvoiced without running the
    /// correlation. A detected period outside the 80-1000 Hz voice band is
    /// also reported as unvoiced, as are degenerate frames where the
    /// autocorrelation never turns upward after the zero-lag peak.
    ///
    /// # Arguments
    /// * `signal` - Input audio frame, exactly `frame_size` samples in [-1, 1]
    /// * `sample_rate` - Sample rate in Hz
    /// * `amplitude_threshold` - Minimum RMS amplitude for detection
    ///
    /// # Returns
    /// * `Some(frequency)` - Detected fundamental frequency in Hz
    /// * `None` - Unvoiced (silence, noise, or out-of-band estimate)
    pub fn detect(
        &mut self,
        signal: &[f32],
        sample_rate: u32,
        amplitude_threshold: f32,
    ) -> Option<f32> {
        assert_eq!(
            signal.len(),
            self.frame_size,
            "input frame size must match the detector's frame size"
        );

        // --- Noise gate: reject silence before the expensive correlation ---
        let rms = (signal.iter().map(|&s| s * s).sum::<f32>() / signal.len() as f32).sqrt();
        if rms < amplitude_threshold {
            return None;
        }

        self.autocorrelate(signal);
        let r = &self.autocorr;

        // --- Walk past the zero-lag peak's descending slope ---
        let mut d = 0;
        while d + 1 < r.len() && r[d] > r[d + 1] {
            d += 1;
        }
        if d + 1 >= r.len() {
            // Monotonically decreasing correlation: no periodicity peak.
            return None;
        }

        // --- First maximum from d onward wins (strict comparison) ---
        let mut peak_lag = 0;
        let mut peak_val = f32::NEG_INFINITY;
        for (lag, &val) in r.iter().enumerate().skip(d) {
            if val > peak_val {
                peak_val = val;
                peak_lag = lag;
            }
        }
        if peak_lag == 0 {
            return None;
        }

        // --- Period to frequency, constrained to the human voice band ---
        let frequency = sample_rate as f32 / peak_lag as f32;
        if frequency.is_finite()
            && frequency > VOICE_BAND_MIN_HZ
            && frequency < VOICE_BAND_MAX_HZ
        {
            Some(frequency)
        } else {
            None
        }
    }

    /// Fills `self.autocorr` with `r[lag] = sum_j signal[j] * signal[j+lag]`
    /// for lags `0..frame_size`, computed as ifft(|fft(signal, 2N)|^2).
    fn autocorrelate(&mut self, signal: &[f32]) {
        for (slot, &sample) in self.spectrum.iter_mut().zip(signal.iter()) {
            *slot = Complex { re: sample, im: 0.0 };
        }
        for slot in self.spectrum[signal.len()..].iter_mut() {
            *slot = Complex { re: 0.0, im: 0.0 };
        }

        self.fft.process_with_scratch(&mut self.spectrum, &mut self.scratch);
        for bin in self.spectrum.iter_mut() {
            *bin = Complex { re: bin.norm_sqr(), im: 0.0 };
        }
        self.inv_fft.process_with_scratch(&mut self.spectrum, &mut self.scratch);

        // rustfft does not normalize, so a forward/inverse pair scales by the
        // transform length.
        let normalization = 1.0 / self.spectrum.len() as f32;
        for (value, bin) in self.autocorr.iter_mut().zip(self.spectrum.iter()) {
            *value = bin.re * normalization;
        }
    }
}
