//! # Musical Tuning Module
//!
//! Conversions between frequency and the equal-tempered scale for the
//! vocal pitch display. Note indices follow the MIDI convention
//! (A4 = 440 Hz = index 69) and deviations are reported in cents.

use serde::Serialize;

/// Chromatic note names, indexed by `note_index mod 12` (index 0 = C).
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Sentinel note index meaning "no voiced pitch this tick".
pub const UNVOICED_NOTE_INDEX: i32 = -1;

/// Reference pitch: A4 in Hz.
const A4_HZ: f32 = 440.0;
/// MIDI note number of A4.
const A4_NOTE_INDEX: i32 = 69;

/// The nearest equal-tempered note to a measured frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteReading {
    /// MIDI-style semitone index, or [`UNVOICED_NOTE_INDEX`].
    pub note_index: i32,
    /// Note name without octave (e.g. "A", "C#"). Empty when unvoiced.
    pub note_name: &'static str,
    /// Octave number in scientific pitch notation (index 60 = C4).
    pub octave: i32,
    /// Signed deviation from the nearest semitone, in cents.
    pub cents: f32,
}

impl NoteReading {
    /// The sentinel reading used for silent or rejected frames.
    pub fn unvoiced() -> Self {
        NoteReading {
            note_index: UNVOICED_NOTE_INDEX,
            note_name: "",
            octave: 0,
            cents: 0.0,
        }
    }

    pub fn is_voiced(&self) -> bool {
        self.note_index != UNVOICED_NOTE_INDEX
    }
}

/// Maps a frequency to the nearest equal-tempered note.
///
/// Only defined for `frequency > 0`.
///
/// Rounding convention: the fractional note number is rounded with
/// `f32::round`, which rounds ties away from zero. A frequency exactly
/// halfway between two semitones therefore maps to the *upper* note and
/// reads as -50 cents; all other inputs land in (-50, +50).
///
/// # Arguments
/// * `frequency` - Measured fundamental frequency in Hz
///
/// # Returns
/// * `NoteReading` with the nearest note index, name, octave, and the
///   cent deviation from that note's exact frequency
pub fn note_from_frequency(frequency: f32) -> NoteReading {
    debug_assert!(frequency > 0.0, "note_from_frequency requires a positive frequency");

    // f = 440 * 2^((n - 69) / 12), solved for n.
    let note_float = 12.0 * (frequency / A4_HZ).log2() + A4_NOTE_INDEX as f32;
    let note_index = note_float.round() as i32;

    let target_frequency = frequency_from_note_index(note_index);
    let cents = 1200.0 * (frequency / target_frequency).log2();

    // rem_euclid keeps the table lookup valid for negative indices.
    let note_name = NOTE_NAMES[note_index.rem_euclid(12) as usize];
    let octave = note_index.div_euclid(12) - 1;

    NoteReading {
        note_index,
        note_name,
        octave,
        cents,
    }
}

/// The exact equal-tempered frequency of a note index (A4 = 69 = 440 Hz).
pub fn frequency_from_note_index(note_index: i32) -> f32 {
    A4_HZ * 2.0_f32.powf((note_index - A4_NOTE_INDEX) as f32 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a440_is_a4_with_zero_cents() {
        let reading = note_from_frequency(440.0);
        assert_eq!(reading.note_index, 69);
        assert_eq!(reading.note_name, "A");
        assert_eq!(reading.octave, 4);
        assert!(reading.cents.abs() < 0.01, "cents = {}", reading.cents);
    }

    #[test]
    fn middle_c_octave_numbering() {
        let reading = note_from_frequency(261.63);
        assert_eq!(reading.note_index, 60);
        assert_eq!(reading.note_name, "C");
        assert_eq!(reading.octave, 4);
    }

    #[test]
    fn just_below_the_half_semitone_stays_on_the_lower_note() {
        // The A4/A#4 midpoint is ~452.89 Hz; 452.8 Hz sits a hair under it.
        let reading = note_from_frequency(452.8);
        assert_eq!(reading.note_index, 69);
        assert_eq!(reading.note_name, "A");
        assert!(reading.cents > 49.0 && reading.cents < 50.0, "cents = {}", reading.cents);
    }

    #[test]
    fn exact_semitone_frequency_reads_near_zero_cents() {
        // 466.16 Hz is A#4 itself, a full semitone above A4, not a
        // boundary case.
        let reading = note_from_frequency(466.16);
        assert_eq!(reading.note_index, 70);
        assert_eq!(reading.note_name, "A#");
        assert_eq!(reading.octave, 4);
        assert!(reading.cents.abs() < 1.0, "cents = {}", reading.cents);
    }

    #[test]
    fn just_above_the_half_semitone_rounds_to_the_upper_note() {
        // 453.0 Hz is slightly more than 50 cents above A4.
        let reading = note_from_frequency(453.0);
        assert_eq!(reading.note_index, 70);
        assert_eq!(reading.note_name, "A#");
        assert!(reading.cents < -49.0 && reading.cents > -50.0, "cents = {}", reading.cents);
    }

    #[test]
    fn note_index_round_trip() {
        // Several octaves either side of the vocal range.
        for note_index in 12..=120 {
            let reading = note_from_frequency(frequency_from_note_index(note_index));
            assert_eq!(reading.note_index, note_index);
            assert!(reading.cents.abs() < 0.5, "index {} cents {}", note_index, reading.cents);
        }
    }

    #[test]
    fn negative_note_indices_name_correctly() {
        // Index -3 is A, two octaves below A0.
        let reading = note_from_frequency(frequency_from_note_index(-3));
        assert_eq!(reading.note_index, -3);
        assert_eq!(reading.note_name, "A");
        assert_eq!(reading.octave, -2);
    }

    #[test]
    fn unvoiced_sentinel() {
        let reading = NoteReading::unvoiced();
        assert!(!reading.is_voiced());
        assert_eq!(reading.note_index, UNVOICED_NOTE_INDEX);
        assert_eq!(reading.note_name, "");
        assert_eq!(reading.cents, 0.0);
    }
}
