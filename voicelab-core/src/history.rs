//! # Pitch History Module
//!
//! Bounded buffer of recent per-tick pitch readings backing the timeline
//! display. Every analysis tick appends exactly one entry, silent ticks
//! included, so an entry's position also encodes elapsed time.

use std::collections::VecDeque;

use serde::Serialize;

use crate::tuning::UNVOICED_NOTE_INDEX;

/// Default number of entries retained for display.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// One timeline sample: the cent deviation and the note it deviates from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub cents: f32,
    /// Note index of the tick, or [`UNVOICED_NOTE_INDEX`] for silence.
    pub note_index: i32,
}

impl HistoryEntry {
    /// The entry recorded for a silent or rejected tick. Gaps in voicing
    /// stay visible on the timeline rather than being erased.
    pub fn unvoiced() -> Self {
        HistoryEntry {
            cents: 0.0,
            note_index: UNVOICED_NOTE_INDEX,
        }
    }
}

/// FIFO ring of the most recent pitch readings.
#[derive(Debug)]
pub struct HistoryRing {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        HistoryRing {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one entry, silently dropping the oldest at capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The most recent `max_items` entries, oldest first.
    pub fn snapshot(&self, max_items: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(max_items);
        self.entries.iter().skip(skip).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voiced(note_index: i32, cents: f32) -> HistoryEntry {
        HistoryEntry { cents, note_index }
    }

    #[test]
    fn capacity_bounds_the_ring() {
        let mut ring = HistoryRing::new(3);
        for i in 0..5 {
            ring.push(voiced(60 + i, i as f32));
        }
        assert_eq!(ring.len(), 3);

        // The last three pushes survive, in push order.
        let snapshot = ring.snapshot(usize::MAX);
        assert_eq!(
            snapshot,
            vec![voiced(62, 2.0), voiced(63, 3.0), voiced(64, 4.0)]
        );
    }

    #[test]
    fn snapshot_returns_the_most_recent_window_oldest_first() {
        let mut ring = HistoryRing::new(10);
        for i in 0..4 {
            ring.push(voiced(60 + i, 0.0));
        }
        assert_eq!(ring.snapshot(2), vec![voiced(62, 0.0), voiced(63, 0.0)]);
        // Asking for more than is stored returns everything.
        assert_eq!(ring.snapshot(100).len(), 4);
    }

    #[test]
    fn silent_ticks_are_retained() {
        let mut ring = HistoryRing::new(10);
        ring.push(voiced(69, 1.5));
        ring.push(HistoryEntry::unvoiced());
        ring.push(voiced(69, -2.0));

        let snapshot = ring.snapshot(usize::MAX);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[1].note_index, UNVOICED_NOTE_INDEX);
    }

    #[test]
    fn clear_empties_the_ring() {
        let mut ring = HistoryRing::default();
        ring.push(voiced(60, 0.0));
        assert!(!ring.is_empty());
        ring.clear();
        assert!(ring.is_empty());
        assert!(ring.snapshot(10).is_empty());
    }
}
