//! Bounded cursor over a window of the emitter's ring buffer

use crate::record::ParticleRecord;
use std::iter::FusedIterator;

/// Walks `count` records starting at `start`, wrapping modulo the buffer length.
///
/// The iterator borrows the emitter's buffer, so it cannot outlive the
/// `trigger`/`update`/`render` call that handed it out. `next` is the only read
/// path and stops after `count` records; once exhausted it keeps returning `None`.
#[derive(Clone, Debug)]
pub struct ParticleIter<'a> {
    records: &'a [ParticleRecord],
    start: usize,
    count: usize,
    produced: usize,
}

impl<'a> ParticleIter<'a> {
    pub(crate) fn new(records: &'a [ParticleRecord], start: usize, count: usize) -> Self {
        debug_assert!(count <= records.len(), "window larger than buffer");
        debug_assert!(records.is_empty() || start < records.len());
        Self {
            records,
            start,
            count: count.min(records.len()),
            produced: 0,
        }
    }

    /// The first record of the window, regardless of cursor position
    pub fn first(&self) -> Option<&'a ParticleRecord> {
        if self.count == 0 {
            None
        } else {
            self.records.get(self.start)
        }
    }

    /// Rewind so the next call to `next` yields the first record again
    pub fn reset(&mut self) {
        self.produced = 0;
    }

    /// Physical index of the window's first slot
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Total number of records in the window, independent of cursor position
    pub fn window_len(&self) -> usize {
        self.count
    }
}

impl<'a> Iterator for ParticleIter<'a> {
    type Item = &'a ParticleRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.produced >= self.count {
            return None;
        }
        let idx = (self.start + self.produced) % self.records.len();
        self.produced += 1;
        self.records.get(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.produced;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ParticleIter<'_> {}

impl FusedIterator for ParticleIter<'_> {}
