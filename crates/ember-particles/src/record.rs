//! Per-slot release metadata stored in the emitter's ring buffer

use ember_core::Vec2;

/// One slot of the emitter pool.
///
/// `slot_index` is the record's position in the backing array and never
/// changes; everything else is overwritten each time the slot is recycled.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleRecord {
    /// Absolute simulation time (seconds) the particle was released
    pub release_total_seconds: f64,
    /// Spawn position (origin + shape offset)
    pub release_position: Vec2,
    /// Spawn heading supplied by the shape
    pub release_direction: Vec2,
    /// `(now - release_total_seconds) / term`, refreshed every update.
    /// Expired once strictly greater than 1.
    pub normalized_age: f32,
    slot_index: usize,
}

impl ParticleRecord {
    pub(crate) fn new(slot_index: usize) -> Self {
        Self {
            release_total_seconds: 0.0,
            release_position: Vec2::ZERO,
            release_direction: Vec2::ZERO,
            normalized_age: 0.0,
            slot_index,
        }
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    pub(crate) fn release(&mut self, now: f64, position: Vec2, direction: Vec2) {
        self.release_total_seconds = now;
        self.release_position = position;
        self.release_direction = direction;
        self.normalized_age = 0.0;
    }

    pub fn is_expired(&self) -> bool {
        self.normalized_age > 1.0
    }
}
