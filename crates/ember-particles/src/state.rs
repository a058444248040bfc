//! Pluggable per-particle simulation strategy

use crate::iter::ParticleIter;

/// Owns the simulation state for every slot of an emitter, keyed by
/// [`ParticleRecord::slot_index`](crate::ParticleRecord::slot_index).
///
/// The emitter never sees this state. Each call receives an iterator that the
/// implementation is expected to walk to the end. Slots are reused without a
/// "freed" notification: when an index shows up in `trigger`, whatever state it
/// held before belongs to an expired particle and is overwritten.
pub trait ParticleStateManager {
    /// Initialize state for freshly released slots
    fn trigger(&mut self, particles: ParticleIter<'_>);

    /// Advance state for the live window, oldest particle first
    fn update(&mut self, particles: ParticleIter<'_>, dt: f64);

    /// Produce visual output for the live window. Must not alter simulation state.
    fn render(&mut self, particles: ParticleIter<'_>);
}

impl<T: ParticleStateManager + ?Sized> ParticleStateManager for Box<T> {
    fn trigger(&mut self, particles: ParticleIter<'_>) {
        (**self).trigger(particles)
    }

    fn update(&mut self, particles: ParticleIter<'_>, dt: f64) {
        (**self).update(particles, dt)
    }

    fn render(&mut self, particles: ParticleIter<'_>) {
        (**self).render(particles)
    }
}
