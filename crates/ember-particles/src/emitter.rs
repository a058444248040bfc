//! Fixed-capacity ring-buffer emitter

use crate::iter::ParticleIter;
use crate::record::ParticleRecord;
use crate::rng::ParticleRng;
use crate::shape::EmitterShape;
use crate::state::ParticleStateManager;
use ember_core::{EmberError, Result, Vec2};
use log::{debug, trace};

/// Releases particles into a fixed pool of slots and drives a state manager over them.
///
/// The live particles always occupy `active_count` consecutive slots (modulo
/// capacity) starting at `head`. Releases append at `next` and expiry only removes
/// from `head`, so the window is ordered oldest first. All slots are allocated up
/// front; nothing is allocated per particle afterwards.
pub struct ParticleEmitter<S> {
    records: Box<[ParticleRecord]>,
    head: usize,
    next: usize,
    active_count: usize,
    term: f64,
    release_quantity: usize,
    shape: Box<dyn EmitterShape>,
    state_manager: S,
    rng: ParticleRng,
}

impl<S: ParticleStateManager> ParticleEmitter<S> {
    /// Build an emitter with `capacity` slots whose particles live for `term` seconds.
    ///
    /// Fails with [`EmberError::InvalidConfiguration`] when `capacity` is zero or
    /// `term` is not a positive finite number.
    pub fn new(
        capacity: usize,
        term: f64,
        shape: Box<dyn EmitterShape>,
        state_manager: S,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(EmberError::InvalidConfiguration(
                "emitter capacity must be greater than zero".into(),
            ));
        }
        if !(term > 0.0 && term.is_finite()) {
            return Err(EmberError::InvalidConfiguration(format!(
                "emitter term must be a positive number of seconds, got {term}"
            )));
        }

        let records: Box<[ParticleRecord]> = (0..capacity).map(ParticleRecord::new).collect();
        debug!("Created particle emitter: capacity={capacity}, term={term}s");

        Ok(Self {
            records,
            head: 0,
            next: 0,
            active_count: 0,
            term,
            release_quantity: 1,
            shape,
            state_manager,
            rng: ParticleRng::default(),
        })
    }

    /// Reseed the random source lent to the shape
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ParticleRng::new(seed);
        self
    }

    pub fn with_release_quantity(mut self, quantity: usize) -> Self {
        self.release_quantity = quantity;
        self
    }

    /// Release up to `release_quantity` particles around `origin`.
    ///
    /// Stops early once the pool is full; the surplus is dropped without error.
    pub fn trigger(&mut self, now: f64, origin: Vec2) {
        let start = self.next;
        let mut released = 0;

        for _ in 0..self.release_quantity {
            let Some(slot) = self.push() else {
                break;
            };
            let (offset, direction) = self.shape.offset_and_direction(&mut self.rng);
            self.records[slot].release(now, origin + offset, direction);
            released += 1;
        }

        if released < self.release_quantity {
            trace!(
                "Emitter saturated: released {released} of {} requested",
                self.release_quantity
            );
        }

        if released > 0 {
            self.state_manager
                .trigger(ParticleIter::new(&self.records, start, released));
        }
    }

    /// Refresh ages, retire expired particles from the head, then advance the survivors.
    pub fn update(&mut self, now: f64, dt: f64) {
        if self.active_count == 0 {
            return;
        }

        let capacity = self.records.len();
        let term = self.term;
        let mut expired = 0;
        let mut leading = true;

        for i in 0..self.active_count {
            let record = &mut self.records[(self.head + i) % capacity];
            record.normalized_age = ((now - record.release_total_seconds) / term) as f32;
            if leading && record.is_expired() {
                expired += 1;
            } else {
                leading = false;
            }
        }

        if expired > 0 {
            self.pop(expired);
            trace!("Expired {expired} particle(s), {} active", self.active_count);
        }

        if self.active_count > 0 {
            self.state_manager.update(
                ParticleIter::new(&self.records, self.head, self.active_count),
                dt,
            );
        }
    }

    /// Hand the live window to the state manager for drawing
    pub fn render(&mut self) {
        if self.active_count == 0 {
            return;
        }
        self.state_manager
            .render(ParticleIter::new(&self.records, self.head, self.active_count));
    }

    /// Drop every live particle
    pub fn clear(&mut self) {
        self.head = 0;
        self.next = 0;
        self.active_count = 0;
    }

    /// Read-only view of the live window, oldest first
    pub fn active_particles(&self) -> ParticleIter<'_> {
        ParticleIter::new(&self.records, self.head, self.active_count)
    }

    pub fn active_particles_count(&self) -> usize {
        self.active_count
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn is_full(&self) -> bool {
        self.active_count == self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count == 0
    }

    pub fn term(&self) -> f64 {
        self.term
    }

    pub fn release_quantity(&self) -> usize {
        self.release_quantity
    }

    pub fn set_release_quantity(&mut self, quantity: usize) {
        self.release_quantity = quantity;
    }

    pub fn state_manager(&self) -> &S {
        &self.state_manager
    }

    pub fn state_manager_mut(&mut self) -> &mut S {
        &mut self.state_manager
    }

    /// Claim the slot at `next`, or `None` when every slot is live
    fn push(&mut self) -> Option<usize> {
        if self.active_count == self.records.len() {
            return None;
        }
        let slot = self.next;
        self.next = (self.next + 1) % self.records.len();
        self.active_count += 1;
        Some(slot)
    }

    /// Retire `count` particles from the head
    fn pop(&mut self, count: usize) {
        debug_assert!(count <= self.active_count);
        self.active_count -= count;
        if self.active_count == 0 {
            self.head = 0;
            self.next = 0;
        } else {
            self.head = (self.head + count) % self.records.len();
        }
    }
}
