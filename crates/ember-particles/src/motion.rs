//! Built-in state manager: ballistic motion with size/color over lifetime

use crate::curves::{age_factor, lerp_color, lerp_f32};
use crate::iter::ParticleIter;
use crate::rng::ParticleRng;
use crate::state::ParticleStateManager;
use bytemuck::{Pod, Zeroable};
use ember_core::{Color, Vec2};

/// Tunables for [`MotionStateManager`]
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSettings {
    pub speed_min: f32,
    pub speed_max: f32,
    pub gravity: Vec2,
    pub damping: f32,
    pub size_start: f32,
    pub size_end: f32,
    pub color_start: Color,
    pub color_end: Color,
    /// Radians per second
    pub rotation_speed: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            speed_min: 20.0,
            speed_max: 60.0,
            gravity: Vec2::ZERO,
            damping: 0.0,
            size_start: 4.0,
            size_end: 0.0,
            color_start: Color::WHITE,
            color_end: Color::new(1.0, 1.0, 1.0, 0.0),
            rotation_speed: 0.0,
        }
    }
}

/// Simulation state for one slot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub color: Color,
}

/// Instance data handed to a sprite batch.
/// 32 bytes: 2 rows of vec4.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub pos_size_rot: [f32; 4], // xy = position, z = size, w = rotation
    pub color: [f32; 4],        // rgba
}

impl ParticleInstance {
    pub fn from_state(s: &ParticleState) -> Self {
        Self {
            pos_size_rot: [s.position.x, s.position.y, s.size, s.rotation],
            color: s.color.to_array(),
        }
    }
}

/// Integrates velocity, gravity and damping per slot and packs render instances.
pub struct MotionStateManager {
    settings: MotionSettings,
    states: Vec<ParticleState>,
    /// Reused between frames so rendering does not allocate in steady state
    instances: Vec<ParticleInstance>,
    rng: ParticleRng,
}

impl MotionStateManager {
    pub fn new(capacity: usize, settings: MotionSettings, seed: u64) -> Self {
        Self {
            settings,
            states: vec![ParticleState::default(); capacity],
            instances: Vec::with_capacity(capacity),
            rng: ParticleRng::new(seed),
        }
    }

    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut MotionSettings {
        &mut self.settings
    }

    pub fn state(&self, slot_index: usize) -> Option<&ParticleState> {
        self.states.get(slot_index)
    }

    /// Instances packed by the most recent `render`
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Raw bytes of [`instances`](Self::instances), ready for a vertex buffer upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    fn slot_mut(&mut self, slot_index: usize) -> &mut ParticleState {
        if slot_index >= self.states.len() {
            self.states.resize(slot_index + 1, ParticleState::default());
        }
        &mut self.states[slot_index]
    }
}

impl ParticleStateManager for MotionStateManager {
    fn trigger(&mut self, particles: ParticleIter<'_>) {
        for p in particles {
            let speed = self.rng.range(self.settings.speed_min, self.settings.speed_max);
            let fresh = ParticleState {
                position: p.release_position,
                velocity: p.release_direction * speed,
                size: self.settings.size_start,
                rotation: 0.0,
                color: self.settings.color_start,
            };
            *self.slot_mut(p.slot_index()) = fresh;
        }
    }

    fn update(&mut self, particles: ParticleIter<'_>, dt: f64) {
        let dt = dt as f32;
        let MotionSettings {
            gravity,
            damping,
            size_start,
            size_end,
            color_start,
            color_end,
            rotation_speed,
            ..
        } = self.settings.clone();
        let drag = (1.0 - damping * dt).max(0.0);

        for p in particles {
            let s = self.slot_mut(p.slot_index());
            s.velocity += gravity * dt;
            if damping > 0.0 {
                s.velocity = s.velocity * drag;
            }
            s.position += s.velocity * dt;
            s.rotation += rotation_speed * dt;

            let t = age_factor(p.normalized_age);
            s.size = lerp_f32(size_start, size_end, t);
            s.color = lerp_color(color_start, color_end, t);
        }
    }

    fn render(&mut self, particles: ParticleIter<'_>) {
        self.instances.clear();
        for p in particles {
            if let Some(s) = self.states.get(p.slot_index()) {
                self.instances.push(ParticleInstance::from_state(s));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::ParticleEmitter;
    use crate::shape::RectangleShape;

    fn still_settings() -> MotionSettings {
        MotionSettings {
            speed_min: 10.0,
            speed_max: 10.0,
            ..Default::default()
        }
    }

    fn emitter(settings: MotionSettings) -> ParticleEmitter<MotionStateManager> {
        let shape = RectangleShape::new(0.0, 0.0, Vec2::UNIT_X, false);
        ParticleEmitter::new(4, 1.0, Box::new(shape), MotionStateManager::new(4, settings, 7))
            .unwrap()
            .with_release_quantity(2)
    }

    #[test]
    fn instance_layout() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
        assert_eq!(std::mem::align_of::<ParticleInstance>(), 4);
    }

    #[test]
    fn trigger_initializes_from_release() {
        let mut e = emitter(still_settings());
        e.trigger(0.0, Vec2::new(5.0, 5.0));

        let s = e.state_manager().state(1).unwrap();
        assert_eq!(s.position, Vec2::new(5.0, 5.0));
        assert_eq!(s.velocity, Vec2::new(10.0, 0.0));
        assert_eq!(s.size, 4.0);
    }

    #[test]
    fn update_integrates_motion_and_interpolates() {
        let mut e = emitter(still_settings());
        e.trigger(0.0, Vec2::ZERO);
        e.update(0.5, 0.5);

        let s = e.state_manager().state(0).unwrap();
        assert!((s.position.x - 5.0).abs() < 1e-5);
        assert!((s.size - 2.0).abs() < 1e-5);
        assert!((s.color.a - 0.5).abs() < 1e-5);
    }

    #[test]
    fn gravity_bends_velocity() {
        let settings = MotionSettings {
            gravity: Vec2::new(0.0, -10.0),
            ..still_settings()
        };
        let mut e = emitter(settings);
        e.trigger(0.0, Vec2::ZERO);
        e.update(0.1, 0.1);

        let s = e.state_manager().state(0).unwrap();
        assert!((s.velocity.y + 1.0).abs() < 1e-5);
        assert!(s.position.y < 0.0);
    }

    #[test]
    fn damping_slows_particles() {
        let settings = MotionSettings {
            damping: 2.0,
            ..still_settings()
        };
        let mut e = emitter(settings);
        e.trigger(0.0, Vec2::ZERO);
        e.update(0.25, 0.25);

        let s = e.state_manager().state(0).unwrap();
        assert!((s.velocity.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn render_packs_live_window() {
        let mut e = emitter(still_settings());
        e.trigger(0.0, Vec2::ZERO);
        e.render();
        assert_eq!(e.state_manager().instances().len(), 2);
        assert_eq!(e.state_manager().instance_bytes().len(), 64);

        e.update(2.0, 2.0);
        e.render();
        // Expired pool skips render, previous instances are left untouched
        assert_eq!(e.state_manager().instances().len(), 2);
    }

    #[test]
    fn reused_slot_is_reinitialized() {
        let mut e = emitter(still_settings());
        e.trigger(0.0, Vec2::ZERO);
        e.update(0.5, 0.5);
        e.update(1.5, 1.0);
        assert!(e.is_empty());

        e.trigger(1.5, Vec2::new(1.0, 1.0));
        let s = e.state_manager().state(0).unwrap();
        assert_eq!(s.position, Vec2::new(1.0, 1.0));
        assert_eq!(s.size, 4.0);
    }

    #[test]
    fn grows_when_slot_exceeds_capacity() {
        let mut manager = MotionStateManager::new(1, still_settings(), 1);
        assert!(manager.state(3).is_none());
        manager.slot_mut(3).size = 9.0;
        assert_eq!(manager.state(3).unwrap().size, 9.0);
    }
}
