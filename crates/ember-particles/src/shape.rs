//! Emission shapes: where a released particle appears and which way it heads

use crate::rng::ParticleRng;
use ember_core::Vec2;

/// Spawn geometry policy consulted once per released particle.
///
/// Returns `(offset, direction)` where `offset` is added to the emitter origin.
/// Implementations must not depend on pool state.
pub trait EmitterShape: Send + Sync {
    fn offset_and_direction(&self, rng: &mut ParticleRng) -> (Vec2, Vec2);
}

/// Every particle spawns at the origin and heads in a random direction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointShape;

impl EmitterShape for PointShape {
    fn offset_and_direction(&self, rng: &mut ParticleRng) -> (Vec2, Vec2) {
        (Vec2::ZERO, rng.unit_vector())
    }
}

/// Particles spawn along a segment centred on the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineShape {
    axis: Vec2,
    length: f32,
    direction: Vec2,
    both_ways: bool,
}

impl LineShape {
    /// Segment rotated `radians` counter-clockwise from +X
    pub fn from_angle(radians: f32, length: f32, direction: Vec2, both_ways: bool) -> Self {
        Self::from_axis(Vec2::from_angle(radians), length, direction, both_ways)
    }

    /// Segment along `axis`; the axis is normalized, a zero axis falls back to +X
    pub fn from_axis(axis: Vec2, length: f32, direction: Vec2, both_ways: bool) -> Self {
        let axis = if axis.is_zero() {
            Vec2::UNIT_X
        } else {
            axis.normalized()
        };
        Self {
            axis,
            length: length.abs(),
            direction,
            both_ways,
        }
    }

    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

impl EmitterShape for LineShape {
    fn offset_and_direction(&self, rng: &mut ParticleRng) -> (Vec2, Vec2) {
        let half = self.length * 0.5;
        let offset = self.axis * rng.range(-half, half);
        (offset, emit_direction(self.direction, self.both_ways, rng))
    }
}

/// Particles spawn anywhere inside an axis-aligned rectangle centred on the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectangleShape {
    width: f32,
    height: f32,
    direction: Vec2,
    both_ways: bool,
}

impl RectangleShape {
    pub fn new(width: f32, height: f32, direction: Vec2, both_ways: bool) -> Self {
        Self {
            width: width.abs(),
            height: height.abs(),
            direction,
            both_ways,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl EmitterShape for RectangleShape {
    fn offset_and_direction(&self, rng: &mut ParticleRng) -> (Vec2, Vec2) {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        let offset = Vec2::new(rng.range(-half_w, half_w), rng.range(-half_h, half_h));
        (offset, emit_direction(self.direction, self.both_ways, rng))
    }
}

/// Zero nominal direction means "anywhere"; otherwise the nominal heading,
/// flipped half the time when `both_ways` is set.
fn emit_direction(nominal: Vec2, both_ways: bool, rng: &mut ParticleRng) -> Vec2 {
    if nominal.is_zero() {
        rng.unit_vector()
    } else if both_ways && rng.coin_flip() {
        -nominal
    } else {
        nominal
    }
}
