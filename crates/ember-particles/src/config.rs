//! Emitter configuration parsed from TOML

use crate::emitter::ParticleEmitter;
use crate::motion::{MotionSettings, MotionStateManager};
use crate::shape::{EmitterShape, LineShape, PointShape, RectangleShape};
use ember_core::{Color, EmberError, Result, Vec2};
use log::warn;
use std::path::Path;

/// Upper bound on slots per emitter
pub const MAX_CAPACITY: usize = 100_000;

/// Emission shape as written in a config file
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeConfig {
    Point,
    Line {
        axis: Vec2,
        length: f32,
        direction: Vec2,
        both_ways: bool,
    },
    Rectangle {
        width: f32,
        height: f32,
        direction: Vec2,
        both_ways: bool,
    },
}

impl ShapeConfig {
    pub fn build(&self) -> Box<dyn EmitterShape> {
        match *self {
            ShapeConfig::Point => Box::new(PointShape),
            ShapeConfig::Line {
                axis,
                length,
                direction,
                both_ways,
            } => Box::new(LineShape::from_axis(axis, length, direction, both_ways)),
            ShapeConfig::Rectangle {
                width,
                height,
                direction,
                both_ways,
            } => Box::new(RectangleShape::new(width, height, direction, both_ways)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeConfig::Point => "point",
            ShapeConfig::Line { .. } => "line",
            ShapeConfig::Rectangle { .. } => "rectangle",
        }
    }
}

/// Configuration for one emitter, e.g. an `[emitters.sparks]` table
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    pub capacity: usize,
    pub term: f64,
    pub release_quantity: usize,
    pub seed: u64,
    pub origin: Vec2,
    pub playing: bool,
    pub shape: ShapeConfig,
    pub motion: MotionSettings,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            term: 1.0,
            release_quantity: 1,
            seed: 0xDEAD_BEEF,
            origin: Vec2::ZERO,
            playing: true,
            shape: ShapeConfig::Point,
            motion: MotionSettings::default(),
        }
    }
}

impl EmitterConfig {
    /// Parse an EmitterConfig from a TOML table. Missing keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("capacity") {
            config.capacity = toml_count("capacity", v, config.capacity as u64) as usize;
        }
        if let Some(v) = table.get("term") {
            config.term = toml_f64("term", v, config.term);
        }
        if let Some(v) = table.get("release_quantity") {
            config.release_quantity =
                toml_count("release_quantity", v, config.release_quantity as u64) as usize;
        }
        if let Some(v) = table.get("seed") {
            // Any integer is a valid seed, negative ones included
            config.seed = match v.as_integer() {
                Some(seed) => seed as u64,
                None => fallback("seed", v, config.seed),
            };
        }
        if let Some(v) = table.get("origin") {
            config.origin = toml_vec2("origin", v, config.origin);
        }
        if let Some(v) = table.get("playing") {
            config.playing = toml_bool("playing", v, config.playing);
        }

        let motion = &mut config.motion;
        if let Some(v) = table.get("speed_min") {
            motion.speed_min = toml_f32("speed_min", v, motion.speed_min);
        }
        if let Some(v) = table.get("speed_max") {
            motion.speed_max = toml_f32("speed_max", v, motion.speed_max);
        }
        if let Some(v) = table.get("gravity") {
            motion.gravity = toml_vec2("gravity", v, motion.gravity);
        }
        if let Some(v) = table.get("damping") {
            motion.damping = toml_f32("damping", v, motion.damping);
        }
        if let Some(v) = table.get("size_start") {
            motion.size_start = toml_f32("size_start", v, motion.size_start);
        }
        if let Some(v) = table.get("size_end") {
            motion.size_end = toml_f32("size_end", v, motion.size_end);
        }
        if let Some(v) = table.get("color_start") {
            motion.color_start = toml_color("color_start", v, motion.color_start);
        }
        if let Some(v) = table.get("color_end") {
            motion.color_end = toml_color("color_end", v, motion.color_end);
        }
        if let Some(v) = table.get("rotation_speed") {
            motion.rotation_speed = toml_f32("rotation_speed", v, motion.rotation_speed);
        }

        config.shape = parse_shape(table);
        config
    }

    /// Parse a single emitter from TOML source
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        Ok(Self::from_toml(&table))
    }

    /// Reject values the emitter cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(EmberError::ValueOutOfRange {
                field: "capacity".into(),
                min: 1.0,
                max: MAX_CAPACITY as f64,
                value: self.capacity as f64,
            });
        }
        if !(self.term > 0.0 && self.term.is_finite()) {
            return Err(EmberError::ValueOutOfRange {
                field: "term".into(),
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: self.term,
            });
        }
        if self.motion.speed_min > self.motion.speed_max {
            return Err(EmberError::InvalidConfiguration(format!(
                "speed_min ({}) is greater than speed_max ({})",
                self.motion.speed_min, self.motion.speed_max
            )));
        }
        match self.shape {
            ShapeConfig::Line { length, .. } if length < 0.0 => {
                Err(EmberError::InvalidConfiguration(format!(
                    "line_length must not be negative, got {length}"
                )))
            }
            ShapeConfig::Rectangle { width, height, .. } if width < 0.0 || height < 0.0 => {
                Err(EmberError::InvalidConfiguration(format!(
                    "rectangle dimensions must not be negative, got {width}x{height}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Validate and build an emitter driven by [`MotionStateManager`]
    pub fn build(&self) -> Result<ParticleEmitter<MotionStateManager>> {
        self.validate()?;
        let manager = MotionStateManager::new(
            self.capacity,
            self.motion.clone(),
            self.seed ^ 0x9E37_79B9,
        );
        let emitter = ParticleEmitter::new(self.capacity, self.term, self.shape.build(), manager)?
            .with_seed(self.seed)
            .with_release_quantity(self.release_quantity);
        Ok(emitter)
    }
}

/// Headless simulation settings, the `[simulation]` table of a scene file
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub fps: f64,
    pub frames: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: 600,
        }
    }
}

/// A scene file: optional `[simulation]` plus named `[emitters.*]` tables
#[derive(Debug, Clone, Default)]
pub struct SceneConfig {
    pub simulation: SimulationConfig,
    pub emitters: Vec<(String, EmitterConfig)>,
}

impl SceneConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let root: toml::value::Table = toml::from_str(source)?;
        let mut scene = SceneConfig::default();

        if let Some(sim) = root.get("simulation").and_then(|v| v.as_table()) {
            if let Some(v) = sim.get("fps") {
                scene.simulation.fps = toml_f64("simulation.fps", v, scene.simulation.fps);
            }
            if let Some(v) = sim.get("frames") {
                scene.simulation.frames =
                    toml_count("simulation.frames", v, scene.simulation.frames);
            }
        }

        let Some(emitters) = root.get("emitters") else {
            return Err(EmberError::MissingRequiredField("emitters".into()));
        };
        let Some(emitters) = emitters.as_table() else {
            return Err(EmberError::InvalidConfiguration(
                "`emitters` must be a table of named emitter tables".into(),
            ));
        };

        for (name, value) in emitters {
            let Some(table) = value.as_table() else {
                warn!("Skipping emitter '{name}': not a table");
                continue;
            };
            scene
                .emitters
                .push((name.clone(), EmitterConfig::from_toml(table)));
        }

        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validate every emitter, reporting the first failure with its name
    pub fn validate(&self) -> Result<()> {
        if !(self.simulation.fps > 0.0) {
            return Err(EmberError::ValueOutOfRange {
                field: "simulation.fps".into(),
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: self.simulation.fps,
            });
        }
        for (name, config) in &self.emitters {
            config
                .validate()
                .map_err(|e| EmberError::InvalidConfiguration(format!("emitter '{name}': {e}")))?;
        }
        Ok(())
    }
}

fn parse_shape(table: &toml::value::Table) -> ShapeConfig {
    let shape_str = match table.get("shape") {
        Some(v) => v.as_str().unwrap_or_else(|| fallback("shape", v, "point")),
        None => "point",
    };
    let direction = table
        .get("emit_direction")
        .map_or(Vec2::ZERO, |v| toml_vec2("emit_direction", v, Vec2::ZERO));
    let both_ways = table
        .get("both_ways")
        .is_some_and(|v| toml_bool("both_ways", v, false));
    let dimension = |key: &str| table.get(key).map_or(1.0, |v| toml_f32(key, v, 1.0));

    match shape_str {
        "point" => ShapeConfig::Point,
        "line" => {
            // An explicit direction vector wins over an angle
            let axis = match table.get("line_direction") {
                Some(v) => toml_vec2("line_direction", v, Vec2::UNIT_X),
                None => {
                    let degrees = table
                        .get("line_angle")
                        .map_or(0.0, |v| toml_f32("line_angle", v, 0.0));
                    Vec2::from_angle(degrees.to_radians())
                }
            };
            ShapeConfig::Line {
                axis,
                length: dimension("line_length"),
                direction,
                both_ways,
            }
        }
        "rectangle" => ShapeConfig::Rectangle {
            width: dimension("rect_width"),
            height: dimension("rect_height"),
            direction,
            both_ways,
        },
        other => {
            warn!("Unknown emitter shape '{other}', falling back to point");
            ShapeConfig::Point
        }
    }
}

// ── TOML helpers (integer/float coercion, warn on fallback) ──

fn fallback<T: std::fmt::Debug>(key: &str, v: &toml::Value, default: T) -> T {
    warn!("Ignoring `{key} = {v}`: wrong type, using {default:?}");
    default
}

fn toml_f64(key: &str, v: &toml::Value, default: f64) -> f64 {
    match v.as_float().or_else(|| v.as_integer().map(|i| i as f64)) {
        Some(f) => f,
        None => fallback(key, v, default),
    }
}

fn toml_f32(key: &str, v: &toml::Value, default: f32) -> f32 {
    toml_f64(key, v, default as f64) as f32
}

/// Counts accept integers and whole floats such as `8.0`. Negative values clamp to 0.
fn toml_count(key: &str, v: &toml::Value, default: u64) -> u64 {
    let whole = v.as_integer().or_else(|| {
        v.as_float()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    });
    match whole {
        Some(n) => n.max(0) as u64,
        None => fallback(key, v, default),
    }
}

fn toml_bool(key: &str, v: &toml::Value, default: bool) -> bool {
    v.as_bool().unwrap_or_else(|| fallback(key, v, default))
}

/// `[x, y]` or `{ x = .., y = .. }`
fn toml_vec2(key: &str, v: &toml::Value, default: Vec2) -> Vec2 {
    v.clone()
        .try_into()
        .unwrap_or_else(|_| fallback(key, v, default))
}

/// `[r, g, b, a]` or `{ r = .., g = .., b = .., a = .. }`
fn toml_color(key: &str, v: &toml::Value, default: Color) -> Color {
    v.clone()
        .try_into()
        .unwrap_or_else(|_| fallback(key, v, default))
}
