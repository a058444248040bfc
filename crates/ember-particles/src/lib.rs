//! Ember Particles - ring-buffer particle emitters
//!
//! Provides fixed-capacity particle pools with:
//! - A ring buffer of release records, expired lazily from the head each update
//! - A bounded iterator handing slot windows to pluggable state managers
//! - Point, line and rectangle emission shapes
//! - A built-in motion state manager that packs sprite-batch instances
//! - TOML emitter configuration and a `RuntimeSystem` for the game loop

pub mod config;
pub mod curves;
pub mod emitter;
pub mod iter;
pub mod motion;
pub mod rng;
pub mod record;
pub mod shape;
pub mod state;
pub mod system;

pub use config::{EmitterConfig, SceneConfig, ShapeConfig, SimulationConfig};
pub use emitter::ParticleEmitter;
pub use iter::ParticleIter;
pub use motion::{MotionSettings, MotionStateManager, ParticleInstance, ParticleState};
pub use rng::ParticleRng;
pub use record::ParticleRecord;
pub use shape::{EmitterShape, LineShape, PointShape, RectangleShape};
pub use state::ParticleStateManager;
pub use system::{EmitterStats, ParticleDrawData, ParticleSystem};
