//! Runtime system trait

use crate::clock::GameClock;
use ember_core::Result;

/// A system that can be ticked by the game loop
///
/// Systems are updated in registration order. `update` runs once per frame
/// with the clock already advanced; `render` runs afterwards in the draw phase.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, clock: &GameClock) -> Result<()>;

    /// Called once per frame after every system has updated
    fn render(&mut self) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
