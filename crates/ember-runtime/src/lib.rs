//! Ember Runtime - Game loop infrastructure
//!
//! Provides the core game loop building blocks:
//! - `GameClock` - frame timing, either wall-clock or stepped manually
//! - `RuntimeSystem` - trait for systems ticked by the game loop

mod clock;
mod system;

pub use clock::GameClock;
pub use system::RuntimeSystem;
