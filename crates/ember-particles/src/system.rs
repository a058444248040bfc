//! Named emitter set driven by the game loop

use crate::config::{EmitterConfig, SceneConfig};
use crate::emitter::ParticleEmitter;
use crate::motion::{MotionStateManager, ParticleInstance};
use ember_core::{EmberError, Result, Vec2};
use ember_runtime::{GameClock, RuntimeSystem};
use log::{debug, info};

/// Running totals for one emitter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterStats {
    pub released_total: u64,
    pub peak_active: usize,
}

/// Draw data for one emitter, consumed by the renderer
pub struct ParticleDrawData<'a> {
    pub name: &'a str,
    pub instances: &'a [ParticleInstance],
}

struct EmitterEntry {
    name: String,
    emitter: ParticleEmitter<MotionStateManager>,
    origin: Vec2,
    playing: bool,
    /// One-shot releases queued from gameplay code
    pending_burst: usize,
    stats: EmitterStats,
}

impl EmitterEntry {
    fn release(&mut self, now: f64) {
        let before = self.emitter.active_particles_count();
        if self.playing {
            self.emitter.trigger(now, self.origin);
        }
        if self.pending_burst > 0 {
            let quantity = self.emitter.release_quantity();
            self.emitter.set_release_quantity(self.pending_burst);
            self.emitter.trigger(now, self.origin);
            self.emitter.set_release_quantity(quantity);
            self.pending_burst = 0;
        }
        let released = self.emitter.active_particles_count() - before;
        self.stats.released_total += released as u64;
    }
}

/// The particle system: owns every emitter of a scene and ticks them each frame.
pub struct ParticleSystem {
    entries: Vec<EmitterEntry>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build every emitter in a scene
    pub fn from_scene(scene: &SceneConfig) -> Result<Self> {
        let mut system = Self::new();
        for (name, config) in &scene.emitters {
            system.add_emitter(name, config).map_err(|e| {
                EmberError::InvalidConfiguration(format!("emitter '{name}': {e}"))
            })?;
        }
        Ok(system)
    }

    pub fn add_emitter(&mut self, name: &str, config: &EmitterConfig) -> Result<()> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(EmberError::InvalidConfiguration(format!(
                "duplicate emitter name: {name}"
            )));
        }
        let emitter = config.build()?;
        debug!(
            "Registered emitter '{name}' ({} shape, {} slots)",
            config.shape.name(),
            config.capacity
        );
        self.entries.push(EmitterEntry {
            name: name.to_string(),
            emitter,
            origin: config.origin,
            playing: config.playing,
            pending_burst: 0,
            stats: EmitterStats::default(),
        });
        Ok(())
    }

    pub fn emitter(&self, name: &str) -> Option<&ParticleEmitter<MotionStateManager>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.emitter)
    }

    pub fn set_origin(&mut self, name: &str, origin: Vec2) -> Result<()> {
        self.entry_mut(name)?.origin = origin;
        Ok(())
    }

    pub fn set_playing(&mut self, name: &str, playing: bool) -> Result<()> {
        self.entry_mut(name)?.playing = playing;
        Ok(())
    }

    /// Release `count` extra particles on the next frame, even if the emitter is paused
    pub fn queue_burst(&mut self, name: &str, count: usize) -> Result<()> {
        let entry = self.entry_mut(name)?;
        entry.pending_burst = entry.pending_burst.saturating_add(count);
        Ok(())
    }

    /// Trigger, then age and simulate, every emitter
    pub fn step(&mut self, now: f64, dt: f64) {
        for entry in &mut self.entries {
            entry.release(now);
            // Sampled before expiry so a saturated frame is counted
            let active = entry.emitter.active_particles_count();
            entry.stats.peak_active = entry.stats.peak_active.max(active);
            entry.emitter.update(now, dt);
        }
    }

    pub fn render_all(&mut self) {
        for entry in &mut self.entries {
            entry.emitter.render();
        }
    }

    /// Instances for every emitter that has live particles
    pub fn draw_data(&self) -> Vec<ParticleDrawData<'_>> {
        self.entries
            .iter()
            .filter(|e| !e.emitter.is_empty())
            .map(|e| ParticleDrawData {
                name: &e.name,
                instances: e.emitter.state_manager().instances(),
            })
            .collect()
    }

    pub fn stats(&self) -> impl Iterator<Item = (&str, EmitterStats)> + '_ {
        self.entries.iter().map(|e| (e.name.as_str(), e.stats))
    }

    /// Number of tracked emitters
    pub fn emitter_count(&self) -> usize {
        self.entries.len()
    }

    /// Total live particles across all emitters
    pub fn total_active(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.emitter.active_particles_count())
            .sum()
    }

    /// Drop every live particle, keeping the emitters
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.emitter.clear();
            entry.pending_burst = 0;
        }
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut EmitterEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| EmberError::EmitterNotFound(name.to_string()))
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeSystem for ParticleSystem {
    fn initialize(&mut self) -> Result<()> {
        info!("Particle system ready with {} emitter(s)", self.entries.len());
        Ok(())
    }

    fn update(&mut self, clock: &GameClock) -> Result<()> {
        self.step(clock.total_time, clock.delta_time);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.render_all();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(capacity: usize, quantity: usize) -> EmitterConfig {
        EmitterConfig {
            capacity,
            term: 1.0,
            release_quantity: quantity,
            ..Default::default()
        }
    }

    #[test]
    fn step_triggers_and_expires() {
        let mut system = ParticleSystem::new();
        system.add_emitter("sparks", &config(16, 2)).unwrap();

        system.step(0.0, 0.0);
        assert_eq!(system.total_active(), 2);
        system.step(0.5, 0.5);
        assert_eq!(system.total_active(), 4);
        // First batch is now older than the term
        system.step(1.25, 0.75);
        assert_eq!(system.total_active(), 4);

        let (_, stats) = system.stats().next().unwrap();
        assert_eq!(stats.released_total, 6);
        // Counted after the third release, before the first batch expired
        assert_eq!(stats.peak_active, 6);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut system = ParticleSystem::new();
        system.add_emitter("a", &config(4, 1)).unwrap();
        assert!(system.add_emitter("a", &config(4, 1)).is_err());
        assert_eq!(system.emitter_count(), 1);
    }

    #[test]
    fn unknown_emitter_is_reported() {
        let mut system = ParticleSystem::new();
        let err = system.queue_burst("ghost", 3).unwrap_err();
        assert!(matches!(err, EmberError::EmitterNotFound(_)));
    }

    #[test]
    fn burst_fires_while_paused() {
        let mut system = ParticleSystem::new();
        system.add_emitter("boom", &config(8, 1)).unwrap();
        system.set_playing("boom", false).unwrap();

        system.step(0.0, 0.0);
        assert_eq!(system.total_active(), 0);

        system.queue_burst("boom", 20).unwrap();
        system.step(0.1, 0.1);
        // Saturates at capacity
        assert_eq!(system.total_active(), 8);
        assert_eq!(system.emitter("boom").unwrap().release_quantity(), 1);

        system.step(0.2, 0.1);
        assert_eq!(system.stats().next().unwrap().1.released_total, 8);
    }

    #[test]
    fn piled_up_bursts_saturate() {
        let mut system = ParticleSystem::new();
        system.add_emitter("a", &config(4, 1)).unwrap();
        system.set_playing("a", false).unwrap();
        system.queue_burst("a", usize::MAX).unwrap();
        system.queue_burst("a", 1).unwrap();

        system.step(0.0, 0.0);
        assert_eq!(system.total_active(), 4);
    }

    #[test]
    fn peak_counts_particles_expired_in_the_same_frame() {
        let mut system = ParticleSystem::new();
        system.add_emitter("a", &config(4, 1)).unwrap();
        system.set_playing("a", false).unwrap();
        system.queue_burst("a", 2).unwrap();
        system.step(0.0, 0.0);

        // Fills the pool, then the first pair expires during the same step
        system.queue_burst("a", 4).unwrap();
        system.step(1.5, 1.5);
        assert_eq!(system.total_active(), 2);

        let (_, stats) = system.stats().next().unwrap();
        assert_eq!(stats.released_total, 4);
        assert_eq!(stats.peak_active, 4);
    }

    #[test]
    fn origin_moves_new_releases() {
        let mut system = ParticleSystem::new();
        system.add_emitter("trail", &config(4, 1)).unwrap();
        system.set_origin("trail", Vec2::new(7.0, -3.0)).unwrap();
        system.step(0.0, 0.0);

        let emitter = system.emitter("trail").unwrap();
        let first = emitter.active_particles().first().unwrap();
        assert_eq!(first.release_position, Vec2::new(7.0, -3.0));
    }

    #[test]
    fn runtime_system_lifecycle() {
        let mut system = ParticleSystem::new();
        system.add_emitter("a", &config(4, 2)).unwrap();
        system.add_emitter("b", &config(4, 1)).unwrap();

        let mut clock = GameClock::new();
        system.initialize().unwrap();
        clock.advance(1.0 / 60.0);
        RuntimeSystem::update(&mut system, &clock).unwrap();
        RuntimeSystem::render(&mut system).unwrap();

        let draw = system.draw_data();
        assert_eq!(draw.len(), 2);
        assert_eq!(draw[0].name, "a");
        assert_eq!(draw[0].instances.len(), 2);
        assert_eq!(draw[1].instances.len(), 1);

        system.shutdown().unwrap();
        assert_eq!(system.total_active(), 0);
        assert_eq!(system.name(), "particles");
    }

    #[test]
    fn from_scene_builds_all_emitters() {
        let scene = SceneConfig::from_toml_str(
            "[emitters.one]\ncapacity = 4\n[emitters.two]\nshape = \"line\"\nline_length = 10",
        )
        .unwrap();
        let system = ParticleSystem::from_scene(&scene).unwrap();
        assert_eq!(system.emitter_count(), 2);
        assert!(system.emitter("two").is_some());
    }
}
