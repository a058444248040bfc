//! Check command: validates a particle scene without running it

use anyhow::{Context, Result};
use ember_particles::{ParticleSystem, SceneConfig};

pub fn run(path: &str) -> Result<()> {
    let scene =
        SceneConfig::load(path).with_context(|| format!("Failed to load scene: {path}"))?;
    check_scene(&scene)?;

    println!("{path}: OK");
    for (name, config) in &scene.emitters {
        println!(
            "  {:<16} {:<9} capacity {:>6}  term {:>6.2}s  x{}",
            name,
            config.shape.name(),
            config.capacity,
            config.term,
            config.release_quantity
        );
    }
    Ok(())
}

/// Validate the scene and build every emitter once
pub fn check_scene(scene: &SceneConfig) -> Result<()> {
    scene.validate().context("Scene validation failed")?;
    let system = ParticleSystem::from_scene(scene).context("Failed to build emitters")?;
    if system.emitter_count() == 0 {
        anyhow::bail!("Scene defines no emitters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_scene() {
        let scene = SceneConfig::from_toml_str("[emitters.a]\ncapacity = 8").unwrap();
        assert!(check_scene(&scene).is_ok());
    }

    #[test]
    fn rejects_empty_emitter_table() {
        let scene = SceneConfig::from_toml_str("[emitters]").unwrap();
        assert!(check_scene(&scene).is_err());
    }

    #[test]
    fn reports_offending_emitter() {
        let scene = SceneConfig::from_toml_str(
            "[emitters.good]\n[emitters.bad]\nspeed_min = 5\nspeed_max = 1",
        )
        .unwrap();
        let err = check_scene(&scene).unwrap_err();
        assert!(format!("{err:#}").contains("bad"));
    }
}
