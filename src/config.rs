use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use terra2d_physics::PhysicsConfig;
use terra2d_world::WorldConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/terra2d.toml";

/// Everything a headless session reads from `config/terra2d.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Ticks to simulate when no script is given.
    pub ticks: u64,
    /// Column the actor spawns above; the middle column when unset.
    pub spawn_column: Option<usize>,
    /// Width of the printed frame, in pixels.
    pub view_width: f32,
    /// JSONL event log written during the run.
    pub events_path: Option<PathBuf>,
    /// Session metrics report written at the end of the run.
    pub metrics_path: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ticks: 120,
            spawn_column: None,
            view_width: 1280.0,
            events_path: None,
            metrics_path: None,
        }
    }
}

impl SessionConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SessionConfig>(&contents) {
                Ok(mut cfg) => {
                    let reset = cfg.sanitize();
                    if reset > 0 {
                        warn!("{reset} invalid value(s) in {} replaced by defaults", path.display());
                    }
                    cfg
                }
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SessionConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Session config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SessionConfig::default()
            }
        }
    }

    /// Replace values the generator or physics cannot run with by their defaults.
    ///
    /// Returns how many fields were reset.
    pub fn sanitize(&mut self) -> usize {
        let world = WorldConfig::default();
        let physics = PhysicsConfig::default();
        let session = SessionSettings::default();
        let mut reset = 0;
        let mut check = |ok: bool, name: &str| {
            if !ok {
                warn!(field = name, "invalid config value, using default");
                reset += 1;
            }
            ok
        };

        if !check(self.world.width >= 1, "world.width") {
            self.world.width = world.width;
        }
        if !check(self.world.height >= 2, "world.height") {
            self.world.height = world.height;
        }

        let terrain = &mut self.world.terrain;
        if !check(positive(terrain.scale), "world.terrain.scale") {
            terrain.scale = world.terrain.scale;
        }
        if !check(unit(terrain.amplitude), "world.terrain.amplitude") {
            terrain.amplitude = world.terrain.amplitude;
        }
        if !check(unit(terrain.offset), "world.terrain.offset") {
            terrain.offset = world.terrain.offset;
        }
        if !check(terrain.noise.persistence.is_finite(), "world.terrain.noise.persistence") {
            terrain.noise.persistence = world.terrain.noise.persistence;
        }
        if !check(terrain.noise.lacunarity.is_finite(), "world.terrain.noise.lacunarity") {
            terrain.noise.lacunarity = world.terrain.noise.lacunarity;
        }

        let vegetation = &mut self.world.vegetation;
        if !check(unit(vegetation.tree_chance), "world.vegetation.tree_chance") {
            vegetation.tree_chance = world.vegetation.tree_chance;
        }

        let p = &mut self.physics;
        if !check(positive_f32(p.tile_size), "physics.tile_size") {
            p.tile_size = physics.tile_size;
        }
        if !check(positive_f32(p.actor_width), "physics.actor_width") {
            p.actor_width = physics.actor_width;
        }
        if !check(positive_f32(p.actor_height), "physics.actor_height") {
            p.actor_height = physics.actor_height;
        }
        if !check(positive_f32(p.max_fall_speed), "physics.max_fall_speed") {
            p.max_fall_speed = physics.max_fall_speed;
        }
        if !check(p.gravity.is_finite(), "physics.gravity") {
            p.gravity = physics.gravity;
        }
        if !check(p.jump_velocity.is_finite(), "physics.jump_velocity") {
            p.jump_velocity = physics.jump_velocity;
        }
        if !check(p.move_speed.is_finite(), "physics.move_speed") {
            p.move_speed = physics.move_speed;
        }
        if !check((0.0..=1.0).contains(&p.friction), "physics.friction") {
            p.friction = physics.friction;
        }

        if !check(positive_f32(self.session.view_width), "session.view_width") {
            self.session.view_width = session.view_width;
        }
        reset
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn positive_f32(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SessionConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(cfg, SessionConfig::default());
        assert_eq!(cfg.world.width, 100);
        assert_eq!(cfg.physics.tile_size, 32.0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terra2d.toml");
        fs::write(
            &path,
            "[world]\nseed = 99\nwidth = 64\n\n[world.vegetation]\ntree_chance = 0.5\n\n[physics]\ngravity = 1.5\n",
        )
        .unwrap();

        let cfg = SessionConfig::load_from_path(&path);
        assert_eq!(cfg.world.seed, 99);
        assert_eq!(cfg.world.width, 64);
        assert_eq!(cfg.world.height, 50);
        assert_eq!(cfg.world.vegetation.tree_chance, 0.5);
        assert_eq!(cfg.world.vegetation.edge_margin, 5);
        assert_eq!(cfg.physics.gravity, 1.5);
        assert_eq!(cfg.physics.jump_velocity, -15.0);
        assert_eq!(cfg.session.ticks, 120);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[world\nseed = ").unwrap();
        assert_eq!(SessionConfig::load_from_path(&path), SessionConfig::default());
    }

    #[test]
    fn defaults_need_no_sanitizing() {
        assert_eq!(SessionConfig::default().sanitize(), 0);
    }

    #[test]
    fn unusable_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terra2d.toml");
        fs::write(
            &path,
            "[world]\nseed = 3\nheight = 1\n\n[world.terrain]\nscale = 0.0\n\n[world.vegetation]\ntree_chance = nan\n\n[physics]\ntile_size = 0.0\nactor_height = -64.0\ngravity = inf\nmove_speed = 7.0\n",
        )
        .unwrap();

        let cfg = SessionConfig::load_from_path(&path);
        let defaults = SessionConfig::default();
        assert_eq!(cfg.world.seed, 3);
        assert_eq!(cfg.world.height, defaults.world.height);
        assert_eq!(cfg.world.terrain.scale, defaults.world.terrain.scale);
        assert_eq!(cfg.world.vegetation.tree_chance, defaults.world.vegetation.tree_chance);
        assert_eq!(cfg.physics.tile_size, defaults.physics.tile_size);
        assert_eq!(cfg.physics.actor_height, defaults.physics.actor_height);
        assert_eq!(cfg.physics.gravity, defaults.physics.gravity);
        assert_eq!(cfg.physics.move_speed, 7.0);
    }

    #[test]
    fn sanitize_counts_each_reset_field() {
        let mut cfg = SessionConfig::default();
        cfg.world.vegetation.tree_chance = f64::NAN;
        cfg.physics.tile_size = 0.0;
        cfg.physics.friction = 1.5;
        assert_eq!(cfg.sanitize(), 3);
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/terra2d.toml");
        let mut cfg = SessionConfig::default();
        cfg.world.seed = 4242;
        cfg.session.spawn_column = Some(7);
        cfg.save_to_path(&path).unwrap();

        let loaded = SessionConfig::load_from_path(&path);
        assert_eq!(loaded, cfg);
    }
}
