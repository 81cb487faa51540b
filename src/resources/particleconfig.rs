//! Particle configuration resource.
//!
//! Settings loaded from an INI configuration file. Defaults are safe to run
//! with when the file is missing or a key is absent.
//!
//! # Configuration File Format
//!
//! ```ini
//! [particles]
//! pool_capacity = 2048
//! seed = 42
//!
//! [demo]
//! frames = 600
//! delta = 0.016666
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_POOL_CAPACITY: usize = 2048;
const DEFAULT_FRAMES: u32 = 600;
const DEFAULT_DELTA: f32 = 1.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./particles.ini";

/// Particle subsystem configuration.
///
/// The pool capacity is read once when the
/// [`ParticleManagerRes`](crate::resources::particlemanager::ParticleManagerRes)
/// is created; changing it afterwards has no effect on the running pool.
#[derive(Resource, Debug, Clone)]
pub struct ParticleConfig {
    /// Number of particle slots shared by all emitters.
    pub pool_capacity: usize,
    /// Seed for rotation sampling. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Frames the demo binary simulates.
    pub frames: u32,
    /// Fixed frame delta of the demo binary, in seconds.
    pub delta: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            seed: None,
            frames: DEFAULT_FRAMES,
            delta: DEFAULT_DELTA,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [particles] section
        if let Some(capacity) = config.getuint("particles", "pool_capacity").ok().flatten() {
            self.pool_capacity = capacity as usize;
        }
        if let Some(seed) = config.getuint("particles", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        // [demo] section
        if let Some(frames) = config.getuint("demo", "frames").ok().flatten() {
            self.frames = frames as u32;
        }
        if let Some(delta) = config.getfloat("demo", "delta").ok().flatten() {
            if delta > 0.0 {
                self.delta = delta as f32;
            }
        }

        info!(
            "Loaded config: pool_capacity={}, seed={:?}, frames={}, delta={}",
            self.pool_capacity, self.seed, self.frames, self.delta
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [particles] section
        config.set(
            "particles",
            "pool_capacity",
            Some(self.pool_capacity.to_string()),
        );
        if let Some(seed) = self.seed {
            config.set("particles", "seed", Some(seed.to_string()));
        }

        // [demo] section
        config.set("demo", "frames", Some(self.frames.to_string()));
        config.set("demo", "delta", Some(self.delta.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("aberredparticles_{}_{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let c = ParticleConfig::new();
        assert_eq!(c.pool_capacity, DEFAULT_POOL_CAPACITY);
        assert_eq!(c.seed, None);
        assert_eq!(c.frames, DEFAULT_FRAMES);
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let mut c = ParticleConfig::with_path(temp_path("missing"));
        assert!(c.load_from_file().is_err());
        assert_eq!(c.pool_capacity, DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut c = ParticleConfig::with_path(&path);
        c.pool_capacity = 100;
        c.seed = Some(7);
        c.frames = 12;
        c.delta = 0.5;
        c.save_to_file().unwrap();

        let mut loaded = ParticleConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.pool_capacity, 100);
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.frames, 12);
        assert!((loaded.delta - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_partial_file_overrides_only_present_keys() {
        let path = temp_path("partial");
        std::fs::write(&path, "[particles]\npool_capacity = 64\n").unwrap();
        let mut c = ParticleConfig::with_path(&path);
        c.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(c.pool_capacity, 64);
        assert_eq!(c.frames, DEFAULT_FRAMES);
        assert_eq!(c.seed, None);
    }
}
