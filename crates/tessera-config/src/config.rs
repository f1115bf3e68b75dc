//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain generation settings.
    pub terrain: TerrainConfig,
    /// Chunk streaming settings.
    pub streaming: StreamingConfig,
    /// Water animation settings.
    pub water: WaterConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed.
    pub seed: u64,
    /// Tiles along one chunk edge.
    pub chunk_tiles: usize,
    /// Width of one tile in world units.
    pub tile_size: f32,
    /// Vertical scale applied after the height curve.
    pub height_multiplier: f32,
    /// Height-response curve keys `(normalized height, displacement)`.
    pub height_curve: Vec<(f32, f32)>,
    /// Normalized height of the water surface.
    pub sea_level: f32,
    /// Octaves of the height noise.
    pub octaves: u32,
    /// Frequency of the first height octave, in cycles per tile.
    pub base_frequency: f64,
}

/// Chunk streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chebyshev radius, in chunks, of the active area around the viewer.
    pub view_distance: u32,
    /// Radius within which chunk props are shown.
    pub vegetation_distance: u32,
    /// Initial draw mode (`biome`, `height`, `temperature`, `humidity`).
    pub draw_mode: String,
    /// Simulation ticks per second.
    pub tick_rate_hz: u32,
}

/// Water animation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaterConfig {
    /// Wave amplitude in world units.
    pub wave_amplitude: f32,
    /// Wave frequency in cycles per world unit.
    pub wave_frequency: f32,
    /// Wave speed in world units per second.
    pub wave_speed: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            chunk_tiles: 16,
            tile_size: 1.0,
            height_multiplier: 12.0,
            height_curve: vec![(0.0, 0.0), (0.3, 0.05), (0.6, 0.35), (1.0, 1.0)],
            sea_level: 0.3,
            octaves: 4,
            base_frequency: 0.02,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            view_distance: 2,
            vegetation_distance: 1,
            draw_mode: "biome".to_string(),
            tick_rate_hz: 30,
        }
    }
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            wave_amplitude: 0.08,
            wave_frequency: 0.35,
            wave_speed: 1.2,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Checks values that would make chunk generation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.terrain.chunk_tiles >= 2, "terrain.chunk_tiles", "must be at least 2"),
            (self.terrain.tile_size > 0.0, "terrain.tile_size", "must be positive"),
            (!self.terrain.height_curve.is_empty(), "terrain.height_curve", "needs at least one key"),
            ((0.0..=1.0).contains(&self.terrain.sea_level), "terrain.sea_level", "must be in [0, 1]"),
            (self.streaming.tick_rate_hz > 0, "streaming.tick_rate_hz", "must be positive"),
        ];
        match checks.into_iter().find(|(ok, _, _)| !ok) {
            Some((_, field, reason)) => Err(ConfigError::Invalid { field, reason }),
            None => Ok(()),
        }
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("chunk_tiles: 16"));
        assert!(ron_str.contains("draw_mode: \"biome\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(terrain: (seed: 5), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.terrain.seed, 5);
        assert_eq!(config.terrain.chunk_tiles, 16);
        assert_eq!(config.water, WaterConfig::default());
        assert_eq!(config.streaming, StreamingConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_height_curve_parses_as_tuples() {
        let ron_str = "(terrain: (height_curve: [(0.0, 0.0), (1.0, 2.0)]))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.terrain.height_curve, vec![(0.0, 0.0), (1.0, 2.0)]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.terrain.seed = 42;
        config.streaming.view_distance = 5;
        config.streaming.draw_mode = "height".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.water.wave_amplitude = 0.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().water.wave_amplitude, 0.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_tiny_chunks() {
        let mut config = Config::default();
        config.terrain.chunk_tiles = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "terrain.chunk_tiles",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_sea_level_out_of_range() {
        let mut config = Config::default();
        config.terrain.sea_level = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// Terrain settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
