//! Viewer settings
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::SettingsError;
use crate::mesh::TerrainBounds;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Samples per lane ring
    pub fn track_segments(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => TRACK_SEGMENTS,
            QualityPreset::High => 600,
        }
    }

    /// Terrain segments per axis direction (the grid has twice as many cells)
    pub fn terrain_segments(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => TERRAIN_SEGMENTS,
            QualityPreset::High => 160,
        }
    }
}

/// Track layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    pub lane_width: f64,
    pub lane_count: usize,
    /// Height the edge walls drop down to
    pub wall_floor: f64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            lane_width: 1.0,
            lane_count: RACER_COUNT,
            wall_floor: WALL_FLOOR_Z,
        }
    }
}

impl TrackSettings {
    /// Lane boundaries from innermost to outermost
    pub fn lane_offsets(&self) -> Vec<f64> {
        (0..=self.lane_count)
            .map(|i| i as f64 * self.lane_width)
            .collect()
    }
}

/// Terrain extent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub bounds: TerrainBounds,
}

/// Camera mode parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub helicopter_height: f64,
    pub motorcycle_radius: f64,
    pub motorcycle_lift: f64,
    pub look_ahead: f64,
    /// Auto mode re-picks a mode this often (animation time units)
    pub auto_mode_interval: i64,
    /// Followed racer is re-picked this often (animation time units)
    pub auto_entity_interval: i64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            helicopter_height: HELICOPTER_HEIGHT,
            motorcycle_radius: MOTORCYCLE_RADIUS,
            motorcycle_lift: MOTORCYCLE_LIFT,
            look_ahead: FIRST_PERSON_LOOK_AHEAD,
            auto_mode_interval: AUTO_MODE_INTERVAL,
            auto_entity_interval: AUTO_ENTITY_INTERVAL,
        }
    }
}

impl CameraSettings {
    /// Intervals below one time unit would re-pick every frame
    pub fn clamp_intervals(&mut self) {
        for (name, interval) in [
            ("auto_mode_interval", &mut self.auto_mode_interval),
            ("auto_entity_interval", &mut self.auto_entity_interval),
        ] {
            if *interval < 1 {
                log::warn!("{} = {} is too small, using 1", name, interval);
                *interval = 1;
            }
        }
    }
}

/// Racer motion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Seed for racer speeds and the auto camera
    pub seed: u64,
    pub racer_count: usize,
    pub speed_minimum: f64,
    pub speed_multiplier: f64,
    pub head_height: f64,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            racer_count: RACER_COUNT,
            speed_minimum: SPEED_MINIMUM,
            speed_multiplier: SPEED_MULTIPLIER,
            head_height: HEAD_HEIGHT,
        }
    }
}

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tessellation quality preset
    pub quality: QualityPreset,

    // === Geometry ===
    pub track: TrackSettings,
    pub terrain: TerrainSettings,

    // === Motion ===
    pub camera: CameraSettings,
    pub race: RaceSettings,
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&json)?;
        settings.camera.clamp_intervals();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings, falling back to defaults when the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Medium.track_segments(), 300);
        assert_eq!(QualityPreset::Medium.terrain_segments(), 100);
    }

    #[test]
    fn test_default_lane_offsets() {
        assert_eq!(TrackSettings::default().lane_offsets(), LANE_OFFSETS.to_vec());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "quality": "High", "camera": { "look_ahead": 4.0 } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.camera.look_ahead, 4.0);
        assert_eq!(settings.camera.helicopter_height, HELICOPTER_HEIGHT);
        assert_eq!(settings.race.racer_count, RACER_COUNT);
    }

    #[test]
    fn test_save_and_load() {
        let name = format!("robot_race_settings_{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.race.seed = 77;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.quality, QualityPreset::Low);
        assert_eq!(loaded.race.seed, 77);
    }

    #[test]
    fn test_load_clamps_camera_intervals() {
        let name = format!("robot_race_intervals_{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let json = r#"{ "camera": { "auto_mode_interval": -4, "auto_entity_interval": 0 } }"#;
        std::fs::write(&path, json).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.camera.auto_mode_interval, 1);
        assert_eq!(loaded.camera.auto_entity_interval, 1);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default(Path::new("/definitely/not/here.json"));
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(matches!(
            Settings::load(Path::new("/definitely/not/here.json")),
            Err(SettingsError::Io(_))
        ));
    }
}
