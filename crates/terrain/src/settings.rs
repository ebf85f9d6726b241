use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_HEIGHT_MULTIPLIER, MAP_CHUNK_SIZE, MAX_LEVEL_OF_DETAIL, MAX_VIEW_DISTANCE,
};
use crate::height_curve::HeightCurve;
use crate::map_generator::DrawMode;
use crate::noise_map::{NoiseParameters, NormalizeMode};
use crate::regions::{default_regions, TerrainRegion};
use crate::terrain_error::ConfigError;

/// Environment variable naming a JSON settings file to load at startup.
pub const CONFIG_ENV_VAR: &str = "ENDLESS_TERRAIN_CONFIG";

/// Environment variable that switches the app to the single-map preview.
pub const PREVIEW_ENV_VAR: &str = "ENDLESS_TERRAIN_PREVIEW";

/// Every runtime tunable of terrain generation and streaming.
///
/// Missing fields in a settings file take their default values, so a file
/// only needs the values it changes.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub noise: NoiseParameters,
    pub normalize_mode: NormalizeMode,
    pub regions: Vec<TerrainRegion>,
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
    pub level_of_detail: u32,
    pub draw_mode: DrawMode,
    pub map_chunk_size: usize,
    pub max_view_distance: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            noise: NoiseParameters::default(),
            normalize_mode: NormalizeMode::default(),
            regions: default_regions(),
            height_multiplier: DEFAULT_HEIGHT_MULTIPLIER,
            height_curve: HeightCurve::default(),
            level_of_detail: 0,
            draw_mode: DrawMode::default(),
            map_chunk_size: MAP_CHUNK_SIZE,
            max_view_distance: MAX_VIEW_DISTANCE,
        }
    }
}

impl TerrainSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Settings from the file named by [`CONFIG_ENV_VAR`], or the defaults
    /// when the variable is unset or the file cannot be loaded.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(settings) => {
                info!("Loaded terrain settings from {path}");
                settings
            }
            Err(e) => {
                warn!("Failed to load terrain settings from {path}: {e}; using defaults");
                Self::default()
            }
        }
    }

    /// Map side length used for generation. At least two cells, so a chunk
    /// always spans a positive world distance.
    pub fn chunk_map_size(&self) -> usize {
        self.map_chunk_size.max(2)
    }

    /// Level of detail clamped to [`MAX_LEVEL_OF_DETAIL`].
    pub fn clamped_level_of_detail(&self) -> u32 {
        self.level_of_detail.min(MAX_LEVEL_OF_DETAIL)
    }
}
