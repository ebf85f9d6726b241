//! The generation pipeline for one map: noise → region colors → mesh/texture.
//!
//! A [`TerrainGenerator`] is built once from [`TerrainSettings`] and shared
//! (behind an `Arc`) by every chunk, so parameter sanitizing and region
//! validation happen, and are logged, exactly once.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::height_curve::HeightCurve;
use crate::mesh_data::{build_terrain_mesh, MeshData};
use crate::noise_map::{Heightmap, NoiseFieldGenerator};
use crate::regions::{classify, validate_regions, ColorMap, TerrainRegion};
use crate::settings::TerrainSettings;
use crate::terrain_error::TerrainWarning;
use crate::texture::TextureData;

/// What the single-map preview shows. Never affects generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    /// Grayscale heightmap texture.
    NoiseMap,
    /// Flat region colors.
    ColorMap,
    /// Textured mesh.
    #[default]
    Mesh,
}

/// Heightmap and its classified colors for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub heightmap: Heightmap,
    pub color_map: ColorMap,
}

/// Output of [`TerrainGenerator::preview`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapPreview {
    Texture(TextureData),
    MeshWithTexture { mesh: MeshData, texture: TextureData },
}

pub struct TerrainGenerator {
    noise: NoiseFieldGenerator,
    regions: Vec<TerrainRegion>,
    region_warnings: Vec<TerrainWarning>,
    height_multiplier: f32,
    height_curve: HeightCurve,
    map_chunk_size: usize,
}

impl TerrainGenerator {
    pub fn new(settings: &TerrainSettings) -> Self {
        let noise = NoiseFieldGenerator::new(&settings.noise, settings.normalize_mode);

        let region_warnings = validate_regions(&settings.regions);
        for warning in &region_warnings {
            warn!("TerrainGenerator: {}", warning);
        }

        let height_multiplier = if settings.height_multiplier.is_finite() {
            settings.height_multiplier
        } else {
            warn!(
                "TerrainGenerator: non-finite height multiplier {}, using 0",
                settings.height_multiplier
            );
            0.0
        };

        Self {
            noise,
            regions: settings.regions.clone(),
            region_warnings,
            height_multiplier,
            height_curve: settings.height_curve.clone(),
            map_chunk_size: settings.chunk_map_size(),
        }
    }

    /// Side length, in cells, of every generated map.
    pub fn map_chunk_size(&self) -> usize {
        self.map_chunk_size
    }

    pub fn regions(&self) -> &[TerrainRegion] {
        &self.regions
    }

    /// Every correction made while building this generator.
    pub fn warnings(&self) -> Vec<TerrainWarning> {
        self.noise
            .warnings()
            .iter()
            .chain(self.region_warnings.iter())
            .cloned()
            .collect()
    }

    /// Heightmap and color map for the chunk whose centre is `centre`.
    pub fn generate_map_data(&self, centre: Vec2) -> MapData {
        let size = self.map_chunk_size;
        let heightmap = self.noise.generate_at(size, size, centre);
        let color_map = classify(&heightmap, &self.regions);
        MapData {
            heightmap,
            color_map,
        }
    }

    pub fn build_mesh(&self, map: &MapData, level_of_detail: u32) -> MeshData {
        build_terrain_mesh(
            &map.heightmap,
            self.height_multiplier,
            |h| self.height_curve.sample(h),
            level_of_detail,
        )
    }

    /// Region-colored texture for `map`.
    pub fn build_texture(&self, map: &MapData) -> TextureData {
        TextureData::from_color_map(
            &map.color_map,
            map.heightmap.width(),
            map.heightmap.height(),
        )
    }

    /// Generate the map at the world origin and turn it into what
    /// `draw_mode` displays.
    pub fn preview(&self, draw_mode: DrawMode, level_of_detail: u32) -> MapPreview {
        let map = self.generate_map_data(Vec2::ZERO);
        match draw_mode {
            DrawMode::NoiseMap => MapPreview::Texture(TextureData::from_heightmap(&map.heightmap)),
            DrawMode::ColorMap => MapPreview::Texture(self.build_texture(&map)),
            DrawMode::Mesh => MapPreview::MeshWithTexture {
                mesh: self.build_mesh(&map, level_of_detail),
                texture: self.build_texture(&map),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_NOISE_SCALE;

    fn small_settings() -> TerrainSettings {
        TerrainSettings {
            map_chunk_size: 33,
            ..TerrainSettings::default()
        }
    }

    #[test]
    fn test_map_data_dimensions() {
        let generator = TerrainGenerator::new(&small_settings());
        let map = generator.generate_map_data(Vec2::new(32.0, -64.0));
        assert_eq!(map.heightmap.width(), 33);
        assert_eq!(map.heightmap.height(), 33);
        assert_eq!(map.color_map.len(), 33 * 33);
    }

    #[test]
    fn test_preview_modes() {
        let generator = TerrainGenerator::new(&small_settings());

        let MapPreview::Texture(gray) = generator.preview(DrawMode::NoiseMap, 0) else {
            panic!("noise map preview should be a texture");
        };
        assert!(gray.pixels.iter().all(|p| p.red == p.green && p.green == p.blue));

        let MapPreview::Texture(colors) = generator.preview(DrawMode::ColorMap, 0) else {
            panic!("color map preview should be a texture");
        };
        assert_eq!(colors.pixels.len(), 33 * 33);

        let MapPreview::MeshWithTexture { mesh, texture } = generator.preview(DrawMode::Mesh, 1)
        else {
            panic!("mesh preview should carry a mesh");
        };
        assert_eq!(mesh.level_of_detail, 1);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        assert_eq!(texture, colors);
    }

    #[test]
    fn test_mesh_uses_curve_and_multiplier() {
        let settings = TerrainSettings {
            height_multiplier: 10.0,
            height_curve: HeightCurve::linear(),
            ..small_settings()
        };
        let generator = TerrainGenerator::new(&settings);
        let map = generator.generate_map_data(Vec2::ZERO);
        let mesh = generator.build_mesh(&map, 0);
        for (vertex, &h) in mesh.vertices.iter().zip(map.heightmap.values()) {
            assert!((vertex[1] - h * 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_warnings_collected_once() {
        let mut settings = small_settings();
        settings.noise.scale = -1.0;
        settings.regions.truncate(2);
        let generator = TerrainGenerator::new(&settings);
        let warnings = generator.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.contains(&TerrainWarning::InvalidParameter {
            name: "scale",
            given: -1.0,
            used: MIN_NOISE_SCALE,
        }));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, TerrainWarning::RegionCoverageGap { .. })));
    }

    #[test]
    fn test_non_finite_multiplier_flattens_mesh() {
        let settings = TerrainSettings {
            height_multiplier: f32::INFINITY,
            ..small_settings()
        };
        let generator = TerrainGenerator::new(&settings);
        let map = generator.generate_map_data(Vec2::ZERO);
        let mesh = generator.build_mesh(&map, 0);
        assert!(mesh.vertices.iter().all(|v| v[1] == 0.0));
    }
}
