//! Height-band classification of heightmap cells into named terrain regions.

use bevy::color::Srgba;
use serde::{Deserialize, Serialize};

use crate::noise_map::Heightmap;
use crate::terrain_error::TerrainWarning;

/// A named height band. A cell belongs to the first region (in declaration
/// order) whose `height` threshold is at or above the cell's height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainRegion {
    pub name: String,
    pub height: f32,
    pub color: Srgba,
}

impl TerrainRegion {
    pub fn new(name: impl Into<String>, height: f32, color: Srgba) -> Self {
        Self {
            name: name.into(),
            height,
            color,
        }
    }
}

/// One color per heightmap cell, row-major, same dimensions as the heightmap.
pub type ColorMap = Vec<Srgba>;

/// Color given to every cell when no regions are configured.
pub const UNCLASSIFIED_COLOR: Srgba = Srgba::NONE;

/// The default palette: water, sand, grass, rock and snow bands.
pub fn default_regions() -> Vec<TerrainRegion> {
    vec![
        TerrainRegion::new("Deep Water", 0.3, Srgba::rgb(0.20, 0.38, 0.76)),
        TerrainRegion::new("Shallow Water", 0.4, Srgba::rgb(0.22, 0.42, 0.82)),
        TerrainRegion::new("Sand", 0.45, Srgba::rgb(0.82, 0.82, 0.50)),
        TerrainRegion::new("Grass", 0.55, Srgba::rgb(0.34, 0.60, 0.10)),
        TerrainRegion::new("Grass 2", 0.6, Srgba::rgb(0.24, 0.42, 0.08)),
        TerrainRegion::new("Rock", 0.7, Srgba::rgb(0.36, 0.27, 0.24)),
        TerrainRegion::new("Rock 2", 0.9, Srgba::rgb(0.29, 0.24, 0.23)),
        TerrainRegion::new("Snow", 1.0, Srgba::rgb(1.0, 1.0, 1.0)),
    ]
}

/// Index of the region `height` falls into.
///
/// Heights above every threshold (a coverage gap, or NaN) fall back to the
/// last region. Returns `None` only when `regions` is empty.
pub fn region_index(height: f32, regions: &[TerrainRegion]) -> Option<usize> {
    if regions.is_empty() {
        return None;
    }
    let idx = regions
        .iter()
        .position(|r| height <= r.height)
        .unwrap_or(regions.len() - 1);
    Some(idx)
}

/// Color every heightmap cell by its region.
pub fn classify(heightmap: &Heightmap, regions: &[TerrainRegion]) -> ColorMap {
    heightmap
        .values()
        .iter()
        .map(|&h| match region_index(h, regions) {
            Some(idx) => regions[idx].color,
            None => UNCLASSIFIED_COLOR,
        })
        .collect()
}

/// Report thresholds that decrease or that stop short of 1.0.
pub fn validate_regions(regions: &[TerrainRegion]) -> Vec<TerrainWarning> {
    let mut warnings = Vec::new();
    for (index, pair) in regions.windows(2).enumerate() {
        if pair[1].height < pair[0].height {
            warnings.push(TerrainWarning::RegionsOutOfOrder { index: index + 1 });
        }
    }
    if let Some(last) = regions.last() {
        if !(last.height >= 1.0) {
            warnings.push(TerrainWarning::RegionCoverageGap {
                last_threshold: last.height,
            });
        }
    }
    warnings
}
