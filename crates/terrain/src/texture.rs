use bevy::color::{ColorToPacked, Srgba};

use crate::noise_map::Heightmap;
use crate::regions::ColorMap;

/// A flat per-pixel color texture, row-major, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Srgba>,
}

impl TextureData {
    /// Grayscale texture: height 0 is black, height 1 is white.
    pub fn from_heightmap(heightmap: &Heightmap) -> Self {
        let pixels = heightmap
            .values()
            .iter()
            .map(|&h| {
                let v = h.clamp(0.0, 1.0);
                Srgba::rgb(v, v, v)
            })
            .collect();
        Self {
            width: heightmap.width(),
            height: heightmap.height(),
            pixels,
        }
    }

    /// Texture that shows a classified color map as-is.
    pub fn from_color_map(color_map: &ColorMap, width: usize, height: usize) -> Self {
        let mut pixels = color_map.clone();
        pixels.resize(width * height, Srgba::NONE);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Packed RGBA8 bytes, four per pixel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| c.to_u8_array())
            .collect()
    }
}
