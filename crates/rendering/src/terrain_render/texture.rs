use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use terrain::texture::TextureData;

/// sRGB image for a terrain texture, sampled nearest-neighbour so region
/// borders stay crisp. An empty texture becomes one transparent pixel.
pub fn texture_to_image(texture: &TextureData) -> Image {
    let (width, height, data) = if texture.width == 0 || texture.height == 0 {
        (1, 1, vec![0u8; 4])
    } else {
        (texture.width, texture.height, texture.to_rgba8())
    };
    let mut image = Image::new(
        Extent3d {
            width: width as u32,
            height: height as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = bevy::image::ImageSampler::nearest();
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::Srgba;

    #[test]
    fn test_image_size_and_bytes() {
        let texture = TextureData {
            width: 2,
            height: 3,
            pixels: vec![Srgba::rgb(1.0, 0.0, 0.0); 6],
        };
        let image = texture_to_image(&texture);
        assert_eq!(image.texture_descriptor.size.width, 2);
        assert_eq!(image.texture_descriptor.size.height, 3);
        assert_eq!(image.data.len(), 24);
        assert_eq!(&image.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_empty_texture_becomes_single_pixel() {
        let texture = TextureData {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        let image = texture_to_image(&texture);
        assert_eq!(image.texture_descriptor.size.width, 1);
        assert_eq!(image.data, vec![0, 0, 0, 0]);
    }
}
