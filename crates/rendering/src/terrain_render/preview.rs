//! Single-map preview: the map at the world origin, drawn per `DrawMode`.

use bevy::prelude::*;

use terrain::{MapPreview, TerrainGenerator, TerrainSettings};

use super::mesh::build_chunk_mesh;
use super::texture::texture_to_image;

#[derive(Component)]
pub struct MapPreviewDisplay;

/// Redraw the preview whenever the settings change (and on the first frame).
pub fn redraw_map_preview(
    mut commands: Commands,
    settings: Res<TerrainSettings>,
    existing: Query<Entity, With<MapPreviewDisplay>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !settings.is_changed() {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }

    let generator = TerrainGenerator::new(&settings);
    let size = (generator.map_chunk_size() - 1) as f32;
    let preview = generator.preview(settings.draw_mode, settings.clamped_level_of_detail());
    info!("Drawing {:?} preview", settings.draw_mode);

    match preview {
        MapPreview::Texture(texture) => {
            let image = images.add(texture_to_image(&texture));
            commands.spawn((
                Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color_texture: Some(image),
                    unlit: true,
                    ..default()
                })),
                Transform::IDENTITY,
                MapPreviewDisplay,
            ));
        }
        MapPreview::MeshWithTexture { mesh, texture } => {
            let image = images.add(texture_to_image(&texture));
            commands.spawn((
                Mesh3d(meshes.add(build_chunk_mesh(&mesh))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color_texture: Some(image),
                    perceptual_roughness: 0.9,
                    ..default()
                })),
                Transform::IDENTITY,
                MapPreviewDisplay,
            ));
        }
    }
}
