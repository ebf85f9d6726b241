use std::sync::Arc;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use terrain::chunk::ChunkCoord;
use terrain::mesh_data::MeshData;
use terrain::texture::TextureData;
use terrain::ChunkVisuals;

use super::mesh::build_chunk_mesh;
use super::texture::texture_to_image;
use super::types::{ChunkActivity, TerrainChunkEntity};

/// Scene-backed chunk visuals: one entity per chunk, shown and hidden via
/// `Visibility`.
#[derive(SystemParam)]
pub struct SceneVisuals<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    images: ResMut<'w, Assets<Image>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    activity: ResMut<'w, ChunkActivity>,
}

impl ChunkVisuals for SceneVisuals<'_, '_> {
    type Handle = Entity;

    fn create_handle(&mut self, coord: ChunkCoord, placement: Vec3, _size: f32) -> Entity {
        let entity = self
            .commands
            .spawn((
                Name::new(format!("Terrain chunk ({}, {})", coord.x, coord.y)),
                TerrainChunkEntity { coord },
                Transform::from_translation(placement),
                Visibility::Hidden,
            ))
            .id();
        self.activity.active.insert(entity, false);
        entity
    }

    fn set_active(&mut self, handle: &Entity, active: bool) {
        let was = self.activity.active.insert(*handle, active);
        if was == Some(active) {
            return;
        }
        let visibility = if active {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        self.commands.entity(*handle).insert(visibility);
    }

    fn is_active(&self, handle: &Entity) -> bool {
        self.activity.is_active(*handle)
    }

    fn present(&mut self, handle: &Entity, mesh: &Arc<MeshData>, texture: &Arc<TextureData>) {
        let mesh_handle = self.meshes.add(build_chunk_mesh(mesh));

        // The texture of a chunk never changes; LOD rebuilds reuse its material.
        let material = match self.activity.materials.get(handle) {
            Some(material) => material.clone(),
            None => {
                let image = self.images.add(texture_to_image(texture));
                let material = self.materials.add(StandardMaterial {
                    base_color_texture: Some(image),
                    perceptual_roughness: 0.9,
                    ..default()
                });
                self.activity.materials.insert(*handle, material.clone());
                material
            }
        };

        self.commands
            .entity(*handle)
            .insert((Mesh3d(mesh_handle), MeshMaterial3d(material)));
    }
}
