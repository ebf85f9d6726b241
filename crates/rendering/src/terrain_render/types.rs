use std::collections::HashMap;

use bevy::prelude::*;

use terrain::chunk::ChunkCoord;
use terrain::ChunkStreamingManager;

/// Marks the entity showing one streamed terrain chunk.
#[derive(Component, Debug, Clone, Copy)]
pub struct TerrainChunkEntity {
    pub coord: ChunkCoord,
}

/// Streaming manager whose chunk handles are scene entities.
pub type SceneStreamingManager = ChunkStreamingManager<Entity>;

/// Active flag and material of every chunk entity.
///
/// `Visibility` is inserted through `Commands`, so it is not readable until
/// the commands apply; the flag here is what streaming queries.
#[derive(Resource, Default, Debug)]
pub struct ChunkActivity {
    pub(crate) active: HashMap<Entity, bool>,
    pub(crate) materials: HashMap<Entity, Handle<StandardMaterial>>,
}

impl ChunkActivity {
    pub fn is_active(&self, entity: Entity) -> bool {
        self.active.get(&entity).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.values().filter(|&&a| a).count()
    }
}
