use std::sync::Arc;

use bevy::prelude::*;

pub mod chunk;
pub mod config;
pub mod headless;
pub mod height_curve;
pub mod map_generator;
pub mod mesh_data;
pub mod noise_map;
pub mod regions;
pub mod settings;
pub mod streaming;
pub mod terrain_error;
pub mod texture;
pub mod visuals;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use chunk::{ChunkCoord, TerrainChunk};
pub use map_generator::{DrawMode, MapData, MapPreview, TerrainGenerator};
pub use settings::TerrainSettings;
pub use streaming::{ChunkStreamingManager, LastStreamingReport, StreamingReport};
pub use visuals::ChunkVisuals;

/// Observer position on the ground plane, snapshotted once per tick before
/// streaming runs. World X maps to `x`, world Z to `y`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct ObserverPosition(pub Vec2);

/// The generation pipeline shared by every chunk.
#[derive(Resource, Clone)]
pub struct TerrainPipeline(pub Arc<TerrainGenerator>);

impl TerrainPipeline {
    pub fn from_settings(settings: &TerrainSettings) -> Self {
        Self(Arc::new(TerrainGenerator::new(settings)))
    }
}

/// Registers terrain settings, the observer snapshot and the shared
/// generation pipeline. Streaming itself is added by a visuals backend
/// ([`headless::HeadlessStreamingPlugin`] or the renderer).
pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainSettings>()
            .init_resource::<ObserverPosition>();

        let settings = app.world().resource::<TerrainSettings>().clone();
        info!(
            "Terrain: seed {}, {}x{} maps, view distance {}",
            settings.noise.seed,
            settings.chunk_map_size(),
            settings.chunk_map_size(),
            settings.max_view_distance
        );
        app.insert_resource(TerrainPipeline::from_settings(&settings));
    }
}

/// Push the configured level of detail into the streaming manager whenever
/// the settings change.
pub fn sync_level_of_detail<H: Send + Sync + 'static>(
    settings: Res<TerrainSettings>,
    manager: Option<ResMut<ChunkStreamingManager<H>>>,
) {
    if !settings.is_changed() {
        return;
    }
    let Some(mut manager) = manager else {
        return;
    };
    let level_of_detail = settings.clamped_level_of_detail();
    if manager.level_of_detail() != level_of_detail {
        manager.set_level_of_detail(level_of_detail);
    }
}
