//! Renderer-free chunk visuals and the plugin that streams chunks with them.
//!
//! Used by servers and tests: chunks are created, shown, hidden and handed
//! content exactly as in the rendered app, but the "visual object" is just a
//! record in [`HeadlessVisuals`].

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::chunk::ChunkCoord;
use crate::mesh_data::MeshData;
use crate::settings::TerrainSettings;
use crate::streaming::{ChunkStreamingManager, LastStreamingReport};
use crate::texture::TextureData;
use crate::visuals::ChunkVisuals;
use crate::{sync_level_of_detail, ObserverPosition, TerrainPipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadlessHandle(u64);

/// What a real renderer would be showing for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessChunkState {
    pub coord: ChunkCoord,
    pub placement: Vec3,
    pub size: f32,
    pub active: bool,
    /// Number of meshes presented so far.
    pub presented: u32,
    pub vertex_count: usize,
    pub level_of_detail: Option<u32>,
}

#[derive(Resource, Debug, Default)]
pub struct HeadlessVisuals {
    next_id: u64,
    states: HashMap<HeadlessHandle, HeadlessChunkState>,
}

impl HeadlessVisuals {
    pub fn state(&self, handle: &HeadlessHandle) -> Option<&HeadlessChunkState> {
        self.states.get(handle)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.states.values().filter(|s| s.active).count()
    }

    /// Total meshes presented across all chunks.
    pub fn presented_total(&self) -> u32 {
        self.states.values().map(|s| s.presented).sum()
    }
}

impl ChunkVisuals for HeadlessVisuals {
    type Handle = HeadlessHandle;

    fn create_handle(&mut self, coord: ChunkCoord, placement: Vec3, size: f32) -> HeadlessHandle {
        let handle = HeadlessHandle(self.next_id);
        self.next_id += 1;
        self.states.insert(
            handle,
            HeadlessChunkState {
                coord,
                placement,
                size,
                active: false,
                presented: 0,
                vertex_count: 0,
                level_of_detail: None,
            },
        );
        handle
    }

    fn set_active(&mut self, handle: &HeadlessHandle, active: bool) {
        if let Some(state) = self.states.get_mut(handle) {
            state.active = active;
        }
    }

    fn is_active(&self, handle: &HeadlessHandle) -> bool {
        self.states.get(handle).is_some_and(|s| s.active)
    }

    fn present(
        &mut self,
        handle: &HeadlessHandle,
        mesh: &Arc<MeshData>,
        _texture: &Arc<TextureData>,
    ) {
        if let Some(state) = self.states.get_mut(handle) {
            state.presented += 1;
            state.vertex_count = mesh.vertex_count();
            state.level_of_detail = Some(mesh.level_of_detail);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub type HeadlessStreamingManager = ChunkStreamingManager<HeadlessHandle>;

/// Streams chunks around [`ObserverPosition`] into [`HeadlessVisuals`] every
/// `Update`. Requires [`crate::TerrainPlugin`].
pub struct HeadlessStreamingPlugin;

impl Plugin for HeadlessStreamingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessVisuals>()
            .init_resource::<LastStreamingReport>()
            .add_systems(Startup, setup_headless_streaming)
            .add_systems(
                Update,
                (
                    sync_level_of_detail::<HeadlessHandle>,
                    stream_headless_chunks,
                )
                    .chain(),
            );
    }
}

fn setup_headless_streaming(
    mut commands: Commands,
    settings: Res<TerrainSettings>,
    pipeline: Res<TerrainPipeline>,
) {
    let manager = HeadlessStreamingManager::from_settings(Arc::clone(&pipeline.0), &settings);
    info!(
        "Headless streaming: chunk size {}, view radius {}",
        manager.chunk_size(),
        manager.view_radius()
    );
    commands.insert_resource(manager);
}

fn stream_headless_chunks(
    observer: Res<ObserverPosition>,
    manager: Option<ResMut<HeadlessStreamingManager>>,
    mut visuals: ResMut<HeadlessVisuals>,
    mut last_report: ResMut<LastStreamingReport>,
) {
    let Some(mut manager) = manager else {
        return;
    };
    last_report.0 = manager.update(observer.0, &mut *visuals);
}
