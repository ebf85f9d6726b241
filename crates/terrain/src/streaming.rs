//! Observer-driven chunk streaming.
//!
//! Every tick the manager hides whatever was visible on the previous tick,
//! then walks the `(2r + 1)^2` window of chunk coordinates around the
//! observer. Existing chunks refresh their visibility; missing ones are
//! created and refreshed on the spot. Chunks that leave the window stay
//! registered (hidden), so returning to an area never regenerates it.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::chunk::{ChunkCoord, TerrainChunk};
use crate::config::{MAX_LEVEL_OF_DETAIL, MAX_VIEW_RADIUS};
use crate::map_generator::TerrainGenerator;
use crate::settings::TerrainSettings;
use crate::terrain_error::TerrainWarning;
use crate::visuals::ChunkVisuals;

/// What one [`ChunkStreamingManager::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamingReport {
    /// Chunk the observer stands in.
    pub current: ChunkCoord,
    /// Coordinates examined: `(2 * view_radius + 1)^2`, fewer only where the
    /// window runs past the `i32` coordinate range.
    pub scanned: usize,
    /// Chunks created this tick.
    pub created: usize,
    /// Chunks visible after the tick.
    pub visible: usize,
    /// Meshes built this tick (first generation or LOD rebuild).
    pub generated: usize,
}

/// Report of the most recent streaming tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LastStreamingReport(pub StreamingReport);

pub struct ChunkStreamingManager<H> {
    generator: Arc<TerrainGenerator>,
    chunk_size: f32,
    max_view_distance: f32,
    view_radius: i32,
    level_of_detail: u32,
    chunks: HashMap<ChunkCoord, TerrainChunk<H>>,
    visible_last_update: Vec<ChunkCoord>,
}

impl<H: Send + Sync + 'static> Resource for ChunkStreamingManager<H> {}

impl<H> ChunkStreamingManager<H> {
    /// Chunks are `map_chunk_size - 1` world units wide so neighbouring maps
    /// share their border row. The view radius, in chunks, is
    /// `max_view_distance / chunk_size` rounded half-to-even, at most
    /// [`MAX_VIEW_RADIUS`].
    pub fn new(generator: Arc<TerrainGenerator>, max_view_distance: f32) -> Self {
        let chunk_size = (generator.map_chunk_size() - 1) as f32;
        let widest = MAX_VIEW_RADIUS as f32 * chunk_size;
        let max_view_distance = if !max_view_distance.is_finite() {
            warn!("ChunkStreamingManager: invalid view distance {max_view_distance}, using 0");
            0.0
        } else if max_view_distance > widest {
            warn!("ChunkStreamingManager: view distance {max_view_distance} too large, using {widest}");
            widest
        } else {
            max_view_distance.max(0.0)
        };
        let view_radius = (max_view_distance / chunk_size).round_ties_even() as i32;
        Self {
            generator,
            chunk_size,
            max_view_distance,
            view_radius,
            level_of_detail: 0,
            chunks: HashMap::new(),
            visible_last_update: Vec::new(),
        }
    }

    pub fn from_settings(generator: Arc<TerrainGenerator>, settings: &TerrainSettings) -> Self {
        let mut manager = Self::new(generator, settings.max_view_distance);
        manager.set_level_of_detail(settings.level_of_detail);
        manager
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn view_radius(&self) -> i32 {
        self.view_radius
    }

    pub fn max_view_distance(&self) -> f32 {
        self.max_view_distance
    }

    pub fn level_of_detail(&self) -> u32 {
        self.level_of_detail
    }

    /// Change the LOD chunk meshes are built at. Already visible chunks
    /// rebuild their mesh on their next refresh.
    pub fn set_level_of_detail(&mut self, level_of_detail: u32) {
        self.level_of_detail = level_of_detail.min(MAX_LEVEL_OF_DETAIL);
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk<H>> {
        self.chunks.get(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &TerrainChunk<H>> {
        self.chunks.values()
    }

    /// Chunks shown by the last update, in scan order.
    pub fn visible_chunks(&self) -> &[ChunkCoord] {
        &self.visible_last_update
    }

    pub fn chunk_coord_at(&self, observer: Vec2) -> ChunkCoord {
        ChunkCoord::containing(observer, self.chunk_size)
    }

    /// Register a hidden chunk at `coord` without generating it. Returns
    /// `false`, leaving the existing chunk untouched, if one is already there.
    pub fn ensure_chunk<V>(&mut self, coord: ChunkCoord, visuals: &mut V) -> bool
    where
        V: ChunkVisuals<Handle = H>,
    {
        if self.chunks.contains_key(&coord) {
            debug!("{}", TerrainWarning::DuplicateChunkRequest(coord));
            return false;
        }
        let chunk = TerrainChunk::new(coord, self.chunk_size, Arc::clone(&self.generator), visuals);
        debug!("Created chunk ({}, {})", coord.x, coord.y);
        self.chunks.insert(coord, chunk);
        true
    }

    /// Run one streaming tick for an observer at `observer` on the ground
    /// plane.
    pub fn update<V>(&mut self, observer: Vec2, visuals: &mut V) -> StreamingReport
    where
        V: ChunkVisuals<Handle = H>,
    {
        for coord in self.visible_last_update.drain(..) {
            if let Some(chunk) = self.chunks.get(&coord) {
                chunk.set_visible(visuals, false);
            }
        }

        let current = self.chunk_coord_at(observer);
        let mut report = StreamingReport {
            current,
            ..default()
        };

        let radius = self.view_radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (Some(x), Some(y)) = (current.x.checked_add(dx), current.y.checked_add(dy))
                else {
                    continue;
                };
                let coord = ChunkCoord::new(x, y);
                report.scanned += 1;

                if !self.chunks.contains_key(&coord) && self.ensure_chunk(coord, visuals) {
                    report.created += 1;
                }
                let Some(chunk) = self.chunks.get_mut(&coord) else {
                    continue;
                };
                if chunk.refresh(observer, self.max_view_distance, self.level_of_detail, visuals) {
                    report.generated += 1;
                }
                if chunk.is_visible(&*visuals) {
                    self.visible_last_update.push(coord);
                    report.visible += 1;
                }
            }
        }

        if report.created > 0 || report.generated > 0 {
            debug!(
                "Streaming tick at ({}, {}): {} created, {} generated, {} visible",
                current.x, current.y, report.created, report.generated, report.visible
            );
        }
        report
    }
}
