//! One tile of the infinite terrain grid.

use std::sync::{Arc, OnceLock};

use bevy::prelude::*;

use crate::config::MAX_LEVEL_OF_DETAIL;
use crate::map_generator::{MapData, TerrainGenerator};
use crate::mesh_data::MeshData;
use crate::texture::TextureData;
use crate::visuals::ChunkVisuals;

/// Integer tile coordinate. Chunk `(x, y)` is centred on world
/// `(x * size, y * size)` on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the ground-plane point `position`, rounding each
    /// component half-to-even. Components past the `i32` range saturate.
    pub fn containing(position: Vec2, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).round_ties_even() as i32,
            y: (position.y / chunk_size).round_ties_even() as i32,
        }
    }
}

/// Axis-aligned square on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    pub centre: Vec2,
    pub half_extent: f32,
}

impl ChunkBounds {
    /// Distance from `point` to the nearest point of the square; 0 inside.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let outside = (point - self.centre).abs() - Vec2::splat(self.half_extent);
        outside.max(Vec2::ZERO).length()
    }
}

pub struct TerrainChunk<H> {
    coord: ChunkCoord,
    position: Vec2,
    bounds: ChunkBounds,
    generator: Arc<TerrainGenerator>,
    handle: H,
    map_data: OnceLock<Arc<MapData>>,
    texture: OnceLock<Arc<TextureData>>,
    mesh: Option<Arc<MeshData>>,
}

impl<H> TerrainChunk<H> {
    /// Create a hidden chunk and its visual handle. Nothing is generated
    /// until the chunk first becomes visible.
    pub fn new<V>(
        coord: ChunkCoord,
        chunk_size: f32,
        generator: Arc<TerrainGenerator>,
        visuals: &mut V,
    ) -> Self
    where
        V: ChunkVisuals<Handle = H>,
    {
        let position = Vec2::new(coord.x as f32, coord.y as f32) * chunk_size;
        let handle = visuals.create_handle(
            coord,
            Vec3::new(position.x, 0.0, position.y),
            chunk_size,
        );
        visuals.set_active(&handle, false);
        Self {
            coord,
            position,
            bounds: ChunkBounds {
                centre: position,
                half_extent: chunk_size / 2.0,
            },
            generator,
            handle,
            map_data: OnceLock::new(),
            texture: OnceLock::new(),
            mesh: None,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space centre on the ground plane.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bounds(&self) -> ChunkBounds {
        self.bounds
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn map_data(&self) -> Option<&Arc<MapData>> {
        self.map_data.get()
    }

    pub fn texture(&self) -> Option<&Arc<TextureData>> {
        self.texture.get()
    }

    pub fn mesh(&self) -> Option<&Arc<MeshData>> {
        self.mesh.as_ref()
    }

    pub fn distance_to(&self, observer: Vec2) -> f32 {
        self.bounds.distance_to(observer)
    }

    pub fn set_visible<V>(&self, visuals: &mut V, visible: bool)
    where
        V: ChunkVisuals<Handle = H>,
    {
        visuals.set_active(&self.handle, visible);
    }

    pub fn is_visible<V>(&self, visuals: &V) -> bool
    where
        V: ChunkVisuals<Handle = H>,
    {
        visuals.is_active(&self.handle)
    }

    /// Show the chunk iff its nearest edge is within `max_view_distance` of
    /// `observer`, generating content the first time it is shown.
    ///
    /// Returns `true` when a mesh was built during this call.
    pub fn refresh<V>(
        &mut self,
        observer: Vec2,
        max_view_distance: f32,
        level_of_detail: u32,
        visuals: &mut V,
    ) -> bool
    where
        V: ChunkVisuals<Handle = H>,
    {
        let visible = self.distance_to(observer) <= max_view_distance;
        self.set_visible(visuals, visible);
        if !visible {
            return false;
        }
        self.ensure_content(level_of_detail, visuals)
    }

    /// Build the mesh for `level_of_detail` unless the cached one already
    /// matches. Map data and texture are generated at most once.
    fn ensure_content<V>(&mut self, level_of_detail: u32, visuals: &mut V) -> bool
    where
        V: ChunkVisuals<Handle = H>,
    {
        let level_of_detail = level_of_detail.min(MAX_LEVEL_OF_DETAIL);
        if self
            .mesh
            .as_ref()
            .is_some_and(|mesh| mesh.level_of_detail == level_of_detail)
        {
            return false;
        }

        let generator = &self.generator;
        let (coord, position) = (self.coord, self.position);
        let map = self.map_data.get_or_init(|| {
            debug!("Generating chunk ({}, {}) at {}", coord.x, coord.y, position);
            Arc::new(generator.generate_map_data(position))
        });
        let texture = self
            .texture
            .get_or_init(|| Arc::new(generator.build_texture(map)));
        let mesh = Arc::new(generator.build_mesh(map, level_of_detail));

        visuals.present(&self.handle, &mesh, texture);
        self.mesh = Some(mesh);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessVisuals;
    use crate::settings::TerrainSettings;

    fn generator(map_chunk_size: usize) -> Arc<TerrainGenerator> {
        let settings = TerrainSettings {
            map_chunk_size,
            ..TerrainSettings::default()
        };
        Arc::new(TerrainGenerator::new(&settings))
    }

    #[test]
    fn test_containing_rounds_half_to_even() {
        assert_eq!(ChunkCoord::containing(Vec2::ZERO, 240.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(Vec2::new(119.0, -121.0), 240.0), ChunkCoord::new(0, -1));
        // exactly half a chunk rounds to the even neighbour
        assert_eq!(ChunkCoord::containing(Vec2::new(120.0, 360.0), 240.0), ChunkCoord::new(0, 2));
        assert_eq!(ChunkCoord::containing(Vec2::new(-120.0, -360.0), 240.0), ChunkCoord::new(0, -2));
    }

    #[test]
    fn test_bounds_distance() {
        let bounds = ChunkBounds {
            centre: Vec2::new(240.0, 0.0),
            half_extent: 120.0,
        };
        assert_eq!(bounds.distance_to(Vec2::new(240.0, 10.0)), 0.0);
        assert_eq!(bounds.distance_to(Vec2::ZERO), 120.0);
        assert_eq!(bounds.distance_to(Vec2::new(0.0, 150.0)), (120.0f32 * 120.0 + 30.0 * 30.0).sqrt());
    }

    #[test]
    fn test_new_chunk_is_hidden_and_empty() {
        let mut visuals = HeadlessVisuals::default();
        let chunk = TerrainChunk::new(ChunkCoord::new(2, -1), 16.0, generator(17), &mut visuals);
        assert_eq!(chunk.position(), Vec2::new(32.0, -16.0));
        assert_eq!(chunk.bounds().half_extent, 8.0);
        assert!(!chunk.is_visible(&visuals));
        assert!(chunk.map_data().is_none());
        assert!(chunk.mesh().is_none());
        let state = visuals.state(chunk.handle()).expect("handle registered");
        assert_eq!(state.placement, Vec3::new(32.0, 0.0, -16.0));
    }

    #[test]
    fn test_visibility_follows_view_distance() {
        let mut visuals = HeadlessVisuals::default();
        let mut chunk = TerrainChunk::new(ChunkCoord::new(1, 0), 16.0, generator(17), &mut visuals);
        // nearest edge is at x = 8
        for (observer_x, expected) in [(0.0, true), (-2.0, true), (-2.5, false), (8.0, true)] {
            let observer = Vec2::new(observer_x, 0.0);
            chunk.refresh(observer, 10.0, 0, &mut visuals);
            assert_eq!(chunk.is_visible(&visuals), expected, "observer x {observer_x}");
            assert_eq!(
                chunk.is_visible(&visuals),
                chunk.distance_to(observer) <= 10.0
            );
        }
    }

    #[test]
    fn test_hidden_chunk_does_not_generate() {
        let mut visuals = HeadlessVisuals::default();
        let mut chunk = TerrainChunk::new(ChunkCoord::new(5, 5), 16.0, generator(17), &mut visuals);
        assert!(!chunk.refresh(Vec2::ZERO, 10.0, 0, &mut visuals));
        assert!(chunk.map_data().is_none());
        assert_eq!(visuals.state(chunk.handle()).map(|s| s.presented), Some(0));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut visuals = HeadlessVisuals::default();
        let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 16.0, generator(17), &mut visuals);
        assert!(chunk.refresh(Vec2::ZERO, 100.0, 0, &mut visuals));
        let map = Arc::clone(chunk.map_data().expect("generated"));
        let mesh = Arc::clone(chunk.mesh().expect("generated"));

        chunk.refresh(Vec2::new(1000.0, 0.0), 100.0, 0, &mut visuals);
        assert!(!chunk.refresh(Vec2::ZERO, 100.0, 0, &mut visuals));

        assert!(Arc::ptr_eq(&map, chunk.map_data().expect("still generated")));
        assert!(Arc::ptr_eq(&mesh, chunk.mesh().expect("still generated")));
        assert_eq!(visuals.state(chunk.handle()).map(|s| s.presented), Some(1));
    }

    #[test]
    fn test_lod_change_rebuilds_mesh_only() {
        let mut visuals = HeadlessVisuals::default();
        let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 16.0, generator(17), &mut visuals);
        chunk.refresh(Vec2::ZERO, 100.0, 0, &mut visuals);
        let map = Arc::clone(chunk.map_data().expect("generated"));
        let texture = Arc::clone(chunk.texture().expect("generated"));

        assert!(chunk.refresh(Vec2::ZERO, 100.0, 2, &mut visuals));
        let mesh = chunk.mesh().expect("rebuilt");
        assert_eq!(mesh.level_of_detail, 2);
        assert_eq!(mesh.vertex_count(), 5 * 5);
        assert!(Arc::ptr_eq(&map, chunk.map_data().expect("kept")));
        assert!(Arc::ptr_eq(&texture, chunk.texture().expect("kept")));
        assert_eq!(visuals.state(chunk.handle()).map(|s| s.presented), Some(2));
    }

    #[test]
    fn test_chunk_samples_its_own_position() {
        let generator = generator(17);
        let mut visuals = HeadlessVisuals::default();
        let mut chunk = TerrainChunk::new(ChunkCoord::new(-1, 2), 16.0, Arc::clone(&generator), &mut visuals);
        chunk.refresh(chunk.position(), 0.0, 0, &mut visuals);
        let expected = generator.generate_map_data(Vec2::new(-16.0, 32.0));
        assert_eq!(**chunk.map_data().expect("generated"), expected);
    }
}
