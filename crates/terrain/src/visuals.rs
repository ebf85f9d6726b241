use std::sync::Arc;

use bevy::math::Vec3;

use crate::chunk::ChunkCoord;
use crate::mesh_data::MeshData;
use crate::texture::TextureData;

/// The display side of a chunk.
///
/// A backend hands out one opaque handle per chunk and owns whatever object
/// the handle refers to (an entity, an in-memory record). Chunks never show or
/// hide themselves directly; the active flag lives with the backend.
pub trait ChunkVisuals {
    type Handle;

    /// Create the (initially hidden) visual object for a chunk centred at
    /// `placement`, spanning `size` world units per side.
    fn create_handle(&mut self, coord: ChunkCoord, placement: Vec3, size: f32) -> Self::Handle;

    fn set_active(&mut self, handle: &Self::Handle, active: bool);

    fn is_active(&self, handle: &Self::Handle) -> bool;

    /// Show freshly built content. Called once per generated mesh.
    fn present(&mut self, handle: &Self::Handle, mesh: &Arc<MeshData>, texture: &Arc<TextureData>);
}
