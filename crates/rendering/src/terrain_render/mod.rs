mod mesh;
mod preview;
mod systems;
mod texture;
mod types;
mod visuals;

pub use mesh::build_chunk_mesh;
pub use preview::{redraw_map_preview, MapPreviewDisplay};
pub use systems::{setup_scene_streaming, stream_scene_chunks};
pub use texture::texture_to_image;
pub use types::{ChunkActivity, SceneStreamingManager, TerrainChunkEntity};
pub use visuals::SceneVisuals;
