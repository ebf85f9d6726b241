//! Heightmap → triangle mesh, with stride-based level of detail.

use crate::config::MAX_LEVEL_OF_DETAIL;
use crate::noise_map::Heightmap;

/// Renderer-agnostic terrain mesh. Immutable once built; a different level of
/// detail means a new `MeshData`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    pub level_of_detail: u32,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Vertex stride for a level of detail: 1 at LOD 0, `2 * lod` otherwise.
/// Levels above [`MAX_LEVEL_OF_DETAIL`] are clamped.
pub fn lod_stride(level_of_detail: u32) -> usize {
    match level_of_detail.min(MAX_LEVEL_OF_DETAIL) {
        0 => 1,
        lod => 2 * lod as usize,
    }
}

/// Grid indices kept along one axis of `len` cells: every `stride`th index,
/// plus the last one so borders always line up with neighbouring chunks.
fn retained_indices(len: usize, stride: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

/// Build a mesh from `heightmap`.
///
/// The mesh is centred on its own origin: column `x` sits at
/// `x - (width - 1) / 2` and row `y` at `(height - 1) / 2 - y` on the Z axis.
/// Vertex elevation is `height_curve(h) * height_multiplier`.
pub fn build_terrain_mesh<F>(
    heightmap: &Heightmap,
    height_multiplier: f32,
    height_curve: F,
    level_of_detail: u32,
) -> MeshData
where
    F: Fn(f32) -> f32,
{
    let width = heightmap.width();
    let height = heightmap.height();
    let stride = lod_stride(level_of_detail);

    let columns = retained_indices(width, stride);
    let rows = retained_indices(height, stride);
    let verts_per_line = columns.len();

    let top_left_x = (width as f32 - 1.0) / -2.0;
    let top_left_z = (height as f32 - 1.0) / 2.0;
    let u_span = (width.saturating_sub(1)).max(1) as f32;
    let v_span = (height.saturating_sub(1)).max(1) as f32;

    let vertex_total = columns.len() * rows.len();
    let quad_total = columns.len().saturating_sub(1) * rows.len().saturating_sub(1);
    let mut vertices = Vec::with_capacity(vertex_total);
    let mut uvs = Vec::with_capacity(vertex_total);
    let mut triangles = Vec::with_capacity(quad_total * 6);

    for (row, &y) in rows.iter().enumerate() {
        for (col, &x) in columns.iter().enumerate() {
            let elevation = height_curve(heightmap.get(x, y)) * height_multiplier;
            vertices.push([top_left_x + x as f32, elevation, top_left_z - y as f32]);
            uvs.push([x as f32 / u_span, y as f32 / v_span]);

            if row + 1 < rows.len() && col + 1 < verts_per_line {
                // a = top-left, b = top-right, c = bottom-left, d = bottom-right
                let a = (row * verts_per_line + col) as u32;
                let b = a + 1;
                let c = a + verts_per_line as u32;
                let d = c + 1;
                triangles.extend_from_slice(&[a, d, c]);
                triangles.extend_from_slice(&[d, a, b]);
            }
        }
    }

    MeshData {
        vertices,
        triangles,
        uvs,
        level_of_detail: level_of_detail.min(MAX_LEVEL_OF_DETAIL),
    }
}
