/// Side length, in heightmap cells, of one generated chunk map.
///
/// `241 - 1 = 240` is divisible by every LOD stride (1, 2, 4, 6, 8, 10, 12),
/// so simplified meshes still land on the chunk border.
pub const MAP_CHUNK_SIZE: usize = 241;

/// World-space size of one chunk tile (`MAP_CHUNK_SIZE - 1`).
pub const CHUNK_WORLD_SIZE: f32 = (MAP_CHUNK_SIZE - 1) as f32;

/// Distance from the observer to a chunk's nearest edge within which the
/// chunk is shown.
pub const MAX_VIEW_DISTANCE: f32 = 430.0;

/// Widest streaming window, in chunks on each side of the observer's chunk.
/// View distances beyond `MAX_VIEW_RADIUS * chunk_size` are clamped.
pub const MAX_VIEW_RADIUS: i32 = 32;

/// Highest supported level of detail. LOD `n > 0` keeps every `2n`th vertex.
pub const MAX_LEVEL_OF_DETAIL: u32 = 6;

/// Replacement for a non-positive or non-finite noise scale.
pub const MIN_NOISE_SCALE: f32 = 0.0001;

/// Noise sample coordinates are folded into `(-NOISE_SAMPLE_LIMIT, NOISE_SAMPLE_LIMIT)`.
///
/// fastnoise floors samples into `i32` lattice cells; 2^24 keeps that cast in
/// range and is also where `f32` stops resolving fractional positions.
pub const NOISE_SAMPLE_LIMIT: f32 = 16_777_216.0;

/// Per-octave sample offsets are drawn from `[-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE)`.
pub const OCTAVE_OFFSET_RANGE: f32 = 1_000.0;

/// Default mesh height in world units for a normalized height of 1.0.
pub const DEFAULT_HEIGHT_MULTIPLIER: f32 = 36.0;
