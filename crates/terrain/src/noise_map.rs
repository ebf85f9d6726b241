//! Layered (fBm-style) noise sampling into normalized heightmaps.
//!
//! Every octave samples 2D Perlin noise at `lacunarity^o` frequency and adds
//! it with `persistence^o` weight. Each octave is shifted by an offset drawn
//! from a `ChaCha8Rng` seeded with the map seed, so the same parameters always
//! produce a bit-identical heightmap on every platform and every run.

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{MIN_NOISE_SCALE, NOISE_SAMPLE_LIMIT, OCTAVE_OFFSET_RANGE};
use crate::terrain_error::TerrainWarning;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Inputs of the noise field. See [`NoiseParameters::sanitized`] for the
/// valid ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    pub seed: u64,
    /// Feature size in world units. Larger values give broader hills.
    pub scale: f32,
    pub octave_count: i32,
    /// Amplitude multiplier applied per octave, in `[0, 1]`.
    pub persistence: f32,
    /// Frequency multiplier applied per octave, `>= 1`.
    pub lacunarity: f32,
    /// User offset added to every sample, in world units.
    pub offset: Vec2,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 10.0,
            octave_count: 3,
            persistence: 0.5,
            lacunarity: 5.0,
            offset: Vec2::ZERO,
        }
    }
}

impl NoiseParameters {
    /// Clamp every parameter into its valid range.
    ///
    /// Each parameter is clamped independently. The returned warnings list
    /// every correction that was made; an empty list means the parameters
    /// were already valid.
    pub fn sanitized(&self) -> (Self, Vec<TerrainWarning>) {
        let mut warnings = Vec::new();
        let mut fixed = self.clone();

        if !(self.scale.is_finite() && self.scale > 0.0) {
            fixed.scale = MIN_NOISE_SCALE;
            warnings.push(TerrainWarning::InvalidParameter {
                name: "scale",
                given: self.scale,
                used: fixed.scale,
            });
        }

        if self.octave_count < 1 {
            fixed.octave_count = 1;
            warnings.push(TerrainWarning::InvalidParameter {
                name: "octave_count",
                given: self.octave_count as f32,
                used: 1.0,
            });
        }

        // `f32::max`/`min` discard NaN, so NaN persistence becomes 0.
        fixed.persistence = self.persistence.max(0.0).min(1.0);
        if fixed.persistence != self.persistence {
            warnings.push(TerrainWarning::InvalidParameter {
                name: "persistence",
                given: self.persistence,
                used: fixed.persistence,
            });
        }

        fixed.lacunarity = self.lacunarity.max(1.0);
        if !fixed.lacunarity.is_finite() {
            fixed.lacunarity = 1.0;
        }
        if fixed.lacunarity != self.lacunarity {
            warnings.push(TerrainWarning::InvalidParameter {
                name: "lacunarity",
                given: self.lacunarity,
                used: fixed.lacunarity,
            });
        }

        (fixed, warnings)
    }

    /// Sum of all octave amplitudes, `Σ persistence^o`. This is the largest
    /// absolute value the raw accumulated noise can reach.
    pub fn max_amplitude(&self) -> f32 {
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octave_count.max(1) {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }
}

/// How raw accumulated noise is mapped into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizeMode {
    /// Scale by the theoretical amplitude range. Heights stay comparable
    /// between chunks and between octave configurations.
    #[default]
    Global,
    /// Stretch the grid's own min/max to `[0, 1]`. Only meaningful for a
    /// single map; neighbouring chunks will not line up.
    Local,
}

// ---------------------------------------------------------------------------
// Heightmap
// ---------------------------------------------------------------------------

/// Row-major grid of normalized heights. Cell `(x, y)` is stored at
/// `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl Heightmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Wrap existing values. Returns `None` if `values.len() != width * height`.
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Option<Self> {
        (values.len() == width * height).then_some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.values[y * self.width + x] = value;
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Deterministic layered-noise sampler.
///
/// Parameters are sanitized once on construction; the per-octave offsets are
/// derived from the seed at the same time and reused for every map.
pub struct NoiseFieldGenerator {
    params: NoiseParameters,
    normalize_mode: NormalizeMode,
    octave_offsets: Vec<Vec2>,
    noise: FastNoiseLite,
    warnings: Vec<TerrainWarning>,
}

impl NoiseFieldGenerator {
    pub fn new(params: &NoiseParameters, normalize_mode: NormalizeMode) -> Self {
        let (params, warnings) = params.sanitized();
        for warning in &warnings {
            warn!("NoiseFieldGenerator: {}", warning);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let octave_offsets = (0..params.octave_count)
            .map(|_| {
                let x = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
                let y = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
                Vec2::new(x, y) + params.offset
            })
            .collect();

        // Perlin noise seeded from the low bits of the map seed; the sample
        // frequency is applied by `generate_at`, so the sampler runs at 1.0.
        let mut noise = FastNoiseLite::with_seed(params.seed as i32);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));

        Self {
            params,
            normalize_mode,
            octave_offsets,
            noise,
            warnings,
        }
    }

    /// The parameters actually used for sampling (after clamping).
    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }

    pub fn normalize_mode(&self) -> NormalizeMode {
        self.normalize_mode
    }

    /// Corrections applied to the parameters passed to [`Self::new`].
    pub fn warnings(&self) -> &[TerrainWarning] {
        &self.warnings
    }

    /// Generate a map centred on the world origin.
    pub fn generate(&self, width: usize, height: usize) -> Heightmap {
        self.generate_at(width, height, Vec2::ZERO)
    }

    /// Generate a map whose centre sits at `centre` in world space.
    ///
    /// Column `x` samples world `centre.x + x - width/2`, row `y` samples world
    /// `centre.y + height/2 - y`, so maps of adjacent chunks share their
    /// border samples.
    pub fn generate_at(&self, width: usize, height: usize, centre: Vec2) -> Heightmap {
        let mut map = Heightmap::new(width, height);
        if map.is_empty() {
            return map;
        }

        let half_width = width as f32 / 2.0;
        let half_height = height as f32 / 2.0;
        let scale = self.params.scale;

        let mut min_noise = f32::MAX;
        let mut max_noise = f32::MIN;

        for y in 0..height {
            let world_y = centre.y + (half_height - y as f32);
            for x in 0..width {
                let world_x = centre.x + (x as f32 - half_width);
                let mut amplitude = 1.0_f32;
                let mut frequency = 1.0_f32;
                let mut noise_height = 0.0_f32;

                for offset in &self.octave_offsets {
                    let sample_x = fold_sample((world_x + offset.x) / scale * frequency);
                    let sample_y = fold_sample((world_y + offset.y) / scale * frequency);
                    // fastnoise Perlin output is already in [-1, 1]
                    noise_height += self.noise.get_noise_2d(sample_x, sample_y) * amplitude;

                    amplitude *= self.params.persistence;
                    frequency *= self.params.lacunarity;
                }
                if !noise_height.is_finite() {
                    noise_height = 0.0;
                }

                min_noise = min_noise.min(noise_height);
                max_noise = max_noise.max(noise_height);
                map.set(x, y, noise_height);
            }
        }

        match self.normalize_mode {
            NormalizeMode::Global => {
                let max_amplitude = self.params.max_amplitude();
                for v in map.values.iter_mut() {
                    *v = ((*v + max_amplitude) / (2.0 * max_amplitude)).clamp(0.0, 1.0);
                }
            }
            NormalizeMode::Local => {
                let range = max_noise - min_noise;
                for v in map.values.iter_mut() {
                    *v = if range > f32::EPSILON {
                        ((*v - min_noise) / range).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                }
            }
        }

        map
    }
}

/// Keep a sample coordinate inside the range fastnoise can floor into its
/// lattice. Coordinates already inside are returned unchanged; overflowed
/// ones (from huge octave frequencies or tiny scales) land on the lattice
/// origin, where Perlin noise is zero.
#[inline]
fn fold_sample(value: f32) -> f32 {
    if value.is_finite() {
        value % NOISE_SAMPLE_LIMIT
    } else {
        0.0
    }
}

/// Generate a `width x height` map centred on the origin with global
/// normalization.
pub fn generate_noise_map(width: usize, height: usize, params: &NoiseParameters) -> Heightmap {
    NoiseFieldGenerator::new(params, NormalizeMode::Global).generate(width, height)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
