//! Per-chunk sampled scalar fields (height, temperature, humidity).

use crate::coord::TileCoord;
use crate::grid::Grid;
use crate::heightmap::{NoiseLayer, NoiseLayerParams};

/// Errors raised when assembling field grids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A field does not share the height field's dimensions.
    #[error("{field} field is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// `(width, height)` of the height field.
        expected: (usize, usize),
        /// `(width, height)` of the offending field.
        actual: (usize, usize),
    },

    /// A flat buffer does not hold `width * height` cells.
    #[error("buffer holds {actual} cells, expected {expected}")]
    LengthMismatch {
        /// Required cell count.
        expected: usize,
        /// Provided cell count.
        actual: usize,
    },
}

/// The three equally sized scalar fields sampled for one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledFields {
    height: Grid<f32>,
    temperature: Grid<f32>,
    humidity: Grid<f32>,
}

impl SampledFields {
    /// Bundles the three fields.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionMismatch`] if temperature or humidity
    /// differ in size from the height field.
    pub fn new(
        height: Grid<f32>,
        temperature: Grid<f32>,
        humidity: Grid<f32>,
    ) -> Result<Self, FieldError> {
        let expected = height.dimensions();
        for (field, grid) in [("temperature", &temperature), ("humidity", &humidity)] {
            if grid.dimensions() != expected {
                return Err(FieldError::DimensionMismatch {
                    field,
                    expected,
                    actual: grid.dimensions(),
                });
            }
        }
        Ok(Self {
            height,
            temperature,
            humidity,
        })
    }

    /// Shared `(width, height)` of all three fields.
    pub fn dimensions(&self) -> (usize, usize) {
        self.height.dimensions()
    }

    /// Normalized terrain height.
    pub fn height(&self) -> &Grid<f32> {
        &self.height
    }

    /// Normalized temperature.
    pub fn temperature(&self) -> &Grid<f32> {
        &self.temperature
    }

    /// Normalized humidity.
    pub fn humidity(&self) -> &Grid<f32> {
        &self.humidity
    }

    /// Splits into `(height, temperature, humidity)`.
    pub fn into_parts(self) -> (Grid<f32>, Grid<f32>, Grid<f32>) {
        (self.height, self.temperature, self.humidity)
    }

    /// `(height, temperature, humidity)` at `coord`, if in bounds.
    pub fn sample(&self, coord: TileCoord) -> Option<(f32, f32, f32)> {
        Some((
            *self.height.get(coord)?,
            *self.temperature.get(coord)?,
            *self.humidity.get(coord)?,
        ))
    }
}

/// Parameters for [`FieldSampler`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSamplerParams {
    /// World seed. Each layer derives its own seed from it.
    pub seed: u64,
    /// Tiles along one edge of a chunk.
    pub chunk_tiles: usize,
    /// Height layer.
    pub height: NoiseLayerParams,
    /// Temperature layer. Broader features than height.
    pub temperature: NoiseLayerParams,
    /// Humidity layer.
    pub humidity: NoiseLayerParams,
}

impl Default for FieldSamplerParams {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_tiles: 16,
            height: NoiseLayerParams::default(),
            temperature: NoiseLayerParams {
                octaves: 2,
                base_frequency: 0.005,
                ..Default::default()
            },
            humidity: NoiseLayerParams {
                octaves: 3,
                base_frequency: 0.008,
                ..Default::default()
            },
        }
    }
}

/// Produces the [`SampledFields`] of any chunk from continuous noise.
///
/// Fields are sampled in world tile space, so adjacent chunks agree along
/// their shared edges.
pub struct FieldSampler {
    chunk_tiles: usize,
    height: NoiseLayer,
    temperature: NoiseLayer,
    humidity: NoiseLayer,
}

impl FieldSampler {
    /// Creates a sampler. Layer seeds are derived from `params.seed` so the
    /// three fields are decorrelated.
    pub fn new(params: FieldSamplerParams) -> Self {
        let base = params.seed as u32;
        Self {
            chunk_tiles: params.chunk_tiles,
            height: NoiseLayer::new(NoiseLayerParams {
                seed: base,
                ..params.height
            }),
            temperature: NoiseLayer::new(NoiseLayerParams {
                seed: base.wrapping_add(0xDEAD_BEEF),
                ..params.temperature
            }),
            humidity: NoiseLayer::new(NoiseLayerParams {
                seed: base.wrapping_add(0x5EED_CAFE),
                ..params.humidity
            }),
        }
    }

    /// Tiles along one chunk edge.
    pub fn chunk_tiles(&self) -> usize {
        self.chunk_tiles
    }

    /// Samples the three fields for the chunk at `chunk`.
    pub fn sample_chunk(&self, chunk: TileCoord) -> SampledFields {
        let n = self.chunk_tiles;
        let origin_x = chunk.x as f64 * n as f64;
        let origin_y = chunk.y as f64 * n as f64;
        let layer = |noise: &NoiseLayer| {
            Grid::from_fn(n, n, |t| {
                noise.sample_normalized(origin_x + t.x as f64, origin_y + t.y as f64) as f32
            })
        };
        // All three layers share the `n x n` shape, so no dimension check.
        SampledFields {
            height: layer(&self.height),
            temperature: layer(&self.temperature),
            humidity: layer(&self.humidity),
        }
    }
}
