//! Vegetation placement: spaced candidate points and biome-aware prop scatter.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biome::{BiomeId, BiomeRegistry};
use crate::coord::TileCoord;
use crate::grid::Grid;
use crate::seed::derive_chunk_seed;

/// Identifier of a prop asset (tree, bush, rock, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropId(pub u32);

/// Where and how to instantiate one prop inside a chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct VegetationPlacement {
    /// Tile the prop stands on.
    pub tile: TileCoord,
    /// Offset from the tile center, in tile units.
    pub offset: Vec3,
    /// Rotation around the up axis, in whole degrees `[0, 360)`.
    pub angle_degrees: i32,
    /// The prop must be dropped onto the ground with a raycast instead of
    /// using the tile's sampled height.
    pub place_with_raycast: bool,
    /// The prop asset to instantiate.
    pub prop: PropId,
}

/// Candidates drawn per accepted point by [`spread_points`].
const CANDIDATES_PER_POINT: u32 = 30;

/// Best-candidate points over a `width` by `rows` tile area, each at least
/// `min_spacing` tiles from every other. Coordinates are in tile units, so
/// `floor` of a point is the tile it lands on.
pub(crate) fn spread_points(rng: &mut ChaCha8Rng, width: usize, rows: usize, min_spacing: f32) -> Vec<Vec2> {
    let extent = Vec2::new(width as f32, rows as f32);
    let min_sq = min_spacing * min_spacing;
    // Upper bound on how many spaced points fit.
    let budget = (extent.x * extent.y / (min_sq * 0.7)) as usize;

    let mut points: Vec<Vec2> = Vec::with_capacity(budget);
    while points.len() < budget {
        let best = (0..CANDIDATES_PER_POINT)
            .map(|_| Vec2::new(rng.random_range(0.0..extent.x), rng.random_range(0.0..extent.y)))
            .map(|c| {
                let nearest = points.iter().map(|p| p.distance_squared(c)).fold(f32::INFINITY, f32::min);
                (c, nearest)
            })
            .filter(|&(_, nearest)| nearest >= min_sq)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        match best {
            Some((point, _)) => points.push(point),
            None => break,
        }
    }
    points
}

/// Scatters biome props across a chunk.
#[derive(Clone, Debug)]
pub struct VegetationScatter {
    /// World seed; each chunk derives its own stream from it.
    pub seed: u64,
    /// Minimum distance between two props, in tiles.
    pub min_spacing: f32,
    /// Normalized heights below this value are underwater and stay bare.
    pub sea_level: f32,
    /// Height difference to an edge neighbor above which a prop needs
    /// raycast placement.
    pub raycast_slope: f32,
}

impl Default for VegetationScatter {
    fn default() -> Self {
        Self {
            seed: 0,
            min_spacing: 1.5,
            sea_level: 0.35,
            raycast_slope: 0.04,
        }
    }
}

impl VegetationScatter {
    /// Generate the props for one chunk.
    ///
    /// Output is deterministic for a given `(seed, chunk)` and ordered by
    /// candidate generation.
    pub fn scatter(
        &self,
        chunk: TileCoord,
        heights: &Grid<f32>,
        biomes: &Grid<BiomeId>,
        registry: &BiomeRegistry,
    ) -> Vec<VegetationPlacement> {
        let mut results = Vec::new();
        if self.min_spacing <= 0.0 || heights.is_empty() {
            return results;
        }

        let chunk_seed = derive_chunk_seed(self.seed, chunk);
        let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed ^ self.seed);
        let candidates = spread_points(
            &mut ChaCha8Rng::seed_from_u64(chunk_seed),
            heights.width(),
            heights.height(),
            self.min_spacing,
        );

        for point in candidates {
            let cell = point.floor();
            let tile = TileCoord::new(cell.x as i32, cell.y as i32);
            let (Some(&height), Some(&biome)) = (heights.get(tile), biomes.get(tile)) else {
                continue;
            };

            if height < self.sea_level {
                continue;
            }

            let Some(def) = registry.try_get(biome) else {
                continue;
            };
            if def.props.is_empty() || rng.random::<f64>() >= def.vegetation_density {
                continue;
            }

            let prop = def.props[rng.random_range(0..def.props.len())];
            let within = point - cell - Vec2::splat(0.5);
            let offset = Vec3::new(within.x, 0.0, within.y);

            results.push(VegetationPlacement {
                tile,
                offset,
                angle_degrees: rng.random_range(0..360),
                place_with_raycast: self.is_steep(heights, tile, height),
                prop,
            });
        }

        results
    }

    fn is_steep(&self, heights: &Grid<f32>, tile: TileCoord, height: f32) -> bool {
        tile.edge_neighbors()
            .iter()
            .filter_map(|&n| heights.get(n))
            .any(|&h| (h - height).abs() > self.raycast_slope)
    }
}
