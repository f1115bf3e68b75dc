//! The demo's [`GridCoordinator`]: neighbor-aware texturing, vegetation
//! scatter and asynchronous water checks.

use rustc_hash::{FxHashMap, FxHashSet};
use tessera_chunk::{Chunk, GridCoordinator};
use tessera_mesh::{TerrainMesh, WaterParams, animate_waves};
use tessera_terrain::{
    BiomeId, BiomeRegistry, BiomeRuleSet, Grid, Rgba, TileCoord, VegetationPlacement,
    VegetationScatter,
};
use tracing::warn;

use crate::water_check::{WaterAnswer, WaterCheck, WaterChecker};

/// Painted where a biome id has no registry entry.
const MISSING_BIOME: Rgba = Rgba::rgb(255, 0, 255);

/// Weight of a tile's own color against each of its four neighbors.
const CENTER_WEIGHT: u32 = 4;

/// Chunk geometry and water look shared by every chunk.
#[derive(Clone, Debug)]
pub struct CoordinatorParams {
    pub chunk_tiles: usize,
    pub tile_size: f32,
    pub water: WaterParams,
    pub scatter: VegetationScatter,
}

pub struct WorldCoordinator {
    rules: BiomeRuleSet,
    registry: BiomeRegistry,
    params: CoordinatorParams,
    /// Biome grids of every loaded chunk, for cross-chunk lookups.
    loaded: FxHashMap<TileCoord, Grid<BiomeId>>,
    water: WaterChecker,
    /// Checks requested before the chunk's heights were registered.
    awaiting_heights: FxHashSet<TileCoord>,
    /// Checks submitted and not yet drained.
    pending_water: FxHashSet<TileCoord>,
    time: f32,
}

impl WorldCoordinator {
    pub fn new(
        registry: BiomeRegistry,
        rules: BiomeRuleSet,
        params: CoordinatorParams,
        water: WaterChecker,
    ) -> Self {
        Self {
            rules,
            registry,
            params,
            loaded: FxHashMap::default(),
            water,
            awaiting_heights: FxHashSet::default(),
            pending_water: FxHashSet::default(),
            time: 0.0,
        }
    }

    /// Records the biome grid of a newly loaded chunk and submits its
    /// water check, if one was requested, with the lowest height it holds.
    pub fn register_chunk(&mut self, coord: TileCoord, biomes: Grid<BiomeId>, lowest_height: f32) {
        self.loaded.insert(coord, biomes);
        if self.awaiting_heights.remove(&coord) {
            self.submit_water_check(WaterCheck { coord, lowest_height });
        }
    }

    pub fn forget_chunk(&mut self, coord: TileCoord) {
        self.loaded.remove(&coord);
        self.awaiting_heights.remove(&coord);
    }

    /// Water checks requested but not yet drained.
    pub fn pending_water_checks(&self) -> usize {
        self.awaiting_heights.len() + self.pending_water.len()
    }

    /// Collects the water checks the workers have finished.
    pub fn drain_water_answers(&mut self) -> Vec<WaterAnswer> {
        let answers = self.water.drain_answers();
        for answer in &answers {
            self.pending_water.remove(&answer.coord);
        }
        answers
    }

    /// Advances the water animation clock.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
    }

    pub fn set_wave_params(&mut self, amplitude: f32, frequency: f32, speed: f32) {
        let water = &mut self.params.water;
        water.wave_amplitude = amplitude;
        water.wave_frequency = frequency;
        water.wave_speed = speed;
    }

    fn submit_water_check(&mut self, check: WaterCheck) {
        if !self.pending_water.insert(check.coord) {
            return;
        }
        if !self.water.submit(check) {
            warn!("Water checks are shut down; chunk {} stays dry", check.coord);
            self.pending_water.remove(&check.coord);
        }
    }

    /// World-space `(x, z)` of the chunk's corner.
    fn chunk_origin(&self, coord: TileCoord) -> (f32, f32) {
        let span = self.params.chunk_tiles as f32 * self.params.tile_size;
        (coord.x as f32 * span, coord.y as f32 * span)
    }

    /// Biome of `tile` relative to `coord`, following it into neighbor
    /// chunks when it lies outside `biomes`.
    fn biome_near(&self, coord: TileCoord, biomes: &Grid<BiomeId>, tile: TileCoord) -> Option<BiomeId> {
        if let Some(&id) = biomes.get(tile) {
            return Some(id);
        }
        let n = self.params.chunk_tiles as i32;
        let chunk = coord.offset(tile.x.div_euclid(n), tile.y.div_euclid(n));
        let local = TileCoord::new(tile.x.rem_euclid(n), tile.y.rem_euclid(n));
        self.loaded.get(&chunk)?.get(local).copied()
    }

    fn ground_color(&self, id: BiomeId) -> Rgba {
        self.registry
            .try_get(id)
            .map_or(MISSING_BIOME, |def| def.ground_color)
    }
}

impl GridCoordinator for WorldCoordinator {
    fn biome_rule_set(&self) -> &BiomeRuleSet {
        &self.rules
    }

    /// Held until [`register_chunk`](WorldCoordinator::register_chunk)
    /// supplies the chunk's heights.
    fn request_water_check(&mut self, coord: TileCoord) {
        if !self.pending_water.contains(&coord) {
            self.awaiting_heights.insert(coord);
        }
    }

    /// Open once the chunk and its four edge neighbors are loaded.
    fn is_ready_to_finalize_terrain(&self, coord: TileCoord) -> bool {
        self.loaded.contains_key(&coord)
            && coord
                .edge_neighbors()
                .iter()
                .all(|n| self.loaded.contains_key(n))
    }

    fn compute_ground_colors(&self, coord: TileCoord, biomes: &Grid<BiomeId>) -> Grid<Rgba> {
        let (width, height) = biomes.dimensions();
        Grid::from_fn(width, height, |tile| {
            let mut sum = [0u32; 3];
            let mut weight = 0u32;
            let mut add = |id: BiomeId, w: u32| {
                let c = self.ground_color(id);
                sum[0] += c.r as u32 * w;
                sum[1] += c.g as u32 * w;
                sum[2] += c.b as u32 * w;
                weight += w;
            };
            if let Some(&id) = biomes.get(tile) {
                add(id, CENTER_WEIGHT);
            }
            for neighbor in tile.edge_neighbors() {
                if let Some(id) = self.biome_near(coord, biomes, neighbor) {
                    add(id, 1);
                }
            }
            if weight == 0 {
                return MISSING_BIOME;
            }
            let channel = |s: u32| ((s + weight / 2) / weight) as u8;
            Rgba::rgb(channel(sum[0]), channel(sum[1]), channel(sum[2]))
        })
    }

    fn generate_vegetation(&mut self, chunk: &Chunk) -> Vec<VegetationPlacement> {
        self.params.scatter.scatter(
            chunk.coord(),
            chunk.fields().height(),
            chunk.biomes(),
            &self.registry,
        )
    }

    fn update_water_surface(&mut self, water: &mut TerrainMesh, coord: TileCoord) {
        let origin = self.chunk_origin(coord);
        animate_waves(water, &self.params.water, self.time, origin);
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
