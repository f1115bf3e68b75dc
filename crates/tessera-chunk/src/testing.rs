//! Shared fixtures for the chunk and grid tests.

use std::cell::Cell;

use tessera_mesh::TerrainMesh;
use tessera_terrain::{
    BiomeId, BiomeRule, BiomeRuleSet, Grid, PropId, Rgba, TileCoord, VegetationPlacement,
};

use crate::chunk::Chunk;
use crate::coordinator::GridCoordinator;

pub(crate) const LOWLAND: BiomeId = BiomeId(0);
pub(crate) const HIGHLAND: BiomeId = BiomeId(1);

/// Coordinator that records every call a chunk makes.
pub(crate) struct RecordingCoordinator {
    pub rules: BiomeRuleSet,
    pub ready: bool,
    pub ground_color: Rgba,
    /// Returned by `generate_vegetation`.
    pub props: Vec<VegetationPlacement>,
    /// Overrides the size of the grid returned by `compute_ground_colors`.
    pub ground_color_size: Option<(usize, usize)>,
    pub water_checks: Vec<TileCoord>,
    pub ground_color_calls: Cell<usize>,
    pub vegetation_requests: Vec<TileCoord>,
    pub water_updates: Vec<TileCoord>,
}

impl RecordingCoordinator {
    pub fn new() -> Self {
        let highland = BiomeRule {
            height: (0.5, 1.0),
            ..BiomeRule::everywhere(HIGHLAND)
        };
        Self {
            rules: BiomeRuleSet {
                rules: vec![highland],
                fallback: LOWLAND,
            },
            ready: true,
            ground_color: Rgba::rgb(40, 140, 60),
            props: vec![placement(0, 0), placement(1, 1)],
            ground_color_size: None,
            water_checks: Vec::new(),
            ground_color_calls: Cell::new(0),
            vegetation_requests: Vec::new(),
            water_updates: Vec::new(),
        }
    }
}

impl GridCoordinator for RecordingCoordinator {
    fn biome_rule_set(&self) -> &BiomeRuleSet {
        &self.rules
    }

    fn request_water_check(&mut self, coord: TileCoord) {
        self.water_checks.push(coord);
    }

    fn is_ready_to_finalize_terrain(&self, _coord: TileCoord) -> bool {
        self.ready
    }

    fn compute_ground_colors(&self, _coord: TileCoord, biomes: &Grid<BiomeId>) -> Grid<Rgba> {
        self.ground_color_calls.set(self.ground_color_calls.get() + 1);
        let (w, h) = self.ground_color_size.unwrap_or(biomes.dimensions());
        Grid::filled(w, h, self.ground_color)
    }

    fn generate_vegetation(&mut self, chunk: &Chunk) -> Vec<VegetationPlacement> {
        self.vegetation_requests.push(chunk.coord());
        self.props.clone()
    }

    fn update_water_surface(&mut self, water: &mut TerrainMesh, coord: TileCoord) {
        self.water_updates.push(coord);
        for v in &mut water.vertices {
            v.position[1] += 0.25;
        }
    }
}

pub(crate) fn placement(x: i32, y: i32) -> VegetationPlacement {
    VegetationPlacement {
        tile: TileCoord::new(x, y),
        offset: glam::Vec3::new(0.1, 0.0, -0.2),
        angle_degrees: 90,
        place_with_raycast: false,
        prop: PropId(7),
    }
}

/// Height rises along x from 0 to 1; temperature and humidity are constant.
pub(crate) fn ramp_fields(n: usize) -> (Grid<f32>, Grid<f32>, Grid<f32>) {
    let step = 1.0 / (n.max(2) - 1) as f32;
    (
        Grid::from_fn(n, n, |c| c.x as f32 * step),
        Grid::filled(n, n, 0.25),
        Grid::filled(n, n, 0.75),
    )
}

pub(crate) fn chunk_at(coordinator: &mut RecordingCoordinator, coord: TileCoord) -> Chunk {
    let (h, t, m) = ramp_fields(4);
    Chunk::new(coordinator, coord, h, t, m).unwrap()
}
