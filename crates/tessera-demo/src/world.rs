//! The streamed world: a viewer walks across the terrain while chunks load,
//! activate, dress themselves and unload around it.

use glam::Vec2;
use tessera_chunk::{ChunkGrid, DrawMode};
use tessera_config::Config;
use tessera_mesh::{HeightCurve, WaterParams};
use tessera_terrain::{
    FieldSampler, FieldSamplerParams, NoiseLayerParams, TileCoord, VegetationScatter,
};
use tracing::{debug, info, warn};

use crate::biomes::default_biomes;
use crate::coordinator::{CoordinatorParams, WorldCoordinator};
use crate::error::WorldError;
use crate::streaming::{ChunkStreamer, StreamConfig};
use crate::water_check::{WaterCheckSettings, WaterChecker, lowest_height};

/// Viewer speed in tiles per second.
pub const DEFAULT_VIEWER_VELOCITY: Vec2 = Vec2::new(6.0, 2.5);

const WATER_WORKERS: usize = 2;

/// What one [`World::step`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub loaded: usize,
    pub unloaded: usize,
    pub activated: usize,
    pub deactivated: usize,
    pub water_layers: usize,
    pub textures_built: usize,
    pub water_updates: usize,
}

pub struct World {
    grid: ChunkGrid<WorldCoordinator>,
    sampler: FieldSampler,
    curve: HeightCurve,
    streamer: ChunkStreamer,
    chunk_tiles: usize,
    tile_size: f32,
    height_multiplier: f32,
    view_distance: u32,
    vegetation_distance: u32,
    draw_mode: DrawMode,
    /// Viewer position in world tiles.
    viewer: Vec2,
    velocity: Vec2,
}

impl World {
    /// Builds an empty world from `config`.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an unusable height curve or an
    /// unknown draw mode.
    pub fn new(config: &Config) -> Result<Self, WorldError> {
        config.validate()?;
        let terrain = &config.terrain;
        let streaming = &config.streaming;

        let draw_mode: DrawMode = streaming.draw_mode.parse()?;
        let curve = HeightCurve::new(terrain.height_curve.clone())?;
        let (registry, rules) = default_biomes(terrain.sea_level)?;

        let sampler = FieldSampler::new(FieldSamplerParams {
            seed: terrain.seed,
            chunk_tiles: terrain.chunk_tiles,
            height: NoiseLayerParams {
                octaves: terrain.octaves,
                base_frequency: terrain.base_frequency,
                ..Default::default()
            },
            ..Default::default()
        });

        let water = WaterParams {
            level: curve.evaluate(terrain.sea_level) * terrain.height_multiplier,
            wave_amplitude: config.water.wave_amplitude,
            wave_frequency: config.water.wave_frequency,
            wave_speed: config.water.wave_speed,
        };
        let checker = WaterChecker::new(
            WATER_WORKERS,
            WaterCheckSettings {
                sea_level: terrain.sea_level,
                chunk_tiles: terrain.chunk_tiles,
                tile_size: terrain.tile_size,
                water: water.clone(),
            },
        );
        let params = CoordinatorParams {
            chunk_tiles: terrain.chunk_tiles,
            tile_size: terrain.tile_size,
            water,
            scatter: VegetationScatter {
                seed: terrain.seed,
                sea_level: terrain.sea_level,
                ..Default::default()
            },
        };

        info!(
            "World seed={} chunk={}x{} view_distance={} draw_mode={draw_mode}",
            terrain.seed, terrain.chunk_tiles, terrain.chunk_tiles, streaming.view_distance
        );

        Ok(Self {
            grid: ChunkGrid::new(WorldCoordinator::new(registry, rules, params, checker)),
            sampler,
            curve,
            streamer: ChunkStreamer::new(StreamConfig::for_view_distance(streaming.view_distance)),
            chunk_tiles: terrain.chunk_tiles,
            tile_size: terrain.tile_size,
            height_multiplier: terrain.height_multiplier,
            view_distance: streaming.view_distance,
            vegetation_distance: streaming.vegetation_distance,
            draw_mode,
            viewer: Vec2::ZERO,
            velocity: DEFAULT_VIEWER_VELOCITY,
        })
    }

    pub fn grid(&self) -> &ChunkGrid<WorldCoordinator> {
        &self.grid
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_viewer_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Chunk containing the viewer.
    pub fn viewer_chunk(&self) -> TileCoord {
        let n = self.chunk_tiles as f32;
        TileCoord::new(
            (self.viewer.x / n).floor() as i32,
            (self.viewer.y / n).floor() as i32,
        )
    }

    /// Switches every active chunk to `mode`.
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        if mode == self.draw_mode {
            return;
        }
        self.draw_mode = mode;
        let fired = self.grid.broadcast_draw_mode(mode);
        info!("Draw mode {mode} applied to {fired} chunks");
    }

    /// Applies the settings that can change while running.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DrawMode`] for an unknown draw mode; nothing is
    /// applied in that case.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), WorldError> {
        let mode: DrawMode = config.streaming.draw_mode.parse()?;
        let water = &config.water;
        self.grid.coordinator_mut().set_wave_params(
            water.wave_amplitude,
            water.wave_frequency,
            water.wave_speed,
        );
        if config.streaming.view_distance != self.view_distance {
            self.view_distance = config.streaming.view_distance;
            self.streamer
                .set_config(StreamConfig::for_view_distance(self.view_distance));
        }
        self.vegetation_distance = config.streaming.vegetation_distance;
        self.set_draw_mode(mode);
        Ok(())
    }

    /// Advances the world by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Chunk`] if a sampled chunk is rejected.
    pub fn step(&mut self, dt: f32) -> Result<StepReport, WorldError> {
        let mut report = StepReport::default();
        self.viewer += self.velocity * dt;
        self.grid.coordinator_mut().advance(dt);
        let viewer = self.viewer_chunk();

        self.deliver_water(&mut report);

        let resident: Vec<TileCoord> = self.grid.coords().collect();
        let grid = &self.grid;
        let plan = self.streamer.tick(viewer, resident, |c| grid.contains(c));
        for coord in plan.unload {
            self.grid.unload(coord);
            self.grid.coordinator_mut().forget_chunk(coord);
            report.unloaded += 1;
        }
        for coord in plan.load {
            self.load_chunk(coord)?;
            report.loaded += 1;
        }

        let mut activated = Vec::new();
        let coords: Vec<TileCoord> = self.grid.coords().collect();
        for coord in coords {
            let distance = coord.chebyshev_distance(viewer);
            let active = distance <= self.view_distance;
            if self.grid.set_active(coord, active) {
                if active {
                    activated.push(coord);
                } else {
                    report.deactivated += 1;
                }
            }
            self.grid
                .set_vegetation_active(coord, active && distance <= self.vegetation_distance);
        }
        report.activated = activated.len();

        for &coord in &activated {
            if let Some(chunk) = self.grid.get_mut(coord)
                && chunk.surface().collider().is_none()
            {
                chunk.create_mesh(self.tile_size, self.height_multiplier, &self.curve);
            }
        }

        if report.loaded + report.unloaded + report.activated + report.deactivated > 0 {
            report.textures_built = self.grid.broadcast_visible_set_changed();
        }
        for coord in activated {
            self.grid.draw_chunk(coord, self.draw_mode);
        }

        report.water_updates = self.grid.tick();
        if report.loaded + report.unloaded > 0 {
            debug!(
                "Viewer in {viewer}: +{} -{} chunks, {} resident, {} queued",
                report.loaded,
                report.unloaded,
                self.grid.len(),
                self.streamer.queued()
            );
        }
        Ok(report)
    }

    fn load_chunk(&mut self, coord: TileCoord) -> Result<(), WorldError> {
        let (height, temperature, humidity) = self.sampler.sample_chunk(coord).into_parts();
        let chunk = self.grid.load(coord, height, temperature, humidity)?;
        chunk.create_flat_mesh(self.chunk_tiles, self.tile_size);
        let biomes = chunk.biomes().clone();
        let lowest = lowest_height(chunk.fields().height());
        self.grid.coordinator_mut().register_chunk(coord, biomes, lowest);
        Ok(())
    }

    fn deliver_water(&mut self, report: &mut StepReport) {
        let answers = self.grid.coordinator_mut().drain_water_answers();
        for answer in answers {
            let Some(mesh) = answer.mesh else {
                continue;
            };
            match self.grid.deliver_water(answer.coord, mesh) {
                Ok(true) => report.water_layers += 1,
                Ok(false) => {}
                Err(err) => warn!("Water for chunk {}: {err}", answer.coord),
            }
        }
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
