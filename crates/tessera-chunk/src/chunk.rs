//! The per-chunk lifecycle state machine.
//!
//! A [`Chunk`] owns one tile's sampled fields and its biome grid, and
//! lazily derives everything else: a render mesh, a biome texture, a
//! vegetation list and a water layer. Each derived artifact lives in a
//! [`Lazy`] slot and is built at most once. Activation ties the chunk to the
//! grid's [`GridEvents`] broadcasts through explicit subscription tokens.

use std::sync::Arc;

use tessera_mesh::{HeightCurve, TerrainMesh};
use tessera_terrain::{
    BiomeId, Grid, Rgba, SampledFields, Texture, TileCoord, VegetationPlacement, classify,
};
use tracing::{debug, trace};

use crate::broadcast::{ChunkSubscriptions, GridEvents};
use crate::coordinator::GridCoordinator;
use crate::draw_mode::DrawMode;
use crate::error::{Artifact, ChunkError};
use crate::lazy::Lazy;
use crate::surface::{TerrainSurface, WaterLayer};

/// One tile of the streamed terrain grid.
#[derive(Debug)]
pub struct Chunk {
    coord: TileCoord,
    fields: SampledFields,
    biomes: Grid<BiomeId>,
    surface: TerrainSurface,
    biome_texture: Lazy<Arc<Texture>>,
    vegetation: Lazy<Vec<VegetationPlacement>>,
    props_visible: bool,
    water: Lazy<WaterLayer>,
    /// `Some` exactly while the chunk is active.
    subscriptions: Option<ChunkSubscriptions>,
}

impl Chunk {
    /// Initializes a chunk from its three sampled fields.
    ///
    /// Classifies the biome grid with the coordinator's current rule set and
    /// issues one water check for `coord`. The chunk starts inactive with an
    /// empty, hidden surface.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::Configuration`] if `temperature` or `humidity`
    /// differ in size from `height`.
    pub fn new<C: GridCoordinator + ?Sized>(
        coordinator: &mut C,
        coord: TileCoord,
        height: Grid<f32>,
        temperature: Grid<f32>,
        humidity: Grid<f32>,
    ) -> Result<Self, ChunkError> {
        let fields = SampledFields::new(height, temperature, humidity)?;
        let biomes = classify(&fields, coordinator.biome_rule_set());
        coordinator.request_water_check(coord);

        let (width, rows) = fields.dimensions();
        debug!("Chunk {coord} initialized ({width}x{rows} tiles)");

        Ok(Self {
            coord,
            fields,
            biomes,
            surface: TerrainSurface::new(),
            biome_texture: Lazy::Unbuilt,
            vegetation: Lazy::Unbuilt,
            props_visible: false,
            water: Lazy::Unbuilt,
            subscriptions: None,
        })
    }

    /// Position of this chunk in the chunk grid.
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn fields(&self) -> &SampledFields {
        &self.fields
    }

    pub fn biomes(&self) -> &Grid<BiomeId> {
        &self.biomes
    }

    /// Normalized height of `tile`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] if `tile` is outside the chunk.
    pub fn height_at(&self, tile: TileCoord) -> Result<f32, ChunkError> {
        self.fields
            .height()
            .get(tile)
            .copied()
            .ok_or_else(|| self.out_of_bounds(tile))
    }

    /// Biome of `tile`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] if `tile` is outside the chunk.
    pub fn biome_at(&self, tile: TileCoord) -> Result<BiomeId, ChunkError> {
        self.biomes
            .get(tile)
            .copied()
            .ok_or_else(|| self.out_of_bounds(tile))
    }

    fn out_of_bounds(&self, coord: TileCoord) -> ChunkError {
        let (width, height) = self.fields.dimensions();
        ChunkError::OutOfBounds {
            coord,
            width,
            height,
        }
    }

    // -- Geometry ----------------------------------------------------------

    /// Installs a flat `grid_size x grid_size` placeholder mesh.
    ///
    /// Replaces whatever render mesh was installed before and may be called
    /// any number of times. The collider is left untouched.
    pub fn create_flat_mesh(&mut self, grid_size: usize, tile_size: f32) {
        let mesh = TerrainMesh::flat(grid_size, tile_size);
        trace!("Chunk {} flat mesh: {} vertices", self.coord, mesh.vertices.len());
        self.surface.set_mesh(Arc::new(mesh));
    }

    /// Builds the height-displaced terrain mesh and installs it as both the
    /// render mesh and the collider.
    pub fn create_mesh(&mut self, tile_size: f32, height_multiplier: f32, curve: &HeightCurve) {
        let mesh = Arc::new(TerrainMesh::from_heights(
            self.fields.height(),
            tile_size,
            height_multiplier,
            curve,
        ));
        debug!(
            "Chunk {} terrain mesh: {} triangles",
            self.coord,
            mesh.triangle_count()
        );
        self.surface.set_mesh(Arc::clone(&mesh));
        self.surface.set_collider(mesh);
    }

    // -- Biome texture -----------------------------------------------------

    /// Builds the biome texture from explicit ground colors.
    ///
    /// The texture is cached but not bound; the next Biome draw binds it.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::GroundColorMismatch`] if `ground_colors` is not the
    ///   shape of the biome grid.
    /// - [`ChunkError::AlreadyBuilt`] if the biome texture already exists.
    pub fn set_terrain(&mut self, ground_colors: &Grid<Rgba>) -> Result<(), ChunkError> {
        self.check_ground_colors(ground_colors)?;
        let texture = Arc::new(Texture::from_color_grid(ground_colors));
        if self.biome_texture.build(texture).is_err() {
            tracing::warn!("Chunk {}: biome texture already built", self.coord);
            return Err(ChunkError::AlreadyBuilt(Artifact::BiomeTexture));
        }
        debug!("Chunk {} biome texture set", self.coord);
        Ok(())
    }

    /// Builds the biome texture if the coordinator's readiness gate is open.
    ///
    /// A no-op returning `false` while the texture already exists or while
    /// the gate is closed. On success the texture is bound if
    /// [`DrawMode::Biome`] is the last requested mode.
    pub fn try_create_biome_texture<C: GridCoordinator + ?Sized>(&mut self, coordinator: &C) -> bool {
        if self.biome_texture.is_built() {
            return false;
        }
        if !coordinator.is_ready_to_finalize_terrain(self.coord) {
            trace!("Chunk {} biome texture deferred: neighbors not ready", self.coord);
            return false;
        }

        let (coord, biomes) = (self.coord, &self.biomes);
        let built = self.biome_texture.try_build_with(|| {
            let colors = coordinator.compute_ground_colors(coord, biomes);
            if colors.dimensions() != biomes.dimensions() {
                tracing::warn!(
                    "Chunk {coord}: ground colors are {:?}, biome grid is {:?}",
                    colors.dimensions(),
                    biomes.dimensions()
                );
                return None;
            }
            Some(Arc::new(Texture::from_color_grid(&colors)))
        });
        if !built {
            return false;
        }
        if self.surface.requested() == DrawMode::Biome
            && let Some(texture) = self.biome_texture.get()
        {
            self.surface.bind(Arc::clone(texture), DrawMode::Biome);
        }
        debug!("Chunk {} biome texture created", self.coord);
        true
    }

    fn check_ground_colors(&self, colors: &Grid<Rgba>) -> Result<(), ChunkError> {
        if colors.dimensions() != self.biomes.dimensions() {
            return Err(ChunkError::GroundColorMismatch {
                expected: self.biomes.dimensions(),
                actual: colors.dimensions(),
            });
        }
        Ok(())
    }

    /// Binds the texture for `mode`.
    ///
    /// Biome binds the cached biome texture, first trying to create it. If
    /// it still does not exist the bound texture is left as it was, and the
    /// request is remembered: the texture is bound as soon as a later retry
    /// builds it. The field views are synthesized on every call.
    pub fn on_draw_map<C: GridCoordinator + ?Sized>(&mut self, mode: DrawMode, coordinator: &C) {
        self.surface.request(mode);
        let texture = match mode {
            DrawMode::Biome => {
                if !self.biome_texture.is_built() {
                    self.try_create_biome_texture(coordinator);
                }
                match self.biome_texture.get() {
                    Some(texture) => Arc::clone(texture),
                    None => return,
                }
            }
            DrawMode::Height => Arc::new(Texture::grayscale(self.fields.height())),
            DrawMode::Temperature => Arc::new(Texture::from_scalar_grid(
                self.fields.temperature(),
                Rgba::BLUE,
                Rgba::RED,
            )),
            DrawMode::Humidity => Arc::new(Texture::from_scalar_grid(
                self.fields.humidity(),
                Rgba::WHITE,
                Rgba::BLUE,
            )),
        };
        self.surface.bind(texture, mode);
    }

    /// Handler for the visible-set broadcast: retries a pending biome
    /// texture. Returns `true` if this call built it.
    pub fn on_visible_set_changed<C: GridCoordinator + ?Sized>(&mut self, coordinator: &C) -> bool {
        !self.biome_texture.is_built() && self.try_create_biome_texture(coordinator)
    }

    // -- Vegetation --------------------------------------------------------

    /// Installs the vegetation list.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::AlreadyBuilt`] if vegetation was already set;
    /// the existing list is kept.
    pub fn set_vegetation(&mut self, placements: Vec<VegetationPlacement>) -> Result<(), ChunkError> {
        let count = placements.len();
        if self.vegetation.build(placements).is_err() {
            tracing::warn!("Chunk {}: vegetation already set", self.coord);
            return Err(ChunkError::AlreadyBuilt(Artifact::Vegetation));
        }
        debug!("Chunk {} vegetation set: {count} props", self.coord);
        Ok(())
    }

    /// Shows or hides the prop container.
    ///
    /// Showing a chunk that has no vegetation yet first asks the coordinator
    /// to generate it. Hiding keeps the placements.
    pub fn set_vegetation_active<C: GridCoordinator + ?Sized>(&mut self, show: bool, coordinator: &mut C) {
        if self.props_visible == show {
            return;
        }
        if show && !self.vegetation.is_built() {
            let placements = coordinator.generate_vegetation(self);
            let count = placements.len();
            let installed = self.vegetation.build(placements);
            debug_assert!(installed.is_ok(), "vegetation slot filled during generation");
            debug!("Chunk {} vegetation generated: {count} props", self.coord);
        }
        self.props_visible = show;
    }

    // -- Water -------------------------------------------------------------

    /// Attaches the water sheet found by the coordinator's water check.
    ///
    /// The layer is visible iff the chunk is active.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::AlreadyBuilt`] if a water layer is attached.
    pub fn set_water_layer(&mut self, mesh: TerrainMesh) -> Result<(), ChunkError> {
        let layer = WaterLayer {
            mesh,
            visible: self.is_active(),
        };
        if self.water.build(layer).is_err() {
            tracing::warn!("Chunk {}: water layer already set", self.coord);
            return Err(ChunkError::AlreadyBuilt(Artifact::WaterLayer));
        }
        debug!("Chunk {} water layer attached", self.coord);
        Ok(())
    }

    /// Per-tick hook. While active and watered, hands the water mesh to the
    /// coordinator once. Returns `true` if it did.
    pub fn tick<C: GridCoordinator + ?Sized>(&mut self, coordinator: &mut C) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(water) = self.water.get_mut() else {
            return false;
        };
        coordinator.update_water_surface(&mut water.mesh, self.coord);
        true
    }

    // -- Activation --------------------------------------------------------

    /// Activates or deactivates the chunk.
    ///
    /// Activation shows the surface and water and subscribes to both
    /// [`GridEvents`] channels; deactivation reverses it. Repeating the
    /// current state is a no-op. Returns `true` if the state changed.
    pub fn set_active(&mut self, active: bool, events: &mut GridEvents) -> bool {
        if self.is_active() == active {
            return false;
        }

        self.surface.set_visible(active);
        if let Some(water) = self.water.get_mut() {
            water.visible = active;
        }

        if active {
            self.subscriptions = Some(ChunkSubscriptions::subscribe(events, self.coord));
        } else if let Some(subs) = self.subscriptions.take() {
            subs.release(events);
        }
        debug!("Chunk {} {}", self.coord, if active { "activated" } else { "deactivated" });
        true
    }

    /// Deactivates and drops the chunk.
    pub fn release(mut self, events: &mut GridEvents) {
        self.set_active(false, events);
    }

    // -- State -------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.subscriptions.is_some()
    }

    pub fn has_mesh(&self) -> bool {
        self.surface.mesh().is_some()
    }

    pub fn has_biome_texture(&self) -> bool {
        self.biome_texture.is_built()
    }

    pub fn has_vegetation(&self) -> bool {
        self.vegetation.is_built()
    }

    pub fn has_water_layer(&self) -> bool {
        self.water.is_built()
    }

    pub fn surface(&self) -> &TerrainSurface {
        &self.surface
    }

    /// The cached biome texture, bound or not.
    pub fn biome_texture(&self) -> Option<&Arc<Texture>> {
        self.biome_texture.get()
    }

    pub fn vegetation(&self) -> Option<&[VegetationPlacement]> {
        self.vegetation.get().map(Vec::as_slice)
    }

    pub fn props_visible(&self) -> bool {
        self.props_visible
    }

    pub fn water_layer(&self) -> Option<&WaterLayer> {
        self.water.get()
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        if self.subscriptions.is_some() {
            tracing::warn!("Chunk {} dropped while active; its subscriptions leak", self.coord);
        }
    }
}

#[cfg(test)]
#[path = "chunk_tests.rs"]
mod tests;
