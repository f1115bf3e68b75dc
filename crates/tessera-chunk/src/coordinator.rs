//! The policy a chunk consults while it builds its artifacts.

use tessera_mesh::TerrainMesh;
use tessera_terrain::{BiomeId, BiomeRuleSet, Grid, Rgba, TileCoord, VegetationPlacement};

use crate::chunk::Chunk;

/// Grid-level policy consumed by [`Chunk`].
///
/// A chunk never stores its coordinator. Every operation that needs one
/// borrows it for the duration of the call.
pub trait GridCoordinator {
    /// Rules used to classify a new chunk's fields.
    fn biome_rule_set(&self) -> &BiomeRuleSet;

    /// Asks whether water intersects the chunk at `coord`.
    ///
    /// An answer, if any, arrives later through
    /// [`Chunk::set_water_layer`], at most once.
    fn request_water_check(&mut self, coord: TileCoord);

    /// Neighbor-readiness gate for finalizing a chunk's biome texture.
    fn is_ready_to_finalize_terrain(&self, coord: TileCoord) -> bool;

    /// Per-tile ground colors for a chunk's biome grid.
    ///
    /// The result must have the same dimensions as `biomes`.
    fn compute_ground_colors(&self, coord: TileCoord, biomes: &Grid<BiomeId>) -> Grid<Rgba>;

    /// Props for `chunk`, called at most once per chunk.
    fn generate_vegetation(&mut self, chunk: &Chunk) -> Vec<VegetationPlacement>;

    /// Animates the water sheet of the chunk at `coord` for this tick.
    fn update_water_surface(&mut self, water: &mut TerrainMesh, coord: TileCoord);
}
