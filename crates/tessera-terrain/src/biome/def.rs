//! Biome definition: describes the properties of a single biome type.

use crate::color::Rgba;
use crate::vegetation::PropId;

/// Full descriptor for a biome type.
#[derive(Clone, Debug)]
pub struct BiomeDef {
    /// Human-readable biome name (e.g., "temperate_forest").
    pub name: String,
    /// Base color painted into the biome texture for tiles of this biome.
    pub ground_color: Rgba,
    /// Probability of a prop spawning on a candidate tile, in `[0.0, 1.0]`.
    pub vegetation_density: f64,
    /// Props that may be placed in this biome. Empty for barren biomes.
    pub props: Vec<PropId>,
}
