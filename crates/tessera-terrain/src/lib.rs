//! Terrain data for streamed chunks: tile coordinates, sampled fields, biome
//! classification, texture synthesis and vegetation scatter.
//!
//! Everything here is pure data or a pure function of its inputs; the chunk
//! state machine that consumes it lives in `tessera-chunk`.

mod color;
mod coord;
mod field;
mod grid;
mod heightmap;
mod seed;
mod texture;

pub mod biome;
pub mod vegetation;

pub use biome::{
    BiomeDef, BiomeId, BiomeRegistry, BiomeRegistryError, BiomeRule, BiomeRuleSet, classify,
    classify_tile,
};
pub use color::Rgba;
pub use coord::TileCoord;
pub use field::{FieldError, FieldSampler, FieldSamplerParams, SampledFields};
pub use grid::Grid;
pub use heightmap::{NoiseLayer, NoiseLayerParams};
pub use seed::{chunk_rng, derive_chunk_seed};
pub use texture::Texture;
pub use vegetation::{PropId, VegetationPlacement, VegetationScatter};
