use tessera_chunk::{ChunkError, ParseDrawModeError};
use tessera_config::ConfigError;
use tessera_mesh::CurveError;
use tessera_terrain::BiomeRegistryError;

/// Errors that stop the simulation.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid height curve: {0}")]
    Curve(#[from] CurveError),

    #[error("biome table rejected: {0}")]
    Biomes(#[from] BiomeRegistryError),

    #[error(transparent)]
    DrawMode(#[from] ParseDrawModeError),

    #[error("chunk failed: {0}")]
    Chunk(#[from] ChunkError),
}
