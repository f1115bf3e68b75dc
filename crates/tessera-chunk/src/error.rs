//! Chunk error types.

use std::fmt;

use tessera_terrain::{FieldError, TileCoord};

/// A derived artifact that can be installed at most once per chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Texture synthesized from ground colors.
    BiomeTexture,
    /// Vegetation placement list.
    Vegetation,
    /// Water surface mesh.
    WaterLayer,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BiomeTexture => "biome texture",
            Self::Vegetation => "vegetation",
            Self::WaterLayer => "water layer",
        })
    }
}

/// Errors raised by [`Chunk`](crate::Chunk) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChunkError {
    /// The sampled fields do not share one shape.
    #[error("invalid chunk fields: {0}")]
    Configuration(#[from] FieldError),

    /// A tile lookup fell outside the chunk.
    #[error("tile {coord} is outside the {width}x{height} chunk")]
    OutOfBounds {
        /// The requested tile.
        coord: TileCoord,
        /// Chunk width in tiles.
        width: usize,
        /// Chunk height in tiles.
        height: usize,
    },

    /// A ground-color grid does not match the biome grid.
    #[error("ground colors are {actual:?}, biome grid is {expected:?}")]
    GroundColorMismatch {
        /// `(width, height)` of the biome grid.
        expected: (usize, usize),
        /// `(width, height)` of the color grid.
        actual: (usize, usize),
    },

    /// The artifact was already installed on this chunk.
    #[error("{0} already built")]
    AlreadyBuilt(Artifact),
}
