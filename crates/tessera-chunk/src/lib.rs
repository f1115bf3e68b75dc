//! Per-chunk lifecycle for streamed procedural terrain.
//!
//! A [`Chunk`] owns one tile's sampled fields and derives its biome grid at
//! construction. Geometry, the biome texture, vegetation and water are built
//! lazily, at most once each. [`ChunkGrid`] owns the loaded chunks together
//! with a [`GridCoordinator`] policy and dispatches the grid's broadcasts to
//! the chunks that are currently active.

mod broadcast;
mod chunk;
mod coordinator;
mod draw_mode;
mod error;
mod grid;
mod lazy;
mod surface;

#[cfg(test)]
mod testing;

pub use broadcast::{Channel, GridEvents, Subscription};
pub use chunk::Chunk;
pub use coordinator::GridCoordinator;
pub use draw_mode::{DrawMode, ParseDrawModeError};
pub use error::{Artifact, ChunkError};
pub use grid::ChunkGrid;
pub use lazy::Lazy;
pub use surface::{TerrainSurface, WaterLayer};
