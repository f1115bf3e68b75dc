//! Terrain geometry: flat and heightfield chunk meshes, height-response
//! curves, and animated water sheets.

pub mod curve;
pub mod terrain_mesh;
pub mod water;

pub use curve::{CurveError, HeightCurve};
pub use terrain_mesh::{MeshVertex, TerrainMesh};
pub use water::{WaterParams, animate_waves, water_sheet};
