//! Water surfaces: flat sheets at water level with animated waves.

use crate::terrain_mesh::TerrainMesh;

/// Water configuration shared by all chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterParams {
    /// Water level, in the same vertical units as the terrain mesh.
    pub level: f32,
    /// Wave amplitude.
    pub wave_amplitude: f32,
    /// Wave frequency (cycles per unit).
    pub wave_frequency: f32,
    /// Wave speed (units per second).
    pub wave_speed: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            level: 3.5,
            wave_amplitude: 0.08,
            wave_frequency: 0.35,
            wave_speed: 1.2,
        }
    }
}

/// A flat water sheet covering `tiles x tiles` at `params.level`.
pub fn water_sheet(tiles: usize, tile_size: f32, params: &WaterParams) -> TerrainMesh {
    let mut mesh = TerrainMesh::flat(tiles, tile_size);
    for v in &mut mesh.vertices {
        v.position[1] = params.level;
    }
    mesh
}

/// Displaces a water sheet's vertices for simulation time `time`.
///
/// `origin` is the world-space `(x, z)` of the sheet's corner, so waves
/// line up across neighboring chunks.
pub fn animate_waves(mesh: &mut TerrainMesh, params: &WaterParams, time: f32, origin: (f32, f32)) {
    let k = params.wave_frequency * std::f32::consts::TAU;
    let phase = params.wave_speed * time * k;
    for v in &mut mesh.vertices {
        let wx = origin.0 + v.position[0];
        let wz = origin.1 + v.position[2];
        let wave = (k * wx + phase).sin() * 0.6 + (k * 0.7 * wz - phase * 0.8).cos() * 0.4;
        v.position[1] = params.level + params.wave_amplitude * wave;
    }
    mesh.recompute_normals();
}
