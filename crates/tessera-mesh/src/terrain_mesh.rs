//! Heightfield terrain meshes: flat placeholders and height-displaced grids.

use glam::Vec3;
use tessera_terrain::{Grid, TileCoord};

use crate::curve::HeightCurve;

/// A single vertex in a terrain mesh, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local coordinates; `y` is up.
    pub position: [f32; 3],
    /// Smooth vertex normal.
    pub normal: [f32; 3],
    /// Texture coordinates spanning `[0, 1]` across the chunk.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

/// A regular grid mesh with shared vertices.
///
/// Vertices are row-major over `columns x rows`; each grid cell is two
/// triangles wound counter-clockwise when viewed from above.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    columns: usize,
    rows: usize,
}

impl TerrainMesh {
    /// A flat `tiles x tiles` plane at `y = 0`, one quad per tile.
    pub fn flat(tiles: usize, tile_size: f32) -> Self {
        Self::build(tiles + 1, tiles + 1, tile_size, |_| 0.0)
    }

    /// One vertex per height sample, lifted to
    /// `curve.evaluate(h) * height_multiplier`.
    pub fn from_heights(
        heights: &Grid<f32>,
        tile_size: f32,
        height_multiplier: f32,
        curve: &HeightCurve,
    ) -> Self {
        Self::build(heights.width(), heights.height(), tile_size, |c| {
            heights
                .get(c)
                .map_or(0.0, |&h| curve.evaluate(h) * height_multiplier)
        })
    }

    fn build(columns: usize, rows: usize, tile_size: f32, height_at: impl Fn(TileCoord) -> f32) -> Self {
        let mut vertices = Vec::with_capacity(columns * rows);
        let u_span = columns.saturating_sub(1).max(1) as f32;
        let v_span = rows.saturating_sub(1).max(1) as f32;

        for z in 0..rows {
            for x in 0..columns {
                let y = height_at(TileCoord::new(x as i32, z as i32));
                vertices.push(MeshVertex {
                    position: [x as f32 * tile_size, y, z as f32 * tile_size],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / u_span, z as f32 / v_span],
                });
            }
        }

        let mut indices = Vec::new();
        if columns >= 2 && rows >= 2 {
            indices.reserve((columns - 1) * (rows - 1) * 6);
            for z in 0..rows - 1 {
                for x in 0..columns - 1 {
                    let i = (z * columns + x) as u32;
                    let right = i + 1;
                    let below = i + columns as u32;
                    let diag = below + 1;
                    indices.extend_from_slice(&[i, below, right, right, below, diag]);
                }
            }
        }

        let mut mesh = Self {
            vertices,
            indices,
            columns,
            rows,
        };
        mesh.recompute_normals();
        mesh
    }

    /// Recomputes smooth normals from the current positions.
    ///
    /// Call after editing vertex heights in place.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }

    /// Vertex grid size as `(columns, rows)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Lowest and highest vertex `y`, or `None` for an empty mesh.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.vertices.iter().map(|v| v.position[1]).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }

    /// Vertex buffer as raw bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
