//! Render-side state of a chunk: the terrain surface and the water layer.
//!
//! These are plain handles for a scene backend to read. Uploading and
//! binding happen outside this crate.

use std::sync::Arc;

use tessera_mesh::TerrainMesh;
use tessera_terrain::Texture;

use crate::draw_mode::DrawMode;

/// The terrain mesh holder of one chunk.
#[derive(Clone, Debug)]
pub struct TerrainSurface {
    mesh: Option<Arc<TerrainMesh>>,
    collider: Option<Arc<TerrainMesh>>,
    texture: Option<Arc<Texture>>,
    displayed: DrawMode,
    requested: DrawMode,
    visible: bool,
    glossiness: f32,
}

impl TerrainSurface {
    /// An empty, hidden, matte surface.
    pub fn new() -> Self {
        Self {
            mesh: None,
            collider: None,
            texture: None,
            displayed: DrawMode::Biome,
            requested: DrawMode::Biome,
            visible: false,
            glossiness: 0.0,
        }
    }

    /// Render mesh, placeholder or terrain.
    pub fn mesh(&self) -> Option<&Arc<TerrainMesh>> {
        self.mesh.as_ref()
    }

    /// Collision mesh. Only the height-displaced terrain mesh is collidable.
    pub fn collider(&self) -> Option<&Arc<TerrainMesh>> {
        self.collider.as_ref()
    }

    /// Currently bound texture.
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    /// Mode of the bound texture.
    pub fn displayed(&self) -> DrawMode {
        self.displayed
    }

    /// Mode last asked for. Differs from [`displayed`](Self::displayed)
    /// while a Biome draw waits for its texture.
    pub fn requested(&self) -> DrawMode {
        self.requested
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn glossiness(&self) -> f32 {
        self.glossiness
    }

    pub(crate) fn set_mesh(&mut self, mesh: Arc<TerrainMesh>) {
        self.mesh = Some(mesh);
    }

    pub(crate) fn set_collider(&mut self, mesh: Arc<TerrainMesh>) {
        self.collider = Some(mesh);
    }

    pub(crate) fn request(&mut self, mode: DrawMode) {
        self.requested = mode;
    }

    pub(crate) fn bind(&mut self, texture: Arc<Texture>, mode: DrawMode) {
        self.texture = Some(texture);
        self.displayed = mode;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Default for TerrainSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// A chunk's water sheet and its visibility.
#[derive(Clone, Debug)]
pub struct WaterLayer {
    pub(crate) mesh: TerrainMesh,
    pub(crate) visible: bool,
}

impl WaterLayer {
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
