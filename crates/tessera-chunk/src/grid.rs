//! Owner of all loaded chunks and dispatcher of grid broadcasts.
//!
//! [`ChunkGrid`] keeps the coordinator policy, the [`GridEvents`] channels
//! and the chunks side by side, so a broadcast can walk a channel's
//! subscribers and call into each chunk with the coordinator borrowed.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tessera_mesh::TerrainMesh;
use tessera_terrain::{Grid, TileCoord};
use tracing::{debug, trace};

use crate::broadcast::GridEvents;
use crate::chunk::Chunk;
use crate::coordinator::GridCoordinator;
use crate::draw_mode::DrawMode;
use crate::error::ChunkError;

/// Loaded chunks keyed by [`TileCoord`], plus the policy and events they use.
pub struct ChunkGrid<C> {
    coordinator: C,
    events: GridEvents,
    chunks: FxHashMap<TileCoord, Chunk>,
}

impl<C: GridCoordinator> ChunkGrid<C> {
    /// Creates an empty grid driven by `coordinator`.
    pub fn new(coordinator: C) -> Self {
        Self {
            coordinator,
            events: GridEvents::new(),
            chunks: FxHashMap::default(),
        }
    }

    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut C {
        &mut self.coordinator
    }

    pub fn events(&self) -> &GridEvents {
        &self.events
    }

    /// Initializes and inserts the chunk at `coord`.
    ///
    /// A chunk already loaded at `coord` is released first.
    ///
    /// # Errors
    ///
    /// Propagates [`Chunk::new`] errors; the grid is left unchanged.
    pub fn load(
        &mut self,
        coord: TileCoord,
        height: Grid<f32>,
        temperature: Grid<f32>,
        humidity: Grid<f32>,
    ) -> Result<&mut Chunk, ChunkError> {
        let chunk = Chunk::new(&mut self.coordinator, coord, height, temperature, humidity)?;
        match self.chunks.entry(coord) {
            Entry::Occupied(mut entry) => {
                debug!("Chunk {coord} reloaded");
                entry.insert(chunk).release(&mut self.events);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(chunk)),
        }
    }

    /// Unloads the chunk at `coord`, deactivating it first.
    pub fn remove(&mut self, coord: TileCoord) -> Option<Chunk> {
        let mut chunk = self.chunks.remove(&coord)?;
        chunk.set_active(false, &mut self.events);
        Some(chunk)
    }

    /// Unloads and drops the chunk at `coord`. Returns `true` if one was loaded.
    pub fn unload(&mut self, coord: TileCoord) -> bool {
        match self.chunks.remove(&coord) {
            Some(chunk) => {
                chunk.release(&mut self.events);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of all loaded chunks, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Activates or deactivates the chunk at `coord`.
    ///
    /// Returns `true` if the chunk exists and its state changed.
    pub fn set_active(&mut self, coord: TileCoord, active: bool) -> bool {
        self.chunks
            .get_mut(&coord)
            .is_some_and(|chunk| chunk.set_active(active, &mut self.events))
    }

    /// Shows or hides the props of the chunk at `coord`.
    ///
    /// Returns `false` if no chunk is loaded there.
    pub fn set_vegetation_active(&mut self, coord: TileCoord, show: bool) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        chunk.set_vegetation_active(show, &mut self.coordinator);
        true
    }

    /// Delivers a water-check answer to the chunk at `coord`.
    ///
    /// Returns `Ok(false)` if the chunk was unloaded in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::AlreadyBuilt`] if the chunk already has water.
    pub fn deliver_water(&mut self, coord: TileCoord, mesh: TerrainMesh) -> Result<bool, ChunkError> {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            debug!("Water for unloaded chunk {coord} dropped");
            return Ok(false);
        };
        chunk.set_water_layer(mesh)?;
        Ok(true)
    }

    /// Sends `mode` to every chunk subscribed to draw-mode changes.
    ///
    /// Returns how many handlers ran.
    pub fn broadcast_draw_mode(&mut self, mode: DrawMode) -> usize {
        let mut fired = 0;
        for coord in self.events.draw_mode_changed.subscribers() {
            if let Some(chunk) = self.chunks.get_mut(coord) {
                chunk.on_draw_map(mode, &self.coordinator);
                fired += 1;
            }
        }
        debug!("Draw mode {mode} sent to {fired} chunks");
        fired
    }

    /// Sends `mode` to the chunk at `coord` alone, if it is active.
    ///
    /// Used to dress a chunk that was just activated.
    pub fn draw_chunk(&mut self, coord: TileCoord, mode: DrawMode) -> bool {
        match self.chunks.get_mut(&coord) {
            Some(chunk) if chunk.is_active() => {
                chunk.on_draw_map(mode, &self.coordinator);
                true
            }
            _ => false,
        }
    }

    /// Notifies every subscribed chunk that the visible set changed.
    ///
    /// Returns how many biome textures this built.
    pub fn broadcast_visible_set_changed(&mut self) -> usize {
        let mut built = 0;
        for coord in self.events.visible_set_changed.subscribers() {
            if let Some(chunk) = self.chunks.get_mut(coord)
                && chunk.on_visible_set_changed(&self.coordinator)
            {
                built += 1;
            }
        }
        trace!("Visible set changed: {built} biome textures built");
        built
    }

    /// Runs every chunk's per-tick hook. Returns how many water surfaces
    /// were updated.
    pub fn tick(&mut self) -> usize {
        let mut updated = 0;
        for chunk in self.chunks.values_mut() {
            if chunk.tick(&mut self.coordinator) {
                updated += 1;
            }
        }
        trace!("Tick: {updated} water surfaces updated");
        updated
    }
}

impl<C> Drop for ChunkGrid<C> {
    fn drop(&mut self) {
        for (_, chunk) in self.chunks.drain() {
            chunk.release(&mut self.events);
        }
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
