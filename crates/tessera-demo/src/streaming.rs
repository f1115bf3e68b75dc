//! Chunk streaming around the viewer with hysteresis and per-tick budgets.
//!
//! Missing chunks inside the load radius are queued nearest-first; loaded
//! chunks are released only once they fall beyond the wider unload radius,
//! so a viewer hovering at a border does not thrash.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;
use tessera_terrain::TileCoord;

/// Radii (Chebyshev, in chunks) and per-tick budgets.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    pub load_radius: u32,
    /// Must exceed `load_radius` to leave a hysteresis band.
    pub unload_radius: u32,
    pub loads_per_tick: u32,
    pub unloads_per_tick: u32,
}

impl StreamConfig {
    /// Radii for a given active area: one extra ring is loaded so every
    /// active chunk has all of its neighbors.
    pub fn for_view_distance(view_distance: u32) -> Self {
        Self {
            load_radius: view_distance + 1,
            unload_radius: view_distance + 2,
            ..Self::default()
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            load_radius: 3,
            unload_radius: 4,
            loads_per_tick: 8,
            unloads_per_tick: 16,
        }
    }
}

/// Chunks awaiting a load, nearest first.
#[derive(Debug, Default)]
pub struct LoadQueue {
    queue: BinaryHeap<Reverse<(u32, TileCoord)>>,
    pending: FxHashSet<TileCoord>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate coordinates are ignored.
    pub fn enqueue(&mut self, coord: TileCoord, distance: u32) {
        if self.pending.insert(coord) {
            self.queue.push(Reverse((distance, coord)));
        }
    }

    pub fn dequeue(&mut self) -> Option<(u32, TileCoord)> {
        while let Some(Reverse((distance, coord))) = self.queue.pop() {
            if self.pending.remove(&coord) {
                return Some((distance, coord));
            }
        }
        None
    }

    /// Drops queued coordinates `keep` rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(TileCoord) -> bool) {
        self.pending.retain(|&c| keep(c));
        let pending = &self.pending;
        self.queue.retain(|Reverse((_, c))| pending.contains(c));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Chunks to load and unload this tick.
#[derive(Debug, Default, PartialEq)]
pub struct StreamPlan {
    /// Nearest first.
    pub load: Vec<TileCoord>,
    pub unload: Vec<TileCoord>,
}

#[derive(Debug)]
pub struct ChunkStreamer {
    config: StreamConfig,
    queue: LoadQueue,
}

impl ChunkStreamer {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            queue: LoadQueue::new(),
        }
    }

    /// Replaces the radii. Queued chunks outside the new load radius are
    /// dropped on the next tick.
    pub fn set_config(&mut self, config: StreamConfig) {
        self.config = config;
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Plans one tick around `viewer`.
    ///
    /// `loaded` lists the chunks currently resident; `is_loaded` answers
    /// membership for the same set.
    pub fn tick(
        &mut self,
        viewer: TileCoord,
        loaded: impl IntoIterator<Item = TileCoord>,
        is_loaded: impl Fn(TileCoord) -> bool,
    ) -> StreamPlan {
        let mut plan = StreamPlan::default();
        let lr = self.config.load_radius;

        self.queue.retain(|c| c.chebyshev_distance(viewer) <= lr);
        let r = lr as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let coord = viewer.offset(dx, dy);
                if !is_loaded(coord) {
                    self.queue.enqueue(coord, coord.chebyshev_distance(viewer));
                }
            }
        }

        while plan.load.len() < self.config.loads_per_tick as usize {
            let Some((_, coord)) = self.queue.dequeue() else {
                break;
            };
            if !is_loaded(coord) {
                plan.load.push(coord);
            }
        }

        let ur = self.config.unload_radius;
        plan.unload = loaded
            .into_iter()
            .filter(|c| c.chebyshev_distance(viewer) > ur)
            .take(self.config.unloads_per_tick as usize)
            .collect();

        plan
    }
}
