//! Background water checks: decides off the main thread whether a chunk
//! dips below sea level and, if so, builds its water sheet.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use tessera_mesh::{TerrainMesh, WaterParams, water_sheet};
use tessera_terrain::{Grid, TileCoord};

/// Shared by every worker.
#[derive(Clone, Debug)]
pub struct WaterCheckSettings {
    /// Normalized height of the water surface.
    pub sea_level: f32,
    /// Tiles along one chunk edge.
    pub chunk_tiles: usize,
    pub tile_size: f32,
    /// Geometry of the sheet handed back for submerged chunks.
    pub water: WaterParams,
}

/// One queued check: the chunk and the lowest normalized height it holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterCheck {
    pub coord: TileCoord,
    pub lowest_height: f32,
}

/// A finished water check.
pub struct WaterAnswer {
    pub coord: TileCoord,
    /// `None` when the chunk stays dry.
    pub mesh: Option<TerrainMesh>,
}

/// Smallest value in `heights`, or infinity for an empty grid.
pub fn lowest_height(heights: &Grid<f32>) -> f32 {
    heights.as_slice().iter().copied().fold(f32::INFINITY, f32::min)
}

/// The water sheet for `check`, if any of its tiles lie below sea level.
pub fn water_for(settings: &WaterCheckSettings, check: WaterCheck) -> Option<TerrainMesh> {
    (check.lowest_height < settings.sea_level)
        .then(|| water_sheet(settings.chunk_tiles, settings.tile_size, &settings.water))
}

/// Worker pool that answers water checks asynchronously.
///
/// Requests go in through [`submit`](Self::submit); answers come back in
/// completion order through [`drain_answers`](Self::drain_answers).
pub struct WaterChecker {
    task_sender: Option<crossbeam_channel::Sender<WaterCheck>>,
    answer_receiver: crossbeam_channel::Receiver<WaterAnswer>,
    worker_handles: Vec<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
}

impl WaterChecker {
    /// Spawns `worker_count` threads (at least one).
    pub fn new(worker_count: usize, settings: WaterCheckSettings) -> Self {
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<WaterCheck>();
        let (answer_tx, answer_rx) = crossbeam_channel::unbounded();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let settings = Arc::new(settings);

        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count.max(1) {
            let rx = task_rx.clone();
            let tx = answer_tx.clone();
            let settings = Arc::clone(&settings);
            let flight = Arc::clone(&in_flight);

            handles.push(std::thread::spawn(move || {
                while let Ok(check) = rx.recv() {
                    let mesh = water_for(&settings, check);
                    let _ = tx.send(WaterAnswer {
                        coord: check.coord,
                        mesh,
                    });
                    flight.fetch_sub(1, Ordering::Relaxed);
                }
            }));
        }

        Self {
            task_sender: Some(task_tx),
            answer_receiver: answer_rx,
            worker_handles: handles,
            in_flight,
        }
    }

    /// Queues `check`. Returns `false` after shutdown.
    pub fn submit(&self, check: WaterCheck) -> bool {
        let Some(sender) = &self.task_sender else {
            return false;
        };
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        if sender.send(check).is_err() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Collects every answer finished so far without blocking.
    pub fn drain_answers(&self) -> Vec<WaterAnswer> {
        self.answer_receiver.try_iter().collect()
    }

    /// Stops the workers after the queued checks finish.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WaterChecker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
