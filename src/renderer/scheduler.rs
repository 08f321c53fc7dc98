use std::sync::Mutex;

use crate::film::{partition_tiles, FilmSettings, TileBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Queued,
    Rendering,
    Complete,
}

/// One unit of scheduler-owned work. `completed_samples` is published by
/// the worker that owns the tile and read by the controller for progress
/// reporting.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub index: usize,
    pub bounds: TileBounds,
    pub state: TileState,
    pub completed_samples: u32,
}

struct SchedulerState {
    tiles: Vec<Tile>,
    cursor: usize,
}

/// Partitions the image into tiles and hands them out atomically to
/// workers (§4.5). The single mutex here guards the whole tile array;
/// `next_tile` is the only mutating operation on the hot path and its
/// critical section is O(1).
pub struct TileScheduler {
    state: Mutex<SchedulerState>,
}

impl TileScheduler {
    pub fn new(settings: &FilmSettings) -> Self {
        let bounds = partition_tiles(settings);
        let tiles = bounds
            .into_iter()
            .enumerate()
            .map(|(index, bounds)| Tile {
                index,
                bounds,
                state: TileState::Queued,
                completed_samples: 0,
            })
            .collect();
        Self {
            state: Mutex::new(SchedulerState { tiles, cursor: 0 }),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.state.lock().unwrap().tiles.len()
    }

    /// Atomically claims the next `Queued` tile, marking it `Rendering`.
    /// Returns `None` once every tile has been claimed. The order in which
    /// concurrent claimers receive tiles is unspecified, but every tile is
    /// handed out exactly once (enforced by the single cursor advance under
    /// the lock).
    pub fn next_tile(&self) -> Option<Tile> {
        let mut state = self.state.lock().unwrap();
        if state.cursor >= state.tiles.len() {
            return None;
        }
        let index = state.cursor;
        state.cursor += 1;
        state.tiles[index].state = TileState::Rendering;
        Some(state.tiles[index])
    }

    /// Records one completed sample pass for `index`, for progress
    /// reporting (not claimed/unclaimed state, which `next_tile` owns).
    pub fn record_sample_pass(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        state.tiles[index].completed_samples += 1;
    }

    pub fn mark_complete(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        state.tiles[index].state = TileState::Complete;
    }

    pub fn tile_at(&self, index: usize) -> Tile {
        self.state.lock().unwrap().tiles[index]
    }
}
