use std::sync::atomic::Ordering;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::film::Film;
use crate::integrators::radiance;
use crate::math::{Coord, Spectrum};
use crate::sampling::Sampler;
use crate::scene::Scene;
use crate::{lumen_debug, lumen_trace};

use super::{AbortFlag, PauseState, Prefs};
use super::scheduler::TileScheduler;

pub enum WorkerMessage {
    SamplePass {
        worker_id: usize,
        tile_index: usize,
        elapsed: Duration,
        /// Pixels actually sampled this pass -- equal to the tile's area
        /// unless abort cut the pass short partway through (§7: the pixels
        /// after the cutoff contribute nothing, so they don't count here).
        pixels_sampled: u32,
    },
    TileDone {
        worker_id: usize,
        tile_index: usize,
    },
    Finished {
        worker_id: usize,
    },
}

/// One render worker's fixed inputs for the lifetime of a render.
pub struct WorkerContext {
    pub id: usize,
    pub scene: Arc<Scene>,
    pub film: Arc<Film>,
    pub scheduler: Arc<TileScheduler>,
    pub prefs: Prefs,
    pub abort: AbortFlag,
    pub pause: Arc<PauseState>,
    pub to_controller: Sender<WorkerMessage>,
}

/// The worker loop (§4.6): repeatedly claim a tile, run every sample pass
/// over it, publish into the shared film, and report progress, until the
/// scheduler is exhausted or the abort flag fires.
pub fn run(ctx: WorkerContext) {
    lumen_debug!("worker {}: starting", ctx.id);

    'tiles: while let Some(tile) = ctx.scheduler.next_tile() {
        let (w, h) = (tile.bounds.extent.0 as usize, tile.bounds.extent.1 as usize);
        let mut local = vec![(Spectrum::zeros(), 0u32); w * h];

        for s in 0..ctx.prefs.sample_count {
            let pass_start = Instant::now();
            let mut pixels_sampled: u32 = 0;

            // Scan bottom-to-top, then left-to-right within a row, matching
            // the camera ray generator's pixel convention (§9's half-pixel
            // note; the original this was distilled from iterates
            // `end.y - 1 ..= begin.y` for the same reason).
            'rows: for row in (0..tile.bounds.extent.1).rev() {
                for col in 0..tile.bounds.extent.0 {
                    if ctx.abort.load(Ordering::Acquire) {
                        lumen_trace!("worker {}: abort observed mid-tile", ctx.id);
                        break 'rows;
                    }

                    let x = tile.bounds.origin.x + col;
                    let y = tile.bounds.origin.y + row;

                    let mut sampler =
                        Sampler::for_sample(x, y, ctx.film.width, ctx.prefs.sample_count, s);

                    let ray = ctx.scene.camera.generate_ray(
                        Coord::new(x, y),
                        ctx.film.width,
                        ctx.film.height,
                        ctx.prefs.antialiasing,
                        &mut sampler,
                    );

                    let sample = radiance(ray, &ctx.scene, 0, ctx.prefs.bounces, &mut sampler);
                    // Arithmetic anomalies never reach the running mean;
                    // `radiance` already clamps internally, this is a second
                    // line of defense at the publish boundary (§7).
                    let sample = if sample.is_finite() && !sample.has_nans() {
                        sample
                    } else {
                        Spectrum::zeros()
                    };

                    let local_idx = (row * tile.bounds.extent.0 + col) as usize;
                    let (sum, count) = &mut local[local_idx];
                    *sum += sample;
                    *count += 1;
                    pixels_sampled += 1;
                }
            }

            ctx.film.update_tile(tile.bounds, &local);

            // Reported even when abort cut this pass short: the pixels
            // already written above genuinely joined the running mean
            // (§3's invariant), so they count toward the total (§6's "total
            // samples" output, pinned by end-to-end scenario 1).
            ctx.scheduler.record_sample_pass(tile.index);
            let _ = ctx.to_controller.send(WorkerMessage::SamplePass {
                worker_id: ctx.id,
                tile_index: tile.index,
                elapsed: pass_start.elapsed(),
                pixels_sampled,
            });

            if ctx.abort.load(Ordering::Acquire) {
                break 'tiles;
            }

            wait_while_paused(&ctx);
            if ctx.abort.load(Ordering::Acquire) {
                break 'tiles;
            }
        }

        ctx.scheduler.mark_complete(tile.index);
        let _ = ctx.to_controller.send(WorkerMessage::TileDone {
            worker_id: ctx.id,
            tile_index: tile.index,
        });
    }

    lumen_debug!("worker {}: done", ctx.id);
    let _ = ctx.to_controller.send(WorkerMessage::Finished { worker_id: ctx.id });
}

/// Blocks while the shared pause flag is set, rechecking on every
/// condvar wakeup and bailing immediately once abort fires (§5, §9's note
/// on replacing independent per-thread pause flags with one condvar).
fn wait_while_paused(ctx: &WorkerContext) {
    let mut paused = ctx.pause.flag.lock().unwrap();
    while *paused && !ctx.abort.load(Ordering::Acquire) {
        let (guard, _timeout) = ctx
            .pause
            .condvar
            .wait_timeout(paused, Duration::from_millis(100))
            .unwrap();
        paused = guard;
    }
}
