use std::sync::Mutex;

use crate::math::{linear_to_srgb, Coord, Spectrum};

/// Render preferences that size the framebuffer and tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilmSettings {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for FilmSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            tile_width: 32,
            tile_height: 32,
        }
    }
}

/// The pixel bounds of one tile: `origin` is its top-left pixel, `extent`
/// its width/height (clipped to the film at the right/bottom edges).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
    pub origin: Coord,
    pub extent: (u32, u32),
}

impl TileBounds {
    pub fn area(&self) -> u32 {
        self.extent.0 * self.extent.1
    }
}

/// Partitions `settings`'s resolution into a row-major (top-to-bottom,
/// left-to-right), top-left-first grid of tiles, clipping edge tiles to the
/// image bounds (§4.5).
pub fn partition_tiles(settings: &FilmSettings) -> Vec<TileBounds> {
    let mut tiles = Vec::new();
    let mut y = 0;
    while y < settings.height {
        let h = settings.tile_height.min(settings.height - y);
        let mut x = 0;
        while x < settings.width {
            let w = settings.tile_width.min(settings.width - x);
            tiles.push(TileBounds {
                origin: Coord::new(x, y),
                extent: (w, h),
            });
            x += settings.tile_width;
        }
        y += settings.tile_height;
    }
    tiles
}

struct FilmInner {
    /// Running `(sum, count)` per pixel; the mean is only computed at
    /// readout, per the design note preferring accuracy over an in-place
    /// running mean at high sample counts.
    accum: Vec<(Spectrum, u32)>,
    display: Vec<[u8; 3]>,
}

/// The controller-owned framebuffer: a float accumulator and an 8-bit sRGB
/// display image, both `width x height`. Tiles partition the image, so
/// concurrent workers only ever touch disjoint pixel ranges; the inner
/// `Mutex` here exists only to make that single-writer discipline safe in
/// the type system (copying a tile's worth of pixels is cheap, so the lock
/// is held briefly), not because pixel ownership is actually shared.
pub struct Film {
    pub width: u32,
    pub height: u32,
    inner: Mutex<FilmInner>,
}

impl Film {
    pub fn new(settings: &FilmSettings) -> Self {
        let count = (settings.width as usize) * (settings.height as usize);
        Self {
            width: settings.width,
            height: settings.height,
            inner: Mutex::new(FilmInner {
                accum: vec![(Spectrum::zeros(), 0); count],
                display: vec![[0u8; 3]; count],
            }),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Merges one freshly-rendered sample pass of `bounds` into the film.
    /// `local` holds `(sum, count)` for every pixel in `bounds`, row-major
    /// from `bounds.origin`. Matches the running-mean invariant: after
    /// merging, `accum[p] / count[p]` is the arithmetic mean of every
    /// sample logically completed at `p` so far.
    pub fn update_tile(&self, bounds: TileBounds, local: &[(Spectrum, u32)]) {
        debug_assert_eq!(local.len() as u32, bounds.area());
        let mut inner = self.inner.lock().unwrap();
        let width = self.width;
        for row in 0..bounds.extent.1 {
            for col in 0..bounds.extent.0 {
                let x = bounds.origin.x + col;
                let y = bounds.origin.y + row;
                let idx = (y as usize) * (width as usize) + (x as usize);
                let (sum, count) = local[(row * bounds.extent.0 + col) as usize];
                inner.accum[idx] = (sum, count);
                let mean = if count > 0 {
                    sum / (count as f32)
                } else {
                    Spectrum::zeros()
                };
                inner.display[idx] = [
                    linear_to_srgb(mean.x),
                    linear_to_srgb(mean.y),
                    linear_to_srgb(mean.z),
                ];
            }
        }
    }

    /// The current running mean at `(x, y)`.
    pub fn mean(&self, x: u32, y: u32) -> Spectrum {
        let idx = self.index(x, y);
        let inner = self.inner.lock().unwrap();
        let (sum, count) = inner.accum[idx];
        if count > 0 {
            sum / (count as f32)
        } else {
            Spectrum::zeros()
        }
    }

    /// Snapshot of the 8-bit sRGB display image, row-major top-to-bottom.
    pub fn display_snapshot(&self) -> Vec<[u8; 3]> {
        self.inner.lock().unwrap().display.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_partition_covers_every_pixel_exactly_once() {
        let settings = FilmSettings {
            width: 70,
            height: 50,
            tile_width: 32,
            tile_height: 32,
        };
        let tiles = partition_tiles(&settings);
        let mut covered = vec![0u8; 70 * 50];
        for tile in &tiles {
            for row in 0..tile.extent.1 {
                for col in 0..tile.extent.0 {
                    let x = tile.origin.x + col;
                    let y = tile.origin.y + row;
                    assert!(x < 70 && y < 50);
                    covered[(y * 70 + x) as usize] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn tile_order_is_row_major_top_left_first() {
        let settings = FilmSettings {
            width: 64,
            height: 64,
            tile_width: 32,
            tile_height: 32,
        };
        let tiles = partition_tiles(&settings);
        let origins: Vec<(u32, u32)> = tiles.iter().map(|t| (t.origin.x, t.origin.y)).collect();
        assert_eq!(origins, vec![(0, 0), (32, 0), (0, 32), (32, 32)]);
    }

    #[test]
    fn update_tile_computes_running_mean() {
        let settings = FilmSettings {
            width: 2,
            height: 1,
            tile_width: 2,
            tile_height: 1,
        };
        let film = Film::new(&settings);
        let bounds = TileBounds {
            origin: Coord::new(0, 0),
            extent: (2, 1),
        };
        film.update_tile(
            bounds,
            &[
                (Spectrum::new(1.0, 0.0, 0.0), 1),
                (Spectrum::new(2.0, 0.0, 0.0), 2),
            ],
        );
        assert_eq!(film.mean(0, 0), Spectrum::new(1.0, 0.0, 0.0));
        assert_eq!(film.mean(1, 0), Spectrum::new(1.0, 0.0, 0.0));
    }
}
