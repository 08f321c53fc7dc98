//! PRNG seeding and the sample-space primitives the integrator and camera
//! draw from. Grounded in the c-ray original this spec was distilled from:
//! `hash()` is the public-domain SplitMix64 finalizer, fed as the seed to a
//! `rand_pcg::Pcg32` stream held at a constant stream id of 0 (matching the
//! original's `pcg32_srandom_r(&rng, hash(idx), 0)`).

use crate::math::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// SplitMix64 finalizer / 64-bit avalanche mix. Public domain
/// (https://xoshiro.di.unimi.it/splitmix64.c, by Sebastiano Vigna).
pub fn hash(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^= x >> 31;
    x
}

/// Deterministic per-sample seed: `hash((y * width + x) * sample_count + s)`,
/// the invariant named in the data model. `width`, `sample_count` and `s` are
/// all small enough that the intermediate product fits `u64` for any image
/// size/sample count this renderer is meant to run at.
pub fn pixel_sample_seed(x: u32, y: u32, width: u32, sample_count: u32, s: u32) -> u64 {
    let pixel_index = (y as u64) * (width as u64) + (x as u64);
    hash(pixel_index * (sample_count as u64) + (s as u64))
}

/// The only primitive the integrator and camera see: a `[0, 1)` draw.
pub struct Sampler {
    rng: Pcg32,
}

impl Sampler {
    /// Seeds a new sampler for pixel `(x, y)`, sample index `s` out of
    /// `sample_count` total samples at resolution `width`.
    pub fn for_sample(x: u32, y: u32, width: u32, sample_count: u32, s: u32) -> Self {
        let seed = pixel_sample_seed(x, y, width, sample_count, s);
        Self {
            rng: Pcg32::new(seed, 0),
        }
    }

    /// Returns the next `[0, 1)` draw.
    pub fn get_dimension(&mut self) -> f32 {
        // `gen_range` rather than the raw 32-bit word avoids exposing the
        // generator's bit layout to callers and keeps the contract at
        // exactly "a uniform [0, 1) float", per the spec.
        self.rng.gen_range(0.0..1.0)
    }
}

/// Samples a point uniformly on the unit disc. `r = sqrt(u), theta = u2 *
/// 2*PI` -- the simple (non-concentric) mapping named in the spec and used
/// by the c-ray original's thin-lens sampling, not the area-preserving
/// concentric mapping some path tracers prefer for its lower distortion.
pub fn sample_disc(u1: f32, u2: f32) -> Vec2 {
    let r = u1.sqrt();
    let theta = u2 * std::f32::consts::TAU;
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash(42), hash(42));
        assert_ne!(hash(42), hash(43));
    }

    #[test]
    fn pixel_seed_is_deterministic_and_distinct_per_sample() {
        let a = pixel_sample_seed(3, 7, 640, 16, 0);
        let b = pixel_sample_seed(3, 7, 640, 16, 0);
        let c = pixel_sample_seed(3, 7, 640, 16, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sampler_draws_stay_in_unit_interval() {
        let mut sampler = Sampler::for_sample(10, 20, 640, 64, 5);
        for _ in 0..1000 {
            let u = sampler.get_dimension();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn disc_sample_stays_within_unit_disc() {
        let mut sampler = Sampler::for_sample(0, 0, 1, 1_000_000, 0);
        for _ in 0..10_000 {
            let u1 = sampler.get_dimension();
            let u2 = sampler.get_dimension();
            let p = sample_disc(u1, u2);
            assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn disc_sample_area_is_uniform() {
        // Chi-square goodness of fit across an 8x8 grid of equal-area
        // annulus/angle bins over 10^6 draws; coarse bucketing keeps the
        // expected count per bin well above the usual >=5 rule of thumb.
        const RADIAL_BINS: usize = 8;
        const ANGULAR_BINS: usize = 8;
        const DRAWS: usize = 1_000_000;
        let mut counts = [0usize; RADIAL_BINS * ANGULAR_BINS];

        let mut sampler = Sampler::for_sample(1, 1, 1, DRAWS as u32, 0);
        for _ in 0..DRAWS {
            let u1 = sampler.get_dimension();
            let u2 = sampler.get_dimension();
            let p = sample_disc(u1, u2);
            let r = (p.x * p.x + p.y * p.y).sqrt();
            let theta = p.y.atan2(p.x).rem_euclid(std::f32::consts::TAU);
            // Equal-area radial bins: bin index from r^2, since area ~ r^2.
            let rbin = ((r * r) * RADIAL_BINS as f32) as usize;
            let rbin = rbin.min(RADIAL_BINS - 1);
            let abin = ((theta / std::f32::consts::TAU) * ANGULAR_BINS as f32) as usize;
            let abin = abin.min(ANGULAR_BINS - 1);
            counts[rbin * ANGULAR_BINS + abin] += 1;
        }

        let expected = DRAWS as f64 / counts.len() as f64;
        let chi_sq: f64 = counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // 63 degrees of freedom (64 bins - 1); alpha=0.01 critical value is
        // ~92.0. Uniform sampling should sit comfortably below that.
        assert!(
            chi_sq < 92.0,
            "chi-square statistic {chi_sq} suggests non-uniform disc coverage"
        );
    }
}
