pub mod fresnel;
pub mod lambertian;
pub mod specular;

use crate::math::Vec3;

/// Transforms a direction given in the local frame of a shading normal
/// (z-up) into world space, using the orthonormal basis built around `n`.
pub fn local_to_world(local: Vec3, n: Vec3, t: Vec3, b: Vec3) -> Vec3 {
    t * local.x + b * local.y + n * local.z
}

/// Cosine-weighted sample over the hemisphere around `+z` in local space,
/// via Malley's method: uniform disc sample, then project up onto the
/// hemisphere. `(u1, u2)` are independent `[0, 1)` draws.
pub fn cosine_sample_hemisphere(u1: f32, u2: f32) -> Vec3 {
    let d = crate::sampling::sample_disc(u1, u2);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}
