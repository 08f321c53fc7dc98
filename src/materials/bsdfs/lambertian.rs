use super::{cosine_sample_hemisphere, local_to_world};
use crate::math::Vec3;
use crate::sampling::Sampler;

/// Samples a cosine-weighted outgoing direction around shading normal `n`
/// (with tangent/bitangent `t`/`b`). Returns the world-space direction; the
/// weight for cosine-weighted hemisphere sampling against a Lambertian BRDF
/// is exactly `albedo` (the `cos(theta)` and `1/pi` terms cancel against the
/// `cos(theta)/pi` pdf), so the caller applies `albedo` directly rather than
/// this module computing a pdf that would just be divided back out.
pub fn sample(n: Vec3, t: Vec3, b: Vec3, sampler: &mut Sampler) -> Vec3 {
    let local = cosine_sample_hemisphere(sampler.get_dimension(), sampler.get_dimension());
    local_to_world(local, n, t, b).normalized()
}
