pub mod bsdfs;
mod glass;
mod matte;
mod metal;

pub use glass::Glass;
pub use matte::Matte;
pub use metal::Metal;

use crate::interaction::HitRecord;
use crate::math::{Spectrum, Vec3};
use crate::ray::Ray;
use crate::sampling::Sampler;

/// The closed set of material variants the integrator scatters against.
/// Expressed as an enum (per the "closed set of variants" design note)
/// rather than a trait object: there's no plugin surface for materials at
/// this scope, and an enum keeps `Scene::materials` a flat, cheaply
/// `Copy`-able `Vec` with no indirection on the hot path.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    Matte(Matte),
    Metal(Metal),
    Glass(Glass),
}

impl Material {
    /// Emitted radiance `L_e` at this material, zero for everything but an
    /// emissive [`Matte`].
    pub fn emitted(&self) -> Spectrum {
        match self {
            Material::Matte(m) => m.emitted(),
            Material::Metal(m) => m.emitted(),
            Material::Glass(m) => m.emitted(),
        }
    }

    /// Samples a scattering event: an outgoing ray and a weight already
    /// divided by its sampling pdf. Returns `None` if the material absorbs
    /// (scattering failed or produced a degenerate direction) -- the
    /// integrator then stops at `L_e` for this path, per spec §4.4.
    pub fn scatter(
        &self,
        hit: &HitRecord,
        incident_direction: Vec3,
        sampler: &mut Sampler,
    ) -> Option<(Ray, Spectrum)> {
        match self {
            Material::Matte(m) => m.scatter(hit, sampler),
            Material::Metal(m) => m.scatter(hit, incident_direction, sampler),
            Material::Glass(m) => m.scatter(hit, incident_direction, sampler),
        }
    }
}
