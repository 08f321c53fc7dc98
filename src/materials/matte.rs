use super::bsdfs::lambertian;
use crate::interaction::HitRecord;
use crate::math::{Spectrum, Vec3};
use crate::ray::{Ray, RayKind};
use crate::sampling::Sampler;

/// A perfectly diffuse (Lambertian) surface with an optional emission term.
/// The single material capable of acting as an area light, since lights
/// aren't modeled as a separate scene entity -- emission lives on whatever
/// material is hit, matching end-to-end scenario 3's "single emissive
/// sphere".
#[derive(Debug, Clone, Copy)]
pub struct Matte {
    pub albedo: Spectrum,
    pub emission: Spectrum,
}

impl Matte {
    pub fn emitted(&self) -> Spectrum {
        self.emission
    }

    /// Returns the outgoing ray and its already-pdf-divided weight, or
    /// `None` if the geometry is degenerate (zero-length normal after
    /// construction, which shouldn't happen for a valid `HitRecord` but is
    /// guarded rather than assumed).
    pub fn scatter(&self, hit: &HitRecord, sampler: &mut Sampler) -> Option<(Ray, Spectrum)> {
        let n = hit.normal;
        let (t, b) = Vec3::coordinate_system(n);
        let wo = lambertian::sample(n, t, b, sampler);
        if wo.length_squared() == 0.0 {
            return None;
        }
        let ray = Ray::new(hit.point, wo, RayKind::Reflected);
        Some((ray, self.albedo))
    }
}
