use super::bsdfs::{fresnel, specular};
use crate::interaction::HitRecord;
use crate::math::{Spectrum, Vec3};
use crate::ray::{Ray, RayKind};
use crate::sampling::Sampler;

/// A smooth dielectric (glass) surface. Picks stochastically between
/// reflection and transmission weighted by the Fresnel term, so a single
/// sample stays an unbiased estimator without needing to split the path.
#[derive(Debug, Clone, Copy)]
pub struct Glass {
    pub ior: f32,
}

impl Glass {
    pub fn emitted(&self) -> Spectrum {
        Spectrum::zeros()
    }

    /// `incident_direction` is the incoming ray's direction (pointing into
    /// the surface).
    pub fn scatter(
        &self,
        hit: &HitRecord,
        incident_direction: Vec3,
        sampler: &mut Sampler,
    ) -> Option<(Ray, Spectrum)> {
        let wi = -incident_direction;
        let entering = hit.normal.dot(wi) > 0.0;
        let (n, eta) = if entering {
            (hit.normal, 1.0 / self.ior)
        } else {
            (-hit.normal, self.ior)
        };

        let cos_theta = n.dot(wi).min(1.0);
        let reflectance = fresnel::schlick_reflectance(cos_theta, eta);

        let wo = if sampler.get_dimension() < reflectance {
            specular::reflect(wi, n)
        } else {
            match specular::refract(wi, n, eta) {
                Some(refracted) => refracted,
                None => specular::reflect(wi, n),
            }
        };

        if wo.length_squared() == 0.0 || !wo.is_finite() {
            return None;
        }

        // Weight is 1: whichever event was sampled, its probability
        // (reflectance or 1-reflectance) exactly cancels against the
        // Fresnel-weighted radiance for that event, leaving clear glass
        // unattenuated.
        let ray = Ray::new(hit.point, wo.normalized(), RayKind::Refracted);
        Some((ray, Spectrum::ones()))
    }
}
