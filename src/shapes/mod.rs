mod sphere;

pub use sphere::{Sphere, EPSILON_S};

use crate::interaction::HitRecord;
use crate::ray::Ray;

/// The closed set of shape variants the intersection oracle queries.
/// Spheres are the only concrete shape modeled -- mesh/BVH construction is
/// an external collaborator per spec §1 and isn't part of this crate -- but
/// the enum exists (rather than exposing `Sphere` directly as `Scene`'s
/// element type) so `Scene::intersect` has one dispatch point to extend from.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Sphere(Sphere),
}

impl Shape {
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
        }
    }

    pub fn material(&self) -> usize {
        match self {
            Shape::Sphere(s) => s.material,
        }
    }
}
