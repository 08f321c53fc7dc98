use crate::math::Vec3;

/// Distinguishes the role a ray plays when diagnosing intersection bugs and
/// when deciding the surface epsilon to apply. `Shadow` isn't threaded
/// through any behavioral difference yet -- there's no explicit shadow-ray
/// next-event estimation in this integrator, which emits `Incident` rays
/// from the camera, `Reflected` rays from matte/metal scattering and
/// `Refracted` rays from glass (both reflection and transmission, since
/// either can come out of a single dielectric scatter) -- but the variant
/// exists because the data model names all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayKind {
    Incident,
    Shadow,
    Reflected,
    Refracted,
}

/// A ray with a unit direction, keyed by [`RayKind`].
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub kind: RayKind,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        debug_assert!(
            (direction.length() - 1.0).abs() < 1e-3 || direction.length() == 0.0,
            "Ray direction must be normalized (or the degenerate zero vector)"
        );
        Self {
            origin,
            direction,
            kind,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
