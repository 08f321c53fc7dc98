use crate::math::Vec3;

/// Perfect mirror reflection of incoming direction `wi` (pointing away from
/// the surface, toward the viewer) about shading normal `n`.
pub fn reflect(wi: Vec3, n: Vec3) -> Vec3 {
    (n * (2.0 * n.dot(wi)) - wi).normalized()
}

/// Refracts `wi` (pointing away from the surface) through a boundary with
/// relative IOR `eta` (incident medium over transmitted medium, PBRT's
/// `etaI / etaT`), given the surface normal `n` oriented against `wi`.
/// Returns `None` on total internal reflection.
pub fn refract(wi: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_theta_i = n.dot(wi).min(1.0);
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = sin2_theta_i * eta * eta;
    if sin2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some((-wi) * eta + n * (eta * cos_theta_i - cos_theta_t))
}
