use crate::math::Spectrum;
use crate::ray::Ray;
use crate::sampling::Sampler;
use crate::scene::Scene;

/// Recursive radiance estimator, bounded by `max_depth` rather than
/// Russian-roulette-terminated (§4.4). `depth` counts bounces already taken;
/// a fresh camera ray starts at `depth = 0`.
pub fn radiance(ray: Ray, scene: &Scene, depth: u32, max_depth: u32, sampler: &mut Sampler) -> Spectrum {
    if depth > max_depth {
        return Spectrum::zeros();
    }

    // A zero-length direction (degenerate jitter/lens sample, per §7) can't
    // intersect anything meaningfully; treat it the same as a miss.
    if ray.direction.length_squared() == 0.0 {
        return scene.environment.radiance(ray.direction);
    }

    let hit = match scene.intersect(&ray) {
        Some(hit) => hit,
        None => return scene.environment.radiance(ray.direction),
    };

    let material = scene.material(hit.material);
    let emitted = material.emitted();

    let scattered = material.scatter(&hit, ray.direction, sampler);
    let (next_ray, weight) = match scattered {
        Some(s) => s,
        None => return emitted,
    };

    // Per-sample arithmetic anomalies (NaN/Inf from degenerate BSDFs, §7)
    // are clamped to black rather than allowed to propagate and destroy the
    // running mean for the whole pixel.
    if !weight.is_finite() || weight.has_nans() {
        return emitted;
    }

    let incoming = radiance(next_ray, scene, depth + 1, max_depth, sampler);
    let estimate = emitted + weight * incoming;

    if estimate.is_finite() && !estimate.has_nans() {
        estimate
    } else {
        Spectrum::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, CameraParameters};
    use crate::materials::{Material, Matte};
    use crate::math::Vec3;
    use crate::ray::RayKind;
    use crate::scene::{Environment, Scene};
    use crate::shapes::{Shape, Sphere};

    #[test]
    fn miss_returns_environment_radiance() {
        let scene = Scene::new(
            Camera::new(CameraParameters::default()),
            vec![Shape::Sphere(Sphere::new(Vec3::new(100.0, 100.0, 100.0), 1.0, 0))],
            vec![Material::Matte(Matte {
                albedo: Spectrum::ones(),
                emission: Spectrum::zeros(),
            })],
            Environment::Constant(Spectrum::new(0.25, 0.5, 0.75)),
        )
        .unwrap();

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), RayKind::Incident);
        let mut sampler = Sampler::for_sample(0, 0, 1, 1, 0);
        let result = radiance(ray, &scene, 0, 5, &mut sampler);
        assert_eq!(result, Spectrum::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn exceeding_max_depth_returns_black() {
        let scene = Scene::new(
            Camera::new(CameraParameters::default()),
            vec![Shape::Sphere(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 0))],
            vec![Material::Matte(Matte {
                albedo: Spectrum::ones(),
                emission: Spectrum::zeros(),
            })],
            Environment::Constant(Spectrum::ones()),
        )
        .unwrap();
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), RayKind::Incident);
        let mut sampler = Sampler::for_sample(0, 0, 1, 1, 0);
        assert_eq!(radiance(ray, &scene, 6, 5, &mut sampler), Spectrum::zeros());
    }

    #[test]
    fn emissive_sphere_contributes_emission_directly() {
        let scene = Scene::new(
            Camera::new(CameraParameters::default()),
            vec![Shape::Sphere(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 0))],
            vec![Material::Matte(Matte {
                albedo: Spectrum::zeros(),
                emission: Spectrum::new(2.0, 2.0, 2.0),
            })],
            Environment::Constant(Spectrum::zeros()),
        )
        .unwrap();
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), RayKind::Incident);
        let mut sampler = Sampler::for_sample(0, 0, 1, 1, 0);
        let result = radiance(ray, &scene, 0, 5, &mut sampler);
        assert_eq!(result, Spectrum::new(2.0, 2.0, 2.0));
    }
}
