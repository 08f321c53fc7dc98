use crate::math::{Coord, Vec3};
use crate::ray::{Ray, RayKind};
use crate::sampling::Sampler;

/// User-facing camera description: position, viewing frame and thin-lens
/// parameters. `forward`/`left`/`up` are expected unit and mutually
/// orthogonal -- `Camera::new` normalizes `forward` and re-derives
/// `left`/`up` via the Gram-Schmidt-ish cross-product construction so small
/// input error doesn't accumulate into a skewed frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraParameters {
    pub position: Vec3,
    pub forward: Vec3,
    pub up_hint: Vec3,
    /// Focal length in raster-plane units: larger values narrow the field
    /// of view. Matches the `f` in `(x - W/2)/f`.
    pub focal_length: f32,
    /// Thin-lens aperture radius. `0.0` is a pinhole (fast path, no lens
    /// sampling).
    pub aperture: f32,
    /// Distance from the lens to the plane that's in perfect focus.
    pub focal_distance: f32,
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            forward: Vec3::new(0.0, 0.0, 1.0),
            up_hint: Vec3::new(0.0, 1.0, 0.0),
            focal_length: 400.0,
            aperture: 0.0,
            focal_distance: 1.0,
        }
    }
}

/// A thin-lens camera. Aperture `0` degenerates to a pinhole and is a fast
/// path that skips lens sampling entirely (§4.2).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    left: Vec3,
    up: Vec3,
    focal_length: f32,
    aperture: f32,
    focal_distance: f32,
}

impl Camera {
    pub fn new(params: CameraParameters) -> Self {
        // `normalized_or_zero`, not `normalized`: the axes here are
        // caller-supplied and may be degenerate, which `has_valid_axes`
        // must be able to report rather than have this constructor panic.
        let forward = params.forward.normalized_or_zero();
        let left = params.up_hint.cross(forward).normalized_or_zero();
        let up = forward.cross(left).normalized_or_zero();
        Self {
            position: params.position,
            forward,
            left,
            up,
            focal_length: params.focal_length,
            aperture: params.aperture,
            focal_distance: params.focal_distance,
        }
    }

    /// `false` if the supplied axes were degenerate (zero-length forward or
    /// forward colinear with the up hint), which `Scene::new` rejects as a
    /// fatal precondition (§7).
    pub fn has_valid_axes(&self) -> bool {
        self.forward.is_finite()
            && self.left.is_finite()
            && self.up.is_finite()
            && self.forward.length_squared() > 1e-12
            && self.left.length_squared() > 1e-12
            && self.up.length_squared() > 1e-12
    }

    /// Generates a camera ray for pixel `pixel` in an image of
    /// `width`x`height`, optionally jittered for antialiasing, per §4.2.
    ///
    /// The half-pixel convention is deliberate and spec-pinned (§9's open
    /// question): jitter is applied directly to the integer pixel
    /// coordinates, not to a coordinate already offset to the pixel center.
    pub fn generate_ray(
        &self,
        pixel: Coord,
        width: u32,
        height: u32,
        antialiasing: bool,
        sampler: &mut Sampler,
    ) -> Ray {
        let (mut x, mut y) = (pixel.x as f32, pixel.y as f32);
        if antialiasing {
            x += sampler.get_dimension() * 0.5 - 0.25;
            y += sampler.get_dimension() * 0.5 - 0.25;
        }

        let direction_camera = Vec3::new(
            (x - width as f32 * 0.5) / self.focal_length,
            (y - height as f32 * 0.5) / self.focal_length,
            1.0,
        )
        .normalized();

        let direction_world =
            (self.left * direction_camera.x + self.up * direction_camera.y + self.forward * direction_camera.z)
                .normalized();

        if self.aperture <= 0.0 {
            return Ray::new(self.position, direction_world, RayKind::Incident);
        }

        let ft = self.focal_distance / direction_camera.z;
        let focal_point = self.position + direction_world * ft;

        let lens = crate::sampling::sample_disc(sampler.get_dimension(), sampler.get_dimension())
            * self.aperture;
        let origin = self.position + self.left * lens.x + self.up * lens.y;

        let to_focal_point = focal_point - origin;
        if to_focal_point.length_squared() == 0.0 {
            // Degenerate: lens sample landed exactly on the focal point.
            // Fall back to the pinhole direction rather than produce a
            // zero-length ray direction (§7: treated as an environment
            // miss downstream).
            return Ray::new(origin, direction_world, RayKind::Incident);
        }

        Ray::new(origin, to_focal_point.normalized(), RayKind::Incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinhole_is_fast_path_with_no_lens_offset() {
        let camera = Camera::new(CameraParameters {
            aperture: 0.0,
            ..CameraParameters::default()
        });
        let mut sampler = Sampler::for_sample(0, 0, 1, 1, 0);
        let ray = camera.generate_ray(Coord::new(320, 240), 640, 480, false, &mut sampler);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn center_pixel_looks_along_forward() {
        let camera = Camera::new(CameraParameters::default());
        let mut sampler = Sampler::for_sample(0, 0, 1, 1, 0);
        let ray = camera.generate_ray(Coord::new(320, 240), 640, 480, false, &mut sampler);
        assert!((ray.direction.dot(Vec3::new(0.0, 0.0, 1.0)) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_axes_are_rejected() {
        let camera = Camera::new(CameraParameters {
            forward: Vec3::zeros(),
            ..CameraParameters::default()
        });
        assert!(!camera.has_valid_axes());
    }
}
