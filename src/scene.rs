use std::fmt;

use crate::camera::Camera;
use crate::interaction::HitRecord;
use crate::materials::Material;
use crate::math::{Spectrum, Vec3};
use crate::ray::Ray;
use crate::shapes::Shape;

/// Radiance returned when a ray escapes to infinity. Either a constant, or a
/// raw equirectangular float map -- decoding image files into that map is
/// out of scope (external collaborator, per spec §1), so `Map` only ever
/// gets built from in-memory data the caller already decoded.
#[derive(Debug, Clone)]
pub enum Environment {
    Constant(Spectrum),
    Map {
        width: usize,
        height: usize,
        data: Vec<Spectrum>,
    },
}

impl Environment {
    pub fn radiance(&self, direction: Vec3) -> Spectrum {
        match self {
            Environment::Constant(c) => *c,
            Environment::Map {
                width,
                height,
                data,
            } => {
                if *width == 0 || *height == 0 {
                    return Spectrum::zeros();
                }
                let d = direction.normalized_or_zero();
                let u = (d.z.atan2(d.x) + std::f32::consts::PI) / std::f32::consts::TAU;
                let v = d.y.clamp(-1.0, 1.0).acos() / std::f32::consts::PI;
                let x = ((u * *width as f32) as usize).min(width - 1);
                let y = ((v * *height as f32) as usize).min(height - 1);
                data[y * width + x]
            }
        }
    }
}

/// Fatal scene preconditions, surfaced to the caller before any worker
/// spawns (§7: "Scene invalid").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    Empty,
    DegenerateCamera,
    ZeroResolution,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Empty => write!(f, "scene has no shapes"),
            SceneError::DegenerateCamera => {
                write!(f, "camera has degenerate (zero-length or colinear) axes")
            }
            SceneError::ZeroResolution => write!(f, "image resolution has a zero dimension"),
        }
    }
}

impl std::error::Error for SceneError {}

/// An immutable, read-only-during-render scene: the camera, the shape list,
/// their materials, and the environment radiance. Shared by `Arc` among
/// worker threads (§5: "Scene, camera, prefs: read-only during render").
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub shapes: Vec<Shape>,
    pub materials: Vec<Material>,
    pub environment: Environment,
}

impl Scene {
    pub fn new(
        camera: Camera,
        shapes: Vec<Shape>,
        materials: Vec<Material>,
        environment: Environment,
    ) -> Result<Self, SceneError> {
        if shapes.is_empty() {
            return Err(SceneError::Empty);
        }
        if !camera.has_valid_axes() {
            return Err(SceneError::DegenerateCamera);
        }
        Ok(Self {
            camera,
            shapes,
            materials,
            environment,
        })
    }

    /// Finds the nearest hit across every shape, or `None` on a miss. A
    /// linear scan: BVH construction is an external collaborator per spec
    /// §1 and this crate only ever holds a handful of spheres.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        for shape in &self.shapes {
            if let Some(hit) = shape.intersect(ray) {
                if closest.map_or(true, |c| hit.t < c.t) {
                    closest = Some(hit);
                }
            }
        }
        closest
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraParameters;
    use crate::materials::Matte;
    use crate::shapes::Sphere;

    fn default_camera() -> Camera {
        Camera::new(CameraParameters::default())
    }

    #[test]
    fn rejects_empty_scene() {
        let err = Scene::new(
            default_camera(),
            vec![],
            vec![],
            Environment::Constant(Spectrum::zeros()),
        )
        .unwrap_err();
        assert_eq!(err, SceneError::Empty);
    }

    #[test]
    fn intersects_nearest_of_overlapping_spheres() {
        let materials = vec![
            Material::Matte(Matte {
                albedo: Spectrum::ones(),
                emission: Spectrum::zeros(),
            }),
            Material::Matte(Matte {
                albedo: Spectrum::ones(),
                emission: Spectrum::zeros(),
            }),
        ];
        let shapes = vec![
            Shape::Sphere(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 0)),
            Shape::Sphere(Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0, 1)),
        ];
        let scene = Scene::new(
            default_camera(),
            shapes,
            materials,
            Environment::Constant(Spectrum::zeros()),
        )
        .unwrap();

        let ray = Ray::new(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 1.0),
            crate::ray::RayKind::Incident,
        );
        let hit = scene.intersect(&ray).unwrap();
        assert_eq!(hit.material, 1);
    }

    #[test]
    fn constant_environment_is_direction_independent() {
        let env = Environment::Constant(Spectrum::new(0.5, 0.5, 0.5));
        assert_eq!(env.radiance(Vec3::new(1.0, 0.0, 0.0)), Spectrum::new(0.5, 0.5, 0.5));
        assert_eq!(env.radiance(Vec3::new(0.0, 1.0, 0.0)), Spectrum::new(0.5, 0.5, 0.5));
    }
}
