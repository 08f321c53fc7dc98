use crate::math::{Vec2, Vec3};

/// A surface intersection, produced per query by the intersection oracle
/// (§4.3). `material` indexes into the owning [`crate::scene::Scene`]'s
/// material list rather than holding a reference, so `HitRecord` stays a
/// plain value type that can be produced and copied freely in the hot path.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub material: usize,
}
