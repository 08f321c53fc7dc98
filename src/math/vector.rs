use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html
//
// `Vec3` is a single concrete `f32` triple rather than a type generic over a
// `ValueType` trait: the data model names "Vector" as exactly a triple of
// 32-bit floats, so there's no second numeric type to abstract over here.

/// A two-dimensional float vector. Used for raster/lens coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// An integer pixel/raster coordinate pair. Kept distinct from [`Vec2`] even
/// though the representation is similar: a `Coord` identifies a pixel on the
/// film, a `Vec2` a sub-pixel displacement or lens sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A three-dimensional vector. Used for points, directions and normals alike
/// -- the data model doesn't distinguish them, and a separate `Point3`/
/// `Normal` wrapper buys nothing once there's only one underlying numeric
/// representation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn ones() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product, computed in `f64` to avoid catastrophic cancellation
    /// for near-parallel inputs.
    /// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html#DotandCrossProduct
    pub fn cross(&self, other: Self) -> Self {
        let (ax, ay, az) = (self.x as f64, self.y as f64, self.z as f64);
        let (bx, by, bz) = (other.x as f64, other.y as f64, other.z as f64);
        Self::new(
            ((ay * bz) - (az * by)) as f32,
            ((az * bx) - (ax * bz)) as f32,
            ((ax * by) - (ay * bx)) as f32,
        )
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        debug_assert!(len > 0.0, "normalizing a zero-length vector");
        *self * (1.0 / len)
    }

    /// Normalizes `self`, or returns the zero vector if `self` is
    /// degenerate. For call sites that must tolerate caller-supplied or
    /// otherwise possibly-zero input without panicking (camera axis setup,
    /// environment lookups on a defensively-checked ray direction) rather
    /// than assume the non-degenerate invariant `normalized` enforces.
    pub fn normalized_or_zero(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::zeros()
        }
    }

    /// Componentwise minimum.
    pub fn min(&self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Componentwise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Midpoint of two vectors.
    pub fn midpoint(a: Self, b: Self) -> Self {
        (a + b) * 0.5
    }

    /// Reflects `self` (incident direction `I`) about a unit normal `N`:
    /// `I - 2(N . I)N`.
    pub fn reflect(&self, normal: Self) -> Self {
        *self - normal * (normal.dot(*self) * 2.0)
    }

    /// Builds an orthonormal basis `(t, b, n)` around a unit normal `n`,
    /// using the branchless construction from Duff et al., "Building an
    /// Orthonormal Basis, Revisited" (the PBRT-style "pick the axis of
    /// largest magnitude" approach generalizes to this sign-based form).
    pub fn coordinate_system(n: Self) -> (Self, Self) {
        let sign = 1.0_f32.copysign(n.z);
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;
        let t = Self::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
        let bt = Self::new(b, sign + n.y * n.y * a, -n.y);
        (t, bt)
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of bounds: {i}"),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index out of bounds: {i}"),
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Componentwise multiply.
impl Mul for Vec3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl MulAssign for Vec3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl DivAssign<f32> for Vec3 {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn normalize_has_unit_length() {
        for v in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 0.1, 9.0),
            Vec3::new(1e-3, 1e-3, 1e-3),
        ] {
            assert_abs_diff_eq!(v.normalized().length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn reflect_preserves_incident_length() {
        let n = Vec3::new(0.0, 1.0, 0.0);
        let i = Vec3::new(1.0, -1.0, 0.0);
        let r = i.reflect(n);
        assert_relative_eq!(r.length(), i.length(), epsilon = 1e-5);
        assert_relative_eq!(r, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn cross_is_orthogonal_to_both_inputs() {
        let a = Vec3::new(1.0, 0.3, -2.0);
        let b = Vec3::new(-0.5, 2.0, 1.0);
        let c = a.cross(b);
        assert_abs_diff_eq!(c.dot(a), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(c.dot(b), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn coordinate_system_is_orthonormal() {
        for n in [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0).normalized(),
            Vec3::new(1.0, 2.0, 3.0).normalized(),
        ] {
            let (t, b) = Vec3::coordinate_system(n);
            assert_abs_diff_eq!(t.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(b.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t.dot(n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(b.dot(n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t.dot(b), 0.0, epsilon = 1e-5);
        }
    }
}
