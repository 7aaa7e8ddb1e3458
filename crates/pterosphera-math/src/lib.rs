#![warn(missing_docs)]

//! Math types for the pterosphera geometry layer.
//!
//! Thin wrappers around nalgebra: points, vectors, affine transforms,
//! axis-aligned bounding boxes and tolerance constants.

use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3, Vector4};

/// A point in 3D space (millimeters).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Affine placement of a part, stored as a homogeneous matrix.
///
/// Constructors delegate to nalgebra. Composition reads right to left:
/// `a.then(&b)` applies `b` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Homogeneous matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// No-op placement.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Shift by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::translation_vec(&Vec3::new(dx, dy, dz))
    }

    /// Shift by `v`.
    pub fn translation_vec(v: &Vec3) -> Self {
        Self {
            matrix: Matrix4::new_translation(v),
        }
    }

    /// Per-axis scale; a negative factor mirrors.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Rotation about X, in radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::from_rotation(Rotation3::from_euler_angles(angle, 0.0, 0.0))
    }

    /// Rotation about Y; maps +Z toward +X for positive angles.
    pub fn rotation_y(angle: f64) -> Self {
        Self::from_rotation(Rotation3::from_euler_angles(0.0, angle, 0.0))
    }

    /// Rotation about Z.
    pub fn rotation_z(angle: f64) -> Self {
        Self::from_rotation(Rotation3::from_euler_angles(0.0, 0.0, angle))
    }

    /// Euler angles in degrees, applied about X, then Y, then Z.
    pub fn rotation_xyz_deg(x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        Self::from_rotation(Rotation3::from_euler_angles(
            x_deg.to_radians(),
            y_deg.to_radians(),
            z_deg.to_radians(),
        ))
    }

    fn from_rotation(rotation: Rotation3<f64>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Compose: `self * other`, so `other` is applied first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Geometric mean of the axis scale factors (`|det|^(1/3)` of the linear part).
    ///
    /// Exact for rigid motions, mirrors and uniform scales.
    pub fn scale_factor(&self) -> f64 {
        let linear: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        linear.determinant().abs().cbrt()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Box spanning `min..max`.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Box centered at the origin with the given half extents.
    pub fn centered(half: Vec3) -> Self {
        Self {
            min: Point3::from(-half),
            max: Point3::from(half),
        }
    }

    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Box grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Aabb {
        let m = Vec3::repeat(margin);
        Aabb {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, b.z),
            Point3::new(a.x, b.y, b.z),
        ]
    }

    /// Bounds of this box after `transform` (conservative for rotations).
    pub fn transformed(&self, transform: &Transform) -> Aabb {
        let corners = self.corners().map(|c| transform.apply_point(&c));
        // Eight corners, never empty.
        let mut out = Aabb::new(corners[0], corners[0]);
        for c in &corners[1..] {
            out.min = out.min.inf(c);
            out.max = out.max.sup(c);
        }
        out
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Size along the longest axis.
    pub fn longest_extent(&self) -> f64 {
        self.extent().max()
    }

    /// Whether `p` lies inside or on the box.
    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Euclidean distance from `p` to the box, zero inside.
    pub fn distance_to(&self, p: &Point3) -> f64 {
        let mut sq = 0.0;
        for i in 0..3 {
            let d = (self.min[i] - p[i]).max(p[i] - self.max[i]).max(0.0);
            sq += d * d;
        }
        sq.sqrt()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 mm linear, 1e-12 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        angular: 1e-12,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
