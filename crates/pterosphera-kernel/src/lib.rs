#![warn(missing_docs)]

//! Solid kernel for pterosphera.
//!
//! The geometry layer never builds solids directly: it talks to a
//! [`SolidKernel`], which owns the primitive, boolean, hull and transform
//! operations. This crate defines that seam and ships [`SdfKernel`], a
//! signed-distance-field implementation whose solids can be meshed with
//! [`mesh_solid`].
//!
//! # Example
//!
//! ```
//! use pterosphera_kernel::{SdfKernel, SolidKernel};
//! use pterosphera_math::Vec3;
//!
//! let kernel = SdfKernel::new();
//! let block = kernel.cuboid(Vec3::new(10.0, 10.0, 4.0)).unwrap();
//! let hole = kernel.cylinder(6.0, 2.0).unwrap();
//! let part = kernel.difference(&block, &hole);
//! let mesh = pterosphera_kernel::mesh_solid(&part, 24).unwrap();
//! assert!(mesh.num_triangles() > 0);
//! ```

pub mod hull;
pub mod mesh;
pub mod solid;

pub use hull::ConvexPolytope;
pub use mesh::{mesh_solid, TriangleMesh};
pub use solid::{SdfKernel, Solid};

use pterosphera_math::{Point3, Transform, Vec3};
use thiserror::Error;

/// Errors reported by a solid kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A primitive was requested with a non-positive or non-finite dimension.
    #[error("invalid {primitive} dimension {field} = {value}")]
    InvalidPrimitive {
        /// Primitive kind ("cuboid", "cylinder", ...).
        primitive: &'static str,
        /// Offending parameter.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Hull input does not span a volume.
    #[error("degenerate hull: {0}")]
    DegenerateHull(String),

    /// A transform with no inverse was applied.
    #[error("singular transform")]
    SingularTransform,

    /// Meshing was requested for a solid with no geometry.
    #[error("solid is empty")]
    EmptySolid,

    /// Meshing resolution out of range.
    #[error("invalid mesh resolution: {0} cells")]
    InvalidResolution(usize),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Boolean/implicit-solid kernel consumed by the geometry layer.
///
/// Primitives are centered at the origin with their axis along Z.
/// `union` must be associative and commutative so callers may reduce
/// solids in any grouping.
pub trait SolidKernel: Send + Sync {
    /// Solid handle produced by this kernel.
    type Solid: Clone + Send + Sync;

    /// The empty solid (identity for union).
    fn empty(&self) -> Self::Solid;

    /// Box with the given full size.
    fn cuboid(&self, size: Vec3) -> Result<Self::Solid>;

    /// Cylinder of `height` and `radius`.
    fn cylinder(&self, height: f64, radius: f64) -> Result<Self::Solid>;

    /// Truncated cone of `height` from `radius_bottom` (at -Z) to `radius_top` (at +Z).
    fn cone(&self, height: f64, radius_bottom: f64, radius_top: f64) -> Result<Self::Solid>;

    /// Sphere of `radius`.
    fn sphere(&self, radius: f64) -> Result<Self::Solid>;

    /// Union of any number of solids.
    fn union(&self, solids: Vec<Self::Solid>) -> Self::Solid;

    /// `a` minus `b`.
    fn difference(&self, a: &Self::Solid, b: &Self::Solid) -> Self::Solid;

    /// Convex hull of a point set; needs at least 4 non-coplanar points.
    fn hull_of_points(&self, points: &[Point3]) -> Result<Self::Solid>;

    /// Apply an affine transform.
    fn transform(&self, solid: &Self::Solid, transform: &Transform) -> Result<Self::Solid>;

    /// Translate by `(dx, dy, dz)`.
    fn translate(&self, solid: &Self::Solid, dx: f64, dy: f64, dz: f64) -> Result<Self::Solid> {
        self.transform(solid, &Transform::translation(dx, dy, dz))
    }

    /// Union of two solids.
    fn union2(&self, a: &Self::Solid, b: &Self::Solid) -> Self::Solid {
        self.union(vec![a.clone(), b.clone()])
    }
}
