//! Signed-distance-field solids and the reference [`SdfKernel`].
//!
//! A [`Solid`] is an immutable, reference-counted expression tree. Leaves
//! are primitives or convex hulls, inner nodes are unions, differences and
//! transforms. Distances are exact for primitives and conservative after
//! booleans, with the sign always correct, which is all the mesher needs.

use std::sync::Arc;

use pterosphera_math::{Aabb, Point3, Transform, Vec3};

use crate::hull::ConvexPolytope;
use crate::{KernelError, Result, SolidKernel};

#[derive(Debug)]
enum Shape {
    Empty,
    Cuboid {
        half: Vec3,
    },
    Cylinder {
        half_height: f64,
        radius: f64,
    },
    Cone {
        half_height: f64,
        radius_bottom: f64,
        radius_top: f64,
    },
    Sphere {
        radius: f64,
    },
    Hull(ConvexPolytope),
    Union(Vec<Solid>),
    Difference(Solid, Solid),
    Transformed {
        child: Solid,
        /// World to child-local.
        inverse: Transform,
        scale: f64,
    },
}

/// An immutable solid described by its signed distance function.
#[derive(Debug, Clone)]
pub struct Solid {
    shape: Arc<Shape>,
    bounds: Option<Aabb>,
}

impl Solid {
    fn new(shape: Shape, bounds: Option<Aabb>) -> Self {
        Self {
            shape: Arc::new(shape),
            bounds,
        }
    }

    /// The empty solid.
    pub fn empty() -> Self {
        Self::new(Shape::Empty, None)
    }

    /// Whether the solid has no geometry.
    pub fn is_empty(&self) -> bool {
        matches!(*self.shape, Shape::Empty)
    }

    /// Bounding box, `None` when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Signed distance from `p`: negative inside, positive outside.
    pub fn distance(&self, p: &Point3) -> f64 {
        match &*self.shape {
            Shape::Empty => f64::INFINITY,
            Shape::Cuboid { half } => {
                let q = p.coords.abs() - half;
                let outside = q.sup(&Vec3::zeros()).norm();
                let inside = q.max().min(0.0);
                outside + inside
            }
            Shape::Cylinder {
                half_height,
                radius,
            } => {
                let dr = p.x.hypot(p.y) - radius;
                let dz = p.z.abs() - half_height;
                dr.max(0.0).hypot(dz.max(0.0)) + dr.max(dz).min(0.0)
            }
            Shape::Cone {
                half_height,
                radius_bottom,
                radius_top,
            } => capped_cone(p, *half_height, *radius_bottom, *radius_top),
            Shape::Sphere { radius } => p.coords.norm() - radius,
            Shape::Hull(hull) => hull.signed_distance(p),
            Shape::Union(children) => {
                let mut best = f64::INFINITY;
                for child in children {
                    if let Some(b) = child.bounds {
                        if b.distance_to(p) >= best {
                            continue;
                        }
                    }
                    best = best.min(child.distance(p));
                }
                best
            }
            Shape::Difference(a, b) => {
                let da = a.distance(p);
                match b.bounds {
                    // Outside the cutter's box the cutter cannot win the max.
                    Some(bb) if bb.distance_to(p) >= -da => da,
                    Some(_) => da.max(-b.distance(p)),
                    None => da,
                }
            }
            Shape::Transformed {
                child,
                inverse,
                scale,
            } => child.distance(&inverse.apply_point(p)) * scale,
        }
    }

    /// Whether `p` is inside or on the surface.
    pub fn contains(&self, p: &Point3) -> bool {
        self.distance(p) <= 0.0
    }

    /// Number of nodes in the expression tree.
    pub fn node_count(&self) -> usize {
        1 + match &*self.shape {
            Shape::Union(children) => children.iter().map(Solid::node_count).sum(),
            Shape::Difference(a, b) => a.node_count() + b.node_count(),
            Shape::Transformed { child, .. } => child.node_count(),
            _ => 0,
        }
    }
}

/// Capped cone along Z, `radius_bottom` at `-half_height`, `radius_top` at `+half_height`.
fn capped_cone(p: &Point3, h: f64, r1: f64, r2: f64) -> f64 {
    let qx = p.x.hypot(p.y);
    let qy = p.z;
    let (k1x, k1y) = (r2, h);
    let (k2x, k2y) = (r2 - r1, 2.0 * h);

    let cap_r = if qy < 0.0 { r1 } else { r2 };
    let cax = qx - qx.min(cap_r);
    let cay = qy.abs() - h;

    let k2_sq = k2x * k2x + k2y * k2y;
    let t = (((k1x - qx) * k2x + (k1y - qy) * k2y) / k2_sq).clamp(0.0, 1.0);
    let cbx = qx - k1x + k2x * t;
    let cby = qy - k1y + k2y * t;

    let sign = if cbx < 0.0 && cay < 0.0 { -1.0 } else { 1.0 };
    sign * (cax * cax + cay * cay).min(cbx * cbx + cby * cby).sqrt()
}

fn check_dimension(primitive: &'static str, field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(KernelError::InvalidPrimitive {
            primitive,
            field,
            value,
        })
    }
}

fn boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|i| a.min[i] <= b.max[i] && b.min[i] <= a.max[i])
}

/// Signed-distance-field implementation of [`SolidKernel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SdfKernel;

impl SdfKernel {
    /// Create a kernel.
    pub fn new() -> Self {
        Self
    }
}

impl SolidKernel for SdfKernel {
    type Solid = Solid;

    fn empty(&self) -> Solid {
        Solid::empty()
    }

    fn cuboid(&self, size: Vec3) -> Result<Solid> {
        let half = Vec3::new(
            check_dimension("cuboid", "x", size.x)?,
            check_dimension("cuboid", "y", size.y)?,
            check_dimension("cuboid", "z", size.z)?,
        ) / 2.0;
        Ok(Solid::new(Shape::Cuboid { half }, Some(Aabb::centered(half))))
    }

    fn cylinder(&self, height: f64, radius: f64) -> Result<Solid> {
        let half_height = check_dimension("cylinder", "height", height)? / 2.0;
        let radius = check_dimension("cylinder", "radius", radius)?;
        Ok(Solid::new(
            Shape::Cylinder {
                half_height,
                radius,
            },
            Some(Aabb::centered(Vec3::new(radius, radius, half_height))),
        ))
    }

    fn cone(&self, height: f64, radius_bottom: f64, radius_top: f64) -> Result<Solid> {
        let half_height = check_dimension("cone", "height", height)? / 2.0;
        let radius_bottom = check_dimension("cone", "radius_bottom", radius_bottom)?;
        let radius_top = check_dimension("cone", "radius_top", radius_top)?;
        let r = radius_bottom.max(radius_top);
        Ok(Solid::new(
            Shape::Cone {
                half_height,
                radius_bottom,
                radius_top,
            },
            Some(Aabb::centered(Vec3::new(r, r, half_height))),
        ))
    }

    fn sphere(&self, radius: f64) -> Result<Solid> {
        let radius = check_dimension("sphere", "radius", radius)?;
        Ok(Solid::new(
            Shape::Sphere { radius },
            Some(Aabb::centered(Vec3::repeat(radius))),
        ))
    }

    fn union(&self, solids: Vec<Solid>) -> Solid {
        let mut children = Vec::with_capacity(solids.len());
        for solid in solids {
            match &*solid.shape {
                Shape::Empty => {}
                Shape::Union(inner) => children.extend(inner.iter().cloned()),
                _ => children.push(solid),
            }
        }
        match children.len() {
            0 => Solid::empty(),
            1 => children.pop().unwrap_or_else(Solid::empty),
            _ => {
                let bounds = children
                    .iter()
                    .filter_map(|c| c.bounds)
                    .reduce(|a, b| a.union(&b));
                Solid::new(Shape::Union(children), bounds)
            }
        }
    }

    fn difference(&self, a: &Solid, b: &Solid) -> Solid {
        match (a.bounds, b.bounds) {
            (None, _) => Solid::empty(),
            (Some(_), None) => a.clone(),
            (Some(ab), Some(bb)) if !boxes_overlap(&ab, &bb) => a.clone(),
            (Some(ab), Some(_)) => Solid::new(Shape::Difference(a.clone(), b.clone()), Some(ab)),
        }
    }

    fn hull_of_points(&self, points: &[Point3]) -> Result<Solid> {
        let hull = ConvexPolytope::from_points(points)?;
        let bounds = hull.bounds();
        Ok(Solid::new(Shape::Hull(hull), Some(bounds)))
    }

    fn transform(&self, solid: &Solid, transform: &Transform) -> Result<Solid> {
        let inverse = transform.inverse().ok_or(KernelError::SingularTransform)?;
        let Some(bounds) = solid.bounds else {
            return Ok(Solid::empty());
        };
        let scale = transform.scale_factor();
        let world_bounds = bounds.transformed(transform);

        // Collapse transform chains into one node.
        if let Shape::Transformed {
            child,
            inverse: child_inverse,
            scale: child_scale,
        } = &*solid.shape
        {
            return Ok(Solid::new(
                Shape::Transformed {
                    child: child.clone(),
                    inverse: child_inverse.then(&inverse),
                    scale: child_scale * scale,
                },
                Some(world_bounds),
            ));
        }

        Ok(Solid::new(
            Shape::Transformed {
                child: solid.clone(),
                inverse,
                scale,
            },
            Some(world_bounds),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_distance() {
        let k = SdfKernel::new();
        let b = k.cuboid(Vec3::new(2.0, 4.0, 6.0)).unwrap();
        assert_relative_eq!(b.distance(&Point3::origin()), -1.0);
        assert_relative_eq!(b.distance(&Point3::new(3.0, 0.0, 0.0)), 2.0);
        assert!(b.contains(&Point3::new(0.9, 1.9, 2.9)));
    }

    #[test]
    fn test_cylinder_and_sphere() {
        let k = SdfKernel::new();
        let c = k.cylinder(10.0, 2.0).unwrap();
        assert_relative_eq!(c.distance(&Point3::new(3.0, 0.0, 0.0)), 1.0);
        assert_relative_eq!(c.distance(&Point3::new(0.0, 0.0, 6.0)), 1.0);
        let s = k.sphere(5.0).unwrap();
        assert_relative_eq!(s.distance(&Point3::new(0.0, 8.0, 0.0)), 3.0);
    }

    #[test]
    fn test_cone_radii_at_caps() {
        let k = SdfKernel::new();
        let cone = k.cone(4.0, 3.0, 1.0).unwrap();
        // Just inside the wide bottom, just outside the narrow top.
        assert!(cone.contains(&Point3::new(2.9, 0.0, -1.99)));
        assert!(!cone.contains(&Point3::new(1.1, 0.0, 1.99)));
        assert!(cone.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!cone.contains(&Point3::new(0.0, 0.0, 2.1)));
    }

    #[test]
    fn test_invalid_primitive() {
        let k = SdfKernel::new();
        assert_eq!(
            k.sphere(0.0).unwrap_err(),
            KernelError::InvalidPrimitive {
                primitive: "sphere",
                field: "radius",
                value: 0.0
            }
        );
        assert!(k.cylinder(-1.0, 1.0).is_err());
    }

    #[test]
    fn test_union_flattens_and_skips_empty() {
        let k = SdfKernel::new();
        let a = k.sphere(1.0).unwrap();
        let b = k.translate(&a, 5.0, 0.0, 0.0).unwrap();
        let ab = k.union(vec![a.clone(), k.empty(), b.clone()]);
        let abc = k.union(vec![ab.clone(), k.translate(&a, 10.0, 0.0, 0.0).unwrap()]);
        assert_eq!(abc.node_count(), 1 + 1 + 2 + 2);
        assert!(abc.contains(&Point3::new(10.0, 0.0, 0.0)));
        assert!(!abc.contains(&Point3::new(2.5, 0.0, 0.0)));
        assert!(k.union(vec![k.empty()]).is_empty());
    }

    #[test]
    fn test_difference() {
        let k = SdfKernel::new();
        let block = k.cuboid(Vec3::new(10.0, 10.0, 10.0)).unwrap();
        let hole = k.cylinder(12.0, 2.0).unwrap();
        let part = k.difference(&block, &hole);
        assert!(!part.contains(&Point3::origin()));
        assert!(part.contains(&Point3::new(4.0, 0.0, 0.0)));

        let far = k.translate(&hole, 100.0, 0.0, 0.0).unwrap();
        let untouched = k.difference(&block, &far);
        assert_eq!(untouched.node_count(), 1);
    }

    #[test]
    fn test_transform_chain_collapses() {
        let k = SdfKernel::new();
        let s = k.sphere(1.0).unwrap();
        let moved = k.translate(&s, 1.0, 0.0, 0.0).unwrap();
        let rotated = k
            .transform(&moved, &Transform::rotation_z(std::f64::consts::FRAC_PI_2))
            .unwrap();
        assert_eq!(rotated.node_count(), 2);
        assert!(rotated.contains(&Point3::new(0.0, 1.0, 0.0)));
        let b = rotated.bounds().unwrap();
        assert_relative_eq!(b.max.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_transform() {
        let k = SdfKernel::new();
        let s = k.sphere(1.0).unwrap();
        assert_eq!(
            k.transform(&s, &Transform::scale(1.0, 0.0, 1.0)).unwrap_err(),
            KernelError::SingularTransform
        );
    }

    #[test]
    fn test_mirror_keeps_distance_scale() {
        let k = SdfKernel::new();
        let s = k.translate(&k.sphere(1.0).unwrap(), 0.0, 3.0, 0.0).unwrap();
        let m = k.transform(&s, &Transform::scale(1.0, -1.0, 1.0)).unwrap();
        assert_relative_eq!(m.distance(&Point3::new(0.0, -3.0, 0.0)), -1.0, epsilon = 1e-12);
    }
}
