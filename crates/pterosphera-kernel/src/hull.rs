//! Convex hulls of small point sets.
//!
//! The hull itself comes from `chull`. Its triangles are turned into
//! outward half-spaces and the solid is their intersection, which tolerates
//! corners that are slightly out of plane.

use chull::ConvexHullWrapper;
use pterosphera_math::{Aabb, Point3, Vec3};

use crate::{KernelError, Result};

/// Relative tolerance for merging coplanar facets, scaled by the hull extent.
const PLANE_EPS: f64 = 1e-9;

/// Half-space `normal · p <= offset`, with `normal` pointing outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace {
    /// Outward unit normal.
    pub normal: Vec3,
    /// Plane offset along the normal.
    pub offset: f64,
}

impl HalfSpace {
    /// Signed distance of `p` from the plane, positive outside.
    pub fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }
}

/// A convex polytope given by its supporting half-spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolytope {
    planes: Vec<HalfSpace>,
    points: Vec<Point3>,
    bounds: Aabb,
}

impl ConvexPolytope {
    /// Hull of `points`.
    ///
    /// Fails with [`KernelError::DegenerateHull`] for fewer than 4 points,
    /// non-finite coordinates, or a point set with no volume.
    pub fn from_points(points: &[Point3]) -> Result<Self> {
        if points.len() < 4 {
            return Err(KernelError::DegenerateHull(format!(
                "{} points, need at least 4",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(KernelError::DegenerateHull(
                "non-finite coordinate".to_string(),
            ));
        }
        let bounds = Aabb::from_points(points)
            .ok_or_else(|| KernelError::DegenerateHull("no points".to_string()))?;
        let eps = PLANE_EPS * bounds.longest_extent().max(1.0);

        let mut input: Vec<Vec<f64>> = Vec::with_capacity(points.len());
        for p in points {
            let coords = vec![p.x, p.y, p.z];
            if !input.contains(&coords) {
                input.push(coords);
            }
        }
        let hull = ConvexHullWrapper::try_new(&input, None).map_err(|_| {
            KernelError::DegenerateHull(format!("{} distinct points span no volume", input.len()))
        })?;
        let (vertices, indices) = hull.vertices_indices();
        let corners: Vec<Point3> = vertices
            .iter()
            .map(|v| Point3::new(v[0], v[1], v[2]))
            .collect();
        let centroid = corners
            .iter()
            .fold(Vec3::zeros(), |acc, c| acc + c.coords)
            / corners.len().max(1) as f64;

        let mut planes: Vec<HalfSpace> = Vec::new();
        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (corners[tri[0]], corners[tri[1]], corners[tri[2]]);
            let normal = (b - a).cross(&(c - a));
            let len = normal.norm();
            if len <= eps * eps {
                continue;
            }
            let mut plane = HalfSpace {
                normal: normal / len,
                offset: (normal / len).dot(&a.coords),
            };
            // Orient away from the interior.
            if plane.normal.dot(&centroid) > plane.offset {
                plane = HalfSpace {
                    normal: -plane.normal,
                    offset: -plane.offset,
                };
            }
            let duplicate = planes.iter().any(|h| {
                (h.normal - plane.normal).norm() < 1e-6 && (h.offset - plane.offset).abs() < eps
            });
            if !duplicate {
                planes.push(plane);
            }
        }

        if planes.len() < 4 {
            return Err(KernelError::DegenerateHull(format!(
                "{} points span no volume",
                points.len()
            )));
        }

        Ok(Self {
            planes,
            points: points.to_vec(),
            bounds,
        })
    }

    /// Supporting half-spaces.
    pub fn planes(&self) -> &[HalfSpace] {
        &self.planes
    }

    /// The input points.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Bounding box of the input points.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Signed distance bound: exact inside and on faces, conservative near edges.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.planes
            .iter()
            .map(|h| h.distance(p))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Whether `p` is inside or on the hull.
    pub fn contains(&self, p: &Point3) -> bool {
        self.signed_distance(p) <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> Vec<Point3> {
        let mut pts = Vec::with_capacity(8);
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    pts.push(Point3::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn test_cube_has_six_planes() {
        let hull = ConvexPolytope::from_points(&unit_cube()).unwrap();
        assert_eq!(hull.planes().len(), 6);
        assert!(hull.contains(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!hull.contains(&Point3::new(1.5, 0.5, 0.5)));
        assert_relative_eq!(
            hull.signed_distance(&Point3::new(0.5, 0.5, 0.25)),
            -0.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_interior_point_ignored() {
        let mut pts = unit_cube();
        pts.push(Point3::new(0.5, 0.5, 0.5));
        let hull = ConvexPolytope::from_points(&pts).unwrap();
        assert_eq!(hull.planes().len(), 6);
    }

    #[test]
    fn test_tetrahedron() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let hull = ConvexPolytope::from_points(&pts).unwrap();
        assert_eq!(hull.planes().len(), 4);
        assert!(hull.contains(&Point3::new(0.1, 0.1, 0.1)));
        assert!(!hull.contains(&Point3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_hull_encloses_its_input() {
        let pts: Vec<Point3> = (0..24)
            .map(|i| {
                let t = i as f64 * 0.7;
                Point3::new(
                    t.cos() * 3.0,
                    (t * 1.3).sin() * 2.0,
                    (t * 0.4).sin() * 5.0 + i as f64 * 0.1,
                )
            })
            .collect();
        let hull = ConvexPolytope::from_points(&pts).unwrap();
        for p in &pts {
            assert!(hull.signed_distance(p) < 1e-9, "{p:?} outside");
        }
        let far = Point3::new(10.0, 0.0, 0.0);
        assert!(!hull.contains(&far));
    }

    #[test]
    fn test_too_few_points() {
        let pts = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert!(matches!(
            ConvexPolytope::from_points(&pts),
            Err(KernelError::DegenerateHull(_))
        ));
    }

    #[test]
    fn test_coplanar_points_rejected() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        assert!(matches!(
            ConvexPolytope::from_points(&pts),
            Err(KernelError::DegenerateHull(_))
        ));
    }
}
