//! Corner lattices for the elements of a column.
//!
//! A column of `N` elements is bounded by `N + 1` angular rows. Each row
//! holds four points: {left, right} × {outer, inner}. Element `i` takes its
//! eight corners from rows `i` (front) and `i + 1` (back), so neighbouring
//! elements copy the same row values and share their boundary exactly.

use pterosphera_math::{Point3, Vec3};

use crate::arc::ArcLayout;
use crate::error::{ensure_positive, GeometryError, Result};

/// Element faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Lateral face at `y = 0`.
    Left,
    /// Lateral face at `y = column_width`.
    Right,
    /// Boundary face on row `i`.
    Front,
    /// Boundary face on row `i + 1`.
    Back,
    /// Inner (socket floor) surface.
    Under,
    /// Outer (top plate) surface.
    Top,
}

/// Local corner indices of each face, indexed by `Face as usize`.
pub const FACE_TEMPLATE: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [4, 6, 7, 5],
    [0, 4, 5, 1],
    [2, 3, 7, 6],
    [1, 5, 7, 3],
    [0, 2, 6, 4],
];

impl Face {
    /// Every face, in template order.
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
        Face::Under,
        Face::Top,
    ];

    /// Local corner indices of this face.
    pub fn corners(self) -> [usize; 4] {
        FACE_TEMPLATE[self as usize]
    }
}

/// Local index of a corner: `lateral * 4 + arc * 2 + surface`.
///
/// `lateral` is 0 for left, 1 for right; `arc` 0 for front, 1 for back;
/// `surface` 0 for outer, 1 for inner.
pub const fn corner_index(lateral: usize, arc: usize, surface: usize) -> usize {
    lateral * 4 + arc * 2 + surface
}

/// Parameters shared by every element of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSpec {
    /// Arc layout of the column.
    pub layout: ArcLayout,
    /// Number of elements.
    pub element_count: usize,
    /// Radius of the top surface.
    pub radius_outer: f64,
    /// Radius of the socket floor surface.
    pub radius_inner: f64,
    /// Lateral width.
    pub column_width: f64,
    /// Position of the curvature center.
    pub offset: Vec3,
}

impl LatticeSpec {
    fn validate(&self) -> Result<()> {
        const LOCATION: &str = "element lattice";
        ensure_positive(LOCATION, "radius_outer", self.radius_outer)?;
        ensure_positive(LOCATION, "radius_inner", self.radius_inner)?;
        ensure_positive(LOCATION, "column_width", self.column_width)?;
        if self.element_count == 0 {
            return Err(GeometryError::config(LOCATION, "element_count must be at least 1"));
        }
        if self.radius_outer >= self.radius_inner {
            return Err(GeometryError::config(
                LOCATION,
                format!(
                    "radius_outer {} must be less than radius_inner {}",
                    self.radius_outer, self.radius_inner
                ),
            ));
        }
        if !self.offset.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::config(LOCATION, "offset must be finite"));
        }
        Ok(())
    }

    /// Boundary row `k`: `[left-outer, left-inner, right-outer, right-inner]`.
    fn row(&self, k: usize) -> [Point3; 4] {
        let angle = self.layout.angle_at(k);
        let (sin, cos) = angle.sin_cos();
        let mut row = [Point3::origin(); 4];
        for lateral in 0..2 {
            let y = lateral as f64 * self.column_width;
            for (surface, radius) in [self.radius_outer, self.radius_inner].into_iter().enumerate() {
                row[lateral * 2 + surface] = Point3::new(
                    cos * radius + self.offset.x,
                    y + self.offset.y,
                    sin * radius + self.offset.z,
                );
            }
        }
        row
    }
}

/// One element of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Index within the column.
    pub index: usize,
    /// First element of the column.
    pub is_first: bool,
    /// Last element of the column.
    pub is_last: bool,
    /// Corners, ordered by [`corner_index`].
    pub corners: [Point3; 8],
    /// Radius of the top surface.
    pub radius_outer: f64,
    /// Radius of the socket floor surface.
    pub radius_inner: f64,
}

impl Element {
    fn from_rows(spec: &LatticeSpec, index: usize, front: &[Point3; 4], back: &[Point3; 4]) -> Self {
        let mut corners = [Point3::origin(); 8];
        for lateral in 0..2 {
            for (arc, row) in [front, back].into_iter().enumerate() {
                for surface in 0..2 {
                    corners[corner_index(lateral, arc, surface)] = row[lateral * 2 + surface];
                }
            }
        }
        Self {
            index,
            is_first: index == 0,
            is_last: index + 1 == spec.element_count,
            corners,
            radius_outer: spec.radius_outer,
            radius_inner: spec.radius_inner,
        }
    }

    /// The four corners of `face`, in template order.
    pub fn face_points(&self, face: Face) -> [Point3; 4] {
        face.corners().map(|i| self.corners[i])
    }
}

/// Build element `element_index` directly from its two boundary rows.
///
/// Produces the same points as [`ColumnLattice::element`].
pub fn build_element(spec: &LatticeSpec, element_index: usize) -> Result<Element> {
    spec.validate()?;
    if element_index >= spec.element_count {
        return Err(GeometryError::Topology(format!(
            "element {element_index} requested from a column of {}",
            spec.element_count
        )));
    }
    let front = spec.row(element_index);
    let back = spec.row(element_index + 1);
    Ok(Element::from_rows(spec, element_index, &front, &back))
}

/// All boundary rows of one column, computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLattice {
    spec: LatticeSpec,
    rows: Vec<[Point3; 4]>,
}

impl ColumnLattice {
    /// Compute the `element_count + 1` boundary rows.
    pub fn new(spec: LatticeSpec) -> Result<Self> {
        spec.validate()?;
        let mut rows = Vec::with_capacity(spec.element_count + 1);
        for k in 0..=spec.element_count {
            rows.push(spec.row(k));
        }
        Ok(Self { spec, rows })
    }

    /// Lattice parameters.
    pub fn spec(&self) -> &LatticeSpec {
        &self.spec
    }

    /// Boundary rows.
    pub fn rows(&self) -> &[[Point3; 4]] {
        &self.rows
    }

    /// Number of lattice points, `4 * (element_count + 1)`.
    pub fn point_count(&self) -> usize {
        self.rows.len() * 4
    }

    /// Element `index`.
    ///
    /// # Errors
    ///
    /// [`GeometryError::Topology`] when `index >= element_count`; row
    /// `element_count` only closes the last element.
    pub fn element(&self, index: usize) -> Result<Element> {
        if index >= self.spec.element_count {
            return Err(GeometryError::Topology(format!(
                "element {index} requested from a column of {}",
                self.spec.element_count
            )));
        }
        Ok(Element::from_rows(
            &self.spec,
            index,
            &self.rows[index],
            &self.rows[index + 1],
        ))
    }

    /// Every element in order.
    pub fn elements(&self) -> Vec<Element> {
        (0..self.spec.element_count)
            .map(|i| Element::from_rows(&self.spec, i, &self.rows[i], &self.rows[i + 1]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::compute_arc_layout;
    use approx::assert_relative_eq;

    fn spec(count: usize) -> LatticeSpec {
        LatticeSpec {
            layout: compute_arc_layout(48.2, 19.2, count, 1).unwrap(),
            element_count: count,
            radius_outer: 48.2,
            radius_inner: 53.2,
            column_width: 19.2,
            offset: Vec3::new(1.0, 2.0, 3.0),
        }
    }

    #[test]
    fn test_face_template_covers_each_corner_three_times() {
        let mut uses = [0; 8];
        for face in Face::ALL {
            for i in face.corners() {
                uses[i] += 1;
            }
        }
        assert_eq!(uses, [3; 8]);
    }

    #[test]
    fn test_faces_select_expected_corners() {
        let e = build_element(&spec(3), 0).unwrap();
        for p in e.face_points(Face::Left) {
            assert_relative_eq!(p.y, 2.0);
        }
        for p in e.face_points(Face::Right) {
            assert_relative_eq!(p.y, 21.2);
        }
        for p in e.face_points(Face::Top) {
            let r = (p.x - 1.0).hypot(p.z - 3.0);
            assert_relative_eq!(r, 48.2, epsilon = 1e-9);
        }
        for p in e.face_points(Face::Under) {
            let r = (p.x - 1.0).hypot(p.z - 3.0);
            assert_relative_eq!(r, 53.2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_point_count() {
        let lattice = ColumnLattice::new(spec(4)).unwrap();
        assert_eq!(lattice.point_count(), 20);
        assert_eq!(lattice.elements().len(), 4);
    }

    #[test]
    fn test_neighbours_share_boundary() {
        let lattice = ColumnLattice::new(spec(4)).unwrap();
        let elements = lattice.elements();
        for pair in elements.windows(2) {
            let back = pair[0].face_points(Face::Back);
            let front = pair[1].face_points(Face::Front);
            // Back is [2,3,7,6], front is [0,4,5,1]: match by corner role.
            assert_eq!(back[0], front[0]);
            assert_eq!(back[1], front[3]);
            assert_eq!(back[2], front[2]);
            assert_eq!(back[3], front[1]);
        }
    }

    #[test]
    fn test_build_element_matches_lattice() {
        let s = spec(4);
        let lattice = ColumnLattice::new(s).unwrap();
        for i in 0..4 {
            assert_eq!(build_element(&s, i).unwrap(), lattice.element(i).unwrap());
        }
    }

    #[test]
    fn test_closing_row_is_not_an_element() {
        let lattice = ColumnLattice::new(spec(4)).unwrap();
        assert!(matches!(lattice.element(4), Err(GeometryError::Topology(_))));
        assert!(build_element(&spec(4), 4).is_err());
    }

    #[test]
    fn test_flags() {
        let elements = ColumnLattice::new(spec(3)).unwrap().elements();
        assert!(elements[0].is_first && !elements[0].is_last);
        assert!(!elements[1].is_first && !elements[1].is_last);
        assert!(elements[2].is_last);
    }

    #[test]
    fn test_outer_must_be_inside_inner() {
        let mut s = spec(2);
        s.radius_inner = s.radius_outer;
        assert!(matches!(
            ColumnLattice::new(s),
            Err(GeometryError::Configuration { .. })
        ));
    }

    #[test]
    fn test_home_element_straddles_bottom() {
        // Element home - 1 is centered straight below the curvature center.
        let s = spec(4);
        let e = build_element(&s, 0).unwrap();
        let front = e.corners[corner_index(0, 0, 0)];
        let back = e.corners[corner_index(0, 1, 0)];
        assert_relative_eq!(front.x - 1.0, -(back.x - 1.0), epsilon = 1e-9);
        assert!(front.z < 3.0 && back.z < 3.0);
    }
}
