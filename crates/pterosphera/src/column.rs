//! Column assembly: element volumes, bridges welding a column to its
//! neighbour, and bezel strips along the outer edges of the dish.
//!
//! Planning is pure and produces point sets only; [`assemble_column`]
//! hands those to the kernel as hulls.

use pterosphera_kernel::SolidKernel;
use pterosphera_math::{Point3, Vec3};
use serde::Serialize;

use crate::arc::ArcLayout;
use crate::config::CaseSettings;
use crate::error::{ensure_positive, GeometryError, Result};
use crate::hand::HandSide;
use crate::lattice::{ColumnLattice, Element, Face, LatticeSpec};

/// Everything needed to build one column. Created by
/// [`layout_hand`](crate::hand::layout_hand), never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    /// Index of the finger in the hand as configured.
    pub finger_index: usize,
    /// Finger name.
    pub finger_name: String,
    /// Column index within the finger.
    pub column_index: usize,
    /// First column of its finger.
    pub finger_first: bool,
    /// Last column of its finger.
    pub finger_last: bool,
    /// First column of the dish.
    pub dish_first: bool,
    /// Last column of the dish.
    pub dish_last: bool,
    /// Hand the column belongs to.
    pub side: HandSide,
    /// Lateral width.
    pub column_width: f64,
    /// Curvature center.
    pub offset: [f64; 3],
    /// Arc layout shared by the finger's columns.
    pub layout: ArcLayout,
    /// Number of switches.
    pub switch_count: usize,
    /// Arc length of one switch.
    pub switch_height: f64,
    /// Home row, 0-based.
    pub home_row_index: usize,
    /// Radius of the top surface.
    pub curvature_radius: f64,
}

impl ColumnSpec {
    /// Curvature center as a vector.
    pub fn offset_vec(&self) -> Vec3 {
        Vec3::from(self.offset)
    }

    /// Error location naming finger and column.
    pub fn location(&self) -> String {
        format!(
            "finger {} ({}) column {}",
            self.finger_name, self.finger_index, self.column_index
        )
    }

    fn validate(&self) -> Result<()> {
        let location = self.location();
        ensure_positive(&location, "column_width", self.column_width)?;
        ensure_positive(&location, "curvature_radius", self.curvature_radius)?;
        ensure_positive(&location, "switch_height", self.switch_height)?;
        if self.switch_count == 0 {
            return Err(GeometryError::config(location, "switch_count must be at least 1"));
        }
        Ok(())
    }

    /// Lattice of this column: top surface on the curvature radius, socket
    /// floor `plate_thickness` further out.
    pub fn lattice(&self, settings: &CaseSettings) -> Result<ColumnLattice> {
        self.validate()?;
        let location = self.location();
        let thickness = ensure_positive(&location, "plate_thickness", settings.plate_thickness)?;
        ColumnLattice::new(LatticeSpec {
            layout: self.layout,
            element_count: self.switch_count,
            radius_outer: self.curvature_radius,
            radius_inner: self.curvature_radius + thickness,
            column_width: self.column_width,
            offset: self.offset_vec(),
        })
        .map_err(|e| e.within(&location))
    }
}

/// Hull joining one element of a column to one element of its neighbour.
#[derive(Debug, Clone, PartialEq)]
pub struct Bridge {
    /// Bridge slot, `0..max(M, K)`.
    pub slot: usize,
    /// Element of this column (clamped).
    pub element: usize,
    /// Element of the adjacent column (clamped).
    pub adjacent_element: usize,
    /// Right face of `element` then left face of `adjacent_element`.
    pub points: [Point3; 8],
}

/// Hull finishing the outer edge of the dish along one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Bezel {
    /// Edge of the column the strip runs along.
    pub face: Face,
    /// Element index.
    pub element: usize,
    /// Face points then the same points moved outward.
    pub points: [Point3; 8],
}

/// Pure description of a column's volumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    /// One per switch.
    pub elements: Vec<Element>,
    /// Welds to the adjacent column.
    pub bridges: Vec<Bridge>,
    /// Dish edge strips.
    pub bezels: Vec<Bezel>,
    /// Largest inner radius plus floor clearance and thickness.
    pub deepest_point: f64,
}

impl ColumnPlan {
    /// Every hull point set in the plan.
    pub fn hulls(&self) -> impl Iterator<Item = &[Point3; 8]> + '_ {
        self.elements
            .iter()
            .map(|e| &e.corners)
            .chain(self.bridges.iter().map(|b| &b.points))
            .chain(self.bezels.iter().map(|b| &b.points))
    }
}

fn shifted(points: [Point3; 4], dy: f64) -> [Point3; 4] {
    points.map(|p| p + Vec3::new(0.0, dy, 0.0))
}

fn join(a: [Point3; 4], b: [Point3; 4]) -> [Point3; 8] {
    [a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3]]
}

/// Plan the volumes of `spec`, welded to `adjacent` when given.
///
/// Columns weld unless `spec` is the last column of the dish. Bridge `s`
/// joins element `min(s, M - 1)` of this column to element `min(s, K - 1)`
/// of the neighbour, so a shorter column repeats its last face instead of
/// indexing past its end.
pub fn plan_column(
    spec: &ColumnSpec,
    adjacent: Option<&ColumnSpec>,
    settings: &CaseSettings,
) -> Result<ColumnPlan> {
    let lattice = spec.lattice(settings)?;
    let elements = lattice.elements();
    let margin = settings.bridge_margin;

    let mut bridges = Vec::new();
    if let Some(adjacent) = adjacent.filter(|_| !spec.dish_last) {
        let neighbour = adjacent.lattice(settings)?.elements();
        let (m, k) = (elements.len(), neighbour.len());
        if m == 0 || k == 0 {
            return Err(GeometryError::Topology(format!(
                "cannot weld {} ({m} elements) to {} ({k} elements)",
                spec.location(),
                adjacent.location()
            )));
        }
        let slots = m.max(k);
        bridges.reserve(slots);
        for slot in 0..slots {
            let (i, j) = (slot.min(m - 1), slot.min(k - 1));
            let right = shifted(elements[i].face_points(Face::Right), -margin);
            let left = shifted(neighbour[j].face_points(Face::Left), margin);
            bridges.push(Bridge {
                slot,
                element: i,
                adjacent_element: j,
                points: join(right, left),
            });
        }
    }

    let mut bezels = Vec::new();
    let edges = [
        (spec.dish_first, Face::Left, -1.0),
        (spec.dish_last, Face::Right, 1.0),
    ];
    for (enabled, face, outward) in edges {
        if !enabled || settings.bezel_width <= 0.0 {
            continue;
        }
        for e in &elements {
            let inner = shifted(e.face_points(face), -outward * margin);
            let outer = shifted(e.face_points(face), outward * settings.bezel_width);
            bezels.push(Bezel {
                face,
                element: e.index,
                points: join(inner, outer),
            });
        }
    }

    let deepest_point = elements
        .iter()
        .map(|e| e.radius_inner)
        .fold(f64::NEG_INFINITY, f64::max)
        + settings.floor_clearance
        + settings.floor_thickness;

    Ok(ColumnPlan {
        elements,
        bridges,
        bezels,
        deepest_point,
    })
}

/// Realize a plan as the union of its hulls.
pub fn realize_plan<K: SolidKernel>(kernel: &K, plan: &ColumnPlan) -> Result<K::Solid> {
    let hulls = plan
        .hulls()
        .map(|points| kernel.hull_of_points(points))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(kernel.union(hulls))
}

/// Build the solid of one column, welded to `adjacent` when given.
pub fn assemble_column<K: SolidKernel>(
    kernel: &K,
    spec: &ColumnSpec,
    adjacent: Option<&ColumnSpec>,
    settings: &CaseSettings,
) -> Result<K::Solid> {
    let plan = plan_column(spec, adjacent, settings)?;
    log::debug!(
        "{}: {} elements, {} bridges, {} bezels",
        spec.location(),
        plan.elements.len(),
        plan.bridges.len(),
        plan.bezels.len()
    );
    realize_plan(kernel, &plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{layout_hand, FingerSpec, HandSpec};
    use pterosphera_kernel::SdfKernel;

    fn two_columns(m: usize, k: usize) -> Vec<ColumnSpec> {
        let hand = HandSpec {
            side: HandSide::Left,
            fingers: vec![
                FingerSpec::new("a", 0.0, 48.2, 1, m),
                FingerSpec::new("b", 0.0, 52.0, 1, k),
            ],
        };
        layout_hand(&hand, &CaseSettings::default()).unwrap()
    }

    #[test]
    fn test_bridge_count_is_max() {
        let columns = two_columns(4, 3);
        let plan = plan_column(&columns[0], Some(&columns[1]), &CaseSettings::default()).unwrap();
        assert_eq!(plan.bridges.len(), 4);
        let last = &plan.bridges[3];
        assert_eq!((last.element, last.adjacent_element), (3, 2));
    }

    #[test]
    fn test_equal_counts_do_not_clamp() {
        let columns = two_columns(3, 3);
        let plan = plan_column(&columns[0], Some(&columns[1]), &CaseSettings::default()).unwrap();
        for (i, b) in plan.bridges.iter().enumerate() {
            assert_eq!((b.element, b.adjacent_element), (i, i));
        }
    }

    #[test]
    fn test_bridge_overlaps_both_columns() {
        let settings = CaseSettings::default();
        let columns = two_columns(3, 3);
        let plan = plan_column(&columns[0], Some(&columns[1]), &settings).unwrap();
        let seam = settings.column_width;
        for b in &plan.bridges {
            for p in &b.points[..4] {
                assert!((p.y - (seam - settings.bridge_margin)).abs() < 1e-12);
            }
            for p in &b.points[4..] {
                assert!((p.y - (seam + settings.bridge_margin)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_last_column_does_not_weld() {
        let columns = two_columns(3, 3);
        let plan = plan_column(&columns[1], Some(&columns[0]), &CaseSettings::default()).unwrap();
        assert!(plan.bridges.is_empty());
    }

    #[test]
    fn test_bezels_on_dish_edges() {
        let settings = CaseSettings::default();
        let columns = two_columns(4, 3);
        let first = plan_column(&columns[0], None, &settings).unwrap();
        assert_eq!(first.bezels.len(), 4);
        assert!(first.bezels.iter().all(|b| b.face == Face::Left));
        let min_y = first.bezels[0].points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!((min_y + settings.bezel_width).abs() < 1e-12);

        let last = plan_column(&columns[1], None, &settings).unwrap();
        assert_eq!(last.bezels.len(), 3);
        assert!(last.bezels.iter().all(|b| b.face == Face::Right));
    }

    #[test]
    fn test_deepest_point() {
        let settings = CaseSettings::default();
        let columns = two_columns(3, 3);
        let plan = plan_column(&columns[0], None, &settings).unwrap();
        let expected = 48.2
            + settings.plate_thickness
            + settings.floor_clearance
            + settings.floor_thickness;
        assert!((plan.deepest_point - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_width_names_column() {
        let mut columns = two_columns(3, 3);
        columns[1].column_width = 0.0;
        let err = plan_column(&columns[1], None, &CaseSettings::default()).unwrap_err();
        assert!(err.to_string().contains("finger b (1) column 0"));
    }

    #[test]
    fn test_assemble_column_solid() {
        let settings = CaseSettings::default();
        let columns = two_columns(3, 3);
        let k = SdfKernel::new();
        let solid = assemble_column(&k, &columns[0], Some(&columns[1]), &settings).unwrap();
        // Middle of home-1 element, halfway through the plate, straight below the center.
        let mid = pterosphera_math::Point3::new(
            0.0,
            settings.column_width / 2.0,
            -(48.2 + settings.plate_thickness / 2.0),
        );
        assert!(solid.contains(&mid));
        assert!(!solid.contains(&pterosphera_math::Point3::origin()));
    }
}
