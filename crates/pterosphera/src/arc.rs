//! Angular layout of elements along a curved column.
//!
//! Elements are spaced by a fixed angular pitch at a constant radius, so
//! consecutive faces stay close to parallel and the column reads as one
//! smooth shell. The radius acts as the finger's virtual knuckle distance.

use std::f64::consts::FRAC_PI_2;

use serde::Serialize;

use crate::error::{ensure_positive, GeometryError, Result};

/// Angular pitch and rotation of a column's arc, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcLayout {
    /// Angle subtended by one element.
    pub step_angle: f64,
    /// Rotation applied to the whole arc.
    pub angle_offset: f64,
}

impl ArcLayout {
    /// Angle of boundary row `k`: `-step_angle * k - angle_offset`.
    pub fn angle_at(&self, k: usize) -> f64 {
        -self.step_angle * k as f64 - self.angle_offset
    }

    /// Angle halfway between rows `k` and `k + 1`.
    pub fn mid_angle(&self, k: usize) -> f64 {
        -self.step_angle * (k as f64 + 0.5) - self.angle_offset
    }

    /// Total angle covered by `count` elements.
    pub fn sweep(&self, count: usize) -> f64 {
        self.step_angle * count as f64
    }

    /// Step angle in degrees.
    pub fn step_angle_deg(&self) -> f64 {
        self.step_angle.to_degrees()
    }

    /// Angle offset in degrees.
    pub fn angle_offset_deg(&self) -> f64 {
        self.angle_offset.to_degrees()
    }
}

/// Compute the arc layout for a column.
///
/// `step_angle = asin(element_height / curvature_radius)` and
/// `angle_offset = 90° - (home_row_index - 0.5) * step_angle`.
///
/// With these formulas `mid_angle(k) = -90° + (home_row_index - 1 - k) * step_angle`,
/// so the element centered straight below the curvature center is
/// `home_row_index - 1`, not `home_row_index`. For `home_row_index == 0` no
/// element is centered there; element 0 sits one step past it.
///
/// # Errors
///
/// [`GeometryError::Configuration`] for non-positive dimensions, a zero
/// element count, a home row outside `0..element_count`, or an element
/// taller than the curvature radius.
pub fn compute_arc_layout(
    curvature_radius: f64,
    element_height: f64,
    element_count: usize,
    home_row_index: usize,
) -> Result<ArcLayout> {
    const LOCATION: &str = "arc layout";
    let radius = ensure_positive(LOCATION, "curvature_radius", curvature_radius)?;
    let height = ensure_positive(LOCATION, "element_height", element_height)?;
    if element_count == 0 {
        return Err(GeometryError::config(LOCATION, "element_count must be at least 1"));
    }
    if home_row_index >= element_count {
        return Err(GeometryError::config(
            LOCATION,
            format!("home_row_index {home_row_index} outside 0..{element_count}"),
        ));
    }
    if height > radius {
        return Err(GeometryError::config(
            LOCATION,
            format!("element_height {height} exceeds curvature_radius {radius}"),
        ));
    }

    let step_angle = (height / radius).asin();
    let angle_offset = FRAC_PI_2 - (home_row_index as f64 - 0.5) * step_angle;
    Ok(ArcLayout {
        step_angle,
        angle_offset,
    })
}
