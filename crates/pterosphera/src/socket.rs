//! Primitive compositions: switch sockets, the trackball shell and top
//! plate, ball transfer units and the sensor mount.
//!
//! Every shape is built centered on the Z axis. Wherever two primitives
//! meet at a face, the subtractive or joining side is pushed past it by the
//! weld shift.

use pterosphera_kernel::SolidKernel;
use pterosphera_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, GeometryError, Result};

/// MX switch socket dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchSocketDims {
    /// Width and height of the square switch opening.
    pub socket_size: f64,
    /// Width of the relief cut for the switch opening tabs.
    pub side_tab_width: f64,
    /// Distance from the opening edge to the tab relief.
    pub side_tabs_dist: f64,
    /// Total depth, top plate included.
    pub socket_depth: f64,
    /// Thickness of the plate the switch clips into.
    pub top_plate_depth: f64,
    /// Width of the clip recess.
    pub clip_hole_width: f64,
    /// Height of the clip recess.
    pub clip_hole_height: f64,
    /// How far the clip recess reaches past the opening.
    pub clip_hole_depth: f64,
    /// Wall around a standalone socket block.
    pub rim_width: f64,
}

impl Default for SwitchSocketDims {
    fn default() -> Self {
        Self {
            socket_size: 13.9,
            side_tab_width: 5.8,
            side_tabs_dist: 1.0,
            socket_depth: 5.0,
            top_plate_depth: 1.4,
            clip_hole_width: 5.0,
            clip_hole_height: 2.5,
            clip_hole_depth: 1.2,
            rim_width: 2.0,
        }
    }
}

impl SwitchSocketDims {
    /// Depth below the top plate.
    fn body_depth(&self) -> f64 {
        self.socket_depth - self.top_plate_depth
    }

    /// Height of the top plate surface in the hole's own frame.
    pub fn hole_top(&self) -> f64 {
        self.body_depth() / 2.0 + self.top_plate_depth
    }

    /// Width of the hole across the opening tabs.
    fn tab_span(&self) -> f64 {
        self.socket_size + self.side_tabs_dist * 2.0
    }
}

/// Ball transfer unit dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BtuDims {
    /// Stem radius.
    pub base_radius: f64,
    /// Stem height.
    pub base_height: f64,
    /// Head (flange) radius.
    pub head_radius: f64,
    /// Head height.
    pub head_height: f64,
    /// Radius of the rolling ball.
    pub ball_radius: f64,
    /// Overall height, ball included.
    pub total_height: f64,
}

impl Default for BtuDims {
    fn default() -> Self {
        Self {
            base_radius: 12.7 / 2.0,
            base_height: 6.8,
            head_radius: 14.5 / 2.0,
            head_height: 1.0,
            ball_radius: 8.4 / 2.0,
            total_height: 10.4,
        }
    }
}

/// Optical sensor mount dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorMountDims {
    /// Distance between the two screw centers.
    pub screw_dist: f64,
    /// Screw hole radius at the top.
    pub screw_radius_top: f64,
    /// Screw hole radius at the bottom.
    pub screw_radius_bottom: f64,
    /// Wall thickness around the screw holes.
    pub screw_margin: f64,
    /// Screw hole depth.
    pub screw_depth: f64,
    /// Length of the base plate.
    pub base_height: f64,
    /// Thickness of the base plate.
    pub base_depth: f64,
    /// Room cut below the plate for the sensor board.
    pub sensor_clearance: f64,
    /// Radius of the lens opening.
    pub lens_hole_radius: f64,
}

impl Default for SensorMountDims {
    fn default() -> Self {
        Self {
            screw_dist: 24.0,
            screw_radius_top: 3.1 / 2.0,
            screw_radius_bottom: 2.8 / 2.0,
            screw_margin: 1.1,
            screw_depth: 3.7,
            base_height: 21.0,
            base_depth: 1.5,
            sensor_clearance: 10.0,
            lens_hole_radius: 4.5,
        }
    }
}

/// Trackball socket shell dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellDims {
    /// Trackball radius.
    pub trackball_radius: f64,
    /// Shell wall thickness.
    pub wall_thickness: f64,
    /// Gap between ball and shell.
    pub socket_clearance: f64,
    /// Height of the retaining top plate.
    pub top_plate_height: f64,
    /// Gap between ball and top plate at the plate's top edge.
    pub top_plate_clearance: f64,
}

impl ShellDims {
    /// Outer radius of the shell and top plate.
    pub fn outer_radius(&self) -> f64 {
        self.trackball_radius + self.wall_thickness + self.socket_clearance
    }
}

/// A socket shape and its dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SocketKind {
    /// Printable block holding one switch.
    SwitchSocket(SwitchSocketDims),
    /// Cutting die for a switch opening.
    SwitchHole(SwitchSocketDims),
    /// Lower hemisphere cradling the trackball.
    TrackballShell(ShellDims),
    /// Ring on top of the shell that keeps the ball in.
    TopPlate(ShellDims),
    /// A ball transfer unit: stem, head and ball.
    BtuPeg(BtuDims),
    /// Cutting die for a ball transfer unit, `height` overall.
    BtuHole {
        /// Unit dimensions.
        btu: BtuDims,
        /// Overall die height.
        height: f64,
    },
    /// Sensor mount, or its cutting die when `for_cut` is set.
    SensorMount {
        /// Mount dimensions.
        mount: SensorMountDims,
        /// Build the die instead of the part.
        for_cut: bool,
    },
}

impl SocketKind {
    /// Short name used in error locations.
    pub fn name(&self) -> &'static str {
        match self {
            SocketKind::SwitchSocket(_) => "switch socket",
            SocketKind::SwitchHole(_) => "switch hole",
            SocketKind::TrackballShell(_) => "trackball shell",
            SocketKind::TopPlate(_) => "top plate",
            SocketKind::BtuPeg(_) => "btu",
            SocketKind::BtuHole { .. } => "btu hole",
            SocketKind::SensorMount { .. } => "sensor mount",
        }
    }
}

/// Build the solid for `kind`.
///
/// # Errors
///
/// [`GeometryError::Configuration`] for dimensions that leave no material
/// (for example a tab relief wider than the opening), or a negative weld
/// shift; kernel errors are passed through.
pub fn build_socket<K: SolidKernel>(
    kernel: &K,
    kind: &SocketKind,
    weld_shift: f64,
) -> Result<K::Solid> {
    if !weld_shift.is_finite() || weld_shift < 0.0 {
        return Err(GeometryError::config(
            kind.name(),
            format!("weld_shift must be non-negative, got {weld_shift}"),
        ));
    }
    match kind {
        SocketKind::SwitchSocket(dims) => switch_socket(kernel, dims, weld_shift),
        SocketKind::SwitchHole(dims) => switch_hole(kernel, dims, weld_shift),
        SocketKind::TrackballShell(dims) => trackball_shell(kernel, dims, weld_shift),
        SocketKind::TopPlate(dims) => top_plate(kernel, dims, weld_shift),
        SocketKind::BtuPeg(btu) => btu_unit(kernel, btu, weld_shift),
        SocketKind::BtuHole { btu, height } => btu_hole(kernel, btu, *height, weld_shift),
        SocketKind::SensorMount { mount, for_cut } => {
            sensor_mount(kernel, mount, *for_cut, weld_shift)
        }
    }
    .map_err(|e| e.within(kind.name()))
}

// =============================================================================
// Switches
// =============================================================================

fn switch_hole<K: SolidKernel>(k: &K, d: &SwitchSocketDims, weld: f64) -> Result<K::Solid> {
    let body_d = ensure_positive("switch", "socket_depth - top_plate_depth", d.body_depth())?;
    let tab_w = ensure_positive(
        "switch",
        "tab relief width",
        (d.socket_size - d.side_tabs_dist * 2.0 - d.side_tab_width) / 2.0,
    )?;
    let span = d.tab_span();

    // Body, open downward past its floor.
    let body = k.cuboid(Vec3::new(d.socket_size, span, body_d + weld))?;
    let body = k.translate(&body, 0.0, 0.0, -weld / 2.0)?;

    let plate_h = d.top_plate_depth + weld;
    let plate_z = body_d / 2.0 + d.top_plate_depth / 2.0;
    let plate = k.cuboid(Vec3::new(d.socket_size, d.socket_size, plate_h))?;
    let plate = k.translate(&plate, 0.0, 0.0, plate_z)?;

    let clip = k.cuboid(Vec3::new(
        d.socket_size + d.clip_hole_depth,
        d.clip_hole_width,
        d.clip_hole_height,
    ))?;
    let clip = k.translate(&clip, 0.0, 0.0, body_d / 2.0 - d.clip_hole_height / 2.0)?;

    let tab = k.cuboid(Vec3::new(tab_w, span, plate_h))?;
    let tab_x = (d.socket_size / 2.0 - d.side_tabs_dist) - tab_w / 2.0;
    let tab_a = k.translate(&tab, tab_x, 0.0, plate_z)?;
    let tab_b = k.translate(&tab, -tab_x, 0.0, plate_z)?;

    Ok(k.union(vec![body, plate, clip, tab_a, tab_b]))
}

fn switch_socket<K: SolidKernel>(k: &K, d: &SwitchSocketDims, weld: f64) -> Result<K::Solid> {
    let rim = ensure_positive("switch", "rim_width", d.rim_width)?;
    let hole = switch_hole(k, d, weld)?;
    let block = k.cuboid(Vec3::new(
        d.socket_size + d.clip_hole_depth + rim * 2.0,
        d.tab_span() + rim * 2.0,
        d.socket_depth,
    ))?;
    // Top flush with the plate surface, floor flush with the body floor.
    let block = k.translate(&block, 0.0, 0.0, d.top_plate_depth / 2.0)?;
    Ok(k.difference(&block, &hole))
}

// =============================================================================
// Trackball socket
// =============================================================================

fn trackball_shell<K: SolidKernel>(k: &K, d: &ShellDims, weld: f64) -> Result<K::Solid> {
    let r = ensure_positive("shell", "outer radius", d.outer_radius())?;
    let inner = ensure_positive(
        "shell",
        "inner radius",
        d.trackball_radius + d.socket_clearance,
    )?;
    if inner >= r {
        return Err(GeometryError::config("shell", "wall_thickness must be positive"));
    }

    let outer = k.sphere(r)?;
    let cut = k.cuboid(Vec3::new(2.0 * (r + weld), 2.0 * (r + weld), r + weld))?;
    let cut = k.translate(&cut, 0.0, 0.0, (r + weld) / 2.0)?;
    let bowl = k.difference(&outer, &cut);
    Ok(k.difference(&bowl, &k.sphere(inner)?))
}

fn top_plate<K: SolidKernel>(k: &K, d: &ShellDims, weld: f64) -> Result<K::Solid> {
    let h = ensure_positive("top plate", "top_plate_height", d.top_plate_height)?;
    let ball = ensure_positive("top plate", "trackball_radius", d.trackball_radius)?;
    if h >= ball {
        return Err(GeometryError::config(
            "top plate",
            format!("top_plate_height {h} must be less than trackball_radius {ball}"),
        ));
    }

    let plate = k.cylinder(h, d.outer_radius())?;

    // Opening follows the ball: wide at the bottom, just clearing it at the top.
    let bottom_r = ball + d.socket_clearance;
    let top_r = (ball * ball - h * h).sqrt() + d.top_plate_clearance;
    let slope = (top_r - bottom_r) / h;
    let opening = k.cone(h + 2.0 * weld, bottom_r - slope * weld, top_r + slope * weld)?;

    let ring = k.difference(&plate, &opening);
    Ok(k.translate(&ring, 0.0, 0.0, h / 2.0 - weld)?)
}

// =============================================================================
// Ball transfer units
// =============================================================================

fn btu_unit<K: SolidKernel>(k: &K, b: &BtuDims, weld: f64) -> Result<K::Solid> {
    let base = k.cylinder(b.base_height, b.base_radius)?;

    let head = k.cylinder(b.head_height, b.head_radius)?;
    let head = k.translate(&head, 0.0, 0.0, (b.base_height + b.head_height) / 2.0 - weld)?;

    let ball_z = b.total_height - ((b.base_height + b.head_height) / 2.0 + b.ball_radius);
    let ball = k.translate(&k.sphere(b.ball_radius)?, 0.0, 0.0, ball_z)?;

    Ok(k.union(vec![base, head, ball]))
}

fn btu_hole<K: SolidKernel>(k: &K, b: &BtuDims, height: f64, weld: f64) -> Result<K::Solid> {
    if height <= b.base_height {
        return Err(GeometryError::config(
            "btu hole",
            format!("height {height} must exceed base_height {}", b.base_height),
        ));
    }
    let base = k.cylinder(b.base_height, b.base_radius + weld)?;

    // Fixed stem, head stretched to the requested height.
    let head_h = height - b.base_height + weld;
    let head = k.cylinder(head_h, b.head_radius + weld)?;
    let head = k.translate(&head, 0.0, 0.0, (b.base_height + head_h) / 2.0 - weld)?;

    Ok(k.union(vec![base, head]))
}

// =============================================================================
// Sensor mount
// =============================================================================

fn sensor_mount<K: SolidKernel>(
    k: &K,
    m: &SensorMountDims,
    for_cut: bool,
    weld: f64,
) -> Result<K::Solid> {
    let screw_x = m.screw_dist / 2.0;

    let mut width = m.screw_dist + (m.screw_radius_top + m.screw_margin) * 4.0;
    let mut depth = m.base_depth;
    if for_cut {
        width -= weld;
        depth += m.sensor_clearance;
    }
    let base = k.cuboid(Vec3::new(width, m.base_height, depth))?;
    let base = k.translate(&base, 0.0, 0.0, -depth / 2.0)?;

    let wall_h = m.screw_depth + m.screw_margin;
    let wall = k.cylinder(wall_h, m.screw_radius_top + m.screw_margin)?;
    let wall_z = (wall_h - m.base_depth) / 2.0;
    let walls = k.union(vec![
        k.translate(&wall, -screw_x, 0.0, wall_z)?,
        k.translate(&wall, screw_x, 0.0, wall_z)?,
    ]);
    let body = k.union2(&base, &walls);

    let lens = k.cylinder(m.base_depth * 4.0, m.lens_hole_radius)?;
    if for_cut {
        return Ok(k.union2(&body, &lens));
    }

    let screw = k.cone(m.screw_depth + weld, m.screw_radius_bottom, m.screw_radius_top)?;
    let holes = k.union(vec![
        k.translate(&screw, -screw_x, 0.0, 0.0)?,
        k.translate(&screw, screw_x, 0.0, 0.0)?,
        lens,
    ]);
    Ok(k.difference(&body, &holes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pterosphera_kernel::SdfKernel;
    use pterosphera_math::Point3;

    const WELD: f64 = 0.05;

    fn shell() -> ShellDims {
        ShellDims {
            trackball_radius: 17.0,
            wall_thickness: 3.5,
            socket_clearance: 2.0,
            top_plate_height: 5.0,
            top_plate_clearance: 0.6,
        }
    }

    #[test]
    fn test_switch_hole_extent() {
        let k = SdfKernel::new();
        let d = SwitchSocketDims::default();
        let hole = build_socket(&k, &SocketKind::SwitchHole(d), WELD).unwrap();
        let b = hole.bounds().unwrap();
        assert!((b.max.z - (d.hole_top() + WELD / 2.0)).abs() < 1e-9);
        assert!((b.min.z + (d.body_depth() / 2.0 + WELD)).abs() < 1e-9);
        // Clip recess reaches past the opening along X.
        assert!((b.max.x - (13.9 + 1.2) / 2.0).abs() < 1e-9);
        assert!((b.max.y - 15.9 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_switch_socket_is_open_through() {
        let k = SdfKernel::new();
        let d = SwitchSocketDims::default();
        let socket = build_socket(&k, &SocketKind::SwitchSocket(d), WELD).unwrap();
        assert!(!socket.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!socket.contains(&Point3::new(0.0, 0.0, d.hole_top() - 0.01)));
        // Rim material beside the opening.
        assert!(socket.contains(&Point3::new(0.0, 15.9 / 2.0 + 1.0, 0.0)));
    }

    #[test]
    fn test_tab_relief_wider_than_opening() {
        let k = SdfKernel::new();
        let d = SwitchSocketDims {
            side_tab_width: 20.0,
            ..Default::default()
        };
        let err = build_socket(&k, &SocketKind::SwitchHole(d), WELD).unwrap_err();
        assert!(matches!(err, GeometryError::Configuration { .. }));
    }

    #[test]
    fn test_shell_is_lower_bowl() {
        let k = SdfKernel::new();
        let s = build_socket(&k, &SocketKind::TrackballShell(shell()), WELD).unwrap();
        assert!(s.contains(&Point3::new(0.0, 0.0, -21.0)));
        assert!(!s.contains(&Point3::new(0.0, 0.0, -18.0)));
        assert!(!s.contains(&Point3::new(21.0, 0.0, 0.5)));
    }

    #[test]
    fn test_top_plate_clears_ball() {
        let k = SdfKernel::new();
        let d = shell();
        let plate = build_socket(&k, &SocketKind::TopPlate(d), WELD).unwrap();
        let b = plate.bounds().unwrap();
        assert!((b.min.z + WELD).abs() < 1e-9);
        assert!((b.max.z - (5.0 - WELD)).abs() < 1e-9);
        // Ring material outside the opening, none inside it.
        assert!(plate.contains(&Point3::new(21.5, 0.0, 2.0)));
        assert!(!plate.contains(&Point3::new(15.0, 0.0, 2.0)));
    }

    #[test]
    fn test_top_plate_taller_than_ball() {
        let k = SdfKernel::new();
        let d = ShellDims {
            top_plate_height: 20.0,
            ..shell()
        };
        assert!(build_socket(&k, &SocketKind::TopPlate(d), WELD).is_err());
    }

    #[test]
    fn test_btu_ball_on_top() {
        let k = SdfKernel::new();
        let btu = BtuDims::default();
        let unit = build_socket(&k, &SocketKind::BtuPeg(btu), WELD).unwrap();
        let top = unit.bounds().unwrap().max.z;
        // Ball top sits at total height above the stem's mid-plane minus half stem/head.
        let expected = btu.total_height - (btu.base_height + btu.head_height) / 2.0;
        assert!((top - expected).abs() < 1e-9);
    }

    #[test]
    fn test_btu_hole_height() {
        let k = SdfKernel::new();
        let btu = BtuDims::default();
        let die = build_socket(&k, &SocketKind::BtuHole { btu, height: 20.0 }, WELD).unwrap();
        let b = die.bounds().unwrap();
        assert!((b.min.z + btu.base_height / 2.0).abs() < 1e-9);
        assert!((b.max.z - (20.0 - btu.base_height / 2.0)).abs() < 1e-9);
        assert!((b.max.x - (btu.head_radius + WELD)).abs() < 1e-9);
        assert!(build_socket(&k, &SocketKind::BtuHole { btu, height: 5.0 }, WELD).is_err());
    }

    #[test]
    fn test_sensor_mount_and_die() {
        let k = SdfKernel::new();
        let mount = SensorMountDims::default();
        let part = build_socket(&k, &SocketKind::SensorMount { mount, for_cut: false }, WELD)
            .unwrap();
        // Lens opening through the plate, plate material beside it.
        assert!(!part.contains(&Point3::new(0.0, 0.0, -0.75)));
        assert!(part.contains(&Point3::new(0.0, 7.0, -0.75)));
        // Screw hole through the wall.
        assert!(!part.contains(&Point3::new(12.0, 0.0, 0.0)));

        let die = build_socket(&k, &SocketKind::SensorMount { mount, for_cut: true }, WELD)
            .unwrap();
        assert!(die.contains(&Point3::new(0.0, 0.0, -0.75)));
        assert!(die.contains(&Point3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_negative_weld_shift() {
        let k = SdfKernel::new();
        let kind = SocketKind::BtuPeg(BtuDims::default());
        assert!(build_socket(&k, &kind, -0.1).is_err());
    }
}
