//! Trackball socket: shell, top plate, a ring of ball transfer unit holes
//! and the optical sensor mount under the ball.

use pterosphera_kernel::SolidKernel;
use pterosphera_math::Transform;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result};
use crate::radial::{place_ring, ring_placements, MountPlacement};
use crate::socket::{build_socket, BtuDims, SensorMountDims, ShellDims, SocketKind};

/// Where the sensor sits under the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorPlacement {
    /// Gap between the ball and the top of the mount base.
    pub dist_from_ball: f64,
    /// Tilt of the mount about Y, in degrees.
    pub angle_y_deg: f64,
    /// Mount dimensions.
    pub mount: SensorMountDims,
}

impl Default for SensorPlacement {
    fn default() -> Self {
        Self {
            dist_from_ball: 1.6,
            angle_y_deg: -11.0,
            mount: SensorMountDims::default(),
        }
    }
}

impl SensorPlacement {
    /// Mount frame to socket frame for a ball of `ball_radius`.
    pub fn transform(&self, ball_radius: f64) -> Transform {
        Transform::rotation_y(self.angle_y_deg.to_radians()).then(&Transform::translation(
            0.0,
            0.0,
            -(ball_radius + self.dist_from_ball),
        ))
    }
}

/// Trackball socket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackballSocketSpec {
    /// Ball radius.
    pub trackball_radius: f64,
    /// Shell wall thickness.
    pub wall_thickness: f64,
    /// Gap between ball and shell.
    pub socket_clearance: f64,
    /// Height of the retaining top plate.
    pub top_plate_height: f64,
    /// Gap between ball and top plate at the plate's top edge.
    pub top_plate_clearance: f64,
    /// Number of ball transfer units.
    pub btu_count: usize,
    /// Height of the unit ring above the bottom of the ball.
    pub btu_offset_z: f64,
    /// Overall height of the unit hole dies.
    pub btu_peg_height: f64,
    /// Cut and add the sensor mount.
    pub with_sensor: bool,
    /// Ball center in the case frame.
    pub position: [f64; 3],
    /// Ball transfer unit dimensions.
    pub btu: BtuDims,
    /// Sensor placement.
    pub sensor: SensorPlacement,
}

impl Default for TrackballSocketSpec {
    fn default() -> Self {
        Self {
            trackball_radius: 17.0,
            wall_thickness: 3.5,
            socket_clearance: 2.0,
            top_plate_height: 5.0,
            top_plate_clearance: 0.6,
            btu_count: 3,
            btu_offset_z: 7.1,
            btu_peg_height: 20.0,
            with_sensor: true,
            position: [-20.0, -35.0, -25.0],
            btu: BtuDims::default(),
            sensor: SensorPlacement::default(),
        }
    }
}

impl TrackballSocketSpec {
    /// Shell and top plate dimensions.
    pub fn shell(&self) -> ShellDims {
        ShellDims {
            trackball_radius: self.trackball_radius,
            wall_thickness: self.wall_thickness,
            socket_clearance: self.socket_clearance,
            top_plate_height: self.top_plate_height,
            top_plate_clearance: self.top_plate_clearance,
        }
    }

    /// Placements of the ball transfer units.
    ///
    /// Units and their holes share one pivot height, the unit's overall height.
    pub fn btu_placements(&self) -> Result<Vec<MountPlacement>> {
        let (_, placements) = ring_placements(
            self.btu_count,
            self.trackball_radius,
            self.btu_offset_z,
            self.btu.total_height,
        )?;
        Ok(placements)
    }
}

/// What goes into a rendered socket besides the socket itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackballOptions {
    /// Add the ball, for previews.
    pub include_trackball: bool,
}

/// Build the trackball socket centered on the ball.
///
/// The shell and top plate are joined, the unit holes cut, then the sensor
/// opening cut and the mount added.
pub fn build_trackball_socket<K: SolidKernel>(
    kernel: &K,
    spec: &TrackballSocketSpec,
    options: TrackballOptions,
    weld_shift: f64,
) -> Result<K::Solid> {
    let shell = spec.shell();
    let body = kernel.union(vec![
        build_socket(kernel, &SocketKind::TrackballShell(shell), weld_shift)?,
        build_socket(kernel, &SocketKind::TopPlate(shell), weld_shift)?,
    ]);

    let peg_height = ensure_positive("trackball", "btu_peg_height", spec.btu_peg_height)?;
    let holes = place_ring(
        kernel,
        |k| {
            build_socket(
                k,
                &SocketKind::BtuHole {
                    btu: spec.btu,
                    height: peg_height,
                },
                weld_shift,
            )
        },
        spec.btu_count,
        spec.trackball_radius,
        spec.btu_offset_z,
        spec.btu.total_height,
    )?;
    let mut socket = kernel.difference(&body, &holes);

    if spec.with_sensor {
        let place = spec.sensor.transform(spec.trackball_radius);
        let mount = spec.sensor.mount;
        let die = build_socket(
            kernel,
            &SocketKind::SensorMount {
                mount,
                for_cut: true,
            },
            weld_shift,
        )?;
        let part = build_socket(
            kernel,
            &SocketKind::SensorMount {
                mount,
                for_cut: false,
            },
            weld_shift,
        )?;
        socket = kernel.difference(&socket, &kernel.transform(&die, &place)?);
        socket = kernel.union2(&socket, &kernel.transform(&part, &place)?);
    }

    if options.include_trackball {
        socket = kernel.union2(&socket, &kernel.sphere(spec.trackball_radius)?);
    }
    log::debug!(
        "trackball socket: r={} btus={} sensor={}",
        spec.trackball_radius,
        spec.btu_count,
        spec.with_sensor
    );
    Ok(socket)
}

/// The ball transfer units themselves, placed where their holes are cut.
pub fn build_btu_ring<K: SolidKernel>(
    kernel: &K,
    spec: &TrackballSocketSpec,
    weld_shift: f64,
) -> Result<K::Solid> {
    place_ring(
        kernel,
        |k| build_socket(k, &SocketKind::BtuPeg(spec.btu), weld_shift),
        spec.btu_count,
        spec.trackball_radius,
        spec.btu_offset_z,
        spec.btu.total_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pterosphera_kernel::SdfKernel;
    use pterosphera_math::{Point3, Vec3};

    const WELD: f64 = 0.05;

    fn no_sensor() -> TrackballSocketSpec {
        TrackballSocketSpec {
            with_sensor: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_btu_holes_are_cut() {
        let spec = no_sensor();
        let k = SdfKernel::new();
        let socket = build_trackball_socket(&k, &spec, TrackballOptions::default(), WELD).unwrap();

        let mid_wall = spec.trackball_radius + spec.socket_clearance + spec.wall_thickness / 2.0;
        for p in spec.btu_placements().unwrap() {
            // Unit axes run through the ball center.
            let toward_center = p.transform.apply_vec(&Vec3::z());
            let in_wall = Point3::origin() - toward_center * mid_wall;
            assert!(!socket.contains(&in_wall), "unit {} not cut", p.index);
        }
        // The bottom of the bowl lies between the holes.
        assert!(socket.contains(&Point3::new(0.0, 0.0, -mid_wall)));
    }

    #[test]
    fn test_include_trackball() {
        let spec = no_sensor();
        let k = SdfKernel::new();
        let bare = build_trackball_socket(&k, &spec, TrackballOptions::default(), WELD).unwrap();
        let with_ball = build_trackball_socket(
            &k,
            &spec,
            TrackballOptions {
                include_trackball: true,
            },
            WELD,
        )
        .unwrap();
        assert!(!bare.contains(&Point3::origin()));
        assert!(with_ball.contains(&Point3::origin()));
    }

    #[test]
    fn test_sensor_is_under_the_ball() {
        let spec = TrackballSocketSpec::default();
        let k = SdfKernel::new();
        let socket = build_trackball_socket(&k, &spec, TrackballOptions::default(), WELD).unwrap();
        let place = spec.sensor.transform(spec.trackball_radius);
        // Inside the base, clear of the lens opening.
        let in_base = place.apply_point(&Point3::new(
            0.0,
            spec.sensor.mount.base_height / 2.0 - 2.0,
            -spec.sensor.mount.base_depth / 2.0,
        ));
        assert!(in_base.z < -spec.trackball_radius);
        assert!(socket.contains(&in_base));
    }

    #[test]
    fn test_ring_errors_are_reported() {
        let spec = TrackballSocketSpec {
            btu_count: 0,
            ..no_sensor()
        };
        let k = SdfKernel::new();
        assert!(build_trackball_socket(&k, &spec, TrackballOptions::default(), WELD).is_err());

        let spec = TrackballSocketSpec {
            btu_offset_z: 40.0,
            ..no_sensor()
        };
        assert!(build_btu_ring(&k, &spec, WELD).is_err());
    }

    #[test]
    fn test_btu_ring_units() {
        let spec = no_sensor();
        let k = SdfKernel::new();
        let units = build_btu_ring(&k, &spec, WELD).unwrap();
        for p in spec.btu_placements().unwrap() {
            let toward_center = p.transform.apply_vec(&Vec3::z());
            let below_surface = Point3::origin() - toward_center * (spec.trackball_radius + 0.5);
            assert!(units.contains(&below_surface), "unit {} missing", p.index);
        }
    }
}
