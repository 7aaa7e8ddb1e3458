//! Rings of mounts around a sphere, each aimed at its center.
//!
//! Used for the ball transfer units cradling the trackball and for the
//! dies that cut their holes. A mount is authored pointing up (+Z); the
//! tilt that aims it at the center follows from the right triangle formed
//! by the ring radius and the depth of the ring below the center.

use std::f64::consts::TAU;

use pterosphera_kernel::SolidKernel;
use pterosphera_math::{Point3, Transform};

use crate::error::{ensure_positive, GeometryError, Result};

/// Cross-section of a sphere at a depth below its top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Chord radius of the cross-section.
    pub ring_radius: f64,
    /// Tilt from +Z that aims a mount at the center, in radians.
    pub tilt_angle: f64,
    /// Distance from the sphere center down to the ring plane.
    pub drop: f64,
}

/// Cross-section of a sphere of `sphere_radius`, `offset_from_top` below its top.
///
/// `offset_from_top = sphere_radius` is the equator: the ring radius is the
/// sphere radius and the tilt is 90°.
pub fn ring_geometry(sphere_radius: f64, offset_from_top: f64) -> Result<RingGeometry> {
    let r = ensure_positive("mount ring", "sphere_radius", sphere_radius)?;
    let drop = r - offset_from_top;
    if !drop.is_finite() || drop.abs() > r {
        return Err(GeometryError::config(
            "mount ring",
            format!("offset {offset_from_top} lies outside a sphere of radius {r}"),
        ));
    }
    let ring_radius = (r * r - drop * drop).max(0.0).sqrt();
    Ok(RingGeometry {
        ring_radius,
        tilt_angle: ring_radius.atan2(drop),
        drop,
    })
}

/// Where one mount of a ring goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountPlacement {
    /// Position in the ring.
    pub index: usize,
    /// Rotation about the vertical axis, in radians.
    pub rotation_angle: f64,
    /// Tilt toward the center, in radians.
    pub tilt_angle: f64,
    /// Mount frame to ring frame, before the ring is lowered by `drop`.
    pub transform: Transform,
}

impl MountPlacement {
    /// Where the mount-frame point `(0, 0, mount_height / 2)` lands; it lies on the ring.
    pub fn pivot(&self, mount_height: f64) -> Point3 {
        self.transform
            .apply_point(&Point3::new(0.0, 0.0, mount_height / 2.0))
    }
}

/// Placements for `count` mounts of `mount_height` evenly spaced around the ring.
pub fn ring_placements(
    count: usize,
    sphere_radius: f64,
    offset_from_top: f64,
    mount_height: f64,
) -> Result<(RingGeometry, Vec<MountPlacement>)> {
    if count == 0 {
        return Err(GeometryError::config("mount ring", "count must be at least 1"));
    }
    ensure_positive("mount ring", "mount_height", mount_height)?;
    let ring = ring_geometry(sphere_radius, offset_from_top)?;

    let step = TAU / count as f64;
    let placements = (0..count)
        .map(|index| {
            let rotation_angle = step * index as f64;
            let transform = Transform::rotation_z(rotation_angle)
                .then(&Transform::translation(-ring.ring_radius, 0.0, 0.0))
                .then(&Transform::rotation_y(ring.tilt_angle))
                .then(&Transform::translation(0.0, 0.0, -mount_height / 2.0));
            MountPlacement {
                index,
                rotation_angle,
                tilt_angle: ring.tilt_angle,
                transform,
            }
        })
        .collect();
    Ok((ring, placements))
}

/// Union of `count` copies of a mount placed around a sphere centered at the origin.
///
/// `mount_builder` is called once; its solid is reused for every copy.
pub fn place_ring<K, F>(
    kernel: &K,
    mount_builder: F,
    count: usize,
    sphere_radius: f64,
    offset_from_top: f64,
    mount_height: f64,
) -> Result<K::Solid>
where
    K: SolidKernel,
    F: FnOnce(&K) -> Result<K::Solid>,
{
    let (ring, placements) = ring_placements(count, sphere_radius, offset_from_top, mount_height)?;
    let mount = mount_builder(kernel)?;

    let copies = placements
        .iter()
        .map(|p| kernel.transform(&mount, &p.transform))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    log::debug!(
        "placed {} mounts on ring r={:.3} tilt={:.2}°",
        count,
        ring.ring_radius,
        ring.tilt_angle.to_degrees()
    );

    let ring_solid = kernel.union(copies);
    Ok(kernel.translate(&ring_solid, 0.0, 0.0, -ring.drop)?)
}
