//! Hooks for inspecting what a build produced.

use crate::column::{ColumnPlan, ColumnSpec};
use crate::radial::MountPlacement;

/// Receives intermediate results once generation has finished.
///
/// Every method has an empty default, so implementors pick what they need.
pub trait GenerationObserver: Sync {
    /// One finger or thumb column and its plan.
    fn column_planned(&self, _spec: &ColumnSpec, _plan: &ColumnPlan) {}

    /// The ball transfer unit placements of the trackball socket.
    fn ring_placed(&self, _placements: &[MountPlacement]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Observer that writes point listings to the `debug` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl GenerationObserver for LogObserver {
    fn column_planned(&self, spec: &ColumnSpec, plan: &ColumnPlan) {
        log::debug!(
            "{}: step {:.3}° offset {:.3}°",
            spec.location(),
            spec.layout.step_angle_deg(),
            spec.layout.angle_offset_deg()
        );
        for element in &plan.elements {
            for (i, p) in element.corners.iter().enumerate() {
                log::debug!(
                    "  element {} corner {i}: ({:.3}, {:.3}, {:.3})",
                    element.index,
                    p.x,
                    p.y,
                    p.z
                );
            }
        }
        for bridge in &plan.bridges {
            log::debug!(
                "  bridge {}: element {} -> {}",
                bridge.slot,
                bridge.element,
                bridge.adjacent_element
            );
        }
    }

    fn ring_placed(&self, placements: &[MountPlacement]) {
        for p in placements {
            log::debug!(
                "  mount {}: rotation {:.2}° tilt {:.2}°",
                p.index,
                p.rotation_angle.to_degrees(),
                p.tilt_angle.to_degrees()
            );
        }
    }
}
