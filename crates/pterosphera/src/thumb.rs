//! Thumb cluster: one finger's arc of keys, placed on its own.

use pterosphera_kernel::SolidKernel;
use pterosphera_math::Transform;
use serde::{Deserialize, Serialize};

use crate::case::column_with_holes;
use crate::column::{plan_column, ColumnPlan, ColumnSpec};
use crate::config::CaseSettings;
use crate::error::Result;
use crate::hand::{layout_hand, FingerSpec, HandSide, HandSpec};
use crate::socket::SwitchSocketDims;

/// Thumb cluster placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbClusterSpec {
    /// Translation applied after rotating.
    pub offset: [f64; 3],
    /// Rotation about X, Y then Z, in degrees.
    pub rotation_deg: [f64; 3],
    /// The cluster's columns, laid out like a finger.
    pub finger: FingerSpec,
}

impl Default for ThumbClusterSpec {
    fn default() -> Self {
        Self {
            offset: [-45.0, -30.0, -10.0],
            rotation_deg: [0.0, 25.0, -20.0],
            finger: FingerSpec::new("thumb", 0.0, 60.0, 2, 2),
        }
    }
}

impl ThumbClusterSpec {
    /// Columns of the cluster in its own frame.
    pub fn columns(&self, settings: &CaseSettings) -> Result<Vec<ColumnSpec>> {
        let hand = HandSpec {
            side: HandSide::Left,
            fingers: vec![self.finger.clone()],
        };
        layout_hand(&hand, settings).map_err(|e| e.within("thumb cluster"))
    }

    /// Cluster frame to case frame.
    pub fn placement(&self) -> Transform {
        let [x, y, z] = self.offset;
        let [rx, ry, rz] = self.rotation_deg;
        Transform::translation(x, y, z).then(&Transform::rotation_xyz_deg(rx, ry, rz))
    }

    /// Plans for every column, each welded to the next.
    pub fn plans(&self, settings: &CaseSettings) -> Result<Vec<(ColumnSpec, ColumnPlan)>> {
        let columns = self.columns(settings)?;
        columns
            .iter()
            .enumerate()
            .map(|(i, spec)| Ok((spec.clone(), plan_column(spec, columns.get(i + 1), settings)?)))
            .collect()
    }
}

/// Build the thumb cluster, switch openings cut when configured, placed in the case frame.
pub fn build_thumb_cluster<K: SolidKernel>(
    kernel: &K,
    spec: &ThumbClusterSpec,
    settings: &CaseSettings,
    switch: &SwitchSocketDims,
) -> Result<K::Solid> {
    assemble_thumb_cluster(kernel, spec, &spec.plans(settings)?, settings, switch)
}

/// Realize already planned thumb columns and place the cluster.
pub fn assemble_thumb_cluster<K: SolidKernel>(
    kernel: &K,
    spec: &ThumbClusterSpec,
    plans: &[(ColumnSpec, ColumnPlan)],
    settings: &CaseSettings,
    switch: &SwitchSocketDims,
) -> Result<K::Solid> {
    let parts = plans
        .iter()
        .map(|(column, plan)| column_with_holes(kernel, column, plan, settings, switch))
        .collect::<Result<Vec<_>>>()?;
    let cluster = kernel.union(parts);
    Ok(kernel.transform(&cluster, &spec.placement())?)
}
