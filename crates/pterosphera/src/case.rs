//! A complete case half: finger columns with switch openings, the thumb
//! cluster and the trackball socket.

use pterosphera_kernel::SolidKernel;
use pterosphera_math::{Transform, Vec3};
use rayon::prelude::*;

use crate::column::{plan_column, realize_plan, ColumnPlan, ColumnSpec};
use crate::config::{CaseSettings, PterospheraConfig};
use crate::error::Result;
use crate::hand::{layout_hand, HandSide};
use crate::lattice::Element;
use crate::observer::GenerationObserver;
use crate::socket::{build_socket, SocketKind, SwitchSocketDims};
use crate::thumb::assemble_thumb_cluster;
use crate::trackball::{build_trackball_socket, TrackballOptions};

/// A generated case half.
#[derive(Debug, Clone)]
pub struct CaseModel<S> {
    /// The solid, mirrored for a right hand.
    pub solid: S,
    /// Height of the case floor: the lowest column offset minus its deepest point.
    pub floor_z: f64,
    /// Finger and thumb columns built.
    pub column_count: usize,
    /// Element volumes built.
    pub element_count: usize,
    /// Bridge volumes built.
    pub bridge_count: usize,
    /// Finger columns followed by thumb columns, as laid out before mirroring.
    pub columns: Vec<ColumnSpec>,
}

/// Placement of the switch opening die for `element`.
///
/// The die's top lands on the middle of the element's top chord, its axis
/// pointing back at the curvature center.
pub fn switch_hole_transform(
    spec: &ColumnSpec,
    element: &Element,
    switch: &SwitchSocketDims,
) -> Transform {
    let phi = spec.layout.mid_angle(element.index);
    let reach = element.radius_outer * (spec.layout.step_angle / 2.0).cos();
    let top = spec.offset_vec()
        + Vec3::new(reach * phi.cos(), spec.column_width / 2.0, reach * phi.sin());
    let beta = (-phi.cos()).atan2(-phi.sin());
    Transform::translation_vec(&top)
        .then(&Transform::rotation_y(beta))
        .then(&Transform::translation(0.0, 0.0, -switch.hole_top()))
}

/// Realize a column plan and, when enabled, cut one switch opening per element.
pub fn column_with_holes<K: SolidKernel>(
    kernel: &K,
    spec: &ColumnSpec,
    plan: &ColumnPlan,
    settings: &CaseSettings,
    switch: &SwitchSocketDims,
) -> Result<K::Solid> {
    let body = realize_plan(kernel, plan)?;
    if !settings.cut_switch_holes {
        return Ok(body);
    }
    let die = build_socket(kernel, &SocketKind::SwitchHole(*switch), settings.weld_shift)
        .map_err(|e| e.within(&spec.location()))?;
    let holes = plan
        .elements
        .iter()
        .map(|e| kernel.transform(&die, &switch_hole_transform(spec, e, switch)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(kernel.difference(&body, &kernel.union(holes)))
}

/// Build one case half from `config`.
///
/// Columns are planned and realized in parallel and the parts joined by a
/// parallel reduction. `observer` sees every column plan and the trackball
/// ring once the solid is complete.
pub fn build_case<K: SolidKernel>(
    kernel: &K,
    config: &PterospheraConfig,
    observer: &dyn GenerationObserver,
) -> Result<CaseModel<K::Solid>> {
    let settings = &config.case;
    let mut columns = layout_hand(&config.hand, settings)?;

    let plans = columns
        .par_iter()
        .enumerate()
        .map(|(i, spec)| plan_column(spec, columns.get(i + 1), settings))
        .collect::<Result<Vec<_>>>()?;
    let floor_z = columns
        .iter()
        .zip(&plans)
        .map(|(spec, plan)| spec.offset[2] - plan.deepest_point)
        .fold(f64::INFINITY, f64::min);
    log::info!("planned {} columns, floor at z={:.3}", columns.len(), floor_z);

    let mut parts = columns
        .par_iter()
        .zip(plans.par_iter())
        .map(|(spec, plan)| column_with_holes(kernel, spec, plan, settings, &config.switch))
        .collect::<Result<Vec<_>>>()?;

    let thumb_plans = if settings.include_thumb {
        let plans = config.thumb.plans(settings)?;
        parts.push(assemble_thumb_cluster(
            kernel,
            &config.thumb,
            &plans,
            settings,
            &config.switch,
        )?);
        log::info!("built thumb cluster ({} columns)", plans.len());
        plans
    } else {
        Vec::new()
    };

    let ring = if settings.include_trackball {
        let socket = build_trackball_socket(
            kernel,
            &config.trackball,
            TrackballOptions::default(),
            settings.weld_shift,
        )?;
        let [x, y, z] = config.trackball.position;
        parts.push(kernel.translate(&socket, x, y, z)?);
        log::info!("built trackball socket at ({x}, {y}, {z})");
        config.trackball.btu_placements()?
    } else {
        Vec::new()
    };

    let solid = parts
        .into_par_iter()
        .reduce(|| kernel.empty(), |a, b| kernel.union2(&a, &b));
    let solid = match config.hand.side {
        HandSide::Left => solid,
        HandSide::Right => kernel.transform(&solid, &Transform::scale(1.0, -1.0, 1.0))?,
    };

    for (spec, plan) in columns.iter().zip(&plans) {
        observer.column_planned(spec, plan);
    }
    for (spec, plan) in &thumb_plans {
        observer.column_planned(spec, plan);
    }
    if !ring.is_empty() {
        observer.ring_placed(&ring);
    }

    let all_plans = plans.iter().chain(thumb_plans.iter().map(|(_, plan)| plan));
    let (element_count, bridge_count) = all_plans.fold((0, 0), |(e, b), plan| {
        (e + plan.elements.len(), b + plan.bridges.len())
    });
    columns.extend(thumb_plans.into_iter().map(|(spec, _)| spec));
    log::info!(
        "case ready: {} columns, {} elements, {} bridges",
        columns.len(),
        element_count,
        bridge_count
    );

    Ok(CaseModel {
        solid,
        floor_z,
        column_count: columns.len(),
        element_count,
        bridge_count,
        columns,
    })
}
