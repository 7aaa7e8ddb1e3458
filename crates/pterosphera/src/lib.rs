#![warn(missing_docs)]

//! Parametric geometry for a split keyboard case with curved key columns,
//! a trackball socket and a thumb cluster.
//!
//! Finger measurements become arcs ([`arc`]), arcs become point lattices
//! ([`lattice`]), lattices become welded column volumes ([`column`]), and
//! sockets are composed from primitives ([`socket`]) and placed in rings
//! around the trackball ([`radial`]). Solids are built through a
//! [`SolidKernel`](pterosphera_kernel::SolidKernel); nothing here touches the
//! filesystem except configuration loading.
//!
//! # Example
//!
//! ```
//! use pterosphera::{build_case, compute_arc_layout, NoopObserver, PterospheraConfig};
//! use pterosphera_kernel::SdfKernel;
//!
//! let layout = compute_arc_layout(48.2, 19.2, 4, 3).unwrap();
//! assert!((layout.step_angle_deg() - 23.4745).abs() < 1e-3);
//!
//! let mut config = PterospheraConfig::default();
//! config.case.include_trackball = false;
//! let model = build_case(&SdfKernel::new(), &config, &NoopObserver).unwrap();
//! assert_eq!(model.column_count, 7);
//! ```

pub mod arc;
pub mod case;
pub mod column;
pub mod config;
pub mod error;
pub mod hand;
pub mod lattice;
pub mod observer;
pub mod radial;
pub mod socket;
pub mod thumb;
pub mod trackball;

pub use arc::{compute_arc_layout, ArcLayout};
pub use case::{build_case, column_with_holes, switch_hole_transform, CaseModel};
pub use column::{
    assemble_column, plan_column, realize_plan, Bezel, Bridge, ColumnPlan, ColumnSpec,
};
pub use config::{CaseSettings, PterospheraConfig};
pub use error::{ConfigError, GeometryError, Result};
pub use hand::{layout_hand, FingerSpec, HandSide, HandSpec};
pub use lattice::{build_element, ColumnLattice, Element, Face, LatticeSpec};
pub use observer::{GenerationObserver, LogObserver, NoopObserver};
pub use radial::{place_ring, ring_geometry, ring_placements, MountPlacement, RingGeometry};
pub use socket::{
    build_socket, BtuDims, SensorMountDims, ShellDims, SocketKind, SwitchSocketDims,
};
pub use thumb::{assemble_thumb_cluster, build_thumb_cluster, ThumbClusterSpec};
pub use trackball::{
    build_btu_ring, build_trackball_socket, SensorPlacement, TrackballOptions,
    TrackballSocketSpec,
};
