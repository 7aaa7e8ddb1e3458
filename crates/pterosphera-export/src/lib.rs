#![warn(missing_docs)]

//! Mesh export for pterosphera solids.
//!
//! Meshes a [`Solid`] with the reference kernel, enlarges it to make up for
//! material shrinkage and writes binary STL.
//!
//! # Example
//!
//! ```no_run
//! use pterosphera_export::{export_stl, ExportSettings, Material};
//! use pterosphera_kernel::{SdfKernel, SolidKernel};
//!
//! let kernel = SdfKernel::new();
//! let ball = kernel.sphere(17.0).unwrap();
//! let settings = ExportSettings { mesh_cells: 120, material: Material::Pla };
//! let summary = export_stl(&ball, &settings, "out/ball.stl").unwrap();
//! println!("{} triangles", summary.triangles);
//! ```

pub mod material;
pub mod stl;

pub use material::Material;
pub use stl::{to_stl_bytes, write_stl};

use std::path::{Path, PathBuf};

use log::info;
use pterosphera_kernel::{mesh_solid, KernelError, Solid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Meshing failed.
    #[error("meshing failed: {0}")]
    Kernel(#[from] KernelError),
    /// The mesh has no triangles.
    #[error("empty mesh")]
    EmptyMesh,
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Mesh resolution and material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Lattice cells along the longest axis of the part.
    pub mesh_cells: usize,
    /// Print material.
    pub material: Material,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            mesh_cells: 300,
            material: Material::default(),
        }
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Output file.
    pub path: PathBuf,
    /// Triangle count.
    pub triangles: usize,
    /// Scale applied for shrinkage.
    pub scale: f64,
}

/// Mesh `solid` and write it to `path` as binary STL.
pub fn export_stl(
    solid: &Solid,
    settings: &ExportSettings,
    path: impl AsRef<Path>,
) -> Result<ExportSummary> {
    let path = path.as_ref();
    let mut mesh = mesh_solid(solid, settings.mesh_cells)?;
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }
    let scale = settings.material.shrink_factor();
    mesh.scale(scale as f32);
    write_stl(&mesh, path)?;

    info!(
        "wrote {} ({} triangles, scale {:.4})",
        path.display(),
        mesh.num_triangles(),
        scale
    );
    Ok(ExportSummary {
        path: path.to_path_buf(),
        triangles: mesh.num_triangles(),
        scale,
    })
}
