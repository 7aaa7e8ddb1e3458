//! Print material shrink compensation.

use serde::{Deserialize, Serialize};

/// Print material; determines how much the exported mesh is enlarged to
/// make up for cooling shrinkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// No compensation.
    Generic,
    /// PLA, shrinks about 0.1%.
    #[default]
    Pla,
    /// ABS, shrinks about 0.5%.
    Abs,
}

impl Material {
    /// Uniform scale applied to the mesh before writing.
    pub fn shrink_factor(self) -> f64 {
        match self {
            Material::Generic => 1.0,
            Material::Pla => 1.0 / 0.999,
            Material::Abs => 1.0 / 0.995,
        }
    }
}
