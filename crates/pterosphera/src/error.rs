//! Error types for geometry generation and configuration loading.

use pterosphera_kernel::KernelError;
use thiserror::Error;

/// Errors raised while generating geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Out-of-domain input, naming where it was found.
    #[error("configuration error in {location}: {message}")]
    Configuration {
        /// Finger, column or field the error refers to.
        location: String,
        /// What is wrong.
        message: String,
    },

    /// Point or face bookkeeping that cannot be reconciled.
    #[error("topology error: {0}")]
    Topology(String),

    /// The solid kernel rejected an operation.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl GeometryError {
    /// Build a [`GeometryError::Configuration`].
    pub fn config(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Prefix the location of a configuration error with an enclosing scope.
    pub fn within(self, scope: &str) -> Self {
        match self {
            Self::Configuration { location, message } => Self::Configuration {
                location: format!("{scope}: {location}"),
                message,
            },
            other => other,
        }
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors raised while reading or writing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid configuration TOML.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be encoded.
    #[error("could not encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Check that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(location: &str, field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::config(
            location,
            format!("{field} must be positive, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_prefixes_location() {
        let err = GeometryError::config("curvature_radius", "too small").within("finger index");
        assert_eq!(
            err.to_string(),
            "configuration error in finger index: curvature_radius: too small"
        );
    }

    #[test]
    fn test_within_leaves_other_errors() {
        let err = GeometryError::Topology("x".into()).within("finger");
        assert_eq!(err, GeometryError::Topology("x".into()));
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("c", "width", 2.0).unwrap(), 2.0);
        assert!(ensure_positive("c", "width", 0.0).is_err());
        assert!(ensure_positive("c", "width", f64::NAN).is_err());
    }
}
