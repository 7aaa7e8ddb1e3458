//! Configuration: one immutable value threaded through every builder.
//!
//! Every table and field has a default, so a configuration file only needs
//! to name what it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hand::HandSpec;
use crate::socket::SwitchSocketDims;
use crate::thumb::ThumbClusterSpec;
use crate::trackball::TrackballSocketSpec;

/// Case-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseSettings {
    /// Distance added at boolean boundaries so faces never coincide.
    pub weld_shift: f64,
    /// Arc length of one switch along a column.
    pub switch_height: f64,
    /// Lateral width of a column.
    pub column_width: f64,
    /// Distance between the top surface and the socket floor.
    pub plate_thickness: f64,
    /// Home row, 0-based, shared by every finger.
    pub home_row_index: usize,
    /// How far bridges and bezels reach into the columns they join.
    pub bridge_margin: f64,
    /// Width of the strips along the outer edges of the dish.
    pub bezel_width: f64,
    /// Gap between the socket floor and the case floor.
    pub floor_clearance: f64,
    /// Case floor thickness.
    pub floor_thickness: f64,
    /// Extra lateral space between fingers.
    pub finger_gap: f64,
    /// Cut switch openings into the columns.
    pub cut_switch_holes: bool,
    /// Build the thumb cluster.
    pub include_thumb: bool,
    /// Build the trackball socket.
    pub include_trackball: bool,
}

impl Default for CaseSettings {
    fn default() -> Self {
        Self {
            weld_shift: 0.05,
            switch_height: 19.2,
            column_width: 19.2,
            plate_thickness: 5.0,
            home_row_index: 1,
            bridge_margin: 0.5,
            bezel_width: 3.0,
            floor_clearance: 2.0,
            floor_thickness: 2.0,
            finger_gap: 0.0,
            cut_switch_holes: true,
            include_thumb: true,
            include_trackball: true,
        }
    }
}

/// Complete model configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PterospheraConfig {
    /// Case-wide settings.
    pub case: CaseSettings,
    /// Finger columns.
    pub hand: HandSpec,
    /// Thumb cluster.
    pub thumb: ThumbClusterSpec,
    /// Trackball socket.
    pub trackball: TrackballSocketSpec,
    /// Switch socket dimensions.
    pub switch: SwitchSocketDims,
}

impl PterospheraConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Encode as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandSide;

    #[test]
    fn test_defaults_round_trip() {
        let config = PterospheraConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = PterospheraConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = r#"
            [case]
            weld_shift = 0.1

            [hand]
            side = "right"

            [trackball]
            btu_count = 4
        "#;
        let config = PterospheraConfig::from_toml_str(text).unwrap();
        assert_eq!(config.case.weld_shift, 0.1);
        assert_eq!(config.case.column_width, 19.2);
        assert_eq!(config.hand.side, HandSide::Right);
        assert_eq!(config.hand.fingers.len(), 4);
        assert_eq!(config.hand.fingers[0].name, "pinky");
        assert_eq!(config.trackball.btu_count, 4);
        assert_eq!(config.trackball.trackball_radius, 17.0);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PterospheraConfig::from_toml_str("case = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pterosphera.toml");
        std::fs::write(&path, "[switch]\nsocket_size = 14.0\n").unwrap();
        let config = PterospheraConfig::load(&path).unwrap();
        assert_eq!(config.switch.socket_size, 14.0);
        assert!(matches!(
            PterospheraConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
