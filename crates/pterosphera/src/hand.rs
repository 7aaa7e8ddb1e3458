//! Hand description and its layout into columns.

use serde::{Deserialize, Serialize};

use crate::arc::compute_arc_layout;
use crate::column::ColumnSpec;
use crate::config::CaseSettings;
use crate::error::{GeometryError, Result};

/// Which hand a case half is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    /// Left hand; the canonical orientation.
    #[default]
    Left,
    /// Right hand; laid out as a left hand and mirrored across XZ.
    Right,
}

/// One finger's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerSpec {
    /// Display name, used in error messages.
    pub name: String,
    /// Shift of the curvature center along X (reach).
    pub x_offset: f64,
    /// Virtual knuckle distance.
    pub curvature_radius: f64,
    /// Columns served by this finger.
    pub column_count: usize,
    /// Switches per column.
    pub switch_count: usize,
}

impl Default for FingerSpec {
    fn default() -> Self {
        Self::new("finger", 0.0, 48.2, 1, 4)
    }
}

impl FingerSpec {
    /// Finger with the given parameters.
    pub fn new(
        name: &str,
        x_offset: f64,
        curvature_radius: f64,
        column_count: usize,
        switch_count: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            x_offset,
            curvature_radius,
            column_count,
            switch_count,
        }
    }
}

/// A hand: side plus its fingers.
///
/// A left hand lists its fingers from the thumb side outward. A right hand
/// lists them from the outer edge in toward the thumb, so that reversing
/// the list yields the left-hand order and the mirrored case lands every
/// finger beside the same neighbours. [`HandSpec::mirrored`] converts
/// between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HandSpecFile")]
pub struct HandSpec {
    /// Which hand.
    pub side: HandSide,
    /// Fingers in order.
    pub fingers: Vec<FingerSpec>,
}

impl Default for HandSpec {
    fn default() -> Self {
        Self::for_side(HandSide::Left)
    }
}

impl HandSpec {
    /// The default four-finger hand for `side`, listed in that side's order.
    pub fn for_side(side: HandSide) -> Self {
        let mut fingers = vec![
            FingerSpec::new("index", 0.0, 48.2, 2, 4),
            FingerSpec::new("middle", 6.0, 52.0, 1, 4),
            FingerSpec::new("ring", 2.0, 50.0, 1, 4),
            FingerSpec::new("pinky", -10.0, 42.0, 1, 3),
        ];
        if side == HandSide::Right {
            fingers.reverse();
        }
        Self { side, fingers }
    }

    /// The same hand for the other side, with the finger list reordered.
    pub fn mirrored(&self) -> Self {
        let side = match self.side {
            HandSide::Left => HandSide::Right,
            HandSide::Right => HandSide::Left,
        };
        Self {
            side,
            fingers: self.fingers.iter().rev().cloned().collect(),
        }
    }
}

/// On-disk form: omitted fingers default in the order of the given side.
#[derive(Deserialize)]
#[serde(default)]
struct HandSpecFile {
    side: HandSide,
    fingers: Option<Vec<FingerSpec>>,
}

impl Default for HandSpecFile {
    fn default() -> Self {
        Self {
            side: HandSide::Left,
            fingers: None,
        }
    }
}

impl From<HandSpecFile> for HandSpec {
    fn from(file: HandSpecFile) -> Self {
        match file.fingers {
            Some(fingers) => Self {
                side: file.side,
                fingers,
            },
            None => Self::for_side(file.side),
        }
    }
}

/// Lay out every column of `hand`, first to last across the dish.
///
/// A right hand is laid out with its fingers reversed so it can be built
/// as a left hand and mirrored afterwards; given in right-hand order, it
/// lays out exactly like the matching left hand. Columns advance along +Y by the
/// column width, plus `finger_gap` between fingers.
///
/// # Errors
///
/// [`GeometryError::Configuration`] naming the finger (and column) for an
/// empty hand, a finger without columns or switches, or a finger whose arc
/// cannot be laid out.
pub fn layout_hand(hand: &HandSpec, settings: &CaseSettings) -> Result<Vec<ColumnSpec>> {
    if hand.fingers.is_empty() {
        return Err(GeometryError::config("hand", "no fingers"));
    }
    let fingers: Vec<(usize, &FingerSpec)> = match hand.side {
        HandSide::Left => hand.fingers.iter().enumerate().collect(),
        HandSide::Right => hand.fingers.iter().enumerate().rev().collect(),
    };

    let total_columns: usize = hand.fingers.iter().map(|f| f.column_count).sum();
    let mut columns = Vec::with_capacity(total_columns);
    let mut y = 0.0;

    for (position, (finger_index, finger)) in fingers.into_iter().enumerate() {
        let scope = format!("finger {} ({finger_index})", finger.name);
        if finger.column_count == 0 {
            return Err(GeometryError::config(scope, "column_count must be at least 1"));
        }
        let layout = compute_arc_layout(
            finger.curvature_radius,
            settings.switch_height,
            finger.switch_count,
            settings.home_row_index,
        )
        .map_err(|e| e.within(&scope))?;

        if position > 0 {
            y += settings.finger_gap;
        }
        for column_index in 0..finger.column_count {
            let dish_index = columns.len();
            columns.push(ColumnSpec {
                finger_index,
                finger_name: finger.name.clone(),
                column_index,
                finger_first: column_index == 0,
                finger_last: column_index + 1 == finger.column_count,
                dish_first: dish_index == 0,
                dish_last: dish_index + 1 == total_columns,
                side: hand.side,
                column_width: settings.column_width,
                offset: [finger.x_offset, y, 0.0],
                layout,
                switch_count: finger.switch_count,
                switch_height: settings.switch_height,
                home_row_index: settings.home_row_index,
                curvature_radius: finger.curvature_radius,
            });
            y += settings.column_width;
        }
    }

    log::debug!("laid out {} columns for {:?} hand", columns.len(), hand.side);
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hand_layout() {
        let settings = CaseSettings::default();
        let columns = layout_hand(&HandSpec::default(), &settings).unwrap();
        assert_eq!(columns.len(), 5);
        assert!(columns[0].dish_first && !columns[0].dish_last);
        assert!(columns[4].dish_last);
        assert!(columns[0].finger_first && !columns[0].finger_last);
        assert!(columns[1].finger_last);
        assert_eq!(columns[2].finger_name, "middle");
        for (i, c) in columns.iter().enumerate() {
            assert!((c.offset[1] - i as f64 * settings.column_width).abs() < 1e-12);
        }
    }

    #[test]
    fn test_right_hand_reverses_fingers() {
        let settings = CaseSettings::default();
        let hand = HandSpec::for_side(HandSide::Right);
        assert_eq!(hand.fingers[0].name, "pinky");
        let columns = layout_hand(&hand, &settings).unwrap();
        assert_eq!(columns[0].finger_name, "index");
        assert_eq!(columns[0].finger_index, 3);
        assert_eq!(columns[4].finger_name, "pinky");
        assert!(columns.iter().all(|c| c.side == HandSide::Right));

        let left = layout_hand(&hand.mirrored(), &settings).unwrap();
        for (l, r) in left.iter().zip(&columns) {
            assert_eq!(l.finger_name, r.finger_name);
            assert_eq!(l.offset, r.offset);
            assert_eq!(
                (l.dish_first, l.dish_last, l.finger_first, l.finger_last),
                (r.dish_first, r.dish_last, r.finger_first, r.finger_last)
            );
        }
    }

    #[test]
    fn test_right_hand_file_defaults_in_right_order() {
        let hand: HandSpec = toml::from_str("side = \"right\"").unwrap();
        assert_eq!(hand, HandSpec::for_side(HandSide::Right));
        let hand: HandSpec = toml::from_str("").unwrap();
        assert_eq!(hand, HandSpec::default());
        assert_eq!(hand.mirrored().mirrored(), hand);
    }

    #[test]
    fn test_finger_gap() {
        let settings = CaseSettings {
            finger_gap: 2.0,
            ..Default::default()
        };
        let columns = layout_hand(&HandSpec::default(), &settings).unwrap();
        // Index spans two columns, then one gap before middle.
        assert!((columns[2].offset[1] - (2.0 * settings.column_width + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_errors_name_the_finger() {
        let mut hand = HandSpec::default();
        hand.fingers[2].curvature_radius = 10.0;
        let err = layout_hand(&hand, &CaseSettings::default()).unwrap_err();
        assert!(err.to_string().contains("finger ring (2)"));

        hand.fingers[2].curvature_radius = 50.0;
        hand.fingers[1].column_count = 0;
        let err = layout_hand(&hand, &CaseSettings::default()).unwrap_err();
        assert!(err.to_string().contains("finger middle (1)"));
    }

    #[test]
    fn test_empty_hand() {
        let hand = HandSpec {
            side: HandSide::Left,
            fingers: Vec::new(),
        };
        assert!(layout_hand(&hand, &CaseSettings::default()).is_err());
    }
}
