use serde::{Deserialize, Serialize};

/// A resting view of the part, in rotation units (one unit = half a turn).
///
/// `BackNegative` and `BackPositive` show the same face but are reached by
/// spinning in opposite directions, so the settle animation differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    BackNegative,
    Front,
    BackPositive,
}

impl Orientation {
    /// Rotation value in units: -1, 0 or 1.
    pub fn units(&self) -> f64 {
        match self {
            Orientation::BackNegative => -1.0,
            Orientation::Front => 0.0,
            Orientation::BackPositive => 1.0,
        }
    }

    /// Tap semantics: front goes to the positive back view, either back view returns to front.
    pub fn toggled(&self) -> Orientation {
        match self {
            Orientation::BackNegative | Orientation::BackPositive => Orientation::Front,
            Orientation::Front => Orientation::BackPositive,
        }
    }

    /// Snap a continuous rotation to the nearest resting view. Out-of-range
    /// values clamp to the closest end.
    pub fn nearest(rotation: f64) -> Orientation {
        if rotation.is_nan() {
            return Orientation::Front;
        }
        let snapped = rotation.round().clamp(-1.0, 1.0);
        if snapped < 0.0 {
            Orientation::BackNegative
        } else if snapped > 0.0 {
            Orientation::BackPositive
        } else {
            Orientation::Front
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Front
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_rules() {
        assert_eq!(Orientation::BackNegative.toggled(), Orientation::Front);
        assert_eq!(Orientation::Front.toggled(), Orientation::BackPositive);
        assert_eq!(Orientation::BackPositive.toggled(), Orientation::Front);
    }

    #[test]
    fn nearest_rounds_and_clamps() {
        assert_eq!(Orientation::nearest(0.49), Orientation::Front);
        assert_eq!(Orientation::nearest(0.5), Orientation::BackPositive);
        assert_eq!(Orientation::nearest(-0.51), Orientation::BackNegative);
        assert_eq!(Orientation::nearest(-7.0), Orientation::BackNegative);
        assert_eq!(Orientation::nearest(3.2), Orientation::BackPositive);
        assert_eq!(Orientation::nearest(f64::NAN), Orientation::Front);
    }
}
