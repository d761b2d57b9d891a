use serde::{Deserialize, Serialize};

/// The four user-facing parameters of the printable cylinder. All lengths in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CylinderParams {
    pub height: f64,
    pub outer_radius: f64,
    pub wall_thickness: f64,
    pub closed_bottom: bool,
}

impl CylinderParams {
    pub fn new(height: f64, outer_radius: f64, wall_thickness: f64, closed_bottom: bool) -> Self {
        Self {
            height,
            outer_radius,
            wall_thickness,
            closed_bottom,
        }
    }

    pub fn diameter(&self) -> f64 {
        self.outer_radius * 2.0
    }

    /// Radius of the bore. A wall at least as thick as the radius yields a solid slug (0).
    pub fn inner_radius(&self) -> f64 {
        (self.outer_radius - self.wall_thickness).max(0.0)
    }

    /// Wall thickness actually realised by the geometry (never thicker than the radius).
    pub fn effective_wall(&self) -> f64 {
        self.outer_radius - self.inner_radius()
    }
}

impl Default for CylinderParams {
    fn default() -> Self {
        ParamLimits::default().defaults()
    }
}

/// Declared range and default for one numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Increment used by steppers in the host UI.
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp into `[min, max]`. NaN is not a valid input and maps to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Identifies one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    Height,
    OuterRadius,
    WallThickness,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [
        ParamKind::Height,
        ParamKind::OuterRadius,
        ParamKind::WallThickness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Height => "height",
            ParamKind::OuterRadius => "outerRadius",
            ParamKind::WallThickness => "wallThickness",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Ranges for every numeric parameter plus the default bottom style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParamLimits {
    pub height: ParamRange,
    pub outer_radius: ParamRange,
    pub wall_thickness: ParamRange,
    pub closed_bottom: bool,
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self {
            height: ParamRange::new(10.0, 200.0, 50.0, 1.0),
            outer_radius: ParamRange::new(5.0, 100.0, 25.0, 0.5),
            wall_thickness: ParamRange::new(0.5, 50.0, 3.0, 0.5),
            closed_bottom: true,
        }
    }
}

impl ParamLimits {
    pub fn range(&self, kind: ParamKind) -> &ParamRange {
        match kind {
            ParamKind::Height => &self.height,
            ParamKind::OuterRadius => &self.outer_radius,
            ParamKind::WallThickness => &self.wall_thickness,
        }
    }

    pub fn defaults(&self) -> CylinderParams {
        CylinderParams {
            height: self.height.default,
            outer_radius: self.outer_radius.default,
            wall_thickness: self.wall_thickness.default,
            closed_bottom: self.closed_bottom,
        }
    }

    /// Clamp every numeric field into its declared range.
    pub fn clamp(&self, params: CylinderParams) -> CylinderParams {
        CylinderParams {
            height: self.height.clamp(params.height),
            outer_radius: self.outer_radius.clamp(params.outer_radius),
            wall_thickness: self.wall_thickness.clamp(params.wall_thickness),
            closed_bottom: params.closed_bottom,
        }
    }
}
