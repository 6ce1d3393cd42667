//! Fill facet

use super::Color;
use std::hash::{Hash, Hasher};

/// Cell background fill
///
/// `Pattern { pattern: Solid, background: Auto, .. }` is the same fill as
/// `Solid`, and a pattern of type `None` is the same as no fill.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillStyle {
    /// No fill
    #[default]
    None,

    /// Solid color fill
    Solid { color: Color },

    /// Pattern fill
    Pattern {
        pattern: PatternType,
        foreground: Color,
        background: Color,
    },

    /// Gradient fill
    Gradient {
        gradient_type: GradientType,
        /// Angle in degrees (linear gradients)
        angle: f64,
        stops: Vec<GradientStop>,
    },
}

#[derive(PartialEq, Eq, Hash)]
enum FillKey<'a> {
    None,
    Pattern(PatternType, &'a Color, &'a Color),
    Gradient(GradientType, u64, Vec<(u64, &'a Color)>),
}

const AUTO: Color = Color::Auto;

impl FillStyle {
    /// Solid fill with the given color
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    /// Pattern fill
    pub fn pattern(pattern: PatternType, foreground: Color, background: Color) -> Self {
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        }
    }

    /// Linear gradient fill
    pub fn linear_gradient(angle: f64, stops: Vec<GradientStop>) -> Self {
        FillStyle::Gradient {
            gradient_type: GradientType::Linear,
            angle,
            stops,
        }
    }

    /// Check if this is "no fill"
    pub fn is_none(&self) -> bool {
        matches!(self.key(), FillKey::None)
    }

    fn key(&self) -> FillKey<'_> {
        match self {
            FillStyle::None
            | FillStyle::Pattern {
                pattern: PatternType::None,
                ..
            } => FillKey::None,
            FillStyle::Solid { color } => FillKey::Pattern(PatternType::Solid, color, &AUTO),
            FillStyle::Pattern {
                pattern,
                foreground,
                background,
            } => FillKey::Pattern(*pattern, foreground, background),
            FillStyle::Gradient {
                gradient_type,
                angle,
                stops,
            } => FillKey::Gradient(
                *gradient_type,
                angle.to_bits(),
                stops
                    .iter()
                    .map(|s| (s.position.to_bits(), &s.color))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for FillStyle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for FillStyle {}

impl Hash for FillStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Pattern fill types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternType {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    /// 12.5% gray
    Gray125,
    /// 6.25% gray
    Gray0625,
}

/// Gradient types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GradientType {
    /// Linear gradient
    #[default]
    Linear,
    /// Radial/path gradient
    Path,
}

/// Gradient stop (position and color)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradientStop {
    /// Position (0.0 to 1.0)
    pub position: f64,
    /// Color at this position
    pub color: Color,
}

impl GradientStop {
    /// Create a new gradient stop
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}
