//! Border facet

use super::Color;

/// Per-edge border settings for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub diagonal: Option<BorderEdge>,
    /// Which diagonals `diagonal` is drawn on
    pub diagonal_direction: DiagonalDirection,
}

impl BorderStyle {
    /// No borders
    pub fn new() -> Self {
        Self::default()
    }

    /// Same edge on all four sides
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge::new(style, color));
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
            ..Self::default()
        }
    }

    pub fn with_left(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.left = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_right(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.right = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_top(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.top = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_bottom(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.bottom = Some(BorderEdge::new(style, color));
        self
    }

    /// Set the diagonal edge and its direction
    pub fn with_diagonal(
        mut self,
        style: BorderLineStyle,
        color: Color,
        direction: DiagonalDirection,
    ) -> Self {
        self.diagonal = Some(BorderEdge::new(style, color));
        self.diagonal_direction = direction;
        self
    }

    /// Check if all edges are empty
    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.diagonal.is_none()
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderEdge {
    /// Create a new border edge
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }

    /// Thin edge in the automatic color
    pub fn thin() -> Self {
        Self::new(BorderLineStyle::Thin, Color::Auto)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

/// Diagonal border direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagonalDirection {
    #[default]
    None,
    /// Top-left to bottom-right
    Down,
    /// Bottom-left to top-right
    Up,
    Both,
}

impl DiagonalDirection {
    /// Combine the separate up/down flags used by persisted border records
    pub fn from_flags(up: bool, down: bool) -> Self {
        match (up, down) {
            (true, true) => DiagonalDirection::Both,
            (true, false) => DiagonalDirection::Up,
            (false, true) => DiagonalDirection::Down,
            (false, false) => DiagonalDirection::None,
        }
    }

    /// `(up, down)` flags
    pub fn flags(self) -> (bool, bool) {
        match self {
            DiagonalDirection::None => (false, false),
            DiagonalDirection::Down => (false, true),
            DiagonalDirection::Up => (true, false),
            DiagonalDirection::Both => (true, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sets_four_edges() {
        let b = BorderStyle::all(BorderLineStyle::Thin, Color::BLACK);
        assert!(b.left.is_some() && b.bottom.is_some());
        assert!(b.diagonal.is_none());
        assert!(!b.is_empty());
        assert!(BorderStyle::new().is_empty());
    }

    #[test]
    fn test_diagonal_flags() {
        for dir in [
            DiagonalDirection::None,
            DiagonalDirection::Up,
            DiagonalDirection::Down,
            DiagonalDirection::Both,
        ] {
            let (up, down) = dir.flags();
            assert_eq!(DiagonalDirection::from_flags(up, down), dir);
        }
    }
}
