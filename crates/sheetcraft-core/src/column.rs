//! Column types

use crate::cell::CellAddress;
use crate::style::Style;

/// Column definition
///
/// Exists independently of the cells in the column; cells are stored by row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    number: u16,
    /// Custom width in characters (None = default)
    pub width: Option<f64>,
    /// Column is hidden
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    pub(crate) default_style: Option<Style>,
}

impl Column {
    /// Create a new column with default settings
    pub fn new(number: u16) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// 1-based column number
    pub fn number(&self) -> u16 {
        self.number
    }

    /// Column letters, e.g. `AB`
    pub fn letter(&self) -> String {
        CellAddress::column_to_letters(self.number)
    }

    /// Default style for cells in this column
    pub fn default_style(&self) -> Option<&Style> {
        self.default_style.as_ref()
    }

    /// Check if this column has any settings of its own
    pub fn has_custom_settings(&self) -> bool {
        self.width.is_some()
            || self.hidden
            || self.outline_level > 0
            || self.default_style.is_some()
    }

    /// Same settings as `other`, ignoring the column number
    pub fn same_settings(&self, other: &Column) -> bool {
        self.width.map(f64::to_bits) == other.width.map(f64::to_bits)
            && self.hidden == other.hidden
            && self.outline_level == other.outline_level
            && self.default_style == other.default_style
    }
}
