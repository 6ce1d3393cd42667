//! Row types

use crate::cell::Cell;
use crate::style::Style;
use std::collections::BTreeMap;

/// A worksheet row: metadata, default style and its materialized cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    number: u32,
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    /// Row is hidden
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    pub(crate) default_style: Option<Style>,
    pub(crate) cells: BTreeMap<u16, Cell>,
}

impl Row {
    /// Create an empty row
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// 1-based row number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Default style for cells in this row
    pub fn default_style(&self) -> Option<&Style> {
        self.default_style.as_ref()
    }

    /// Materialized cell at a column
    pub fn cell(&self, col: u16) -> Option<&Cell> {
        self.cells.get(&col)
    }

    /// Materialized cells in ascending column order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True when the row holds nothing worth keeping
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && !self.has_custom_settings()
    }

    /// Check if this row has any settings of its own
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some()
            || self.hidden
            || self.outline_level > 0
            || self.default_style.is_some()
    }
}
