//! Effective style resolution and row/column broadcast
//!
//! A materialized cell with an explicit style shows that style as is. Any
//! other address shows the row and column defaults merged facet by facet,
//! the more specific layer winning where both define a facet (row over
//! column unless the sheet says otherwise).
//!
//! Cells never point back at their row or column. Instead a new cell copies
//! the resolved defaults when it is created, and a later row/column write
//! pushes the changed facet into every cell that already exists.

use crate::cell::Cell;
use crate::style::{FacetValue, Style};
use ahash::AHashMap;
use std::sync::Arc;

/// Which default wins when a row and a column set the same facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StylePrecedence {
    /// Row default over column default
    #[default]
    RowFirst,
    /// Column default over row default
    ColumnFirst,
}

/// Merge row and column defaults for an address
///
/// Returns `None` when neither layer sets any facet.
pub fn layered_default(
    row: Option<&Style>,
    column: Option<&Style>,
    precedence: StylePrecedence,
) -> Option<Style> {
    let (first, second) = match precedence {
        StylePrecedence::RowFirst => (row, column),
        StylePrecedence::ColumnFirst => (column, row),
    };
    let merged = match (first, second) {
        (Some(a), Some(b)) => a.clone().or(b),
        (Some(a), None) | (None, Some(a)) => a.clone(),
        (None, None) => return None,
    };
    (!merged.is_empty()).then_some(merged)
}

/// Effective style of an address
pub fn effective_style(
    cell: Option<&Cell>,
    row: Option<&Style>,
    column: Option<&Style>,
    precedence: StylePrecedence,
) -> Style {
    if let Some(style) = cell.and_then(Cell::style) {
        return style.clone();
    }
    layered_default(row, column, precedence).unwrap_or_default()
}

/// Applies one facet to a series of cells
///
/// Cells that shared a style before the write still share one afterwards.
#[derive(Debug)]
pub struct Broadcast {
    value: FacetValue,
    rewritten: AHashMap<Option<Style>, Arc<Style>>,
}

impl Broadcast {
    pub fn new(value: FacetValue) -> Self {
        Self {
            value,
            rewritten: AHashMap::new(),
        }
    }

    /// Overwrite the facet on one cell's explicit style
    ///
    /// Merged-away cells are left alone.
    pub fn apply(&mut self, cell: &mut Cell) {
        if cell.is_merged_away() {
            return;
        }
        let before = cell.style().cloned();
        let value = &self.value;
        let after = self
            .rewritten
            .entry(before)
            .or_insert_with_key(|before| {
                let mut style = before.clone().unwrap_or_default();
                style.set(value.clone());
                Arc::new(style)
            })
            .clone();
        cell.set_shared_style(Some(after));
    }
}
