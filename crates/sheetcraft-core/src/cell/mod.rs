//! Cell-related types
//!
//! - [`CellValue`]: the value stored in a cell
//! - [`CellAddress`] / [`CellRange`]: locations such as `B2` and `A1:C3`
//! - [`RichText`]: multi-run formatted text
//! - [`Cell`]: a materialized cell with its explicit style

mod address;
mod rich_text;
mod value;

pub use address::{CellAddress, CellRange, IntoAddress, IntoRange};
pub use rich_text::{RichText, RichTextRun};
pub use value::{CellError, CellValue, SharedString};

use crate::style::Style;
use std::sync::Arc;

/// A materialized cell
///
/// The style is the cell's own snapshot: it is taken from the row/column
/// defaults when the cell is created and afterwards changes only through
/// explicit writes or row/column broadcasts.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    address: CellAddress,
    value: CellValue,
    style: Option<Arc<Style>>,
    master: Option<CellAddress>,
}

impl Cell {
    /// Create an empty, unstyled cell
    pub fn new(address: CellAddress) -> Self {
        Self {
            address,
            value: CellValue::Empty,
            style: None,
            master: None,
        }
    }

    /// Create a cell with a value and an optional explicit style
    pub fn with_parts(address: CellAddress, value: CellValue, style: Option<Arc<Style>>) -> Self {
        let mut cell = Self::new(address);
        cell.value = value;
        cell.set_shared_style(style);
        cell
    }

    /// Where this cell lives
    pub fn address(&self) -> CellAddress {
        self.address
    }

    /// The stored value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Replace the stored value
    pub fn set_value(&mut self, value: CellValue) {
        self.value = value;
    }

    /// The explicit style, if any
    pub fn style(&self) -> Option<&Style> {
        self.style.as_deref()
    }

    /// The explicit style as a shared handle
    pub fn shared_style(&self) -> Option<&Arc<Style>> {
        self.style.as_ref()
    }

    /// Replace the explicit style
    pub fn set_style(&mut self, style: Option<Style>) {
        self.set_shared_style(style.map(Arc::new));
    }

    /// Replace the explicit style with an existing handle
    ///
    /// An empty style is stored as `None`.
    pub fn set_shared_style(&mut self, style: Option<Arc<Style>>) {
        self.style = style.filter(|s| !s.is_empty());
    }

    /// Mutable access to the explicit style, creating an empty one if needed
    ///
    /// Copies the style first if it is shared with other owners.
    pub fn style_mut(&mut self) -> &mut Style {
        Arc::make_mut(self.style.get_or_insert_with(Default::default))
    }

    /// Top-left cell of the merge range this cell was merged into
    pub fn master(&self) -> Option<CellAddress> {
        self.master
    }

    pub(crate) fn set_master(&mut self, master: Option<CellAddress>) {
        self.master = master;
    }

    /// True for a cell merged away under another master
    pub fn is_merged_away(&self) -> bool {
        self.master.is_some_and(|m| m != self.address)
    }

    /// True when the cell carries neither a value nor a style
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.is_none()
    }

    pub(crate) fn normalize_style(&mut self) {
        if self.style.as_ref().is_some_and(|s| s.is_empty()) {
            self.style = None;
        }
    }
}

/// Read-only view of one address
///
/// Produced for materialized and unmaterialized addresses alike; reading never
/// creates storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    /// The address that was asked for
    pub address: CellAddress,
    /// Value (from the merge master for merged-away cells)
    pub value: CellValue,
    /// Effective style after row/column resolution
    pub style: Style,
    /// Whether a cell exists at this address
    pub materialized: bool,
}
