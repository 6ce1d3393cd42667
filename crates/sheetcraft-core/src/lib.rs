//! # sheetcraft-core
//!
//! In-memory spreadsheet document model for sheetcraft.
//!
//! - [`Workbook`], [`Worksheet`], [`Row`], [`Column`], [`Cell`]: the document graph
//! - [`CellValue`] and [`RichText`]: what cells hold
//! - [`CellAddress`] and [`CellRange`]: 1-based A1 addressing
//! - [`Style`]: six optional facets (number format, font, fill, border,
//!   alignment, protection)
//! - [`resolve`]: how row and column defaults combine into a cell's style
//! - [`StyleTable`]: style interning for persistence
//!
//! ## Example
//!
//! ```rust
//! use sheetcraft_core::{FontStyle, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.add_worksheet("Sheet1").unwrap();
//!
//! sheet.set_value("A1", "Hello").unwrap();
//! sheet.set_row_facet(1, FontStyle::new().with_bold(true)).unwrap();
//!
//! // A1 existed, so the row write restyled it; B1 inherits on read.
//! assert!(sheet.effective_style("A1").unwrap().font.unwrap().bold);
//! assert!(sheet.effective_style("B1").unwrap().font.unwrap().bold);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod resolve;
pub mod row;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{
    Cell, CellAddress, CellError, CellRange, CellValue, CellView, IntoAddress, IntoRange,
    RichText, RichTextRun, SharedString,
};
pub use column::Column;
pub use error::{Error, Result, StyleRefKind};
pub use resolve::StylePrecedence;
pub use row::Row;
pub use workbook::{DocumentProperties, Workbook, WorkbookSettings};
pub use worksheet::{FreezePanes, Worksheet};

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, DiagonalDirection, Facet,
    FacetValue, FillStyle, FontStyle, FontVerticalAlign, GradientStop, GradientType,
    HorizontalAlignment, NumberFormat, PatternType, Protection, ReadingOrder, Style, StyleTable,
    Underline, VerticalAlignment, XfRecord,
};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
