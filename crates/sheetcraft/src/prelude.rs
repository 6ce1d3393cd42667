//! Prelude module - common imports for sheetcraft users
//!
//! ```rust
//! use sheetcraft::prelude::*;
//! ```

pub use crate::{
    // Style types
    Alignment,
    BorderLineStyle,
    BorderStyle,
    // Cell types
    CellAddress,
    CellError,
    CellRange,
    CellValue,
    Color,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    HorizontalAlignment,
    NumberFormat,
    Protection,
    Result,
    RichText,
    Style,
    StylePrecedence,
    VerticalAlignment,
    // Main types
    Workbook,
    Worksheet,
};

#[cfg(feature = "xlsx")]
pub use crate::{WorkbookExt, XlsxReader, XlsxWriter};
