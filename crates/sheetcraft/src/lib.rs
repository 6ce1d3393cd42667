//! # sheetcraft
//!
//! A Rust library for building, styling and persisting spreadsheet documents.
//!
//! ## Features
//!
//! - Sparse workbook/worksheet/cell model with A1 addressing
//! - Six-facet cell styles (number format, font, fill, border, alignment,
//!   protection) with row and column defaults
//! - Rich text values
//! - Read and write XLSX files (Office Open XML), with atomic saves
//!
//! ## Example
//!
//! ```rust
//! use sheetcraft::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.add_worksheet("Basket").unwrap();
//!
//! sheet.set_value("A1", "Apples").unwrap();
//! sheet.set_value("B1", 3).unwrap();
//!
//! // Row defaults restyle existing cells and seed new ones
//! sheet.set_row_facet(1, FontStyle::new().with_bold(true)).unwrap();
//! assert!(sheet.effective_style("C1").unwrap().font.unwrap().bold);
//!
//! // workbook.save("basket.xlsx").unwrap();
//! ```

pub mod prelude;

pub use sheetcraft_core::{
    // Cell types
    Cell,
    CellAddress,
    CellError,
    CellRange,
    CellValue,
    CellView,
    Column,
    // Style types
    Alignment,
    BorderEdge,
    BorderLineStyle,
    BorderStyle,
    Color,
    DiagonalDirection,
    DocumentProperties,
    // Error types
    Error,
    Facet,
    FacetValue,
    FillStyle,
    FontStyle,
    FontVerticalAlign,
    FreezePanes,
    GradientStop,
    GradientType,
    HorizontalAlignment,
    NumberFormat,
    PatternType,
    Protection,
    ReadingOrder,
    Result,
    RichText,
    RichTextRun,
    Row,
    Style,
    StylePrecedence,
    StyleRefKind,
    StyleTable,
    Underline,
    VerticalAlignment,
    // Main types
    Workbook,
    WorkbookSettings,
    Worksheet,
    // Constants
    MAX_COLS,
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

#[cfg(feature = "xlsx")]
pub use sheetcraft_xlsx::{XlsxError, XlsxReader, XlsxWriter};

#[cfg(feature = "xlsx")]
pub use file::{FileError, FileResult, WorkbookExt};

#[cfg(feature = "xlsx")]
mod file {
    use std::path::{Path, PathBuf};

    use sheetcraft_core::Workbook;
    use sheetcraft_xlsx::{XlsxError, XlsxReader, XlsxWriter};
    use thiserror::Error;

    /// Result type for [`WorkbookExt`]
    pub type FileResult<T> = std::result::Result<T, FileError>;

    /// Errors from opening or saving a workbook by path
    #[derive(Debug, Error)]
    pub enum FileError {
        /// The extension names no supported format
        #[error("Unsupported file format: {}", .0.display())]
        UnsupportedFormat(PathBuf),

        /// Reading or writing the package failed
        #[error(transparent)]
        Xlsx(#[from] XlsxError),
    }

    /// Extension trait for Workbook to add file I/O
    pub trait WorkbookExt: Sized {
        /// Open a workbook from a file
        fn open<P: AsRef<Path>>(path: P) -> FileResult<Self>;

        /// Save the workbook to a file
        ///
        /// An existing file is replaced only once the new one is complete.
        fn save<P: AsRef<Path>>(&self, path: P) -> FileResult<()>;
    }

    fn is_xlsx(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xlsm"))
    }

    impl WorkbookExt for Workbook {
        fn open<P: AsRef<Path>>(path: P) -> FileResult<Workbook> {
            let path = path.as_ref();
            if !is_xlsx(path) {
                return Err(FileError::UnsupportedFormat(path.to_path_buf()));
            }
            Ok(XlsxReader::read_file(path)?)
        }

        fn save<P: AsRef<Path>>(&self, path: P) -> FileResult<()> {
            let path = path.as_ref();
            if !is_xlsx(path) {
                return Err(FileError::UnsupportedFormat(path.to_path_buf()));
            }
            Ok(XlsxWriter::write_file(self, path)?)
        }
    }
}
