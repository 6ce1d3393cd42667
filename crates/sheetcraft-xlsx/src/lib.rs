//! # sheetcraft-xlsx
//!
//! XLSX (Office Open XML) reader and writer for sheetcraft.
//!
//! Saving goes workbook -> [`encode`] -> [`PersistedWorkbook`] -> parts ->
//! zip; loading runs the same steps backwards through [`decode`]. The style
//! table that maps styles to ids lives only for one of those passes.
//!
//! ```no_run
//! use sheetcraft_core::Workbook;
//! use sheetcraft_xlsx::{XlsxReader, XlsxWriter};
//!
//! let mut wb = Workbook::new();
//! wb.add_worksheet("Sheet1")?.set_value("A1", "hello")?;
//! XlsxWriter::write_file(&wb, "hello.xlsx")?;
//!
//! let loaded = XlsxReader::read_file("hello.xlsx")?;
//! assert_eq!(loaded.sheet_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod reader;
pub mod writer;

mod shared_strings;
mod styles;
mod xml;

pub use decode::decode;
pub use document::{
    CellRecord, ColumnRecord, PersistedSheet, PersistedWorkbook, RowRecord, SharedStringItem,
    StyleLists, ValueDescriptor,
};
pub use encode::encode;
pub use error::{ContainerFault, XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
