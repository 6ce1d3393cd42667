//! Persisted workbook representation
//!
//! The cross-referenced form a workbook takes on disk, independent of the
//! markup: facet lists and composite style records addressed by id, a
//! shared-string list addressed by index, and per-sheet row, column and cell
//! records that point into both. [`encode`](crate::encode) produces it from
//! a [`Workbook`](sheetcraft_core::Workbook) and [`decode`](crate::decode)
//! turns it back; the reader and writer only translate it to and from parts.

use chrono::NaiveDateTime;
use sheetcraft_core::{
    BorderStyle, CellError, CellRange, DocumentProperties, FillStyle, FontStyle, FreezePanes,
    RichText, StyleTable, XfRecord,
};

use crate::error::XlsxResult;

/// Everything one XLSX package stores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedWorkbook {
    pub properties: DocumentProperties,
    /// Sheets in display order
    pub sheets: Vec<PersistedSheet>,
    pub active_sheet: usize,
    pub styles: StyleLists,
    pub shared_strings: Vec<SharedStringItem>,
}

impl PersistedWorkbook {
    /// Number of cells that point into the shared-string list
    pub fn string_references(&self) -> usize {
        self.sheets
            .iter()
            .flat_map(|sheet| &sheet.rows)
            .flat_map(|row| &row.cells)
            .filter(|cell| matches!(cell.value, ValueDescriptor::SharedString(_)))
            .count()
    }
}

/// The style lists of `styles.xml`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleLists {
    /// Custom number formats only; built-ins are implied by their id
    pub num_fmts: Vec<(u32, String)>,
    pub fonts: Vec<FontStyle>,
    pub fills: Vec<FillStyle>,
    pub borders: Vec<BorderStyle>,
    /// Composite records; position is the id cells refer to
    pub cell_xfs: Vec<XfRecord>,
}

impl StyleLists {
    /// Snapshot the lists of a populated table
    pub fn from_table(table: &StyleTable) -> Self {
        Self {
            num_fmts: table.custom_num_fmts().collect(),
            fonts: table.fonts().to_vec(),
            fills: table.fills().to_vec(),
            borders: table.borders().to_vec(),
            cell_xfs: table.records().to_vec(),
        }
    }

    /// Rebuild a table, validating every cross-reference
    pub fn into_table(self) -> XlsxResult<StyleTable> {
        Ok(StyleTable::from_records(
            self.num_fmts,
            self.fonts,
            self.fills,
            self.borders,
            self.cell_xfs,
        )?)
    }
}

/// One entry of the shared-string table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SharedStringItem {
    Plain(String),
    Rich(RichText),
}

impl SharedStringItem {
    /// Text without formatting
    pub fn plain_text(&self) -> String {
        match self {
            SharedStringItem::Plain(s) => s.clone(),
            SharedStringItem::Rich(rt) => rt.plain_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSheet {
    pub name: String,
    pub visible: bool,
    /// Rows in ascending order
    pub rows: Vec<RowRecord>,
    /// Column ranges in ascending order, adjacent identical columns merged
    pub columns: Vec<ColumnRecord>,
    pub merges: Vec<CellRange>,
    pub freeze_panes: Option<FreezePanes>,
}

impl PersistedSheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            visible: true,
            rows: Vec::new(),
            columns: Vec::new(),
            merges: Vec::new(),
            freeze_panes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowRecord {
    pub number: u32,
    pub height: Option<f64>,
    pub hidden: bool,
    pub outline_level: u8,
    /// Composite id of the row default style
    pub style_id: Option<u32>,
    /// Cells in ascending column order
    pub cells: Vec<CellRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    pub column: u16,
    pub value: ValueDescriptor,
    /// Composite id of the explicit style; `None` when the cell has none
    pub style_id: Option<u32>,
}

/// A cell value as stored: scalars inline, strings usually by reference
#[derive(Debug, Clone, PartialEq)]
pub enum ValueDescriptor {
    Blank,
    Number(f64),
    Boolean(bool),
    Error(CellError),
    Date(NaiveDateTime),
    /// Index into the shared-string list
    SharedString(u32),
    InlineString(String),
    /// Formula text without the leading `=`, plus the last computed result
    Formula {
        text: String,
        cached: Option<Box<ValueDescriptor>>,
    },
}

impl ValueDescriptor {
    pub fn is_blank(&self) -> bool {
        matches!(self, ValueDescriptor::Blank)
    }
}

/// A run of columns sharing the same settings
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRecord {
    pub min: u16,
    pub max: u16,
    pub width: Option<f64>,
    pub hidden: bool,
    pub outline_level: u8,
    pub style_id: Option<u32>,
}
