//! Error types for sheetcraft-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Which persisted style list a dangling reference pointed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRefKind {
    /// Number format id
    NumFmt,
    /// Font list position
    Font,
    /// Fill list position
    Fill,
    /// Border list position
    Border,
    /// Composite cell style (xf) position
    CellStyle,
}

impl std::fmt::Display for StyleRefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StyleRefKind::NumFmt => "number format",
            StyleRefKind::Font => "font",
            StyleRefKind::Fill => "fill",
            StyleRefKind::Border => "border",
            StyleRefKind::CellStyle => "cell style",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in sheetcraft-core
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed A1-style address text
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Malformed range text
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row number outside 1..=max
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column number outside 1..=max
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// A persisted cross-reference has no matching style table entry
    #[error("Unknown {kind} reference: {id}")]
    UnknownStyleReference {
        /// List the id was looked up in
        kind: StyleRefKind,
        /// The dangling id
        id: u32,
    },

    /// A persisted custom number format id leaves no room for new ids
    #[error("Number format id {0} out of range")]
    NumberFormatIdOutOfRange(u32),

    /// Merged cell conflict
    #[error("Cell {0} is part of a merged region")]
    MergedCellConflict(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Shorthand for a dangling style reference
    pub fn unknown_style(kind: StyleRefKind, id: u32) -> Self {
        Error::UnknownStyleReference { kind, id }
    }
}
