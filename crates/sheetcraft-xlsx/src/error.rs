//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Failure of the zip container or the file underneath it
#[derive(Debug, Error)]
pub enum ContainerFault {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// The container could not be opened or read
    #[error("Cannot read container: {0}")]
    ContainerRead(#[source] ContainerFault),

    /// The container could not be written or published
    #[error("Cannot write container: {0}")]
    ContainerWrite(#[source] ContainerFault),

    /// Malformed markup in one part
    #[error("XML error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A cell carries a value type code this reader does not know
    #[error("Unsupported value type '{kind}' in cell {cell}")]
    UnsupportedValueType { cell: String, kind: String },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetcraft_core::Error),
}

impl XlsxError {
    pub(crate) fn read<E: Into<ContainerFault>>(err: E) -> Self {
        XlsxError::ContainerRead(err.into())
    }

    pub(crate) fn write<E: Into<ContainerFault>>(err: E) -> Self {
        XlsxError::ContainerWrite(err.into())
    }

    pub(crate) fn xml(part: &str) -> impl FnOnce(quick_xml::Error) -> Self + '_ {
        move |source| XlsxError::Xml {
            part: part.to_string(),
            source,
        }
    }
}
