//! Error types for export assembly.

use thiserror::Error;

use imei_model::InventoryError;

/// Errors raised while serializing or writing an export document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("CSV serialization error: {0}")]
    Csv(String),

    #[error("XML serialization error: {0}")]
    Xml(String),

    #[error("spreadsheet packaging error: {0}")]
    Zip(String),

    /// Sheet name rejected by the spreadsheet format.
    #[error("invalid sheet name {0:?}")]
    SheetName(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<quick_xml::Error> for ExportError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Zip(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ExportError> for InventoryError {
    fn from(err: ExportError) -> Self {
        InventoryError::Assembly(err.to_string())
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
