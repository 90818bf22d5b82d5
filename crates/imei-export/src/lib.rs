//! Export document assembly for the IMEI inventory.
//!
//! Documents are assembled fully in memory and only then written to disk
//! (see [`output::write_document`]), so a failed export never leaves a
//! partial file behind.

pub mod audit;
pub mod delimited;
pub mod error;
pub mod format;
pub mod output;
pub mod table;
pub mod xlsx;

pub use audit::{
    AUDIT_SHEET, AuditDocument, AuditForm, AuditInfo, Auditor, SoldEntry, build_audit_export,
};
pub use delimited::to_csv;
pub use error::{ExportError, Result};
pub use format::DateFormatter;
pub use output::{ExportFormat, ExportRequest, audit_file_name, flat_file_name, write_document};
pub use table::{FLAT_HEADERS, IMEIS_SHEET, Table, build_flat_export};
pub use xlsx::{Sheet, Workbook};
