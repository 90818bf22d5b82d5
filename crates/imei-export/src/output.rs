//! Output formats, default file names, and writing documents to disk.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use imei_model::{InventoryError, Record};

use crate::audit::{AuditForm, build_audit_export};
use crate::delimited::to_csv;
use crate::error::Result;
use crate::format::DateFormatter;
use crate::table::{IMEIS_SHEET, build_flat_export};
use crate::xlsx::{Sheet, Workbook};

/// Serialization format of the flat export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Default name of the flat export.
pub fn flat_file_name(format: ExportFormat) -> String {
    format!("imeis_completos.{}", format.extension())
}

/// Default name of the audit export, dated with the export day.
pub fn audit_file_name(date: NaiveDate) -> String {
    format!("imeis_auditoria_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Which document to produce.
///
/// Selection is not checked here: callers pass the records returned by
/// `InventoryState::records_for_export`, which refuses partial selections.
/// Only the audit form is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    Flat(ExportFormat),
    Audit(AuditForm),
}

impl ExportRequest {
    pub fn default_file_name(&self, today: NaiveDate) -> String {
        match self {
            Self::Flat(format) => flat_file_name(*format),
            Self::Audit(_) => audit_file_name(today),
        }
    }

    /// Validate the audit form, if any, and serialize the document in memory.
    pub fn assemble(
        &self,
        records: &[Record],
        exported_at: DateTime<Utc>,
        dates: &DateFormatter,
    ) -> std::result::Result<Vec<u8>, InventoryError> {
        let bytes = match self {
            Self::Flat(ExportFormat::Csv) => to_csv(&build_flat_export(records, dates))?,
            Self::Flat(ExportFormat::Xlsx) => {
                let table = build_flat_export(records, dates);
                Workbook::new()
                    .with_sheet(Sheet::new(IMEIS_SHEET, table.to_rows()))
                    .to_xlsx()?
            }
            Self::Audit(form) => {
                form.validate()?;
                build_audit_export(
                    records,
                    form.auditors(),
                    &form.observations,
                    exported_at,
                    dates,
                )
                .to_workbook()
                .to_xlsx()?
            }
        };
        Ok(bytes)
    }
}

/// Write `bytes` to `path` atomically.
///
/// The content goes to a temporary file in the destination directory which is
/// then renamed over `path`; on failure nothing is left at `path`.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    debug!(temp = %temp.path().display(), "export staged");
    temp.persist(path).map_err(|err| err.error)?;

    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(())
}
