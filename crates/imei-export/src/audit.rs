//! Audit export: the flat table plus an auditor sign-off sheet.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use imei_model::{Record, ValidationError};

use crate::format::DateFormatter;
use crate::table::{IMEIS_SHEET, Table, build_flat_export};
use crate::xlsx::{Sheet, Workbook};

/// Sheet holding the auditor metadata.
pub const AUDIT_SHEET: &str = "Información de Auditoría";

static NATIONAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("national id regex is valid"));

/// Identity of one auditor signing the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auditor {
    pub given_names: String,
    pub surnames: String,
    /// Eight-digit national identity document number.
    pub national_id: String,
}

impl Auditor {
    pub fn new(
        given_names: impl Into<String>,
        surnames: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            given_names: given_names.into(),
            surnames: surnames.into(),
            national_id: national_id.into(),
        }
    }

    /// Check this auditor's fields. `position` is one-based.
    pub fn validate(&self, position: usize) -> Result<(), ValidationError> {
        if self.given_names.trim().is_empty() {
            return Err(ValidationError::MissingAuditorField {
                auditor: position,
                field: "Nombres",
            });
        }
        if self.surnames.trim().is_empty() {
            return Err(ValidationError::MissingAuditorField {
                auditor: position,
                field: "Apellidos",
            });
        }
        if !NATIONAL_ID.is_match(self.national_id.trim()) {
            return Err(ValidationError::MalformedNationalId {
                auditor: position,
                value: self.national_id.clone(),
            });
        }
        Ok(())
    }
}

/// Auditor list and observations entered before an audit export.
///
/// The list never drops below one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditForm {
    auditors: Vec<Auditor>,
    pub observations: String,
}

impl Default for AuditForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditForm {
    /// Form with a single blank auditor.
    pub fn new() -> Self {
        Self {
            auditors: vec![Auditor::default()],
            observations: String::new(),
        }
    }

    /// Form pre-filled with `auditors`; falls back to one blank entry when
    /// the list is empty.
    pub fn with_auditors(auditors: Vec<Auditor>) -> Self {
        if auditors.is_empty() {
            return Self::new();
        }
        Self {
            auditors,
            observations: String::new(),
        }
    }

    pub fn auditors(&self) -> &[Auditor] {
        &self.auditors
    }

    pub fn auditor_mut(&mut self, index: usize) -> Option<&mut Auditor> {
        self.auditors.get_mut(index)
    }

    /// Append a blank auditor entry.
    pub fn add_auditor(&mut self) {
        self.auditors.push(Auditor::default());
    }

    /// Remove the entry at `index`. Returns `false` (and changes nothing)
    /// when only one entry remains or the index is out of range.
    pub fn remove_auditor(&mut self, index: usize) -> bool {
        if self.auditors.len() <= 1 || index >= self.auditors.len() {
            return false;
        }
        self.auditors.remove(index);
        true
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.auditors
            .iter()
            .enumerate()
            .try_for_each(|(idx, auditor)| auditor.validate(idx + 1))
    }
}

/// SOLD record as listed in the audit sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldEntry {
    pub imei: String,
    /// Formatted `updatedAt`.
    pub updated_at: String,
}

/// Contents of the audit metadata sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditInfo {
    /// Formatted export timestamp.
    pub exported_at: String,
    pub auditors: Vec<Auditor>,
    pub sold: Vec<SoldEntry>,
    /// Trimmed observations; `None` when blank.
    pub observations: Option<String>,
}

impl AuditInfo {
    pub fn sold_count(&self) -> usize {
        self.sold.len()
    }

    pub fn total_line(&self) -> String {
        format!("Total de series vendidas: {}", self.sold_count())
    }

    /// Sheet layout, one labeled row per value, blank rows between blocks.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![
            row(["Fecha de exportación", self.exported_at.as_str()]),
            Vec::new(),
        ];

        for (idx, auditor) in self.auditors.iter().enumerate() {
            rows.push(vec![format!("Auditor {}", idx + 1)]);
            rows.push(row(["Nombres", auditor.given_names.trim()]));
            rows.push(row(["Apellidos", auditor.surnames.trim()]));
            rows.push(row(["DNI", auditor.national_id.trim()]));
            rows.push(Vec::new());
        }

        rows.push(row(["Series vendidas"]));
        rows.push(row(["IMEI", "FECHA DE ACTUALIZACIÓN"]));
        for entry in &self.sold {
            rows.push(row([entry.imei.as_str(), entry.updated_at.as_str()]));
        }
        rows.push(vec![self.total_line()]);

        if let Some(observations) = &self.observations {
            rows.push(Vec::new());
            rows.push(row(["Observaciones"]));
            rows.push(row([observations.as_str()]));
        }
        rows
    }
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

/// Two-sheet audit export, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDocument {
    pub imeis: Table,
    pub info: AuditInfo,
}

impl AuditDocument {
    pub fn to_workbook(&self) -> Workbook {
        Workbook::new()
            .with_sheet(Sheet::new(IMEIS_SHEET, self.imeis.to_rows()))
            .with_sheet(Sheet::new(AUDIT_SHEET, self.info.to_rows()))
    }
}

/// Assemble the audit export over `records`.
///
/// Auditor fields are taken as given; run [`AuditForm::validate`] first.
pub fn build_audit_export(
    records: &[Record],
    auditors: &[Auditor],
    observations: &str,
    exported_at: DateTime<Utc>,
    dates: &DateFormatter,
) -> AuditDocument {
    let sold: Vec<SoldEntry> = records
        .iter()
        .filter(|record| record.estado.is_sold())
        .map(|record| SoldEntry {
            imei: record.imei.clone(),
            updated_at: dates.format(&record.updated_at),
        })
        .collect();

    let observations = observations.trim();
    let info = AuditInfo {
        exported_at: dates.format(&exported_at),
        auditors: auditors.to_vec(),
        sold,
        observations: (!observations.is_empty()).then(|| observations.to_string()),
    };
    debug!(
        records = records.len(),
        sold = info.sold_count(),
        auditors = info.auditors.len(),
        "audit export assembled"
    );

    AuditDocument {
        imeis: build_flat_export(records, dates),
        info,
    }
}
