//! Error taxonomy shared across the inventory crates.
//!
//! Every failure is recoverable: callers display [`InventoryError::user_message`]
//! and keep their prior state.

use thiserror::Error;

use crate::record::RecordId;

/// Input that failed a client-side check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// IMEI field left blank on create or edit.
    #[error("IMEI is required")]
    MissingImei,

    /// Export attempted without every record selected.
    #[error("{} record(s) not selected: {}", missing_imeis.len(), missing_imeis.join(", "))]
    IncompleteSelection {
        /// IMEIs of the unselected records, in collection order.
        missing_imeis: Vec<String>,
    },

    /// Auditor national id is not exactly eight digits.
    #[error("auditor {auditor}: national id {value:?} must be 8 digits")]
    MalformedNationalId {
        /// One-based auditor position.
        auditor: usize,
        value: String,
    },

    /// Auditor name field left blank.
    #[error("auditor {auditor}: {field} is required")]
    MissingAuditorField {
        /// One-based auditor position.
        auditor: usize,
        field: &'static str,
    },

    /// Commit requested with no edit in progress.
    #[error("no record is being edited")]
    NothingToEdit,

    /// Id does not belong to the current collection.
    #[error("unknown record id {0}")]
    UnknownRecord(RecordId),
}

impl ValidationError {
    /// Localized message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingImei => "El campo IMEI es obligatorio".to_string(),
            Self::IncompleteSelection { missing_imeis } => format!(
                "Debe seleccionar todos los IMEIs antes de exportar. Faltan: {}",
                missing_imeis.join(", ")
            ),
            Self::MalformedNationalId { auditor, .. } => {
                format!("El DNI del auditor {auditor} debe tener 8 dígitos")
            }
            Self::MissingAuditorField { auditor, field } => {
                format!("Complete el campo {field} del auditor {auditor}")
            }
            Self::NothingToEdit => "No hay ningún IMEI en edición".to_string(),
            Self::UnknownRecord(id) => format!("El registro {id} ya no existe"),
        }
    }
}

/// Top-level failure families.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InventoryError {
    /// Request could not complete or returned an error status.
    #[error("network error: {detail}")]
    Network {
        /// Technical description, for logs.
        detail: String,
        /// Localized explanation chosen by the store for this failure.
        message: &'static str,
    },

    /// Client-side input check failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Export document could not be serialized or written.
    #[error("export assembly error: {0}")]
    Assembly(String),
}

impl InventoryError {
    /// Network failure with the generic localized message.
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
            message: "No se pudo comunicar con el servidor de IMEIs. Intente nuevamente.",
        }
    }

    /// Returns a user-friendly message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { message, .. } => (*message).to_string(),
            Self::Validation(err) => err.user_message(),
            Self::Assembly(_) => "No se pudo generar el archivo de exportación.".to_string(),
        }
    }

    /// Returns the validation detail, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Assembly(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
