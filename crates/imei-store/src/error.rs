//! Error types for the record store.

use thiserror::Error;

use imei_model::InventoryError;

/// Errors that can occur while talking to the record backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message taken from the `{error}` payload, or the raw body.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The HTTP client could not be constructed.
    #[error("client setup error: {0}")]
    Setup(String),
}

impl StoreError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Setup(_) => {
                "No se pudo conectar con el servidor. Verifique su conexión."
            }
            Self::Status { status, .. } if *status == 404 => "El IMEI solicitado no existe.",
            Self::Status { .. } => "El servidor rechazó la operación.",
            Self::JsonParse(_) => "La respuesta del servidor no es válida.",
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::JsonParse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

impl From<StoreError> for InventoryError {
    fn from(err: StoreError) -> Self {
        InventoryError::Network {
            detail: err.to_string(),
            message: err.user_message(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = StoreError::Network("connection refused".to_string());
        assert!(err.user_message().contains("conexión"));

        let err = StoreError::Status {
            status: 404,
            message: "IMEI no encontrado".to_string(),
        };
        assert!(err.user_message().contains("no existe"));
    }

    #[test]
    fn test_converts_into_network_failure() {
        let err: InventoryError = StoreError::Status {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, InventoryError::Network { ref detail, .. } if detail.contains("500")));
        assert_eq!(err.user_message(), "El servidor rechazó la operación.");
    }

    #[test]
    fn test_not_found_message_reaches_inventory_error() {
        let err: InventoryError = StoreError::Status {
            status: 404,
            message: "IMEI 7 no encontrado".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "El IMEI solicitado no existe.");
    }
}
