//! Type-safe enumerations for record status.
//!
//! The backend stores status as a one-letter code (`L` for *Libre*, `V` for
//! *Vendido*). These enums keep that wire format at the serde boundary and
//! expose the Spanish display labels used in tables and exports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estado {
    /// Available for sale (`L`).
    #[default]
    #[serde(rename = "L")]
    Free,

    /// Sold (`V`).
    #[serde(rename = "V")]
    Sold,
}

impl Estado {
    /// Returns the wire code stored by the backend.
    pub fn as_code(&self) -> &'static str {
        match self {
            Estado::Free => "L",
            Estado::Sold => "V",
        }
    }

    /// Returns the localized label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Estado::Free => "Libre",
            Estado::Sold => "Vendido",
        }
    }

    /// Returns true if the device has been sold.
    pub fn is_sold(&self) -> bool {
        matches!(self, Estado::Sold)
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Estado {
    type Err = String;

    /// Parse a status from a wire code, a Spanish label, or an English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "L" | "LIBRE" | "FREE" => Ok(Estado::Free),
            "V" | "VENDIDO" | "SOLD" => Ok(Estado::Sold),
            _ => Err(format!("Unknown estado: {s}")),
        }
    }
}

/// Status filter applied to the visible view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    /// No status restriction.
    #[default]
    All,
    /// Only free records.
    Free,
    /// Only sold records.
    Sold,
}

impl StateFilter {
    /// Returns true if a record with the given status passes the filter.
    pub fn matches(&self, estado: Estado) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Free => estado == Estado::Free,
            StateFilter::Sold => estado == Estado::Sold,
        }
    }

    /// Returns the localized label.
    pub fn label(&self) -> &'static str {
        match self {
            StateFilter::All => "Todos",
            StateFilter::Free => "Libre",
            StateFilter::Sold => "Vendido",
        }
    }
}

impl From<Estado> for StateFilter {
    fn from(estado: Estado) -> Self {
        match estado {
            Estado::Free => StateFilter::Free,
            Estado::Sold => StateFilter::Sold,
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "ALL" | "TODOS" | "" => Ok(StateFilter::All),
            other => other
                .parse::<Estado>()
                .map(StateFilter::from)
                .map_err(|_| format!("Unknown state filter: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_from_str() {
        assert_eq!("L".parse::<Estado>().unwrap(), Estado::Free);
        assert_eq!("vendido".parse::<Estado>().unwrap(), Estado::Sold);
        assert_eq!(" sold ".parse::<Estado>().unwrap(), Estado::Sold);
        assert!("X".parse::<Estado>().is_err());
    }

    #[test]
    fn test_state_filter_matches() {
        assert!(StateFilter::All.matches(Estado::Free));
        assert!(StateFilter::All.matches(Estado::Sold));
        assert!(StateFilter::Sold.matches(Estado::Sold));
        assert!(!StateFilter::Sold.matches(Estado::Free));
        assert!(!StateFilter::Free.matches(Estado::Sold));
    }

    #[test]
    fn test_state_filter_from_str() {
        assert_eq!("all".parse::<StateFilter>().unwrap(), StateFilter::All);
        assert_eq!("V".parse::<StateFilter>().unwrap(), StateFilter::Sold);
        assert_eq!("libre".parse::<StateFilter>().unwrap(), StateFilter::Free);
        assert!("pending".parse::<StateFilter>().is_err());
    }
}
