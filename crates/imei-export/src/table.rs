//! Flat tabular export of the record collection.

use imei_model::Record;

use crate::format::DateFormatter;

/// Sheet holding the flat record table.
pub const IMEIS_SHEET: &str = "IMEIs";

/// Column headers of the flat export. The record id is never exported.
pub const FLAT_HEADERS: [&str; 4] = [
    "IMEI",
    "ESTADO",
    "FECHA DE INGRESO",
    "FECHA DE ACTUALIZACIÓN",
];

/// Header row plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row followed by the data rows.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.headers.clone());
        rows.extend(self.rows.iter().cloned());
        rows
    }
}

/// One row per record: IMEI, localized status, created and updated dates.
pub fn build_flat_export(records: &[Record], dates: &DateFormatter) -> Table {
    let mut table = Table::new(&FLAT_HEADERS);
    table.rows = records
        .iter()
        .map(|record| {
            vec![
                record.imei.clone(),
                record.estado.label().to_string(),
                dates.format(&record.created_at),
                dates.format(&record.updated_at),
            ]
        })
        .collect();
    table
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use imei_model::{Estado, RecordId};

    use super::*;

    #[test]
    fn single_record_row_has_no_id() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 12, 18, 30, 0).unwrap();
        let records = vec![Record {
            id: RecordId::from("secret-id"),
            imei: "A".to_string(),
            estado: Estado::Free,
            created_at: t1,
            updated_at: t2,
        }];
        let dates = DateFormatter::utc();
        let table = build_flat_export(&records, &dates);

        assert_eq!(table.headers, FLAT_HEADERS);
        assert_eq!(
            table.rows,
            vec![vec![
                "A".to_string(),
                "Libre".to_string(),
                dates.format(&t1),
                dates.format(&t2),
            ]]
        );
        assert!(!table.rows[0].iter().any(|cell| cell == "secret-id"));
    }

    #[test]
    fn empty_collection_yields_header_only() {
        let table = build_flat_export(&[], &DateFormatter::utc());
        assert!(table.is_empty());
        assert_eq!(table.to_rows().len(), 1);
    }
}
