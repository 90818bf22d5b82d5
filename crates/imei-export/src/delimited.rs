//! Comma-separated rendering of a [`Table`].

use csv::{Terminator, WriterBuilder};

use crate::error::{ExportError, Result};
use crate::table::Table;

/// Serialize `table` as UTF-8 CSV with a header row.
pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_cells_with_delimiters() {
        let mut table = Table::new(&["IMEI", "NOTA"]);
        table.rows.push(vec!["1".to_string(), "a, b".to_string()]);
        let csv = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(csv, "IMEI,NOTA\n1,\"a, b\"\n");
    }

    #[test]
    fn mismatched_row_width_fails() {
        let mut table = Table::new(&["A", "B"]);
        table.rows.push(vec!["only-one".to_string()]);
        assert!(matches!(to_csv(&table), Err(ExportError::Csv(_))));
    }
}
