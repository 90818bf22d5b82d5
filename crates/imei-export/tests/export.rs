//! Export assembly and serialization tests.

use std::io::{Cursor, Read};

use chrono::{DateTime, TimeZone, Utc};
use zip::ZipArchive;

use imei_export::{
    AUDIT_SHEET, AuditForm, Auditor, DateFormatter, ExportFormat, ExportRequest, IMEIS_SHEET,
    build_audit_export, build_flat_export, to_csv, write_document,
};
use imei_model::{Estado, Record, RecordId};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

fn record(
    id: u64,
    imei: &str,
    estado: Estado,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Record {
    Record {
        id: RecordId::from(id),
        imei: imei.to_string(),
        estado,
        created_at: created,
        updated_at: updated,
    }
}

/// Five records, two of them sold.
fn inventory() -> Vec<Record> {
    vec![
        record(1, "111111111111111", Estado::Free, at(2024, 1, 10, 9, 0, 0), at(2024, 1, 10, 9, 0, 0)),
        record(2, "222222222222222", Estado::Sold, at(2024, 1, 11, 10, 15, 0), at(2024, 2, 1, 16, 45, 30)),
        record(3, "333333333333333", Estado::Free, at(2024, 1, 12, 8, 0, 0), at(2024, 1, 12, 8, 0, 0)),
        record(4, "444444444444444", Estado::Sold, at(2024, 1, 13, 12, 0, 0), at(2024, 2, 20, 3, 30, 0)),
        record(5, "555555555555555", Estado::Free, at(2024, 1, 14, 12, 0, 0), at(2024, 1, 14, 12, 0, 0)),
    ]
}

fn lima() -> DateFormatter {
    DateFormatter::from_offset_minutes(-300).unwrap()
}

fn auditor() -> Auditor {
    Auditor::new("Ana María", "Quispe Rojas", "12345678")
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    contents
}

fn render_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn flat_csv_snapshot() {
    let table = build_flat_export(&inventory()[..3], &DateFormatter::utc());
    let csv = String::from_utf8(to_csv(&table).unwrap()).unwrap();
    insta::assert_snapshot!("flat_export_csv", csv);
}

#[test]
fn audit_counts_sold_records() {
    let doc = build_audit_export(
        &inventory(),
        &[auditor()],
        "",
        at(2024, 3, 1, 15, 0, 0),
        &lima(),
    );
    assert_eq!(doc.imeis.rows.len(), 5);
    assert_eq!(doc.info.sold_count(), 2);

    let rows = doc.info.to_rows();
    assert!(rows.contains(&vec!["Total de series vendidas: 2".to_string()]));
    assert!(rows.contains(&vec![
        "222222222222222".to_string(),
        "01/02/2024 11:45:30".to_string(),
    ]));
    assert!(rows.contains(&vec![
        "444444444444444".to_string(),
        "19/02/2024 22:30:00".to_string(),
    ]));
    assert!(doc.info.observations.is_none());
}

#[test]
fn audit_sheet_snapshot() {
    let doc = build_audit_export(
        &inventory(),
        &[auditor()],
        "  Inventario conforme  ",
        at(2024, 3, 1, 15, 0, 0),
        &lima(),
    );
    insta::assert_snapshot!("audit_sheet_rows", render_rows(&doc.info.to_rows()));
}

#[test]
fn auditor_list_lifecycle() {
    let mut form = AuditForm::new();
    assert_eq!(form.auditors().len(), 1);
    form.add_auditor();
    form.add_auditor();
    assert_eq!(form.auditors().len(), 3);

    let mut single = AuditForm::new();
    assert!(!single.remove_auditor(0));
    assert_eq!(single.auditors().len(), 1);
}

#[test]
fn audit_workbook_has_both_sheets() {
    let mut form = AuditForm::with_auditors(vec![auditor()]);
    form.observations = "Sin observaciones".to_string();
    let bytes = ExportRequest::Audit(form)
        .assemble(&inventory(), at(2024, 3, 1, 15, 0, 0), &lima())
        .unwrap();

    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(&format!(r#"name="{IMEIS_SHEET}""#)));
    assert!(workbook.contains(&format!(r#"name="{AUDIT_SHEET}""#)));

    let imeis = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(imeis.contains("<t>FECHA DE INGRESO</t>"));
    assert!(imeis.contains("<t>555555555555555</t>"));

    let info = read_part(&bytes, "xl/worksheets/sheet2.xml");
    assert!(info.contains("<t>Total de series vendidas: 2</t>"));
    assert!(info.contains("<t>Sin observaciones</t>"));
    assert!(info.contains("<t>12345678</t>"));
}

#[test]
fn audit_request_rejects_malformed_national_id() {
    let form = AuditForm::with_auditors(vec![Auditor::new("Ana", "Quispe", "1234")]);
    let err = ExportRequest::Audit(form)
        .assemble(&inventory(), Utc::now(), &lima())
        .unwrap_err();
    assert_eq!(err.user_message(), "El DNI del auditor 1 debe tener 8 dígitos");
}

#[test]
fn flat_xlsx_has_single_sheet() {
    let bytes = ExportRequest::Flat(ExportFormat::Xlsx)
        .assemble(&inventory(), Utc::now(), &DateFormatter::utc())
        .unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    assert!(archive.file_names().any(|name| name == "xl/worksheets/sheet1.xml"));
    assert!(!archive.file_names().any(|name| name == "xl/worksheets/sheet2.xml"));
}

#[test]
fn failed_write_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let target = blocker.join("imeis_completos.csv");
    assert!(write_document(&target, b"IMEI\n").is_err());
    assert!(!target.exists());
}

#[test]
fn failed_rename_cleans_up_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("occupied");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep.txt"), b"x").unwrap();

    assert!(write_document(&target, b"IMEI\n").is_err());
    assert!(target.is_dir());
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
