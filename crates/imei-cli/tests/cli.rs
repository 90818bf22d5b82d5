//! Command tests against the in-memory store.

use chrono::{TimeZone, Utc};
use clap::Parser;

use imei_cli::cli::{Cli, Command, ExportCommand, parse_auditor};
use imei_cli::commands::{demo_records, run_add, run_delete, run_edit, run_export, run_list};
use imei_cli::settings::Settings;
use imei_cli::summary::render_inventory;
use imei_export::DateFormatter;
use imei_model::{Estado, InventoryError, ValidationError};
use imei_store::MemoryStore;
use imei_view::Session;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["imei-inventory"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn demo_session() -> Session<MemoryStore> {
    Session::new(MemoryStore::with_records(demo_records()))
}

fn export_command(cli: Cli) -> ExportCommand {
    match cli.command {
        Command::Export(export) => export,
        _ => panic!("expected export command"),
    }
}

fn validation_error(err: &anyhow::Error) -> Option<&ValidationError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<InventoryError>())
        .and_then(InventoryError::as_validation)
}

#[test]
fn auditor_triples_are_split() {
    let auditor = parse_auditor("Ana María; Quispe Rojas ;12345678").unwrap();
    assert_eq!(auditor.given_names, "Ana María");
    assert_eq!(auditor.surnames, "Quispe Rojas");
    assert_eq!(auditor.national_id, "12345678");

    assert!(parse_auditor("Ana;Quispe").is_err());
}

#[test]
fn audit_export_requires_an_auditor() {
    let argv = ["imei-inventory", "export", "audit", "--select-all"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn select_all_conflicts_with_explicit_ids() {
    let argv = [
        "imei-inventory",
        "export",
        "csv",
        "--select-all",
        "--select",
        "1",
    ];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = parse(&["list", "--estado", "sold", "--offline", "--list-path", "all"]);
    assert!(cli.api.offline);
    assert!(cli.api.list_path.is_some());
    assert!(matches!(cli.command, Command::List(_)));
}

#[test]
fn csv_export_writes_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.csv");
    let cli = parse(&[
        "export",
        "csv",
        "--select-all",
        "--output",
        target.to_str().unwrap(),
    ]);

    let mut session = demo_session();
    let report = run_export(
        &mut session,
        &export_command(cli),
        &Settings::default(),
        Utc::now(),
    )
    .unwrap();

    assert_eq!(report.path, target);
    assert_eq!(report.records, 4);
    let content = std::fs::read_to_string(&target).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("IMEI,ESTADO,FECHA DE INGRESO,FECHA DE ACTUALIZACIÓN")
    );
    assert_eq!(lines.count(), 4);
}

#[test]
fn partial_selection_blocks_export() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.csv");
    let cli = parse(&[
        "export",
        "csv",
        "--select",
        "1",
        "2",
        "--output",
        target.to_str().unwrap(),
    ]);

    let mut session = demo_session();
    let err = run_export(
        &mut session,
        &export_command(cli),
        &Settings::default(),
        Utc::now(),
    )
    .unwrap_err();

    assert_eq!(
        validation_error(&err),
        Some(&ValidationError::IncompleteSelection {
            missing_imeis: vec!["490154203237518".to_string(), "353918057209913".to_string()],
        })
    );
    assert!(!target.exists());
}

#[test]
fn unknown_selected_id_is_rejected() {
    let cli = parse(&["export", "csv", "--select", "99"]);
    let mut session = demo_session();
    let err = run_export(
        &mut session,
        &export_command(cli),
        &Settings::default(),
        Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(
        validation_error(&err),
        Some(ValidationError::UnknownRecord(_))
    ));
}

#[test]
fn audit_export_uses_local_date_in_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.export.output_dir = Some(dir.path().to_path_buf());
    settings.export.utc_offset_minutes = -300;

    let cli = parse(&[
        "export",
        "audit",
        "--select-all",
        "--auditor",
        "Ana;Quispe;12345678",
        "--auditor",
        "Luis;Ramos;87654321",
        "--observations",
        "Conteo físico conforme",
    ]);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap();

    let mut session = demo_session();
    let report = run_export(&mut session, &export_command(cli), &settings, now).unwrap();

    assert_eq!(
        report.path,
        dir.path().join("imeis_auditoria_2024-02-29.xlsx")
    );
    assert!(report.path.is_file());
}

#[test]
fn malformed_auditor_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("audit.xlsx");
    let cli = parse(&[
        "export",
        "audit",
        "--select-all",
        "--auditor",
        "Ana;Quispe;1234",
        "--output",
        target.to_str().unwrap(),
    ]);

    let mut session = demo_session();
    let err = run_export(
        &mut session,
        &export_command(cli),
        &Settings::default(),
        Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(
        validation_error(&err),
        Some(ValidationError::MalformedNationalId { auditor: 1, .. })
    ));
    assert!(!target.exists());
}

#[test]
fn add_edit_delete_round_trip() {
    let mut session = Session::new(MemoryStore::new());

    let Command::Add(add) = parse(&["add", "111222333444555", "--estado", "free"]).command else {
        panic!("expected add");
    };
    run_add(&mut session, &add).unwrap();
    let id = session.store().snapshot()[0].id.to_string();

    let Command::Edit(edit) = parse(&["edit", id.as_str(), "--estado", "sold"]).command else {
        panic!("expected edit");
    };
    run_edit(&mut session, &edit).unwrap();
    assert_eq!(session.store().snapshot()[0].estado, Estado::Sold);
    assert!(session.state().editing().is_none());

    let Command::Delete(delete) = parse(&["delete", id.as_str()]).command else {
        panic!("expected delete");
    };
    run_delete(&mut session, &delete).unwrap();
    assert!(session.store().snapshot().is_empty());
    assert!(session.state().records().is_empty());
}

#[test]
fn edit_without_changes_is_refused() {
    let mut session = demo_session();
    let Command::Edit(edit) = parse(&["edit", "1"]).command else {
        panic!("expected edit");
    };
    assert!(run_edit(&mut session, &edit).is_err());
}

#[test]
fn list_reports_filtered_totals() {
    let mut session = demo_session();
    let Command::List(list) = parse(&["list", "--estado", "sold"]).command else {
        panic!("expected list");
    };
    run_list(&mut session, &list).unwrap();

    let rendered = render_inventory(session.state(), &DateFormatter::utc());
    assert!(rendered.contains("Mostrando 2 de 4 | Vendidos: 2 | Filtro: Vendido"));
    assert!(rendered.contains("356938035643817"));
    assert!(!rendered.contains("356938035643809"));
}
