use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::{info, info_span};

use imei_export::{AuditForm, ExportFormat, ExportRequest, write_document};
use imei_model::{Estado, InventoryError, Record, RecordId};
use imei_store::{HttpRecordStore, MemoryStore, RecordStore};
use imei_view::Session;

use crate::cli::{AddArgs, Command, DeleteArgs, EditArgs, ExportCommand, ListArgs, SelectionArgs};
use crate::settings::Settings;
use crate::summary::{print_export, print_inventory, print_notice};

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub records: usize,
}

/// Run `command` against the configured store.
pub fn run(command: &Command, settings: &Settings, offline: bool) -> Result<()> {
    if offline {
        info!("using offline demo store");
        return execute(MemoryStore::with_records(demo_records()), command, settings);
    }
    let store = HttpRecordStore::new(settings.store_config()).context("create HTTP client")?;
    execute(store, command, settings)
}

pub fn execute<S: RecordStore>(store: S, command: &Command, settings: &Settings) -> Result<()> {
    let mut session = Session::new(store);
    let dates = settings.date_formatter();
    match command {
        Command::List(args) => {
            run_list(&mut session, args)?;
            print_inventory(session.state(), &dates);
        }
        Command::Add(args) => {
            run_add(&mut session, args)?;
            print_notice(session.state());
        }
        Command::Edit(args) => {
            run_edit(&mut session, args)?;
            print_notice(session.state());
        }
        Command::Delete(args) => {
            run_delete(&mut session, args)?;
            print_notice(session.state());
        }
        Command::Export(export) => {
            let report = run_export(&mut session, export, settings, Utc::now())?;
            print_export(&report.path, report.records);
        }
    }
    Ok(())
}

pub fn run_list<S: RecordStore>(session: &mut Session<S>, args: &ListArgs) -> Result<()> {
    session.load().context("load inventory")?;
    let state = session.state_mut();
    state.set_filter(args.estado.into());
    if let Some(search) = &args.search {
        state.set_search(search.as_str());
    }
    Ok(())
}

pub fn run_add<S: RecordStore>(session: &mut Session<S>, args: &AddArgs) -> Result<()> {
    session
        .add(&args.imei, Estado::from(args.estado))
        .context("add record")?;
    Ok(())
}

pub fn run_edit<S: RecordStore>(session: &mut Session<S>, args: &EditArgs) -> Result<()> {
    if args.imei.is_none() && args.estado.is_none() {
        bail!("nothing to change: pass --imei and/or --estado");
    }
    session.load().context("load inventory")?;
    let id = RecordId::new(args.id.as_str());
    let state = session.state_mut();
    state.start_edit(&id).map_err(InventoryError::from)?;
    state
        .update_draft(args.imei.as_deref(), args.estado.map(Estado::from))
        .map_err(InventoryError::from)?;
    session.save_edit().context("update record")?;
    Ok(())
}

pub fn run_delete<S: RecordStore>(session: &mut Session<S>, args: &DeleteArgs) -> Result<()> {
    session.load().context("load inventory")?;
    session
        .delete(&RecordId::new(args.id.as_str()))
        .context("delete record")?;
    Ok(())
}

/// Load, select, validate, assemble, and write an export.
///
/// Nothing is written unless every record of the collection is selected and
/// the document assembled completely.
pub fn run_export<S: RecordStore>(
    session: &mut Session<S>,
    command: &ExportCommand,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<ExportReport> {
    let (request, selection) = match command {
        ExportCommand::Csv(args) => (ExportRequest::Flat(ExportFormat::Csv), &args.selection),
        ExportCommand::Xlsx(args) => (ExportRequest::Flat(ExportFormat::Xlsx), &args.selection),
        ExportCommand::Audit(args) => {
            let mut form = AuditForm::with_auditors(args.auditors.clone());
            form.observations = args.observations.clone().unwrap_or_default();
            (ExportRequest::Audit(form), &args.selection)
        }
    };
    let span = info_span!("export", kind = command_kind(command));
    let _guard = span.enter();

    session.load().context("load inventory")?;
    apply_selection(session, selection)?;
    let records = session
        .state()
        .records_for_export()
        .map_err(InventoryError::from)?;

    let dates = settings.date_formatter();
    let bytes = request.assemble(records, now, &dates)?;
    let path = match &selection.output {
        Some(path) => path.clone(),
        None => {
            let today = now.with_timezone(&dates.offset()).date_naive();
            settings.output_dir().join(request.default_file_name(today))
        }
    };
    write_document(&path, &bytes).map_err(InventoryError::from)?;

    info!(path = %path.display(), records = records.len(), "export complete");
    Ok(ExportReport {
        path,
        records: records.len(),
    })
}

fn apply_selection<S: RecordStore>(
    session: &mut Session<S>,
    selection: &SelectionArgs,
) -> Result<(), InventoryError> {
    let state = session.state_mut();
    if selection.select_all {
        state.select_all();
        return Ok(());
    }
    for raw in &selection.select {
        let id = RecordId::new(raw.as_str());
        if !state.selection().contains(&id) {
            state.toggle_select(&id)?;
        }
    }
    Ok(())
}

fn command_kind(command: &ExportCommand) -> &'static str {
    match command {
        ExportCommand::Csv(_) => "csv",
        ExportCommand::Xlsx(_) => "xlsx",
        ExportCommand::Audit(_) => "audit",
    }
}

/// Seed data for `--offline` runs.
pub fn demo_records() -> Vec<Record> {
    let now = Utc::now();
    [
        ("356938035643809", Estado::Free),
        ("356938035643817", Estado::Sold),
        ("490154203237518", Estado::Free),
        ("353918057209913", Estado::Sold),
    ]
    .into_iter()
    .zip(1u64..)
    .map(|((imei, estado), id)| Record {
        id: RecordId::from(id),
        imei: imei.to_string(),
        estado,
        created_at: now,
        updated_at: now,
    })
    .collect()
}
