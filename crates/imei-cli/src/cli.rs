//! CLI argument definitions for the IMEI inventory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use imei_export::Auditor;
use imei_model::{Estado, StateFilter};
use imei_store::ListPath;

#[derive(Parser)]
#[command(
    name = "imei-inventory",
    version,
    about = "IMEI inventory - list, edit and export device records",
    long_about = "Manage the IMEI inventory held by the remote record service.\n\n\
                  Lists and filters records, adds, edits and deletes them, and exports\n\
                  the full collection as CSV or as an auditor-signed XLSX workbook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Record service connection overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Collection endpoint, e.g. http://localhost:3000/imeis.
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Path serving the full list.
    #[arg(long = "list-path", value_enum, global = true)]
    pub list_path: Option<ListPathArg>,

    /// Request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Use an in-process demo store instead of the remote service.
    #[arg(long = "offline", global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the filtered inventory.
    List(ListArgs),

    /// Register a new IMEI.
    Add(AddArgs),

    /// Change the IMEI or status of a record.
    Edit(EditArgs),

    /// Remove a record.
    Delete(DeleteArgs),

    /// Export the full inventory.
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(Parser)]
pub struct ListArgs {
    /// Status filter.
    #[arg(long = "estado", value_enum, default_value = "all")]
    pub estado: StateFilterArg,

    /// Show only IMEIs ending with this suffix.
    #[arg(long = "search", value_name = "SUFFIX")]
    pub search: Option<String>,
}

#[derive(Parser)]
pub struct AddArgs {
    #[arg(value_name = "IMEI")]
    pub imei: String,

    #[arg(long = "estado", value_enum, default_value = "free")]
    pub estado: EstadoArg,
}

#[derive(Parser)]
pub struct EditArgs {
    /// Record id as assigned by the service.
    #[arg(value_name = "ID")]
    pub id: String,

    /// New IMEI value.
    #[arg(long = "imei")]
    pub imei: Option<String>,

    /// New status.
    #[arg(long = "estado", value_enum)]
    pub estado: Option<EstadoArg>,
}

#[derive(Parser)]
pub struct DeleteArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Subcommand)]
pub enum ExportCommand {
    /// Flat CSV export (imeis_completos.csv).
    Csv(FlatExportArgs),

    /// Flat single-sheet XLSX export (imeis_completos.xlsx).
    Xlsx(FlatExportArgs),

    /// Two-sheet audit workbook (imeis_auditoria_<date>.xlsx).
    Audit(AuditExportArgs),
}

/// Which records to mark before exporting. Every record must end up selected.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Select every record.
    #[arg(long = "select-all", conflicts_with = "select")]
    pub select_all: bool,

    /// Select records by id (repeatable).
    #[arg(long = "select", value_name = "ID", num_args = 1..)]
    pub select: Vec<String>,

    /// Output file (default: configured output directory + standard name).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct FlatExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Parser)]
pub struct AuditExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Auditor as "NAMES;SURNAMES;DNI" (repeatable).
    #[arg(
        long = "auditor",
        value_name = "NAMES;SURNAMES;DNI",
        value_parser = parse_auditor,
        required = true
    )]
    pub auditors: Vec<Auditor>,

    /// Free-text observations appended to the audit sheet.
    #[arg(long = "observations", value_name = "TEXT")]
    pub observations: Option<String>,
}

/// Split a `NAMES;SURNAMES;DNI` triple. Field contents are checked later by
/// the audit form.
pub fn parse_auditor(value: &str) -> Result<Auditor, String> {
    let parts: Vec<&str> = value.split(';').map(str::trim).collect();
    match parts.as_slice() {
        [names, surnames, dni] => Ok(Auditor::new(*names, *surnames, *dni)),
        _ => Err(format!(
            "expected \"NAMES;SURNAMES;DNI\", got {} field(s)",
            parts.len()
        )),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EstadoArg {
    Free,
    Sold,
}

impl From<EstadoArg> for Estado {
    fn from(arg: EstadoArg) -> Self {
        match arg {
            EstadoArg::Free => Estado::Free,
            EstadoArg::Sold => Estado::Sold,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StateFilterArg {
    All,
    Free,
    Sold,
}

impl From<StateFilterArg> for StateFilter {
    fn from(arg: StateFilterArg) -> Self {
        match arg {
            StateFilterArg::All => StateFilter::All,
            StateFilterArg::Free => StateFilter::Free,
            StateFilterArg::Sold => StateFilter::Sold,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ListPathArg {
    Plain,
    All,
}

impl From<ListPathArg> for ListPath {
    fn from(arg: ListPathArg) -> Self {
        match arg {
            ListPathArg::Plain => ListPath::Plain,
            ListPathArg::All => ListPath::All,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
