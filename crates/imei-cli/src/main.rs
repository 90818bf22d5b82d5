//! IMEI inventory CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::debug;
use tracing::level_filters::LevelFilter;

use imei_cli::cli::{Cli, LogFormatArg, LogLevelArg};
use imei_cli::commands::run;
use imei_cli::logging::{LogConfig, LogFormat, init_logging};
use imei_cli::settings::Settings;
use imei_model::InventoryError;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let settings = Settings::load(cli.config.as_deref()).with_overrides(&cli.api);
    let exit_code = match run(&cli.command, &settings, cli.api.offline) {
        Ok(()) => 0,
        Err(error) => {
            debug!("command failed: {error:#}");
            eprintln!("error: {}", describe(&error));
            1
        }
    };
    std::process::exit(exit_code);
}

/// Localized message for inventory failures, the full chain otherwise.
fn describe(error: &anyhow::Error) -> String {
    match error
        .chain()
        .find_map(|cause| cause.downcast_ref::<InventoryError>())
    {
        Some(inventory) if inventory.as_validation().is_some() => inventory.user_message(),
        Some(inventory) => format!("{} ({inventory})", inventory.user_message()),
        None => format!("{error:#}"),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
