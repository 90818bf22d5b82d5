//! Settings file for the command-line client.
//!
//! Looked up at `--config PATH` or in the platform config directory:
//! - Linux: ~/.config/imei-inventory/settings.toml
//! - macOS: ~/Library/Application Support/com.imei-inventory.IMEI Inventory/
//! - Windows: %APPDATA%/imei-inventory/config/
//!
//! Command-line flags override the file; a missing or unreadable file falls
//! back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use imei_export::DateFormatter;
use imei_store::{DEFAULT_BASE_URL, ListPath, StoreConfig};

use crate::cli::ApiArgs;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "imei-inventory";
const APP_NAME: &str = "IMEI Inventory";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub export: ExportSettings,
}

/// Record service connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub list_path: ListPath,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_path: ListPath::default(),
            timeout_secs: imei_store::config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory for exports written without `--output`.
    pub output_dir: Option<PathBuf>,
    /// Offset, in minutes east of UTC, used to render export dates.
    pub utc_offset_minutes: i32,
}

/// Default settings file location, if the platform has one.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl Settings {
    /// Load from `explicit`, or from [`settings_path`] when `None`.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match settings_path() {
                Some(path) => path,
                None => {
                    warn!("could not determine settings path, using defaults");
                    return Self::default();
                }
            },
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!(path = %path.display(), "loaded settings");
                    settings
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, api: &ApiArgs) -> Self {
        if let Some(url) = &api.api_url {
            self.api.base_url.clone_from(url);
        }
        if let Some(list_path) = api.list_path {
            self.api.list_path = list_path.into();
        }
        if let Some(timeout) = api.timeout_secs {
            self.api.timeout_secs = timeout;
        }
        self
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_base_url(self.api.base_url.clone())
            .with_list_path(self.api.list_path)
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    /// Date formatter for exports; out-of-range offsets fall back to UTC.
    pub fn date_formatter(&self) -> DateFormatter {
        DateFormatter::from_offset_minutes(self.export.utc_offset_minutes).unwrap_or_else(|| {
            warn!(
                minutes = self.export.utc_offset_minutes,
                "utc_offset_minutes out of range, using UTC"
            );
            DateFormatter::utc()
        })
    }

    /// Directory for exports without an explicit path.
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ListPathArg;

    #[test]
    fn defaults_point_at_local_service() {
        let settings = Settings::default();
        let config = settings.store_config();
        assert_eq!(config.base_url, "http://localhost:3000/imeis");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.list_path, ListPath::Plain);
        assert_eq!(settings.date_formatter(), DateFormatter::utc());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [api]
            list_path = "all"

            [export]
            utc_offset_minutes = -300
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.list_path, ListPath::All);
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.export.utc_offset_minutes, -300);
        assert!(settings.export.output_dir.is_none());
    }

    #[test]
    fn flags_override_file_values() {
        let api = ApiArgs {
            api_url: Some("http://inventory.local/imeis".to_string()),
            list_path: Some(ListPathArg::All),
            timeout_secs: Some(5),
            offline: false,
        };
        let config = Settings::default().with_overrides(&api).store_config();
        assert_eq!(config.base_url, "http://inventory.local/imeis");
        assert_eq!(config.list_path, ListPath::All);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let mut settings = Settings::default();
        settings.export.utc_offset_minutes = 100_000;
        assert_eq!(settings.date_formatter(), DateFormatter::utc());
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = Settings::default();
        settings.export.output_dir = Some(PathBuf::from("/tmp/exports"));
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
