//! # Settings
//!
//! User-adjustable defaults for the calculators. Settings serialize to a
//! small JSON file; any field left out falls back to its default.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::settings::{LabSettings, ExportFormat};
//! use lab_core::chemistry::ParseMode;
//!
//! let settings: LabSettings = serde_json::from_str(r#"{ "parse_mode": "Strict" }"#).unwrap();
//! assert_eq!(settings.parse_mode, ParseMode::Strict);
//! assert_eq!(settings.export_format, ExportFormat::Text);
//! ```

use serde::{Deserialize, Serialize};

use crate::chemistry::ParseMode;

/// Current schema version for settings files
pub const SETTINGS_VERSION: &str = "0.1.0";

/// Calculator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// How formula strings with stray characters are handled
    pub parse_mode: ParseMode,

    /// Default batch volume for media preparation (L)
    pub default_volume_l: f64,

    /// Default number of batches
    pub default_batch_count: u32,

    /// Format used when exporting results
    pub export_format: ExportFormat,

    /// Log verbosity for front-ends
    pub log_level: LogLevel,
}

impl Default for LabSettings {
    fn default() -> Self {
        LabSettings {
            version: SETTINGS_VERSION.to_string(),
            parse_mode: ParseMode::Lenient,
            default_volume_l: 1.0,
            default_batch_count: 1,
            export_format: ExportFormat::Text,
            log_level: LogLevel::Info,
        }
    }
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl ExportFormat {
    /// Usual file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Log verbosity, mirrored onto `log::LevelFilter` by front-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
