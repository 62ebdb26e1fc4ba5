//! # File I/O Module
//!
//! The only filesystem access in lab_core:
//! - **Settings**: load and save [`LabSettings`] as JSON, with version validation
//! - **Exports**: write rendered reports with atomic saves (write to .tmp,
//!   sync, rename) so a half-written export never replaces a good one
//!
//! ## Example
//!
//! ```rust,no_run
//! use lab_core::export::render;
//! use lab_core::file_io::{load_settings, write_export};
//! use lab_core::media::scale_recipe;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("labcalc.json"))?;
//! let recipe = scale_recipe("LB", settings.default_volume_l, 1, true)?;
//! let contents = render(&recipe, settings.export_format)?;
//! write_export(&contents, Path::new("lb_agar.txt"))?;
//! # Ok::<(), lab_core::errors::LabError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::errors::{LabError, LabResult};
use crate::settings::{LabSettings, SETTINGS_VERSION};

/// Load settings from a JSON file.
///
/// # Returns
///
/// * `Ok(LabSettings)` - Successfully loaded settings
/// * `Err(LabError::VersionMismatch)` - File version is incompatible
/// * `Err(LabError::SerializationError)` - Invalid JSON
/// * `Err(LabError::FileError)` - I/O error
pub fn load_settings(path: &Path) -> LabResult<LabSettings> {
    let mut file = File::open(path).map_err(|e| {
        LabError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        LabError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let settings: LabSettings =
        serde_json::from_str(&contents).map_err(|e| LabError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&settings.version)?;
    info!("loaded settings from {}", path.display());

    Ok(settings)
}

/// Save settings as pretty JSON with atomic write semantics.
pub fn save_settings(settings: &LabSettings, path: &Path) -> LabResult<()> {
    let json = serde_json::to_string_pretty(settings)?;
    atomic_write(json.as_bytes(), path)
}

/// Write a rendered export with atomic write semantics.
///
/// The save process:
/// 1. Write to a temporary file next to the target
/// 2. Sync to disk (fsync)
/// 3. Rename over the target (atomic on most filesystems)
pub fn write_export(contents: &str, path: &Path) -> LabResult<()> {
    atomic_write(contents.as_bytes(), path)?;
    info!("wrote export to {}", path.display());
    Ok(())
}

fn atomic_write(bytes: &[u8], path: &Path) -> LabResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        LabError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        LabError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        LabError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        LabError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Temp file path: the target path with ".tmp" appended to its extension
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp_path = path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> LabResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SETTINGS_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let mismatch = || LabError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SETTINGS_VERSION.to_string(),
    };

    match (file_parts.first(), current_parts.first()) {
        (Some(file_major), Some(current_major)) if file_major == current_major => {}
        _ => return Err(mismatch()),
    }

    // For 0.x versions, minor version must also match (pre-1.0 semver)
    if current_parts[0] == 0 && file_parts.get(1) != current_parts.get(1) {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ExportFormat;

    #[test]
    fn test_settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = LabSettings {
            export_format: ExportFormat::Json,
            default_volume_l: 0.5,
            ..LabSettings::default()
        };
        save_settings(&settings, &path).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.csv");

        write_export("component,amount\n", &path).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("recipe.csv.tmp").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "component,amount\n");
    }

    #[test]
    fn test_write_export_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_export("old", &path).unwrap();
        write_export("new", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SETTINGS_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(tmp_path_for(Path::new("a/b.csv")), PathBuf::from("a/b.csv.tmp"));
        assert_eq!(tmp_path_for(Path::new("report")), PathBuf::from("report.tmp"));
    }
}
