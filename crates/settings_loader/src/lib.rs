//! # Settings Loader
//!
//! Loads the pipeline settings (`settings.json`): SIP activity policy, field-mapping
//! tables for the three MF Central exports, and logging defaults.
//!
//! Every field is optional; a missing key keeps its default, and no settings file at
//! all means [`Settings::default`].
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! let path: Option<PathBuf> = None;
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//! assert_eq!(settings.sip_activity_window_days, 60);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use models::Settings;

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    validate(&settings).with_context(|| format!("Validating settings in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from an optional path, using defaults if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(settings_path) => load_settings(settings_path),
        None => Ok(Settings::default()),
    }
}

fn validate(settings: &Settings) -> Result<()> {
    ensure!(
        settings.sip_activity_window_days >= 0,
        "sip_activity_window_days must not be negative (got {})",
        settings.sip_activity_window_days
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_settings_overrides_window() {
        let file = write_temp(r#"{ "sip_activity_window_days": 90, "include_inactive_sips": true }"#);
        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.sip_activity_window_days, 90);
        assert!(settings.include_inactive_sips);
        assert_eq!(settings.data_source, "MF Central");
    }

    #[test]
    fn test_load_optional_settings_none_gives_defaults() {
        let settings = load_optional_settings(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_missing_file_has_context() {
        let err = load_settings("does/not/exist/settings.json").unwrap_err();
        assert!(err.to_string().contains("Reading settings file"));
    }

    #[test]
    fn test_load_settings_rejects_malformed_json() {
        let file = write_temp("{ not json");
        let err = load_settings(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing settings JSON"));
    }

    #[test]
    fn test_load_settings_rejects_negative_window() {
        let file = write_temp(r#"{ "sip_activity_window_days": -1 }"#);
        assert!(load_settings(file.path()).is_err());
    }
}
