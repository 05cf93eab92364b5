use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use models::Settings;

pub mod brokers;
pub mod compose;
pub mod holdings;
pub mod metrics;
pub mod sips;
pub mod xirr;

pub use compose::{ComposeContext, Composition, RawSources, compose};

pub struct Config {
    pub holdings_file: PathBuf,
    pub transactions_file: PathBuf,
    pub xirr_file: PathBuf,
    pub output_file: PathBuf,
    /// Where to write the import report; skipped when `None`.
    pub report_file: Option<PathBuf>,
    pub settings: Settings,
    pub today: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub pretty: bool,
}

/// Reads the three exports, composes the snapshot and writes it (and the report) to disk.
pub fn run(cfg: &Config) -> Result<Composition> {
    let sources = RawSources {
        consolidated: load_document(&cfg.holdings_file)?,
        transactions: load_document(&cfg.transactions_file)?,
        xirr_report: load_document(&cfg.xirr_file)?,
    };
    let ctx = ComposeContext {
        today: cfg.today,
        generated_at: cfg.generated_at,
    };

    let composition = compose(&sources, &ctx, &cfg.settings)
        .with_context(|| format!("Composing portfolio from {}", cfg.holdings_file.display()))?;

    write_json(&cfg.output_file, &composition.snapshot, cfg.pretty)?;
    if let Some(report_file) = &cfg.report_file {
        write_json(report_file, &composition.report, cfg.pretty)?;
    }

    tracing::info!(output = %cfg.output_file.display(), "Wrote portfolio snapshot");
    Ok(composition)
}

/// Writes any serializable value as JSON, creating parent directories as needed.
fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output dir: {}", parent.display()))?;
    }

    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    fs::write(path, json).with_context(|| format!("Writing output file: {}", path.display()))?;
    Ok(())
}

/// Reads and decodes one export file.
fn load_document(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parsing JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn config(dir: &Path) -> Config {
        let holdings = json!({
            "dtTrxnResult": [{
                "Scheme": "Axis Bluechip Fund - Growth",
                "Folio": "91011",
                "Investor Name": "Asha Verma",
                "Unit Balance": 10,
                "Current Value(Rs.)": 500,
                "Cost Value(Rs.)": 400
            }]
        });
        let transactions = json!({ "dtTrxnResult": [] });
        let xirr = json!([
            { "Scheme": "Axis Bluechip Fund", "Folio": "91011", "Annualised XIRR": 12.5 }
        ]);

        Config {
            holdings_file: write(dir, "CurrentValuation.json", &holdings),
            transactions_file: write(dir, "AS.json", &transactions),
            xirr_file: write(dir, "xirr.json", &xirr),
            output_file: dir.join("out").join("portfolio.json"),
            report_file: Some(dir.join("out").join("report.json")),
            settings: Settings::default(),
            today: NaiveDate::from_ymd_opt(2025, 11, 26).unwrap(),
            generated_at: Utc.with_ymd_and_hms(2025, 11, 26, 0, 0, 0).unwrap(),
            pretty: true,
        }
    }

    #[test]
    fn test_run_writes_snapshot_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());

        let composition = run(&cfg).unwrap();
        assert_eq!(composition.snapshot.portfolio_xirr, 12.5);

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&cfg.output_file).unwrap()).unwrap();
        assert_eq!(written["investor_name"], "Asha Verma");
        assert_eq!(written["xirr"], 12.5);
        assert_eq!(written["num_funds"], 1);
        assert_eq!(written["holdings"][0]["type"], "");
        assert_eq!(written["last_updated"], "2025-11-26T00:00:00Z");

        let report: Value =
            serde_json::from_str(&fs::read_to_string(cfg.report_file.as_ref().unwrap()).unwrap())
                .unwrap();
        assert_eq!(report["sources"][0]["accepted"], 1);
        assert_eq!(report["warnings"][0].as_str().map(|w| w.is_empty()), Some(false));
    }

    #[test]
    fn test_run_reports_missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut cfg = config(dir.path());
        cfg.xirr_file = dir.path().join("missing.json");
        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));

        let cfg = config(dir.path());
        fs::write(&cfg.holdings_file, "{ not json").unwrap();
        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("Parsing JSON"));

        let cfg = config(dir.path());
        fs::write(&cfg.holdings_file, "[]").unwrap();
        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("no usable records"));
    }
}
