use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::views::{FacilityView, FailureView, SummaryView};
use crate::pipeline::BatchOutcome;

/// Timestamp format used in report file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const CSV_HEADER: [&str; 9] = [
    "Rank",
    "Facility",
    "Score",
    "Classification",
    "Trailers",
    "Paved%",
    "Gates",
    "Expected ROI",
    "Action",
];

/// Report file stem for a run, e.g. `dragnet_results_20260118_093000`
pub fn report_stem(timestamp: &str) -> String {
    format!("dragnet_results_{}", timestamp)
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    timestamp: &'a str,
    total_targets: usize,
    summary: SummaryView,
    results: Vec<FacilityView>,
    failures: Vec<FailureView>,
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save report at {}", path.display()))?;
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory at {}", dir.display()))?;
    }
    Ok(())
}

/// Render the JSON report document.
pub fn render_json_report(outcome: &BatchOutcome, timestamp: &str) -> Result<String> {
    let report = JsonReport {
        timestamp,
        total_targets: outcome.total(),
        summary: outcome.summary().into(),
        results: outcome.ranked.iter().map(FacilityView::from).collect(),
        failures: outcome.failures.iter().map(FailureView::from).collect(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
}

/// Write `<dir>/dragnet_results_<timestamp>.json` and return its path.
pub fn write_json_report(dir: &Path, outcome: &BatchOutcome, timestamp: &str) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{}.json", report_stem(timestamp)));
    write_atomic(&path, render_json_report(outcome, timestamp)?.as_bytes())?;
    Ok(path)
}

/// Quote a CSV field when it holds a delimiter, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the ranked facilities as CSV, header included.
pub fn render_csv_report(outcome: &BatchOutcome) -> String {
    let mut lines = vec![csv_row(CSV_HEADER)];
    for (idx, r) in outcome.ranked.iter().enumerate() {
        let c = r.classification();
        lines.push(csv_row([
            (idx + 1).to_string(),
            r.facility.name.clone(),
            format!("{:.1}", r.score()),
            c.label.to_string(),
            r.measurement.trailer_count.to_string(),
            format!("{:.1}", r.measurement.paved_area_pct),
            r.measurement.gate_count.to_string(),
            c.expected_roi.to_string(),
            c.action.to_string(),
        ]));
    }
    let mut csv = lines.join("\r\n");
    csv.push_str("\r\n");
    csv
}

/// Write `<dir>/dragnet_results_<timestamp>.csv` and return its path.
pub fn write_csv_report(dir: &Path, outcome: &BatchOutcome, timestamp: &str) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{}.csv", report_stem(timestamp)));
    write_atomic(&path, render_csv_report(outcome).as_bytes())?;
    Ok(path)
}

/// Write every requested report. Each one is attempted even if another fails;
/// any failure makes the whole call fail.
pub fn write_reports(
    dir: &Path,
    outcome: &BatchOutcome,
    timestamp: &str,
    json: bool,
    csv: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut failures = Vec::new();

    let requested: [(bool, &str, fn(&Path, &BatchOutcome, &str) -> Result<PathBuf>); 2] = [
        (json, "JSON", write_json_report),
        (csv, "CSV", write_csv_report),
    ];
    for (wanted, kind, write) in requested {
        if !wanted {
            continue;
        }
        match write(dir, outcome, timestamp) {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "{} report saved", kind);
                written.push(path);
            }
            Err(e) => failures.push(format!("{} report: {:#}", kind, e)),
        }
    }

    if !failures.is_empty() {
        anyhow::bail!("Failed to write reports: {}", failures.join("; "));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Facility;
    use crate::pipeline::{FacilityFailure, FacilityReport};
    use crate::scoring::{analyze, Measurement, ScoringConfig};
    use std::env;

    fn outcome() -> BatchOutcome {
        let measurement = Measurement::new(85.0, 180, 3);
        BatchOutcome {
            ranked: vec![FacilityReport {
                facility: Facility::new("Costco DC #54, East", 34.754, -78.789)
                    .with_segment("Enterprise"),
                measurement,
                tractors: 10,
                result: analyze(&measurement, &ScoringConfig::default()).unwrap(),
            }],
            failures: vec![FacilityFailure {
                index: 1,
                name: "Ghost Yard".to_string(),
                error: "detection provider failed: no imagery".to_string(),
            }],
        }
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_csv_report() {
        let csv = render_csv_report(&outcome());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Rank,Facility,Score,Classification,Trailers,Paved%,Gates,Expected ROI,Action"
        );
        assert_eq!(
            lines[1],
            "1,\"Costco DC #54, East\",72.5,STANDARD,180,85.0,3,$50K-$500K annually,\"Add to nurture campaign, send value proposition\""
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_csv_keeps_one_decimal_for_whole_numbers() {
        let measurement = Measurement::new(80.0, 300, 5);
        let outcome = BatchOutcome {
            ranked: vec![FacilityReport {
                facility: Facility::new("Mega Hub", 33.6, -84.4),
                measurement,
                tractors: 0,
                result: analyze(&measurement, &ScoringConfig::default()).unwrap(),
            }],
            failures: Vec::new(),
        };
        let csv = render_csv_report(&outcome);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("1,Mega Hub,90.0,WHALE,300,80.0,5,"));
    }

    #[test]
    fn test_render_json_report() {
        let json = render_json_report(&outcome(), "20260101_120000").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["timestamp"], "20260101_120000");
        assert_eq!(value["total_targets"], 2);
        assert_eq!(value["summary"]["standard"], 1);
        assert_eq!(value["results"][0]["score"], 72.5);
        assert_eq!(value["results"][0]["classification"], "STANDARD PROSPECT");
        assert_eq!(value["results"][0]["segment"], "Enterprise");
        assert_eq!(value["failures"][0]["name"], "Ghost Yard");
    }

    #[test]
    fn test_write_reports() {
        let dir = env::temp_dir().join("yard_velocity_test_reports");
        let outcome = outcome();

        let json_path = write_json_report(&dir, &outcome, "20260101_120000").unwrap();
        let csv_path = write_csv_report(&dir, &outcome, "20260101_120000").unwrap();

        assert!(json_path.ends_with("dragnet_results_20260101_120000.json"));
        assert!(csv_path.ends_with("dragnet_results_20260101_120000.csv"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(written["results"].as_array().unwrap().len(), 1);
        assert!(fs::read_to_string(&csv_path).unwrap().starts_with("Rank,"));

        let _ = fs::remove_file(&json_path);
        let _ = fs::remove_file(&csv_path);
    }

    #[test]
    fn test_write_reports_fails_when_dir_is_a_file() {
        let blocker = env::temp_dir().join("yard_velocity_test_not_a_dir");
        fs::write(&blocker, "occupied").unwrap();

        let err = write_reports(&blocker, &outcome(), "20260101_120000", true, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("JSON report"));
        assert!(message.contains("CSV report"));

        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn test_write_reports_skips_unrequested() {
        let dir = env::temp_dir().join("yard_velocity_test_reports_csv_only");
        let written = write_reports(&dir, &outcome(), "20260102_120000", false, true).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("dragnet_results_20260102_120000.csv"));
        let _ = fs::remove_file(&written[0]);
    }
}
