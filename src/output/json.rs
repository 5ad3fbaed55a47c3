//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of scan reports
//! - Per-ecosystem breakdown in verbose mode

use crate::domain::DependencyRecord;
use crate::output::{OutputFormatter, Verbosity};
use crate::scanner::ScanReport;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Summary statistics
    summary: JsonSummary,
    /// Every discovered dependency record
    dependencies: &'a [DependencyRecord],
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Total number of records after deduplication
    dependencies: usize,
    /// Number of manifest files parsed
    files_scanned: usize,
    /// Breakdown by ecosystem (verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_ecosystem: Vec<JsonEcosystemSummary>,
}

/// JSON representation of a per-ecosystem count
#[derive(Serialize)]
struct JsonEcosystemSummary {
    /// Record type label
    ecosystem: String,
    /// Number of records
    dependencies: usize,
}

fn by_ecosystem(records: &[DependencyRecord]) -> Vec<JsonEcosystemSummary> {
    let mut out: Vec<JsonEcosystemSummary> = Vec::new();
    for record in records {
        match out.iter_mut().find(|s| s.ecosystem == record.ecosystem) {
            Some(entry) => entry.dependencies += 1,
            None => out.push(JsonEcosystemSummary {
                ecosystem: record.ecosystem.clone(),
                dependencies: 1,
            }),
        }
    }
    out
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let breakdown = if self.verbosity == Verbosity::Verbose {
            by_ecosystem(&report.records)
        } else {
            Vec::new()
        };

        let output = JsonOutput {
            summary: JsonSummary {
                dependencies: report.records.len(),
                files_scanned: report.files_scanned,
                by_ecosystem: breakdown,
            },
            dependencies: &report.records,
            errors: report.errors.iter().map(|e| e.to_string()).collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanError;
    use std::path::PathBuf;

    fn record(eco: &str, name: &str, version: &str) -> DependencyRecord {
        DependencyRecord {
            ecosystem: eco.to_string(),
            namespace: String::new(),
            name: name.to_string(),
            version: version.to_string(),
            language: "Node JS".to_string(),
        }
    }

    fn create_test_report() -> ScanReport {
        ScanReport {
            records: vec![
                record("npm", "lodash", ">=4.17.21, <5.0.0"),
                record("npm", "react", "18.2.0"),
                record("cargo", "serde", ">=1.0.0, <2.0.0"),
            ],
            errors: Vec::new(),
            files_scanned: 2,
        }
    }

    #[test]
    fn test_format_json() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let mut output = Vec::new();
        formatter.format(&create_test_report(), &mut output).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();

        assert_eq!(parsed["summary"]["dependencies"], 3);
        assert_eq!(parsed["summary"]["files_scanned"], 2);
        assert_eq!(parsed["dependencies"][0]["type"], "npm");
        assert_eq!(parsed["dependencies"][0]["name"], "lodash");
        assert_eq!(parsed["dependencies"][0]["version"], ">=4.17.21, <5.0.0");
        assert!(parsed["errors"].is_null());
    }

    #[test]
    fn test_format_json_verbose_breakdown() {
        let formatter = JsonFormatter::new(Verbosity::Verbose);
        let mut output = Vec::new();
        formatter.format(&create_test_report(), &mut output).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();

        let breakdown = parsed["summary"]["by_ecosystem"].as_array().unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0]["ecosystem"], "npm");
        assert_eq!(breakdown[0]["dependencies"], 2);
    }

    #[test]
    fn test_format_json_errors() {
        let report = ScanReport {
            records: Vec::new(),
            errors: vec![ScanError {
                path: PathBuf::from("bad/package.json"),
                message: "expected value at line 1".to_string(),
            }],
            files_scanned: 0,
        };
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let mut output = Vec::new();
        formatter.format(&report, &mut output).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();

        assert!(parsed["errors"][0]
            .as_str()
            .unwrap()
            .contains("bad/package.json"));
    }
}
