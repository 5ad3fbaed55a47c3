//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Dependency listing grouped by ecosystem with colors
//! - Per-file error display
//! - Summary line with record and file counts

use crate::domain::DependencyRecord;
use crate::output::{OutputFormatter, Verbosity};
use crate::scanner::ScanReport;
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn header(&self, ecosystem: &str) -> String {
        if self.color {
            ecosystem.cyan().bold().to_string()
        } else {
            ecosystem.to_string()
        }
    }

    fn record_line(&self, record: &DependencyRecord) -> String {
        let name = if record.namespace.is_empty() || record.name.contains(&record.namespace) {
            record.name.clone()
        } else {
            format!("{}/{}", record.namespace, record.name)
        };
        let mut line = if record.version.is_empty() {
            format!("  {}", name)
        } else if self.color {
            format!("  {} {}", name, record.version.dimmed())
        } else {
            format!("  {} {}", name, record.version)
        };
        if self.verbosity == Verbosity::Verbose && !record.language.is_empty() {
            line.push_str(&format!(" [{}]", record.language));
        }
        line
    }

    fn error_line(&self, error: &crate::scanner::ScanError) -> String {
        if self.color {
            format!("  {} {}", "error:".red().bold(), error)
        } else {
            format!("  error: {}", error)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &ScanReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            // group by ecosystem keeping first-seen group order
            let mut ecosystems: Vec<&str> = Vec::new();
            for record in &report.records {
                if !ecosystems.contains(&record.ecosystem.as_str()) {
                    ecosystems.push(&record.ecosystem);
                }
            }
            for ecosystem in ecosystems {
                writeln!(writer, "{}", self.header(ecosystem))?;
                for record in report.records.iter().filter(|r| r.ecosystem == ecosystem) {
                    writeln!(writer, "{}", self.record_line(record))?;
                }
                writeln!(writer)?;
            }

            if !report.errors.is_empty() {
                writeln!(writer, "{}", self.header("failed files"))?;
                for error in &report.errors {
                    writeln!(writer, "{}", self.error_line(error))?;
                }
                writeln!(writer)?;
            }
        }

        writeln!(
            writer,
            "{} dependencies from {} files ({} errors)",
            report.records.len(),
            report.files_scanned,
            report.errors.len()
        )?;
        Ok(())
    }
}
