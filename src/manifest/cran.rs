//! R package DESCRIPTION parser
//!
//! Comma-separated package lists in the Depends, Imports, Suggests and
//! LinkingTo fields, with continuation lines indented. The `R` entry in
//! Depends constrains the interpreter, not a package, and is skipped.

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

const DEPENDENCY_FIELDS: [&str; 4] = ["Depends", "Imports", "Suggests", "LinkingTo"];

/// Parser for DESCRIPTION files
pub struct DescriptionParser;

impl ManifestParser for DescriptionParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cran);
        let mut records = Vec::new();
        let mut collecting = false;
        let mut entries = String::new();
        for line in content.lines() {
            // continuation lines are indented under their field
            if collecting && line.starts_with([' ', '\t']) {
                entries.push(' ');
                entries.push_str(line.trim());
                continue;
            }
            collecting = false;
            let Some((field, rest)) = line.split_once(':') else {
                continue;
            };
            if DEPENDENCY_FIELDS.contains(&field.trim()) {
                collecting = true;
                entries.push(',');
                entries.push_str(rest.trim());
            }
        }
        for entry in entries.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, raw) = match entry.split_once('(') {
                Some((name, rest)) => (name.trim(), rest.trim_end_matches(')').trim()),
                None => (entry, ""),
            };
            if name == "R" {
                continue;
            }
            let version = normalize::normalize(Ecosystem::Cran, raw);
            records.extend(builder.build(name, &version));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cran
    }
}
