//! Go module file parsers
//!
//! Handles:
//! - go.mod `require` directives, single line and block form
//! - go.sum checksum lines (`/go.mod` hash lines folded into one entry)

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

/// Strip a trailing line comment
fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or(line).trim()
}

fn build_module(builder: &RecordBuilder, ns_name: &str, version: &str) -> Option<DependencyRecord> {
    let version = normalize::normalize(Ecosystem::Golang, version);
    builder.build(ns_name, &version)
}

/// Parser for go.mod files
pub struct GoModParser;

impl ManifestParser for GoModParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Golang);
        let mut records = Vec::new();
        let mut in_require_block = false;
        for line in content.lines() {
            let line = strip_comment(line);
            if line.is_empty() {
                continue;
            }
            if in_require_block {
                if line.starts_with(')') {
                    in_require_block = false;
                    continue;
                }
                let mut parts = line.split_whitespace();
                if let (Some(ns_name), Some(version)) = (parts.next(), parts.next()) {
                    records.extend(build_module(&builder, ns_name, version));
                }
                continue;
            }
            if line.starts_with("require") {
                let rest = line["require".len()..].trim();
                if rest.starts_with('(') {
                    in_require_block = true;
                    continue;
                }
                let mut parts = rest.split_whitespace();
                if let (Some(ns_name), Some(version)) = (parts.next(), parts.next()) {
                    records.extend(build_module(&builder, ns_name, version));
                }
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Golang
    }
}

/// Parser for go.sum files
pub struct GoSumParser;

impl ManifestParser for GoSumParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Golang);
        let mut records = Vec::new();
        for line in content.lines() {
            // the go.mod hash line repeats the module, keep one entry
            let line = line.replace("/go.mod", "");
            let mut parts = line.split_whitespace();
            let (Some(ns_name), Some(version), Some(hash)) =
                (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            if !hash.starts_with("h1:") {
                continue;
            }
            records.extend(build_module(&builder, ns_name, version));
        }
        // dedup keeps the first pin for each module
        Ok(crate::domain::dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Golang
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_mod_single_and_block_requires() {
        let content = "module example.com/my/thing\n\ngo 1.19\n\n\
require example.com/other/thing v1.0.2\n\
require (\n\
\tgithub.com/davecgh/go-spew v1.1.1\n\
\tgolang.org/x/sys v0.1.0 // indirect\n\
)\n\
exclude example.com/old/thing v1.2.3\n";
        let records = GoModParser.parse(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].namespace, "example.com/other");
        assert_eq!(records[0].name, "thing");
        assert_eq!(records[0].version, "1.0.2");
        assert_eq!(records[1].name, "go-spew");
        assert_eq!(records[1].namespace, "github.com/davecgh");
        assert_eq!(records[2].name, "sys");
        assert_eq!(records[2].language, "Go");
    }

    #[test]
    fn test_go_sum_folds_gomod_lines() {
        let content = "\
github.com/BurntSushi/toml v0.3.1 h1:WXkYYl6Yr3qBf1K79EBnL4mak0OimBfB0XUf9Vl28OQ=\n\
github.com/BurntSushi/toml v0.3.1/go.mod h1:xHWCNGjB5oqiDr8zfno3MHue2Ht5sIBksp03qcyfWMU=\n";
        let records = GoSumParser.parse(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].namespace, "github.com/BurntSushi");
        assert_eq!(records[0].name, "toml");
        assert_eq!(records[0].version, "0.3.1");
    }
}
