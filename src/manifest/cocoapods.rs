//! CocoaPods and Carthage parsers
//!
//! Handles:
//! - Podfile `pod 'Name', '~> x'` declarations
//! - Podfile.lock `PODS:` pin list
//! - .podspec `dependency` declarations
//! - Cartfile github/git origin lines (binary origins skipped)
//! - Cartfile.resolved pinned revisions

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());

/// True for quoted strings that are version requirements, not option values
fn is_requirement(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit())
        || text.starts_with("~>")
        || text.starts_with('>')
        || text.starts_with('<')
        || text.starts_with('=')
}

fn build_declaration(builder: &RecordBuilder, line: &str) -> Option<DependencyRecord> {
    let mut quoted = QUOTED.captures_iter(line).map(|c| c[1].to_string());
    let name = quoted.next()?;
    let requirements: Vec<String> = quoted.filter(|q| is_requirement(q)).collect();
    let version = if requirements.is_empty() {
        String::new()
    } else {
        normalize::normalize(Ecosystem::Cocoapods, &requirements.join(", "))
    };
    builder.build(&name, &version)
}

/// Parser for Podfile files
pub struct PodfileParser;

impl ManifestParser for PodfileParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cocoapods);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with("pod ") || line.starts_with("pod(") {
                records.extend(build_declaration(&builder, line));
            }
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cocoapods
    }
}

/// Parser for Podfile.lock files
pub struct PodfileLockParser;

impl ManifestParser for PodfileLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cocoapods);
        let mut records = Vec::new();
        let mut in_pods = false;
        for line in content.lines() {
            if line.trim_end() == "PODS:" {
                in_pods = true;
                continue;
            }
            if !in_pods {
                continue;
            }
            // the PODS list ends at the next top-level section
            if !line.starts_with(' ') && !line.trim().is_empty() {
                break;
            }
            // pins sit at two spaces; deeper entries are requirement lists
            let Some(entry) = line.strip_prefix("  - ") else {
                continue;
            };
            // pods with sub-deps end in `):`
            let entry = entry.trim_end_matches(':');
            let (name, version) = match entry.split_once(" (") {
                Some((name, rest)) => (name.trim(), rest.trim_end_matches(')')),
                None => (entry.trim(), ""),
            };
            records.extend(builder.build(name, version));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cocoapods
    }
}

/// Parser for .podspec files
pub struct PodspecParser;

impl ManifestParser for PodspecParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cocoapods);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.contains(".dependency ") || line.contains(".dependency(") {
                records.extend(build_declaration(&builder, line));
            }
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cocoapods
    }
}

const URL_SCHEMES: [&str; 5] = ["https://", "http://", "git://", "git@", "ssh://"];

/// Split a Cartfile origin into (namespace, name); accepts both the short
/// `owner/repo` form and full repository URLs
fn split_origin(origin: &str) -> (String, String) {
    let mut path = origin;
    for scheme in URL_SCHEMES {
        if let Some(rest) = path.strip_prefix(scheme) {
            path = rest;
            break;
        }
    }
    let path = path.trim_end_matches(".git");
    match path.rsplit_once('/') {
        Some((namespace, name)) => (namespace.to_string(), name.to_string()),
        None => (String::new(), path.to_string()),
    }
}

fn cartfile_origin(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("github ")
        .or_else(|| line.strip_prefix("git "))?;
    Some(rest.trim())
}

/// Parser for Cartfile files
pub struct CartfileParser;

impl ManifestParser for CartfileParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cocoapods);
        let mut records = Vec::new();
        for line in content.lines() {
            let Some(rest) = cartfile_origin(line.trim()) else {
                continue;
            };
            let mut parts = rest.splitn(2, ' ');
            let Some(origin) = parts.next() else {
                continue;
            };
            let (namespace, name) = split_origin(origin.trim_matches('"'));
            let requirement = parts
                .next()
                .map(|r| r.replace(' ', "").replace('"', ""))
                .unwrap_or_default();
            let requirement = requirement.trim_start_matches('v');
            let version = normalize::normalize(Ecosystem::Cocoapods, requirement);
            records.extend(builder.build_with_namespace(&namespace, &name, &version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cocoapods
    }
}

/// Parser for Cartfile.resolved files
pub struct CartfileResolvedParser;

impl ManifestParser for CartfileResolvedParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cocoapods);
        let mut records = Vec::new();
        for line in content.lines() {
            let Some(rest) = cartfile_origin(line.trim()) else {
                continue;
            };
            let mut parts = rest.split_whitespace();
            let Some(origin) = parts.next() else {
                continue;
            };
            let (namespace, name) = split_origin(origin.trim_matches('"'));
            let version = parts
                .next()
                .map(|v| v.trim_matches('"').trim_start_matches('v'))
                .unwrap_or("");
            records.extend(builder.build_with_namespace(&namespace, &name, version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cocoapods
    }
}
