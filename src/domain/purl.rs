//! Package URL (`pkg:` identifier) parsing
//!
//! Accepts identifiers like `pkg:npm/%40babel/core@7.20.0` and lowers them to
//! the same record shape the manifest extractors emit. Qualifiers (`?...`)
//! and subpaths (`#...`) are stripped; path segments are percent-decoded.

use super::{DependencyRecord, Ecosystem};
use crate::normalize::pypi::canonicalize_name;

/// Parses a package URL into a dependency record
///
/// Returns `None` when the string is not a well-formed `pkg:` identifier.
pub fn parse_purl(input: &str) -> Option<DependencyRecord> {
    let rest = input.trim().strip_prefix("pkg:")?;
    let rest = rest.split('#').next().unwrap_or("");
    let rest = rest.split('?').next().unwrap_or("");

    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }

    let ptype = segments[0].to_ascii_lowercase();
    let last = percent_decode(segments[segments.len() - 1]);
    let namespace = segments[1..segments.len() - 1]
        .iter()
        .map(|s| percent_decode(s))
        .collect::<Vec<String>>()
        .join("/");

    let (mut name, version) = match last.split_once('@') {
        Some((name, version)) => (name.to_string(), version.to_string()),
        // pip-style pins sometimes appear without the @ separator
        None => match last.split_once("==") {
            Some((name, version)) if ptype == "pypi" => {
                (name.to_string(), version.to_string())
            }
            _ => (last, String::new()),
        },
    };
    if name.is_empty() {
        return None;
    }
    if ptype == "pypi" {
        name = canonicalize_name(&name);
    }

    let language = Ecosystem::from_label(&ptype)
        .map(|eco| eco.default_language())
        .unwrap_or("");

    Some(DependencyRecord {
        ecosystem: ptype,
        namespace,
        name,
        version,
        language: language.to_string(),
    })
}

fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
