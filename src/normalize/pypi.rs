//! PEP 440 specifier normalizer and PEP 503 name canonicalization
//!
//! Handles specifier formats:
//! - Exact: `==1.2.3`, `===1.2.3`
//! - Compatible release: `~=1.4.5` (lowered to `>=1.4.5, ==1.4.*`)
//! - Comparison lists: `>=1.0, !=1.5.0, <2.0`
//! - Prefix match: `==1.4.*` (kept with its operator)

use crate::domain::Ecosystem;
use crate::error::NormalizeError;
use crate::normalize::RangeNormalizer;
use regex::Regex;
use std::sync::LazyLock;

static NAME_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Canonicalizes a distribution name per PEP 503
///
/// Runs of `-`, `_` and `.` collapse to a single `-` and the name is
/// lowercased, so `Django_REST.framework` and `django-rest-framework`
/// compare equal.
pub fn canonicalize_name(name: &str) -> String {
    NAME_SEPARATOR_RE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// PEP 440 specifier normalizer
pub struct Pep440Normalizer;

impl RangeNormalizer for Pep440Normalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut out = Vec::new();
        for specifier in raw.split(',') {
            let specifier: String = specifier.chars().filter(|c| !c.is_whitespace()).collect();
            if specifier.is_empty() {
                continue;
            }
            out.push(lower_specifier(&specifier)?);
        }
        if out.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(out.join(", "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}

fn lower_specifier(specifier: &str) -> Result<String, NormalizeError> {
    if let Some(rest) = specifier.strip_prefix("===") {
        return Ok(rest.to_string());
    }
    if let Some(rest) = specifier.strip_prefix("==") {
        // prefix matches keep their operator, exact pins drop it
        if rest.contains('*') {
            return Ok(specifier.to_string());
        }
        return Ok(rest.to_string());
    }
    if let Some(rest) = specifier.strip_prefix("~=") {
        return compatible_release(rest);
    }
    Ok(specifier.to_string())
}

/// `~=X.Y.Z` means at least this release, same `X.Y` series
fn compatible_release(version: &str) -> Result<String, NormalizeError> {
    let prefix = match version.rsplit_once('.') {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => return Err(NormalizeError::malformed(version)),
    };
    Ok(format!(">={version}, =={prefix}.*"))
}
