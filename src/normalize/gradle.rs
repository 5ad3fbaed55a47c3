//! Gradle dependency version normalizer
//!
//! Handles version formats:
//! - Dynamic: `1.+`, `1.2.+`, `+`
//! - Strict marker: `1.7.25!!`
//! - Maven interval notation: `[1.0,2.0)`
//! - Unresolved property references (`$junitVersion`) become unconstrained
//! - Exact versions pass through

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::interval::parse_intervals;
use crate::normalize::{RangeNormalizer, ALL};

/// Gradle version normalizer
pub struct GradleNormalizer;

impl RangeNormalizer for GradleNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let raw = raw.trim();
        // interpolated properties cannot be resolved outside the build
        if raw.contains('$') {
            return Ok(String::new());
        }
        let raw = raw.strip_suffix("!!").unwrap_or(raw);
        if raw == "+" || raw == ALL {
            return Ok(ALL.to_string());
        }
        if let Some(normalized) = parse_intervals(raw)? {
            return Ok(normalized);
        }
        if raw.ends_with('+') {
            return dynamic(raw);
        }

        let tokens: Vec<&str> = raw
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(tokens.join(", "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gradle
    }
}

/// `1.2.+` floats the last component: everything in the 1.2 series
fn dynamic(version: &str) -> Result<String, NormalizeError> {
    let components: Vec<&str> = version.split('.').collect();
    let wildcard_idx = components
        .iter()
        .position(|c| *c == "+")
        .ok_or_else(|| NormalizeError::malformed(version))?;
    if wildcard_idx == 0 {
        return Ok(ALL.to_string());
    }
    let replaced = version.replace('+', "0");
    let tuple = VersionTuple::parse(&replaced)?;
    let mut upper = tuple.clone();
    upper.increment_at(wildcard_idx - 1);
    Ok(format!(">={tuple}, <{upper}"))
}
