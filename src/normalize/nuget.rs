//! NuGet version range normalizer
//!
//! Handles range formats:
//! - Interval notation: `[1.0,2.0)`, `(,1.0]`, `[1.0]` (same grammar as Maven)
//! - Floating: `1.2.*`, `6.0.*-*`
//! - Match-everything: `*`, `*-*`
//! - Bare minimum: `1.0` means `>=1.0`
//!
//! An exclusive single bound such as `(1.0)` matches nothing and is rejected.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::interval::parse_intervals;
use crate::normalize::{RangeNormalizer, ALL};

/// NuGet range normalizer
pub struct NugetNormalizer;

impl RangeNormalizer for NugetNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let raw = raw.trim();
        if raw == "*" || raw == "*-*" || raw == ALL {
            return Ok(ALL.to_string());
        }
        if let Some(normalized) = parse_intervals(raw)? {
            return Ok(normalized);
        }

        // canonical re-feeds arrive as comparator lists
        let tokens: Vec<&str> = raw.split(',').map(|t| t.trim()).collect();
        if tokens
            .iter()
            .all(|t| t.starts_with('>') || t.starts_with('<') || t.starts_with("!="))
        {
            return Ok(tokens.join(", "));
        }

        let stripped = raw.strip_suffix("-*").unwrap_or(raw);
        if stripped.contains('*') {
            return floating(stripped);
        }
        // a bare version is a minimum bound; reject non-numeric tokens
        VersionTuple::parse(&crate::normalize::split_flag(raw).0)?;
        Ok(format!(">={raw}"))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Nuget
    }
}

fn floating(version: &str) -> Result<String, NormalizeError> {
    let replaced = version.replace('*', "0");
    let tuple = VersionTuple::parse(&replaced)?;
    if tuple.len() < 2 {
        return Err(NormalizeError::malformed(version));
    }
    let mut upper = tuple.clone();
    upper.bump_at(tuple.len() - 2);
    Ok(format!(">={tuple}, <{upper}"))
}
