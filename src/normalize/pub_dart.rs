//! Dart pub version constraint normalizer
//!
//! Handles constraint formats:
//! - Any: `any`
//! - Caret: `^1.2.3`, `^0.1.2`
//! - Comparison: `>=1.2.3 <2.0.0`
//! - Exact: `1.2.3`

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::{RangeNormalizer, ALL};

/// pub constraint normalizer
pub struct PubNormalizer;

impl RangeNormalizer for PubNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let raw = raw.trim();
        if raw == "any" || raw == ALL {
            return Ok(ALL.to_string());
        }
        let mut out = Vec::new();
        for token in raw.split([' ', ',']) {
            let token = token.trim().trim_end_matches(',');
            if token.is_empty() {
                continue;
            }
            out.push(constraint(token)?);
        }
        if out.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(out.join(", "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pub
    }
}

fn constraint(token: &str) -> Result<String, NormalizeError> {
    if let Some(rest) = token.strip_prefix('^') {
        return caret(rest);
    }
    Ok(token.to_string())
}

fn caret(rest: &str) -> Result<String, NormalizeError> {
    if let Ok(tuple) = VersionTuple::parse(rest) {
        if tuple.len() == 3 {
            let mut upper = tuple.clone();
            if tuple.get(0) == Some(0) {
                upper.increment_at(1);
            } else {
                upper.increment_at(0);
            }
            return Ok(format!(">={tuple}, <{upper}"));
        }
    }
    // pre-release carets and short forms keep only the lower bound
    Ok(format!(">={rest}"))
}
