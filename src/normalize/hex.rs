//! Hex (Elixir/Erlang) version requirement normalizer
//!
//! Handles requirement formats:
//! - Exact: `== 1.2.3`, `1.2.3`
//! - Pessimistic: `~> 2.1`, `~> 2.1.3`
//! - Comparison: `>= 1.0.0`
//! - Boolean composition: `~> 2.0 or ~> 1.8`, `>= 1.0 and < 2.0`
//!
//! Unlike RubyGems, Hex keeps its bounds at the component count given:
//! `~> 2.1` yields `>=2.1, <3.0` with no zero padding.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::RangeNormalizer;

/// Hex requirement normalizer
pub struct HexNormalizer;

impl RangeNormalizer for HexNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut parts = Vec::new();
        for part in raw.split(" or ") {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let mut terms = Vec::new();
            for term in part.split(" and ") {
                let term = term.trim();
                if term.is_empty() {
                    continue;
                }
                terms.push(requirement(term)?);
            }
            if terms.is_empty() {
                return Err(NormalizeError::malformed(part));
            }
            parts.push(terms.join(" && "));
        }
        if parts.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(parts.join(" || "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hex
    }
}

fn requirement(term: &str) -> Result<String, NormalizeError> {
    let compact: String = term.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(rest) = compact.strip_prefix("~>") {
        return pessimistic(rest);
    }
    if let Some(rest) = compact.strip_prefix("==") {
        return Ok(rest.to_string());
    }
    // comparator terms and canonical re-feeds pass through
    Ok(term.to_string())
}

fn pessimistic(rest: &str) -> Result<String, NormalizeError> {
    let (head, flag) = crate::normalize::split_flag(rest);
    let mut tuple = VersionTuple::parse(&head)?;
    tuple.pad_to(2);
    let lower = tuple.clone();
    let mut upper = tuple.clone();
    upper.increment_at(tuple.len() - 2);
    Ok(format!(">={lower}{flag}, <{upper}"))
}
