//! Hackage (Haskell/Cabal) version range normalizer
//!
//! Handles range formats:
//! - Exact: `==1.2.3`
//! - Wildcard: `==1.2.*`
//! - PVP caret: `^>=1.2.3`
//! - Comparison: `>=1.4 && <1.5`, disjunctions with `||`
//!
//! Cabal ranges already use `&&`/`||`; the normalizer keeps that structure
//! and lowers only the operator forms.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::RangeNormalizer;

/// Hackage range normalizer
pub struct HackageNormalizer;

impl RangeNormalizer for HackageNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut parts = Vec::new();
        for part in raw.split("||") {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let mut terms = Vec::new();
            for term in part.split("&&") {
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
        Ecosystem::Hackage
    }
}

fn requirement(term: &str) -> Result<String, NormalizeError> {
    let compact: String = term.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(rest) = compact.strip_prefix("^>=") {
        return pvp_caret(rest);
    }
    if let Some(rest) = compact.strip_prefix("==") {
        if rest.contains('*') {
            return wildcard(rest);
        }
        return Ok(rest.to_string());
    }
    Ok(compact)
}

/// `==1.2.*` matches everything in the 1.2 series
fn wildcard(rest: &str) -> Result<String, NormalizeError> {
    let lower = rest.replace(".*", "");
    let tuple = VersionTuple::parse(&lower)?;
    let mut upper = tuple.clone();
    upper.bump_at(tuple.len() - 1);
    Ok(format!(">={tuple} && <{upper}"))
}

/// `^>=1.2.3` is the PVP caret: at least this version, below the next minor
fn pvp_caret(rest: &str) -> Result<String, NormalizeError> {
    let tuple = VersionTuple::parse(rest)?;
    let upper = if tuple.len() == 1 {
        let mut upper = tuple.clone();
        upper.pad_to(2);
        upper.set(1, 1);
        upper
    } else {
        let mut upper = tuple.clone();
        upper.truncate(2);
        upper.bump_at(1);
        upper
    };
    Ok(format!(">={tuple} && <{upper}"))
}
