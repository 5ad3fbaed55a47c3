//! Composer (Packagist) version range normalizer
//!
//! Handles range formats:
//! - Exact: `1.2.3`, `=1.2.3`, `v1.0.2`
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2`
//! - Wildcard: `*`, `1.*`, `1.2.x`
//! - Comparison: `>=1.2`, `!=1.0.0`
//! - Hyphen range: `1.0 - 2.0`
//! - Disjunction: `^1.0 || ^2.0` (single `|` is accepted as well)
//!
//! Stability suffixes (`@stable`, `@beta`) become `-suffix` flags on the
//! emitted lower bound.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::{split_terms, RangeNormalizer, ALL};

/// Composer range normalizer
pub struct ComposerNormalizer;

impl RangeNormalizer for ComposerNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut cleaned = glue_operators(raw);
        if !cleaned.contains("||") && cleaned.contains('|') {
            cleaned = cleaned.replace('|', " || ");
        }
        if let Some((lo, hi)) = cleaned.split_once(" - ") {
            return hyphen_range(lo.trim(), hi.trim());
        }

        let mut parts = Vec::new();
        for part in cleaned.split("||") {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let mut terms = Vec::new();
            for term in split_terms(part) {
                terms.push(requirement(&term)?);
            }
            if terms.is_empty() {
                return Err(NormalizeError::malformed(part));
            }
            parts.push(terms.join(", "));
        }
        if parts.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(parts.join(" || "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
    }
}

fn glue_operators(raw: &str) -> String {
    raw.trim()
        .replace("^ ", "^")
        .replace("~> ", "~")
        .replace("~ ", "~")
        .replace(">= ", ">=")
        .replace("<= ", "<=")
        .replace("!= ", "!=")
        .replace("> ", ">")
        .replace("< ", "<")
        .replace("= ", "=")
}

/// Splits the `@stability` suffix into a `-stability` flag
fn split_stability(term: &str) -> (String, String) {
    match term.split_once('@') {
        Some((version, stability)) => (version.to_string(), format!("-{stability}")),
        None => (term.to_string(), String::new()),
    }
}

fn requirement(term: &str) -> Result<String, NormalizeError> {
    let (version, flag) = split_stability(term);
    if version == "*" || version == "x" {
        return Ok(format!("{ALL}{flag}"));
    }
    if version == ALL || version.starts_with("all-") {
        return Ok(version);
    }

    let version = if version.starts_with('=') {
        version.replace('=', "")
    } else {
        version
    };

    if let Some(rest) = version.strip_prefix('~') {
        return tilde(rest, &flag);
    }
    if let Some(rest) = version.strip_prefix('^') {
        return caret(rest, &flag);
    }
    for op in ["!=", ">=", "<=", ">", "<"] {
        if let Some(rest) = version.strip_prefix(op) {
            // comparator versions are zero-padded to three components;
            // pre-release suffixes block the tuple parse and pass through
            let version = match VersionTuple::parse(rest) {
                Ok(tuple) => tuple.padded(3).to_string(),
                Err(_) => rest.to_string(),
            };
            return Ok(format!("{op}{version}{flag}"));
        }
    }
    if version.contains('x') || version.contains('*') {
        return wildcard(&version, &flag);
    }
    Ok(format!("{version}{flag}"))
}

fn tilde(rest: &str, flag: &str) -> Result<String, NormalizeError> {
    let replaced = rest.replace(['x', '*'], "0");
    let mut tuple = VersionTuple::parse(&replaced)?;
    tuple.pad_to(2);
    let lower = tuple.clone().padded(3);
    // the second-to-last given component is bumped, nothing is zeroed
    let mut upper = tuple.clone();
    upper.bump_at(tuple.len() - 2);
    upper.pad_to(3);
    Ok(format!(">={lower}{flag}, <{upper}"))
}

fn caret(rest: &str, flag: &str) -> Result<String, NormalizeError> {
    let stripped = rest.replace(".x", "").replace(".*", "");
    let tuple = VersionTuple::parse(&stripped)?;
    let lower = tuple.clone().padded(3);
    match tuple.first_nonzero() {
        Some(idx) => {
            let mut upper = tuple;
            upper.truncate(idx + 1);
            upper.bump_at(idx);
            upper.pad_to(3);
            Ok(format!(">={lower}{flag}, <{upper}"))
        }
        None => Ok(format!(">={lower}{flag}")),
    }
}

fn wildcard(version: &str, flag: &str) -> Result<String, NormalizeError> {
    let replaced = version.replace(['x', '*'], "0");
    let tuple = VersionTuple::parse(&replaced)?;
    if tuple.len() < 2 {
        return Err(NormalizeError::malformed(version));
    }
    let mut upper = tuple.clone();
    upper.bump_at(tuple.len() - 2);
    Ok(format!(">={tuple}{flag}, <{upper}"))
}

fn hyphen_range(lo: &str, hi: &str) -> Result<String, NormalizeError> {
    let (lo_version, lo_flag) = split_stability(lo);
    let (hi_version, hi_flag) = split_stability(hi);
    let hi_tuple = VersionTuple::parse(&hi_version)?;
    if hi_tuple.len() < 3 {
        let mut upper = hi_tuple;
        upper.bump_at(upper.len() - 1);
        upper.pad_to(3);
        Ok(format!(">={lo_version}{lo_flag}, <{upper}{hi_flag}"))
    } else {
        Ok(format!(">={lo_version}{lo_flag}, <={hi_version}{hi_flag}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> String {
        ComposerNormalizer.normalize(raw).unwrap()
    }

    #[test]
    fn test_bare_version_passthrough() {
        assert_eq!(normalize("1.2.3"), "1.2.3");
        assert_eq!(normalize("=1.2.3"), "1.2.3");
    }

    #[test]
    fn test_wildcard_major_stays_unpadded() {
        assert_eq!(normalize("1.*"), ">=1.0, <2.0");
        assert_eq!(normalize("1.2.x"), ">=1.2.0, <1.3.0");
    }

    #[test]
    fn test_star_is_all() {
        assert_eq!(normalize("*"), "all");
    }

    #[test]
    fn test_caret() {
        assert_eq!(normalize("^1.2.3"), ">=1.2.3, <2.0.0");
        assert_eq!(normalize("^0.3"), ">=0.3.0, <0.4.0");
        assert_eq!(normalize("^0.0.0"), ">=0.0.0");
    }

    #[test]
    fn test_tilde_bumps_second_to_last_given() {
        assert_eq!(normalize("~1.2"), ">=1.2.0, <2.2.0");
        assert_eq!(normalize("~1"), ">=1.0.0, <2.0.0");
    }

    #[test]
    fn test_comparators_are_zero_padded() {
        assert_eq!(normalize(">=1.0"), ">=1.0.0");
        assert_eq!(normalize("!=1.0.0"), "!=1.0.0");
        assert_eq!(normalize(">= 5.6"), ">=5.6.0");
        assert_eq!(normalize("<2"), "<2.0.0");
    }

    #[test]
    fn test_stability_flag() {
        assert_eq!(normalize("1.2.3@stable"), "1.2.3-stable");
        assert_eq!(normalize("*@dev"), "all-dev");
        assert_eq!(normalize("^1.2@beta"), ">=1.2.0-beta, <2.0.0");
    }

    #[test]
    fn test_single_pipe_disjunction() {
        assert_eq!(normalize("^1.0 | ^2.0"), ">=1.0.0, <2.0.0 || >=2.0.0, <3.0.0");
    }

    #[test]
    fn test_conjunction() {
        assert_eq!(normalize(">=1.0 <2.0"), ">=1.0.0, <2.0.0");
        assert_eq!(normalize(">=1.0, <2.0"), ">=1.0.0, <2.0.0");
    }

    #[test]
    fn test_hyphen_range() {
        assert_eq!(normalize("1.0.0 - 2.0.0"), ">=1.0.0, <=2.0.0");
        assert_eq!(normalize("1.0 - 2.0"), ">=1.0, <2.1.0");
    }

    #[test]
    fn test_idempotence_on_canonical_output() {
        for raw in ["1.2.x", "^1.2.3", "~1.2", "*", "1.2.3@stable", ">=1.0 <2.0"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "refeed changed {raw:?}");
        }
    }

    #[test]
    fn test_non_numeric_is_error() {
        assert!(ComposerNormalizer.normalize("^dev-main").is_err());
    }
}
