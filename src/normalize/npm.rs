//! npm/yarn/pnpm semver range normalizer
//!
//! Handles range formats:
//! - Exact: `1.2.3`, `=1.2.3`
//! - Caret: `^1.2.3`, `^0.2.3`
//! - Tilde: `~1.2.3`, `~1.2`
//! - Comparison: `>=1.2.3`, `>1.2`, `<=1.2.3`, `<1.2.3`, `!=1.2.3`
//! - Wildcard: `*`, `x`, `1.x`, `1.2.*`
//! - Hyphen range: `1.2.3 - 2.3.4`
//! - Disjunction: `<1.0.0 || >=2.0.0`
//!
//! Pre-release suffixes (`-beta.1`) ride along on the lower bound and never
//! enter the tuple arithmetic.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::{split_flag, split_terms, RangeNormalizer, ALL};

/// npm semver range normalizer
pub struct NpmNormalizer;

impl RangeNormalizer for NpmNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let cleaned = glue_operators(raw);
        if let Some((lo, hi)) = cleaned.split_once(" - ") {
            return hyphen_range(lo.trim(), hi.trim());
        }

        let mut parts = Vec::new();
        for part in cleaned.split("||") {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            parts.push(conjunction(part)?);
        }
        if parts.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(parts.join(" || "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
}

/// Glues operators to their versions so `>= 1.2` tokenizes as one term.
/// Two-character operators go first so `= ` cannot split them.
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

fn conjunction(part: &str) -> Result<String, NormalizeError> {
    let mut out = Vec::new();
    for term in split_terms(part) {
        out.extend(term_to_comparators(&term)?);
    }
    if out.is_empty() {
        return Err(NormalizeError::malformed(part));
    }
    Ok(out.join(", "))
}

fn term_to_comparators(term: &str) -> Result<Vec<String>, NormalizeError> {
    if term == ALL || term == "*" || term == "x" || term == "X" {
        return Ok(vec![ALL.to_string()]);
    }
    for op in [">=", "<=", "!="] {
        if let Some(rest) = term.strip_prefix(op) {
            return comparator(op, rest);
        }
    }
    if let Some(rest) = term.strip_prefix('<') {
        return comparator("<", rest);
    }
    if let Some(rest) = term.strip_prefix('>') {
        return greater(rest);
    }
    if let Some(rest) = term.strip_prefix('~') {
        return tilde(rest);
    }
    if let Some(rest) = term.strip_prefix('^') {
        return caret(rest);
    }
    bare(&term.replace('=', ""))
}

fn strip_wildcard_suffix(head: &str) -> String {
    head.replace(".x", "").replace(".X", "").replace(".*", "")
}

fn comparator(op: &str, rest: &str) -> Result<Vec<String>, NormalizeError> {
    let (head, flag) = split_flag(rest);
    let head = head.replace(['x', 'X', '*'], "0");
    let tuple = VersionTuple::parse(&head)?.padded(3);
    Ok(vec![format!("{op}{tuple}{flag}")])
}

fn greater(rest: &str) -> Result<Vec<String>, NormalizeError> {
    let (head, flag) = split_flag(rest);
    let head = strip_wildcard_suffix(&head);
    let tuple = VersionTuple::parse(&head)?;
    if tuple.len() < 3 {
        // `>1.2` admits 1.3.0 as the first version above the range
        let mut lower = tuple.clone();
        lower.bump_at(lower.len() - 1);
        lower.pad_to(3);
        Ok(vec![format!(">={lower}{flag}")])
    } else {
        Ok(vec![format!(">{head}{flag}")])
    }
}

fn tilde(rest: &str) -> Result<Vec<String>, NormalizeError> {
    let (head, flag) = split_flag(rest);
    let head = strip_wildcard_suffix(&head);
    let tuple = VersionTuple::parse(&head)?;
    let lower = tuple.clone().padded(3);
    let mut upper = tuple.clone();
    if tuple.len() < 3 {
        upper.bump_at(tuple.len() - 1);
    } else {
        upper.increment_at(tuple.len() - 2);
    }
    upper.pad_to(3);
    Ok(vec![format!(">={lower}{flag}"), format!("<{upper}")])
}

fn caret(rest: &str) -> Result<Vec<String>, NormalizeError> {
    let (head, flag) = split_flag(rest);
    let head = strip_wildcard_suffix(&head);
    let tuple = VersionTuple::parse(&head)?;
    let lower = tuple.clone().padded(3);
    match tuple.first_nonzero() {
        Some(idx) => {
            let mut upper = tuple;
            upper.truncate(idx + 1);
            upper.bump_at(idx);
            upper.pad_to(3);
            Ok(vec![format!(">={lower}{flag}"), format!("<{upper}")])
        }
        // no component to increment, the range is unbounded above
        None => Ok(vec![format!(">={lower}{flag}")]),
    }
}

fn bare(term: &str) -> Result<Vec<String>, NormalizeError> {
    let (head, flag) = split_flag(term);
    let head = strip_wildcard_suffix(&head);
    if head.is_empty() {
        return Ok(vec![ALL.to_string()]);
    }
    let tuple = VersionTuple::parse(&head)?;
    if tuple.len() < 3 {
        // `1.2` and `1.x` behave as `~1.2`
        let combined = format!("{head}{flag}");
        tilde(&combined)
    } else {
        Ok(vec![format!("{head}{flag}")])
    }
}

fn hyphen_range(lo: &str, hi: &str) -> Result<String, NormalizeError> {
    let (lo_head, lo_flag) = split_flag(lo);
    let (hi_head, hi_flag) = split_flag(hi);
    let hi_tuple = VersionTuple::parse(&hi_head)?;
    if hi_tuple.len() < 3 {
        // a partial upper bound is exclusive of the next release
        let mut upper = hi_tuple;
        upper.bump_at(upper.len() - 1);
        upper.pad_to(3);
        Ok(format!(">={lo_head}{lo_flag}, <{upper}{hi_flag}"))
    } else {
        Ok(format!(">={lo_head}{lo_flag}, <={hi_head}{hi_flag}"))
    }
}
