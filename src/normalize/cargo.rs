//! Cargo version requirement normalizer
//!
//! Handles requirement formats:
//! - Exact: `=1.4.2` (emitted as the bare pin `1.4.2`)
//! - Caret: `^1.2.3` (and the zero-major special cases `^0`, `^0.0`)
//! - Tilde: `~1.2.3`, `~1.2`, `~1`
//! - Wildcard: `*`, `1.*`, `1.2.*`
//! - Comparison lists: `>=1.2, <1.5`
//!
//! A bare version carries caret semantics, the same as cargo itself treats
//! `serde = "1.0"` as `^1.0`. Only an explicit `=` pins exactly.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::{split_flag, RangeNormalizer};

/// Cargo requirement normalizer
pub struct CargoNormalizer;

impl RangeNormalizer for CargoNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut out = Vec::new();
        for token in raw.split(',') {
            let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
            if token.is_empty() {
                continue;
            }
            out.push(requirement(&token)?);
        }
        if out.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(out.join(", "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }
}

fn requirement(token: &str) -> Result<String, NormalizeError> {
    if let Some(rest) = token.strip_prefix('=') {
        return Ok(rest.trim_start_matches('=').to_string());
    }
    for op in [">=", "<=", "!=", "<", ">"] {
        if token.starts_with(op) {
            return Ok(token.to_string());
        }
    }
    if let Some(rest) = token.strip_prefix('~') {
        return tilde(rest);
    }
    if token.contains('*') {
        return wildcard(token);
    }
    // bare requirements default to caret semantics
    caret(token.trim_start_matches('^'))
}

fn tilde(rest: &str) -> Result<String, NormalizeError> {
    let (head, flag) = split_flag(rest);
    let tuple = VersionTuple::parse(&head)?;
    match tuple.len() {
        1 => {
            let lower = tuple.clone().padded(3);
            let mut upper = tuple;
            upper.bump_at(0);
            upper.pad_to(3);
            Ok(format!(">={lower}{flag}, <{upper}"))
        }
        2 | 3 => {
            let lower = tuple.clone().padded(3);
            let mut upper = tuple;
            upper.increment_at(1);
            upper.pad_to(3);
            Ok(format!(">={lower}{flag}, <{upper}"))
        }
        _ => Ok(format!("{head}{flag}")),
    }
}

fn caret(rest: &str) -> Result<String, NormalizeError> {
    let (head, flag) = split_flag(rest);
    // zero-major shortcuts without enough components to increment
    if head == "0" {
        return Ok(format!(">=0.0.0{flag}, <1.0.0"));
    }
    if head == "0.0" {
        return Ok(format!(">=0.0.0{flag}, <0.1.0"));
    }
    let tuple = VersionTuple::parse(&head)?;
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

fn wildcard(token: &str) -> Result<String, NormalizeError> {
    if token == "*" {
        return Ok(">=0.0.0".to_string());
    }
    let replaced = token.replace('*', "0");
    let tuple = VersionTuple::parse(&replaced)?;
    if tuple.len() < 2 {
        return Err(NormalizeError::malformed(token));
    }
    let mut upper = tuple.clone();
    upper.bump_at(tuple.len() - 2);
    Ok(format!(">={tuple}, <{upper}"))
}
