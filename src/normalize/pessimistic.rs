//! Pessimistic-operator (`~>`) range normalizer for RubyGems and CocoaPods
//!
//! Handles requirement formats:
//! - Exact: `= 1.2.3`, `1.2.3`
//! - Pessimistic: `~> 2.1`, `~> 2.1.4`
//! - Comparison lists: `>= 1.0, < 2.0`
//!
//! A one- or two-component pessimistic bound bumps its last given component;
//! three or more components bump the second-to-last and zero the rest. Both
//! bounds are zero-padded to three components.

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::RangeNormalizer;

/// RubyGems/CocoaPods requirement normalizer
pub struct PessimisticNormalizer {
    ecosystem: Ecosystem,
}

impl PessimisticNormalizer {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }
}

impl RangeNormalizer for PessimisticNormalizer {
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
        self.ecosystem
    }
}

fn requirement(token: &str) -> Result<String, NormalizeError> {
    if let Some(rest) = token.strip_prefix("~>") {
        return pessimistic(rest);
    }
    for op in [">=", "<=", "!=", ">", "<"] {
        if token.starts_with(op) {
            return Ok(token.to_string());
        }
    }
    if token.contains('=') {
        let bare = token.rsplit('=').next().unwrap_or("");
        return Ok(bare.to_string());
    }
    Ok(token.to_string())
}

/// Splits a version into its leading numeric components and a trailing
/// pre-release flag (`1.2.beta` and `1.2-beta` both yield flag `-beta`).
fn split_numeric(version: &str) -> (Vec<u64>, String) {
    let (head, mut flag) = match version.split_once('-') {
        Some((head, _)) => {
            let tail = version.rsplit('-').next().unwrap_or("");
            (head.to_string(), format!("-{tail}"))
        }
        None => (version.to_string(), String::new()),
    };

    let mut nums = Vec::new();
    let mut trailing = Vec::new();
    for segment in head.split('.') {
        if trailing.is_empty() {
            if let Ok(n) = segment.parse::<u64>() {
                nums.push(n);
                continue;
            }
        }
        trailing.push(segment.to_string());
    }
    if !trailing.is_empty() {
        flag = format!("-{}{}", trailing.join("."), flag);
    }
    (nums, flag)
}

fn pessimistic(rest: &str) -> Result<String, NormalizeError> {
    let (nums, flag) = split_numeric(rest);
    if nums.is_empty() {
        return Err(NormalizeError::malformed(rest));
    }
    let tuple = VersionTuple::from_parts(nums);
    let lower = tuple.clone().padded(3);
    let mut upper = tuple.clone();
    if tuple.len() < 3 {
        upper.bump_at(tuple.len() - 1);
    } else {
        upper.increment_at(tuple.len() - 2);
    }
    upper.pad_to(3);
    Ok(format!(">={lower}{flag}, <{upper}"))
}
