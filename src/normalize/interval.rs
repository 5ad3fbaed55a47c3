//! Maven/Ivy interval-notation range normalizer, shared by pom and sbt
//!
//! Handles range formats:
//! - Inclusive: `[1.0,2.0]`
//! - Exclusive: `(1.0,2.0)` and the half-open mixes `[1.0,2.0)`, `(1.0,2.0]`
//! - Unbounded: `(,1.0]`, `[1.0,)`
//! - Pin: `[1.0]`
//! - Soft requirements (no brackets) pass through unchanged
//!
//! Interval bounds are never padded; `[1.0,2.0]` keeps its two components.

use crate::domain::Ecosystem;
use crate::error::NormalizeError;
use crate::normalize::RangeNormalizer;
use regex::Regex;
use std::sync::LazyLock;

static INTERVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\(][0-9,.\s]+[\)\]]").unwrap());

/// Maven interval normalizer (also covers sbt coordinates)
pub struct IntervalNormalizer {
    ecosystem: Ecosystem,
}

impl IntervalNormalizer {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }
}

impl RangeNormalizer for IntervalNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        match parse_intervals(raw)? {
            Some(normalized) => Ok(normalized),
            // a soft requirement such as `3.8.1` stays as given
            None => Ok(raw.trim().to_string()),
        }
    }

    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }
}

/// Lowers every bracket interval found in `raw`
///
/// Returns `Ok(None)` when the string contains no interval notation.
pub(crate) fn parse_intervals(raw: &str) -> Result<Option<String>, NormalizeError> {
    let matches: Vec<&str> = INTERVAL_RE.find_iter(raw).map(|m| m.as_str()).collect();
    if matches.is_empty() {
        return Ok(None);
    }
    let mut out = Vec::new();
    for m in matches {
        out.push(interval(m)?);
    }
    Ok(Some(out.join(", ")))
}

fn interval(text: &str) -> Result<String, NormalizeError> {
    let open = text.chars().next().unwrap_or('[');
    let close = text.chars().last().unwrap_or(']');
    let inner = &text[1..text.len() - 1];

    let bounds: Vec<&str> = inner.split(',').map(|b| b.trim()).collect();
    match bounds.as_slice() {
        [single] if !single.is_empty() => {
            if open == '[' && close == ']' {
                Ok((*single).to_string())
            } else {
                // an exclusive single bound matches nothing
                Err(NormalizeError::malformed(text))
            }
        }
        [lo, hi] => {
            let lower = match (*lo, open) {
                ("", _) => None,
                (v, '[') => Some(format!(">={v}")),
                (v, _) => Some(format!(">{v}")),
            };
            let upper = match (*hi, close) {
                ("", _) => None,
                (v, ']') => Some(format!("<={v}")),
                (v, _) => Some(format!("<{v}")),
            };
            let parts: Vec<String> = [lower, upper].into_iter().flatten().collect();
            if parts.is_empty() {
                return Err(NormalizeError::malformed(text));
            }
            Ok(parts.join(", "))
        }
        _ => Err(NormalizeError::malformed(text)),
    }
}
