//! Numeric version tuple used by the range normalizers
//!
//! Every ecosystem normalizer lowers its native syntax to arithmetic on a
//! dotted tuple of non-negative integers: pad with zeros, increment one
//! component, zero the components after it. `VersionTuple` is that value
//! type. Pre-release flags and build metadata are carried separately by the
//! normalizers as string suffixes and never enter the tuple.

use crate::error::NormalizeError;
use std::fmt;

/// A dotted numeric version such as `1.2.3`, stored as its components
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTuple {
    parts: Vec<u64>,
}

impl VersionTuple {
    /// Parses a dotted numeric string. Every component must be a base-10
    /// integer; anything else is a `NonNumericComponent` error.
    pub fn parse(text: &str) -> Result<Self, NormalizeError> {
        if text.is_empty() {
            return Err(NormalizeError::malformed(text));
        }
        let parts = text
            .split('.')
            .map(|component| {
                component
                    .parse::<u64>()
                    .map_err(|_| NormalizeError::non_numeric(component))
            })
            .collect::<Result<Vec<u64>, NormalizeError>>()?;
        Ok(Self { parts })
    }

    /// Builds a tuple directly from components
    pub fn from_parts(parts: Vec<u64>) -> Self {
        Self { parts }
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True if the tuple has no components
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Component at `index`, if present
    pub fn get(&self, index: usize) -> Option<u64> {
        self.parts.get(index).copied()
    }

    /// Overwrites the component at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: u64) {
        if let Some(part) = self.parts.get_mut(index) {
            *part = value;
        }
    }

    /// Appends zero components until the tuple has at least `width` of them
    pub fn pad_to(&mut self, width: usize) {
        while self.parts.len() < width {
            self.parts.push(0);
        }
    }

    /// Consuming variant of [`pad_to`](Self::pad_to)
    pub fn padded(mut self, width: usize) -> Self {
        self.pad_to(width);
        self
    }

    /// Adds one to the component at `index`, leaving later components alone
    pub fn bump_at(&mut self, index: usize) {
        if let Some(part) = self.parts.get_mut(index) {
            *part += 1;
        }
    }

    /// Adds one to the component at `index` and zeroes every later component
    pub fn increment_at(&mut self, index: usize) {
        self.bump_at(index);
        for part in self.parts.iter_mut().skip(index + 1) {
            *part = 0;
        }
    }

    /// Drops all components after the first `width`
    pub fn truncate(&mut self, width: usize) {
        self.parts.truncate(width);
    }

    /// Index of the first nonzero component, if any
    pub fn first_nonzero(&self) -> Option<usize> {
        self.parts.iter().position(|&p| p != 0)
    }

    /// True when every component is zero
    pub fn is_all_zero(&self) -> bool {
        self.first_nonzero().is_none()
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(".");
        write!(f, "{}", joined)
    }
}
