//! Dependency record structures
//!
//! A `DependencyRecord` is the scanner's unit of output: one package
//! coordinate with its normalized version constraint. Records are plain
//! strings so that every ecosystem serializes identically.

use super::Ecosystem;
use crate::normalize::pypi::canonicalize_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One discovered dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Ecosystem label (`npm`, `cargo`, `maven`, ...)
    #[serde(rename = "type")]
    pub ecosystem: String,
    /// Package namespace (group id, module host path, vendor); empty when
    /// the ecosystem has no namespace concept
    pub namespace: String,
    /// Package name
    pub name: String,
    /// Normalized version constraint; empty means unconstrained
    pub version: String,
    /// Source language of the declaring manifest
    pub language: String,
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}:{}", self.ecosystem, self.name)
        } else {
            write!(f, "{}:{}@{}", self.ecosystem, self.name, self.version)
        }
    }
}

/// Builds records for a single manifest file
///
/// The builder owns the per-file constants (ecosystem, language) and applies
/// the ecosystem's namespace-splitting rule to each raw package name.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    ecosystem: Ecosystem,
    language: String,
}

impl RecordBuilder {
    /// Creates a builder with the ecosystem's default language
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self {
            ecosystem,
            language: ecosystem.default_language().to_string(),
        }
    }

    /// Overrides the language for every record this builder emits
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns the ecosystem this builder emits for
    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    /// Builds a record, deriving the namespace from the raw name
    ///
    /// Returns `None` for an empty name. The version is taken as given;
    /// callers normalize ranges before building.
    pub fn build(&self, raw_name: &str, version: &str) -> Option<DependencyRecord> {
        let raw_name = raw_name.trim();
        if raw_name.is_empty() {
            return None;
        }
        let (namespace, name) = self.split_namespace(raw_name);
        Some(DependencyRecord {
            ecosystem: self.ecosystem.label().to_string(),
            namespace,
            name,
            version: version.trim().to_string(),
            language: self.language.clone(),
        })
    }

    /// Builds a record with an explicit namespace (git URLs, maven group ids)
    pub fn build_with_namespace(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
    ) -> Option<DependencyRecord> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(DependencyRecord {
            ecosystem: self.ecosystem.label().to_string(),
            namespace: namespace.trim().to_string(),
            name: name.to_string(),
            version: version.trim().to_string(),
            language: self.language.clone(),
        })
    }

    fn split_namespace(&self, raw_name: &str) -> (String, String) {
        match self.ecosystem {
            // vendor/package keeps the full key as the name
            Ecosystem::Composer => match raw_name.rsplit_once('/') {
                Some((vendor, _)) => (vendor.to_string(), raw_name.to_string()),
                None => (String::new(), raw_name.to_string()),
            },
            // module path: host/org is the namespace, last segment the name
            Ecosystem::Golang => match raw_name.rsplit_once('/') {
                Some((ns, name)) => (ns.to_string(), name.to_string()),
                None => (String::new(), raw_name.to_string()),
            },
            Ecosystem::Cpan => match raw_name.rsplit_once("::") {
                Some((ns, name)) => (ns.to_string(), name.to_string()),
                None => (String::new(), raw_name.to_string()),
            },
            Ecosystem::Clojars => match raw_name.rsplit_once('/') {
                Some((ns, name)) => (ns.to_string(), name.to_string()),
                None => (String::new(), raw_name.to_string()),
            },
            Ecosystem::Pypi => (String::new(), canonicalize_name(raw_name)),
            _ => (String::new(), raw_name.to_string()),
        }
    }
}

/// Removes duplicate records, keeping the first occurrence of each
pub fn dedup_records(records: Vec<DependencyRecord>) -> Vec<DependencyRecord> {
    let mut seen: HashSet<DependencyRecord> = HashSet::with_capacity(records.len());
    let mut result = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.clone()) {
            result.push(record);
        }
    }
    result
}
