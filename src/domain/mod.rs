//! Core domain models for depscan
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem types for supported package managers
//! - The numeric version tuple the normalizers do arithmetic on
//! - Dependency record structures and first-seen deduplication
//! - Package URL (`pkg:`) identifier parsing

mod ecosystem;
mod purl;
mod record;
mod version_tuple;

pub use ecosystem::Ecosystem;
pub use purl::parse_purl;
pub use record::{dedup_records, DependencyRecord, RecordBuilder};
pub use version_tuple::VersionTuple;
