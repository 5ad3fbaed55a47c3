//! depscan - Multi-ecosystem dependency scanner library
//!
//! This library provides the core functionality for discovering the
//! dependencies a source tree declares:
//! - Manifest and lockfile extractors for the common package ecosystems
//! - Version-range normalizers lowering each native syntax into one
//!   canonical comparator grammar
//! - A concurrent directory scanner aggregating deduplicated records

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod output;
pub mod progress;
pub mod scanner;
