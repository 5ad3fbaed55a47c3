//! Directory scanner coordinating discovery, parsing and aggregation
//!
//! This module provides:
//! - Concurrent parsing of discovered manifest files (bounded by a semaphore)
//! - Results reassembled in discovery order
//! - Error handling with partial continuation
//! - First-seen deduplication over the aggregate

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{discover_targets, get_parser, ScanTarget};
use crate::progress::ScanProgress;

/// Default number of files parsed concurrently
const DEFAULT_CONCURRENCY: usize = 16;

/// Directory scanner
pub struct Scanner {
    /// Exclude development dependencies where the format marks them
    skip_dev: bool,
    /// Only emit records for these ecosystems; empty means all
    ecosystems: Vec<Ecosystem>,
    /// Semaphore bounding concurrent file reads
    semaphore: Arc<Semaphore>,
}

/// Error attached to one file during a scan
#[derive(Debug)]
pub struct ScanError {
    /// Path of the file that failed
    pub path: PathBuf,
    /// What went wrong
    pub message: String,
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for ScanError {}

/// Result of scanning one directory tree
pub struct ScanReport {
    /// Deduplicated dependency records in discovery order
    pub records: Vec<DependencyRecord>,
    /// Per-file errors; the scan continues past them
    pub errors: Vec<ScanError>,
    /// Number of manifest files parsed
    pub files_scanned: usize,
}

impl Scanner {
    pub fn new(skip_dev: bool) -> Self {
        Self {
            skip_dev,
            ecosystems: Vec::new(),
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
        }
    }

    /// Restricts the scan to the given ecosystems
    pub fn with_ecosystems(mut self, ecosystems: Vec<Ecosystem>) -> Self {
        self.ecosystems = ecosystems;
        self
    }

    fn wants(&self, target: &ScanTarget) -> bool {
        self.ecosystems.is_empty()
            || self
                .ecosystems
                .iter()
                .any(|eco| eco.label() == target.kind.ecosystem().label())
    }

    /// Scan a directory tree and aggregate every record it declares
    pub async fn run(&self, root: &std::path::Path) -> ScanReport {
        self.run_with_progress(root, &ScanProgress::disabled()).await
    }

    /// Scan, reporting each parsed file on the given progress display
    pub async fn run_with_progress(
        &self,
        root: &std::path::Path,
        progress: &ScanProgress,
    ) -> ScanReport {
        let targets: Vec<ScanTarget> = discover_targets(root)
            .into_iter()
            .filter(|t| self.wants(t))
            .collect();
        progress.begin_parsing(targets.len());

        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            let semaphore = Arc::clone(&self.semaphore);
            let skip_dev = self.skip_dev;
            // tasks run concurrently; handles keep discovery order
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let content = match tokio::fs::read_to_string(&target.path).await {
                    Ok(content) => content,
                    Err(e) => {
                        let err = ManifestError::read_error(&target.path, e);
                        return (target, Err(err.to_string()));
                    }
                };
                let parser = get_parser(target.kind, skip_dev);
                let result = parser.parse(&content).map_err(|e| e.to_string());
                (target, result)
            }));
        }

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut files_scanned = 0usize;
        for handle in handles {
            let Ok((target, result)) = handle.await else {
                continue;
            };
            progress.file_done(&target.path);
            match result {
                Ok(found) => {
                    tracing::debug!(
                        path = %target.path.display(),
                        count = found.len(),
                        "parsed manifest"
                    );
                    files_scanned += 1;
                    records.extend(found);
                }
                Err(message) => {
                    tracing::debug!(path = %target.path.display(), error = %message, "parse failed");
                    errors.push(ScanError {
                        path: target.path,
                        message,
                    });
                }
            }
        }

        ScanReport {
            records: dedup_records(records),
            errors,
            files_scanned,
        }
    }
}
