//! Version-range normalizers for each package ecosystem
//!
//! Every normalizer lowers its ecosystem's native range syntax into one
//! canonical comparator grammar:
//! - comparator terms `=` (implicit on a bare version), `>`, `>=`, `<`,
//!   `<=`, `!=`
//! - conjunction joined with `, ` (Elixir and Haskell keep their native
//!   ` && ` form)
//! - disjunction joined with ` || `
//! - the sentinel `all` for an explicit match-everything range
//! - the empty string for "no constraint"
//!
//! Terms already in the canonical comparator grammar pass through each
//! normalizer unchanged, so re-feeding canonical output is safe.

mod cargo;
mod composer;
mod gradle;
mod hackage;
mod hex;
pub(crate) mod interval;
mod npm;
mod nuget;
mod pessimistic;
mod pub_dart;
pub mod pypi;
mod simple;

pub use cargo::CargoNormalizer;
pub use composer::ComposerNormalizer;
pub use gradle::GradleNormalizer;
pub use hackage::HackageNormalizer;
pub use hex::HexNormalizer;
pub use interval::IntervalNormalizer;
pub use npm::NpmNormalizer;
pub use nuget::NugetNormalizer;
pub use pessimistic::PessimisticNormalizer;
pub use pub_dart::PubNormalizer;
pub use pypi::Pep440Normalizer;
pub use simple::{
    up_to_next_major, up_to_next_minor, CpanNormalizer, CranNormalizer, ExactNormalizer,
    GolangNormalizer, SwiftNormalizer,
};

use crate::domain::Ecosystem;
use crate::error::NormalizeError;

/// Sentinel for an explicit match-everything range
pub const ALL: &str = "all";

/// Trait for lowering an ecosystem-native range into the canonical grammar
pub trait RangeNormalizer {
    /// Normalize a raw range string
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError>;

    /// Returns the ecosystem this normalizer handles
    fn ecosystem(&self) -> Ecosystem;
}

/// Get the range normalizer for the specified ecosystem
pub fn normalizer_for(ecosystem: Ecosystem) -> Box<dyn RangeNormalizer> {
    match ecosystem {
        Ecosystem::Npm => Box::new(NpmNormalizer),
        Ecosystem::Cargo => Box::new(CargoNormalizer),
        Ecosystem::Pypi => Box::new(Pep440Normalizer),
        Ecosystem::Gem | Ecosystem::Cocoapods => Box::new(PessimisticNormalizer::new(ecosystem)),
        Ecosystem::Maven | Ecosystem::Sbt => Box::new(IntervalNormalizer::new(ecosystem)),
        Ecosystem::Gradle => Box::new(GradleNormalizer),
        Ecosystem::Golang => Box::new(GolangNormalizer),
        Ecosystem::Composer => Box::new(ComposerNormalizer),
        Ecosystem::Pub => Box::new(PubNormalizer),
        Ecosystem::Nuget => Box::new(NugetNormalizer),
        Ecosystem::Hex => Box::new(HexNormalizer),
        Ecosystem::Hackage => Box::new(HackageNormalizer),
        Ecosystem::Cran => Box::new(CranNormalizer),
        Ecosystem::Swift => Box::new(SwiftNormalizer),
        Ecosystem::Cpan => Box::new(CpanNormalizer),
        Ecosystem::Clojars | Ecosystem::Conan => Box::new(ExactNormalizer::new(ecosystem)),
    }
}

/// Normalizes a raw range, downgrading failures to an unconstrained version
///
/// This is the entry point the extractors use. A malformed range never drops
/// the record: it is logged and the version becomes empty.
pub fn normalize(ecosystem: Ecosystem, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match normalizer_for(ecosystem).normalize(raw) {
        Ok(normalized) => normalized,
        Err(err) => {
            tracing::warn!(
                ecosystem = ecosystem.label(),
                range = raw,
                error = %err,
                "failed to normalize version range, keeping record unconstrained"
            );
            String::new()
        }
    }
}

/// Splits a conjunction on whitespace and commas
///
/// Canonical output separates terms with `, `, so re-fed strings tokenize
/// the same way the native syntax does. Trailing commas left by a
/// space-split are stripped.
pub(crate) fn split_terms(part: &str) -> Vec<String> {
    part.split([' ', ','])
        .map(|t| t.trim().trim_end_matches(','))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Splits a pre-release flag off a version
///
/// The flag keeps only the last dash-separated segment; the version keeps
/// everything before the first dash. `1.2.3-beta.1` becomes
/// `("1.2.3", "-beta.1")`.
pub(crate) fn split_flag(term: &str) -> (String, String) {
    match term.find('-') {
        Some(idx) => {
            let head = term[..idx].to_string();
            let tail = term.rsplit('-').next().unwrap_or("");
            (head, format!("-{}", tail))
        }
        None => (term.to_string(), String::new()),
    }
}
