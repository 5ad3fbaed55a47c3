//! Manifest file detection and dependency extraction
//!
//! This module provides functionality to:
//! - Detect manifest and lockfile formats by filename
//! - Extract dependency records from each format
//! - Prefer a lockfile over its sibling manifest (resolved pins beat
//!   declared ranges for the same ecosystem)

mod cargo_toml;
mod clojure;
mod cocoapods;
mod composer_json;
mod conan;
mod cpanfile;
mod cran;
mod detector;
mod elixir;
mod gemfile;
mod go_mod;
mod haskell;
mod maven;
mod nuget;
mod package_json;
mod pubspec;
mod python;
mod swift_pm;

pub use detector::{discover_targets, ManifestKind, ScanTarget};

pub use cargo_toml::{CargoLockParser, CargoTomlParser};
pub use clojure::ProjectCljParser;
pub use cocoapods::{
    CartfileParser, CartfileResolvedParser, PodfileLockParser, PodfileParser, PodspecParser,
};
pub use composer_json::{ComposerJsonParser, ComposerLockParser};
pub use conan::ConanLockParser;
pub use cpanfile::CpanfileParser;
pub use cran::DescriptionParser;
pub use elixir::{MixExsParser, MixLockParser, RebarConfigParser};
pub use gemfile::{GemfileLockParser, GemfileParser, GemspecParser};
pub use go_mod::{GoModParser, GoSumParser};
pub use haskell::{CabalParser, PackageYamlParser};
pub use maven::{GradleFileParser, PomXmlParser, SbtParser};
pub use nuget::{CsprojParser, NuspecParser, PackagesConfigParser};
pub use package_json::{PackageJsonParser, PackageLockParser, PnpmLockParser, YarnLockParser};
pub use pubspec::{PubspecLockParser, PubspecYamlParser};
pub use python::{
    CondaEnvParser, PipfileLockParser, PipfileParser, PoetryLockParser, PyprojectTomlParser,
    RequirementsTxtParser,
};
pub use swift_pm::{PackageResolvedParser, PackageSwiftParser};

use crate::domain::{DependencyRecord, Ecosystem};
use crate::error::ManifestError;

/// Trait for extracting dependency records from one manifest format
pub trait ManifestParser: Send + Sync {
    /// Parse dependency records from the manifest content
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError>;

    /// Returns the ecosystem this parser emits records for
    fn ecosystem(&self) -> Ecosystem;
}

/// Get the parser for a detected manifest kind
pub fn get_parser(kind: ManifestKind, skip_dev: bool) -> Box<dyn ManifestParser> {
    match kind {
        ManifestKind::PackageJson => Box::new(PackageJsonParser::new(skip_dev)),
        ManifestKind::PackageLockJson => Box::new(PackageLockParser::new(skip_dev)),
        ManifestKind::YarnLock => Box::new(YarnLockParser),
        ManifestKind::PnpmLock => Box::new(PnpmLockParser::new(skip_dev)),
        ManifestKind::CargoToml => Box::new(CargoTomlParser::new(skip_dev)),
        ManifestKind::CargoLock => Box::new(CargoLockParser),
        ManifestKind::ComposerJson => Box::new(ComposerJsonParser::new(skip_dev)),
        ManifestKind::ComposerLock => Box::new(ComposerLockParser::new(skip_dev)),
        ManifestKind::RequirementsTxt => Box::new(RequirementsTxtParser),
        ManifestKind::Pipfile => Box::new(PipfileParser::new(skip_dev)),
        ManifestKind::PipfileLock => Box::new(PipfileLockParser::new(skip_dev)),
        ManifestKind::PyprojectToml => Box::new(PyprojectTomlParser::new(skip_dev)),
        ManifestKind::PoetryLock => Box::new(PoetryLockParser::new(skip_dev)),
        ManifestKind::EnvironmentYml => Box::new(CondaEnvParser),
        ManifestKind::PubspecYaml => Box::new(PubspecYamlParser::new(skip_dev)),
        ManifestKind::PubspecLock => Box::new(PubspecLockParser::new(skip_dev)),
        ManifestKind::Gemfile => Box::new(GemfileParser),
        ManifestKind::Gemspec => Box::new(GemspecParser),
        ManifestKind::GemfileLock => Box::new(GemfileLockParser),
        ManifestKind::GoMod => Box::new(GoModParser),
        ManifestKind::GoSum => Box::new(GoSumParser),
        ManifestKind::PomXml => Box::new(PomXmlParser),
        ManifestKind::BuildSbt => Box::new(SbtParser),
        ManifestKind::BuildGradle => Box::new(GradleFileParser),
        ManifestKind::PackagesConfig => Box::new(PackagesConfigParser),
        ManifestKind::Nuspec => Box::new(NuspecParser),
        ManifestKind::Csproj => Box::new(CsprojParser),
        ManifestKind::MixExs => Box::new(MixExsParser),
        ManifestKind::MixLock => Box::new(MixLockParser),
        ManifestKind::RebarConfig => Box::new(RebarConfigParser),
        ManifestKind::PackageYaml => Box::new(PackageYamlParser),
        ManifestKind::Cabal => Box::new(CabalParser),
        ManifestKind::CranDescription => Box::new(DescriptionParser),
        ManifestKind::PackageSwift => Box::new(PackageSwiftParser),
        ManifestKind::PackageResolved => Box::new(PackageResolvedParser),
        ManifestKind::Podfile => Box::new(PodfileParser),
        ManifestKind::PodfileLock => Box::new(PodfileLockParser),
        ManifestKind::Podspec => Box::new(PodspecParser),
        ManifestKind::Cartfile => Box::new(CartfileParser),
        ManifestKind::CartfileResolved => Box::new(CartfileResolvedParser),
        ManifestKind::Cpanfile => Box::new(CpanfileParser),
        ManifestKind::ProjectClj => Box::new(ProjectCljParser),
        ManifestKind::ConanLock => Box::new(ConanLockParser),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_parser_matches_kind_ecosystem() {
        for kind in ManifestKind::all() {
            let parser = get_parser(*kind, false);
            assert_eq!(
                parser.ecosystem().label(),
                kind.ecosystem().label(),
                "parser for {kind:?} reports the wrong ecosystem"
            );
        }
    }
}
