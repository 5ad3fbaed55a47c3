//! Manifest detection and directory traversal
//!
//! Walks a directory tree, recognizes manifest and lockfile formats by
//! filename, and drops a manifest when a sibling lockfile for the same
//! ecosystem is present. The lockfile carries resolved pins, which are
//! strictly more precise than the declared ranges.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::Ecosystem;

/// Directories that never contain first-party manifests
const PRUNED_DIRS: &[&str] = &[".git", "node_modules", "vendor", "target", "__pycache__"];

/// Every manifest and lockfile format the scanner recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    PackageJson,
    PackageLockJson,
    YarnLock,
    PnpmLock,
    CargoToml,
    CargoLock,
    ComposerJson,
    ComposerLock,
    RequirementsTxt,
    Pipfile,
    PipfileLock,
    PyprojectToml,
    PoetryLock,
    EnvironmentYml,
    PubspecYaml,
    PubspecLock,
    Gemfile,
    Gemspec,
    GemfileLock,
    GoMod,
    GoSum,
    PomXml,
    BuildSbt,
    BuildGradle,
    PackagesConfig,
    Nuspec,
    Csproj,
    MixExs,
    MixLock,
    RebarConfig,
    PackageYaml,
    Cabal,
    CranDescription,
    PackageSwift,
    PackageResolved,
    Podfile,
    PodfileLock,
    Podspec,
    Cartfile,
    CartfileResolved,
    Cpanfile,
    ProjectClj,
    ConanLock,
}

impl ManifestKind {
    /// Detect the manifest kind from a file name
    pub fn detect(file_name: &str) -> Option<ManifestKind> {
        let kind = match file_name {
            "package.json" => ManifestKind::PackageJson,
            "package-lock.json" => ManifestKind::PackageLockJson,
            "yarn.lock" => ManifestKind::YarnLock,
            "pnpm-lock.yaml" => ManifestKind::PnpmLock,
            "Cargo.toml" => ManifestKind::CargoToml,
            "Cargo.lock" => ManifestKind::CargoLock,
            "composer.json" => ManifestKind::ComposerJson,
            "composer.lock" => ManifestKind::ComposerLock,
            "requirements.txt" => ManifestKind::RequirementsTxt,
            "Pipfile" => ManifestKind::Pipfile,
            "Pipfile.lock" => ManifestKind::PipfileLock,
            "pyproject.toml" => ManifestKind::PyprojectToml,
            "poetry.lock" => ManifestKind::PoetryLock,
            "environment.yml" | "environment.yaml" => ManifestKind::EnvironmentYml,
            "pubspec.yaml" | "pubspec.yml" => ManifestKind::PubspecYaml,
            "pubspec.lock" => ManifestKind::PubspecLock,
            "Gemfile" => ManifestKind::Gemfile,
            "Gemfile.lock" => ManifestKind::GemfileLock,
            "go.mod" => ManifestKind::GoMod,
            "go.sum" => ManifestKind::GoSum,
            "pom.xml" => ManifestKind::PomXml,
            "build.sbt" => ManifestKind::BuildSbt,
            "build.gradle" | "build.gradle.kts" => ManifestKind::BuildGradle,
            "packages.config" => ManifestKind::PackagesConfig,
            "mix.exs" => ManifestKind::MixExs,
            "mix.lock" => ManifestKind::MixLock,
            "rebar.config" => ManifestKind::RebarConfig,
            "package.yaml" => ManifestKind::PackageYaml,
            "DESCRIPTION" => ManifestKind::CranDescription,
            "Package.swift" => ManifestKind::PackageSwift,
            "Package.resolved" => ManifestKind::PackageResolved,
            "Podfile" => ManifestKind::Podfile,
            "Podfile.lock" => ManifestKind::PodfileLock,
            "Cartfile" => ManifestKind::Cartfile,
            "Cartfile.resolved" => ManifestKind::CartfileResolved,
            "cpanfile" => ManifestKind::Cpanfile,
            "project.clj" => ManifestKind::ProjectClj,
            "conan.lock" => ManifestKind::ConanLock,
            _ => {
                if file_name.ends_with(".gemspec") {
                    ManifestKind::Gemspec
                } else if file_name.ends_with(".nuspec") {
                    ManifestKind::Nuspec
                } else if file_name.ends_with(".csproj") {
                    ManifestKind::Csproj
                } else if file_name.ends_with(".cabal") {
                    ManifestKind::Cabal
                } else if file_name.ends_with(".podspec") {
                    ManifestKind::Podspec
                } else if file_name.starts_with("requirements") && file_name.ends_with(".txt") {
                    // requirements-dev.txt, requirements_test.txt and friends
                    ManifestKind::RequirementsTxt
                } else {
                    return None;
                }
            }
        };
        Some(kind)
    }

    /// Sibling lockfiles that supersede this manifest when present
    pub fn companion_lockfiles(&self) -> &'static [&'static str] {
        match self {
            ManifestKind::PackageJson => &["package-lock.json", "yarn.lock", "pnpm-lock.yaml"],
            ManifestKind::CargoToml => &["Cargo.lock"],
            ManifestKind::ComposerJson => &["composer.lock"],
            ManifestKind::Pipfile => &["Pipfile.lock"],
            ManifestKind::PyprojectToml => &["poetry.lock"],
            ManifestKind::PubspecYaml => &["pubspec.lock"],
            ManifestKind::Gemfile => &["Gemfile.lock"],
            ManifestKind::GoMod => &["go.sum"],
            ManifestKind::MixExs => &["mix.lock"],
            ManifestKind::PackageSwift => &["Package.resolved"],
            ManifestKind::Podfile => &["Podfile.lock"],
            ManifestKind::Cartfile => &["Cartfile.resolved"],
            _ => &[],
        }
    }

    /// The ecosystem this manifest format declares dependencies for
    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            ManifestKind::PackageJson
            | ManifestKind::PackageLockJson
            | ManifestKind::YarnLock
            | ManifestKind::PnpmLock => Ecosystem::Npm,
            ManifestKind::CargoToml | ManifestKind::CargoLock => Ecosystem::Cargo,
            ManifestKind::ComposerJson | ManifestKind::ComposerLock => Ecosystem::Composer,
            ManifestKind::RequirementsTxt
            | ManifestKind::Pipfile
            | ManifestKind::PipfileLock
            | ManifestKind::PyprojectToml
            | ManifestKind::PoetryLock
            | ManifestKind::EnvironmentYml => Ecosystem::Pypi,
            ManifestKind::PubspecYaml | ManifestKind::PubspecLock => Ecosystem::Pub,
            ManifestKind::Gemfile | ManifestKind::Gemspec | ManifestKind::GemfileLock => {
                Ecosystem::Gem
            }
            ManifestKind::GoMod | ManifestKind::GoSum => Ecosystem::Golang,
            ManifestKind::PomXml => Ecosystem::Maven,
            ManifestKind::BuildSbt => Ecosystem::Sbt,
            ManifestKind::BuildGradle => Ecosystem::Gradle,
            ManifestKind::PackagesConfig | ManifestKind::Nuspec | ManifestKind::Csproj => {
                Ecosystem::Nuget
            }
            ManifestKind::MixExs | ManifestKind::MixLock | ManifestKind::RebarConfig => {
                Ecosystem::Hex
            }
            ManifestKind::PackageYaml | ManifestKind::Cabal => Ecosystem::Hackage,
            ManifestKind::CranDescription => Ecosystem::Cran,
            ManifestKind::PackageSwift | ManifestKind::PackageResolved => Ecosystem::Swift,
            ManifestKind::Podfile
            | ManifestKind::PodfileLock
            | ManifestKind::Podspec
            | ManifestKind::Cartfile
            | ManifestKind::CartfileResolved => Ecosystem::Cocoapods,
            ManifestKind::Cpanfile => Ecosystem::Cpan,
            ManifestKind::ProjectClj => Ecosystem::Clojars,
            ManifestKind::ConanLock => Ecosystem::Conan,
        }
    }

    /// All recognized kinds, for exhaustive dispatch tests
    pub fn all() -> &'static [ManifestKind] {
        &[
            ManifestKind::PackageJson,
            ManifestKind::PackageLockJson,
            ManifestKind::YarnLock,
            ManifestKind::PnpmLock,
            ManifestKind::CargoToml,
            ManifestKind::CargoLock,
            ManifestKind::ComposerJson,
            ManifestKind::ComposerLock,
            ManifestKind::RequirementsTxt,
            ManifestKind::Pipfile,
            ManifestKind::PipfileLock,
            ManifestKind::PyprojectToml,
            ManifestKind::PoetryLock,
            ManifestKind::EnvironmentYml,
            ManifestKind::PubspecYaml,
            ManifestKind::PubspecLock,
            ManifestKind::Gemfile,
            ManifestKind::Gemspec,
            ManifestKind::GemfileLock,
            ManifestKind::GoMod,
            ManifestKind::GoSum,
            ManifestKind::PomXml,
            ManifestKind::BuildSbt,
            ManifestKind::BuildGradle,
            ManifestKind::PackagesConfig,
            ManifestKind::Nuspec,
            ManifestKind::Csproj,
            ManifestKind::MixExs,
            ManifestKind::MixLock,
            ManifestKind::RebarConfig,
            ManifestKind::PackageYaml,
            ManifestKind::Cabal,
            ManifestKind::CranDescription,
            ManifestKind::PackageSwift,
            ManifestKind::PackageResolved,
            ManifestKind::Podfile,
            ManifestKind::PodfileLock,
            ManifestKind::Podspec,
            ManifestKind::Cartfile,
            ManifestKind::CartfileResolved,
            ManifestKind::Cpanfile,
            ManifestKind::ProjectClj,
            ManifestKind::ConanLock,
        ]
    }
}

/// A manifest file located during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub path: PathBuf,
    pub kind: ManifestKind,
}

/// Walk a directory tree and collect every recognized manifest
///
/// Traversal order is deterministic (sorted by file name), pruned
/// directories are skipped, and a manifest with a sibling lockfile for the
/// same ecosystem is dropped in favor of the lockfile.
pub fn discover_targets(root: &Path) -> Vec<ScanTarget> {
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && PRUNED_DIRS.contains(&name.as_ref()))
        });
    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(kind) = ManifestKind::detect(&name) {
            found.push(ScanTarget {
                path: entry.into_path(),
                kind,
            });
        }
    }

    let paths: HashSet<PathBuf> = found.iter().map(|t| t.path.clone()).collect();
    found.retain(|target| {
        let Some(dir) = target.path.parent() else {
            return true;
        };
        !target
            .kind
            .companion_lockfiles()
            .iter()
            .any(|lock| paths.contains(&dir.join(lock)))
    });
    found
}
