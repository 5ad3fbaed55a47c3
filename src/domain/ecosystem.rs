//! Ecosystem type definitions for supported package managers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported package-management ecosystems
///
/// `Gradle` and `Sbt` are distinct variants because their range grammars and
/// source languages differ, but both label their records as `maven`
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Node.js ecosystem (package.json)
    Npm,
    /// Rust ecosystem (Cargo.toml)
    Cargo,
    /// Python ecosystem (requirements.txt, pyproject.toml, environment.yml)
    Pypi,
    /// Ruby ecosystem (Gemfile, *.gemspec)
    Gem,
    /// JVM ecosystem via Maven (pom.xml)
    Maven,
    /// JVM ecosystem via Gradle (build.gradle)
    Gradle,
    /// Scala ecosystem (build.sbt)
    Sbt,
    /// Go ecosystem (go.mod)
    Golang,
    /// PHP ecosystem (composer.json)
    Composer,
    /// Dart ecosystem (pubspec.yaml)
    Pub,
    /// .NET ecosystem (packages.config, *.nuspec, *.csproj)
    Nuget,
    /// Elixir/Erlang ecosystem (mix.exs, rebar.config)
    Hex,
    /// Haskell ecosystem (package.yaml, *.cabal)
    Hackage,
    /// R ecosystem (DESCRIPTION)
    Cran,
    /// Swift ecosystem (Package.swift)
    Swift,
    /// Objective-C/Swift ecosystem via CocoaPods and Carthage
    Cocoapods,
    /// Perl ecosystem (cpanfile)
    Cpan,
    /// Clojure ecosystem (project.clj)
    Clojars,
    /// C/C++ ecosystem (conan.lock)
    Conan,
}

impl Ecosystem {
    /// Returns the record `type` label for this ecosystem
    pub fn label(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Cargo => "cargo",
            Ecosystem::Pypi => "pypi",
            Ecosystem::Gem => "gem",
            Ecosystem::Maven | Ecosystem::Gradle | Ecosystem::Sbt => "maven",
            Ecosystem::Golang => "golang",
            Ecosystem::Composer => "composer",
            Ecosystem::Pub => "pubspec",
            Ecosystem::Nuget => "nuget",
            Ecosystem::Hex => "hex",
            Ecosystem::Hackage => "hackage",
            Ecosystem::Cran => "cran",
            Ecosystem::Swift => "swift",
            Ecosystem::Cocoapods => "cocoapods",
            Ecosystem::Cpan => "cpan",
            Ecosystem::Clojars => "clojars",
            Ecosystem::Conan => "conan",
        }
    }

    /// Returns the default source language for records of this ecosystem
    ///
    /// Extractors override this where one manifest family spans several
    /// languages (rebar.config is Erlang, not Elixir).
    pub fn default_language(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "Node JS",
            Ecosystem::Cargo => "Rust",
            Ecosystem::Pypi => "Python",
            Ecosystem::Gem => "Ruby",
            Ecosystem::Maven | Ecosystem::Gradle => "Java",
            Ecosystem::Sbt => "Scala",
            Ecosystem::Golang => "Go",
            Ecosystem::Composer => "PHP",
            Ecosystem::Pub => "Dart",
            Ecosystem::Nuget => "C#",
            Ecosystem::Hex => "Elixir",
            Ecosystem::Hackage => "Haskell",
            Ecosystem::Cran => "R",
            Ecosystem::Swift => "Swift",
            Ecosystem::Cocoapods => "Objective C",
            Ecosystem::Cpan => "Perl",
            Ecosystem::Clojars => "Clojure",
            Ecosystem::Conan => "C/C++",
        }
    }

    /// Resolves a label back to an ecosystem
    ///
    /// `maven` resolves to [`Ecosystem::Maven`]; `gradle` and `sbt` are also
    /// accepted so the CLI can address their grammars directly.
    pub fn from_label(label: &str) -> Option<Ecosystem> {
        match label.to_ascii_lowercase().as_str() {
            "npm" => Some(Ecosystem::Npm),
            "cargo" => Some(Ecosystem::Cargo),
            "pypi" => Some(Ecosystem::Pypi),
            "gem" => Some(Ecosystem::Gem),
            "maven" => Some(Ecosystem::Maven),
            "gradle" => Some(Ecosystem::Gradle),
            "sbt" => Some(Ecosystem::Sbt),
            "golang" => Some(Ecosystem::Golang),
            "composer" => Some(Ecosystem::Composer),
            "pubspec" | "pub" => Some(Ecosystem::Pub),
            "nuget" => Some(Ecosystem::Nuget),
            "hex" => Some(Ecosystem::Hex),
            "hackage" => Some(Ecosystem::Hackage),
            "cran" => Some(Ecosystem::Cran),
            "swift" => Some(Ecosystem::Swift),
            "cocoapods" => Some(Ecosystem::Cocoapods),
            "cpan" => Some(Ecosystem::Cpan),
            "clojars" => Some(Ecosystem::Clojars),
            "conan" => Some(Ecosystem::Conan),
            _ => None,
        }
    }

    /// Returns all ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Npm,
            Ecosystem::Cargo,
            Ecosystem::Pypi,
            Ecosystem::Gem,
            Ecosystem::Maven,
            Ecosystem::Gradle,
            Ecosystem::Sbt,
            Ecosystem::Golang,
            Ecosystem::Composer,
            Ecosystem::Pub,
            Ecosystem::Nuget,
            Ecosystem::Hex,
            Ecosystem::Hackage,
            Ecosystem::Cran,
            Ecosystem::Swift,
            Ecosystem::Cocoapods,
            Ecosystem::Cpan,
            Ecosystem::Clojars,
            Ecosystem::Conan,
        ]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
