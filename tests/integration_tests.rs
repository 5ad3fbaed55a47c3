//! Integration tests for depscan
//!
//! These tests verify:
//! - Manifest discovery and lockfile precedence across ecosystems
//! - Scanning realistic polyglot project trees end to end
//! - Range normalization into the canonical comparator grammar

use std::fs;
use tempfile::TempDir;

use depscan::domain::Ecosystem;
use depscan::manifest::{discover_targets, get_parser, ManifestKind};
use depscan::normalize::normalize;
use depscan::scanner::{ScanReport, Scanner};

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn scan(dir: &TempDir, scanner: Scanner) -> ScanReport {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    runtime.block_on(scanner.run(dir.path()))
}

mod discovery {
    use super::*;

    /// Test detection of manifests across multiple ecosystems in one tree
    #[test]
    fn test_polyglot_tree_detects_every_format() {
        let dir = create_test_dir();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        fs::write(dir.path().join("Gemfile"), "").unwrap();
        fs::create_dir(dir.path().join("api")).unwrap();
        fs::write(dir.path().join("api/go.mod"), "").unwrap();
        fs::create_dir(dir.path().join("mobile")).unwrap();
        fs::write(dir.path().join("mobile/pubspec.yaml"), "").unwrap();
        fs::write(dir.path().join("mobile/Podfile"), "").unwrap();

        let targets = discover_targets(dir.path());
        let kinds: Vec<ManifestKind> = targets.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ManifestKind::CargoToml,
                ManifestKind::Gemfile,
                ManifestKind::GoMod,
                ManifestKind::Podfile,
                ManifestKind::PubspecYaml,
                ManifestKind::PackageJson,
            ]
        );
    }

    /// Test the lockfile rule applies per directory, not globally
    #[test]
    fn test_lockfile_supersedes_manifest_per_directory() {
        let dir = create_test_dir();
        fs::write(dir.path().join("go.mod"), "").unwrap();
        fs::write(dir.path().join("go.sum"), "").unwrap();
        fs::create_dir(dir.path().join("tool")).unwrap();
        fs::write(dir.path().join("tool/go.mod"), "").unwrap();

        let targets = discover_targets(dir.path());
        let kinds: Vec<ManifestKind> = targets.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ManifestKind::GoSum, ManifestKind::GoMod]);
        assert!(targets[1].path.ends_with("tool/go.mod"));
    }

    #[test]
    fn test_vendored_trees_are_pruned() {
        let dir = create_test_dir();
        for pruned in ["node_modules", "vendor", "target"] {
            fs::create_dir_all(dir.path().join(pruned).join("dep")).unwrap();
            fs::write(dir.path().join(pruned).join("dep/package.json"), "{}").unwrap();
        }
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let targets = discover_targets(dir.path());
        assert_eq!(targets.len(), 1);
        assert!(targets[0].path.ends_with("package.json"));
    }

    #[test]
    fn test_requirements_variants_are_detected() {
        let dir = create_test_dir();
        fs::write(dir.path().join("requirements.txt"), "").unwrap();
        fs::write(dir.path().join("requirements-dev.txt"), "").unwrap();
        fs::write(dir.path().join("requirements_test.txt"), "").unwrap();

        let targets = discover_targets(dir.path());
        assert_eq!(targets.len(), 3);
        assert!(targets
            .iter()
            .all(|t| t.kind == ManifestKind::RequirementsTxt));
    }

    /// Test the parser dispatch covers every recognized format
    #[test]
    fn test_every_kind_has_a_parser_with_matching_ecosystem() {
        for kind in ManifestKind::all() {
            let parser = get_parser(*kind, false);
            assert_eq!(
                parser.ecosystem().label(),
                kind.ecosystem().label(),
                "parser ecosystem mismatch for {kind:?}"
            );
        }
    }
}

mod scanning {
    use super::*;

    #[test]
    fn test_scan_polyglot_project() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"lodash": "^4.17.21", "react": "18.2.0"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("Gemfile"),
            "source 'https://rubygems.org'\n\ngem 'rails', '~> 7.0'\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("backend")).unwrap();
        fs::write(
            dir.path().join("backend/requirements.txt"),
            "requests==2.28.1\ndjango>=3.1\n",
        )
        .unwrap();

        let report = scan(&dir, Scanner::new(false));
        assert!(report.errors.is_empty());
        assert_eq!(report.files_scanned, 3);

        // discovery order is sorted by file name, records follow it
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["rails", "requests", "django", "lodash", "react"]);

        let rails = &report.records[0];
        assert_eq!(rails.ecosystem, "gem");
        assert_eq!(rails.version, ">=7.0.0, <7.1.0");
        assert_eq!(rails.language, "Ruby");

        let lodash = &report.records[3];
        assert_eq!(lodash.ecosystem, "npm");
        assert_eq!(lodash.version, ">=4.17.21, <5.0.0");
    }

    #[test]
    fn test_scan_prefers_lockfile_pins() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("package-lock.json"),
            r#"{
                "lockfileVersion": 1,
                "dependencies": {
                    "lodash": {"version": "4.17.21"}
                }
            }"#,
        )
        .unwrap();

        let report = scan(&dir, Scanner::new(false));
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "lodash");
        assert_eq!(report.records[0].version, "4.17.21");
    }

    #[test]
    fn test_scan_skip_dev_drops_marked_groups() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "dependencies": {"express": "^4.18.0"},
                "devDependencies": {"jest": "^29.0.0"}
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[dependencies]\nserde = \"1.0\"\n\n[dev-dependencies]\ncriterion = \"0.5\"\n",
        )
        .unwrap();

        let full = scan(&dir, Scanner::new(false));
        let names: Vec<&str> = full.records.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"jest"));
        assert!(names.contains(&"criterion"));

        let runtime_only = scan(&dir, Scanner::new(true));
        let names: Vec<&str> = runtime_only
            .records
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert!(names.contains(&"express"));
        assert!(names.contains(&"serde"));
        assert!(!names.contains(&"jest"));
        assert!(!names.contains(&"criterion"));
    }

    #[test]
    fn test_scan_reports_broken_files_and_continues() {
        let dir = create_test_dir();
        fs::write(dir.path().join("composer.json"), "{ broken").unwrap();
        fs::write(dir.path().join("requirements.txt"), "flask==2.2.0\n").unwrap();

        let report = scan(&dir, Scanner::new(false));
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.ends_with("composer.json"));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "flask");
    }

    #[test]
    fn test_scan_same_name_different_ecosystems_not_deduped() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"uuid": "9.0.0"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("requirements.txt"), "uuid==9.0.0\n").unwrap();

        let report = scan(&dir, Scanner::new(false));
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_scan_identical_records_deduped_across_files() {
        let dir = create_test_dir();
        fs::write(dir.path().join("requirements.txt"), "requests==2.28.1\n").unwrap();
        fs::write(
            dir.path().join("requirements-dev.txt"),
            "requests==2.28.1\npytest==7.2.0\n",
        )
        .unwrap();

        let report = scan(&dir, Scanner::new(false));
        assert_eq!(report.files_scanned, 2);
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["requests", "pytest"]);
    }

    #[test]
    fn test_scan_ecosystem_filter_skips_other_files() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("requirements.txt"), "flask==2.2.0\n").unwrap();

        let scanner = Scanner::new(false).with_ecosystems(vec![Ecosystem::Pypi]);
        let report = scan(&dir, scanner);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].ecosystem, "pypi");
    }

    #[test]
    fn test_scan_empty_tree() {
        let dir = create_test_dir();
        let report = scan(&dir, Scanner::new(false));
        assert_eq!(report.files_scanned, 0);
        assert!(report.records.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_scan_namespaced_records() {
        let dir = create_test_dir();
        fs::write(
            dir.path().join("go.mod"),
            "module example.com/app\n\ngo 1.21\n\nrequire github.com/gin-gonic/gin v1.9.0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("composer.json"),
            r#"{"require": {"symfony/console": "^5.4"}}"#,
        )
        .unwrap();

        let report = scan(&dir, Scanner::new(false));
        let gin = report
            .records
            .iter()
            .find(|r| r.name == "gin")
            .expect("go record missing");
        assert_eq!(gin.namespace, "github.com/gin-gonic");
        assert_eq!(gin.version, "1.9.0");

        let console = report
            .records
            .iter()
            .find(|r| r.name == "symfony/console")
            .expect("composer record missing");
        assert_eq!(console.namespace, "symfony");
        assert_eq!(console.version, ">=5.4.0, <6.0.0");
    }
}

mod normalization {
    use super::*;

    #[test]
    fn test_npm_ranges() {
        assert_eq!(normalize(Ecosystem::Npm, "^1.2.3"), ">=1.2.3, <2.0.0");
        assert_eq!(normalize(Ecosystem::Npm, "~1.2.3"), ">=1.2.3, <1.3.0");
        assert_eq!(normalize(Ecosystem::Npm, "1.x"), ">=1.0.0, <2.0.0");
        assert_eq!(
            normalize(Ecosystem::Npm, "1.2.3 - 2.3.4"),
            ">=1.2.3, <=2.3.4"
        );
    }

    #[test]
    fn test_pypi_ranges() {
        assert_eq!(normalize(Ecosystem::Pypi, "==1.2.3"), "1.2.3");
        assert_eq!(normalize(Ecosystem::Pypi, "~=2.2"), ">=2.2, ==2.*");
        assert_eq!(normalize(Ecosystem::Pypi, "~=1.4.5"), ">=1.4.5, ==1.4.*");
    }

    #[test]
    fn test_cargo_ranges() {
        assert_eq!(normalize(Ecosystem::Cargo, "^1.2.3"), ">=1.2.3, <2.0.0");
        assert_eq!(normalize(Ecosystem::Cargo, "~1.2"), ">=1.2.0, <1.3.0");
        assert_eq!(normalize(Ecosystem::Cargo, "=1.4.2"), "1.4.2");
        // a bare requirement is cargo's implicit caret
        assert_eq!(normalize(Ecosystem::Cargo, "1.35"), ">=1.35.0, <2.0.0");
        assert_eq!(normalize(Ecosystem::Cargo, "0.3"), ">=0.3.0, <0.4.0");
    }

    #[test]
    fn test_pessimistic_ranges() {
        assert_eq!(normalize(Ecosystem::Gem, "~> 2.1"), ">=2.1.0, <2.2.0");
        assert_eq!(normalize(Ecosystem::Gem, "~> 2.1.4"), ">=2.1.4, <2.2.0");
        assert_eq!(normalize(Ecosystem::Cocoapods, "~> 3.0"), ">=3.0.0, <3.1.0");
    }

    #[test]
    fn test_interval_ranges() {
        assert_eq!(normalize(Ecosystem::Maven, "[1.0,2.0]"), ">=1.0, <=2.0");
        assert_eq!(normalize(Ecosystem::Nuget, "[1.0,2.0)"), ">=1.0, <2.0");
        assert_eq!(normalize(Ecosystem::Nuget, "(,1.0]"), "<=1.0");
        assert_eq!(normalize(Ecosystem::Nuget, "[1.0]"), "1.0");
        assert_eq!(normalize(Ecosystem::Nuget, "1.2.*"), ">=1.2.0, <1.3.0");
        assert_eq!(normalize(Ecosystem::Gradle, "4.+"), ">=4.0, <5.0");
    }

    /// Elixir and Haskell keep their native ` && ` conjunction
    #[test]
    fn test_native_conjunction_joiners() {
        assert_eq!(normalize(Ecosystem::Hex, "~> 2.1"), ">=2.1, <3.0");
        assert_eq!(
            normalize(Ecosystem::Hex, ">= 1.0 and < 2.0"),
            ">= 1.0 && < 2.0"
        );
        assert_eq!(
            normalize(Ecosystem::Hex, "~> 2.0 or ~> 1.8"),
            ">=2.0, <3.0 || >=1.8, <2.0"
        );
        assert_eq!(normalize(Ecosystem::Hackage, "==1.2.*"), ">=1.2 && <1.3");
        assert_eq!(normalize(Ecosystem::Hackage, "^>=1.2.3"), ">=1.2.3 && <1.3");
    }

    #[test]
    fn test_pub_and_composer_caret() {
        assert_eq!(normalize(Ecosystem::Pub, "^1.2.3"), ">=1.2.3, <2.0.0");
        assert_eq!(normalize(Ecosystem::Pub, "^0.1.2"), ">=0.1.2, <0.2.0");
        assert_eq!(normalize(Ecosystem::Composer, "^2.0"), ">=2.0.0, <3.0.0");
        assert_eq!(normalize(Ecosystem::Composer, "5.*"), ">=5.0, <6.0");
        assert_eq!(
            normalize(Ecosystem::Composer, ">=1.0 <2.0"),
            ">=1.0.0, <2.0.0"
        );
    }

    #[test]
    fn test_all_sentinel() {
        assert_eq!(normalize(Ecosystem::Npm, "*"), "all");
        assert_eq!(normalize(Ecosystem::Nuget, "*"), "all");
        assert_eq!(normalize(Ecosystem::Pub, "any"), "all");
        assert_eq!(normalize(Ecosystem::Cpan, "0"), "all");
    }

    #[test]
    fn test_empty_range_stays_empty() {
        assert_eq!(normalize(Ecosystem::Npm, ""), "");
        assert_eq!(normalize(Ecosystem::Maven, "   "), "");
    }

    /// A malformed range never drops the record, the version goes empty
    #[test]
    fn test_malformed_range_downgrades_to_unconstrained() {
        assert_eq!(normalize(Ecosystem::Gem, "~>"), "");
        assert_eq!(normalize(Ecosystem::Maven, "(1.0)"), "");
    }

    #[test]
    fn test_canonical_output_is_a_fixed_point() {
        let cases = [
            (Ecosystem::Npm, "^1.2.3"),
            (Ecosystem::Pypi, "~=2.2"),
            (Ecosystem::Gem, "~> 2.1"),
            (Ecosystem::Maven, "[1.0,2.0]"),
            (Ecosystem::Hex, "~> 2.1.3"),
            (Ecosystem::Pub, "^0.1.2"),
            (Ecosystem::Composer, "^2.0"),
        ];
        for (ecosystem, raw) in cases {
            let once = normalize(ecosystem, raw);
            assert_eq!(
                normalize(ecosystem, &once),
                once,
                "refeed changed {raw:?} for {ecosystem:?}"
            );
        }
    }
}
