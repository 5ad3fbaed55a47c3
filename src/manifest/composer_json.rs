//! Composer manifest and lockfile parsers
//!
//! Handles:
//! - composer.json `require` and `require-dev` (constraints normalized,
//!   the `php` platform requirement is skipped)
//! - composer.lock `packages` and `packages-dev` resolved pins

use serde_json::Value;

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

/// Parser for composer.json files
pub struct ComposerJsonParser {
    skip_dev: bool,
}

impl ComposerJsonParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn collect(
        root: &Value,
        section: &str,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(deps) = root.get(section).and_then(|d| d.as_object()) else {
            return;
        };
        for (name, spec) in deps {
            // the interpreter itself is not a package
            if name.eq_ignore_ascii_case("php") {
                continue;
            }
            let Some(spec) = spec.as_str() else {
                continue;
            };
            let version = normalize::normalize(Ecosystem::Composer, spec);
            out.extend(builder.build(name, &version));
        }
    }
}

impl ManifestParser for ComposerJsonParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("composer.json", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Composer);
        let mut records = Vec::new();
        Self::collect(&root, "require", &builder, &mut records);
        if !self.skip_dev {
            Self::collect(&root, "require-dev", &builder, &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
    }
}

/// Parser for composer.lock files
pub struct ComposerLockParser {
    skip_dev: bool,
}

impl ComposerLockParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn collect(
        root: &Value,
        section: &str,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(packages) = root.get(section).and_then(|p| p.as_array()) else {
            return;
        };
        for package in packages {
            let Some(name) = package.get("name").and_then(|n| n.as_str()) else {
                continue;
            };
            let version = package
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim_start_matches('v');
            out.extend(builder.build(name, version));
        }
    }
}

impl ManifestParser for ComposerLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("composer.lock", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Composer);
        let mut records = Vec::new();
        Self::collect(&root, "packages", &builder, &mut records);
        if !self.skip_dev {
            Self::collect(&root, "packages-dev", &builder, &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composer_json_require() {
        let content = r#"{
            "require": {
                "php": ">=7.4",
                "monolog/monolog": "^2.0",
                "symfony/console": "5.*"
            },
            "require-dev": {
                "phpunit/phpunit": "~9.5"
            }
        }"#;
        let records = ComposerJsonParser::new(false).parse(content).unwrap();
        assert_eq!(records.len(), 3);
        let monolog = records.iter().find(|r| r.name == "monolog/monolog").unwrap();
        assert_eq!(monolog.namespace, "monolog");
        assert_eq!(monolog.version, ">=2.0.0, <3.0.0");
        assert_eq!(monolog.language, "PHP");
        let console = records.iter().find(|r| r.name == "symfony/console").unwrap();
        assert_eq!(console.version, ">=5.0, <6.0");
    }

    #[test]
    fn test_composer_json_skip_dev() {
        let content = r#"{
            "require": {"monolog/monolog": "^2.0"},
            "require-dev": {"phpunit/phpunit": "~9.5"}
        }"#;
        let records = ComposerJsonParser::new(true).parse(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "monolog/monolog");
    }

    #[test]
    fn test_composer_lock_strips_v_prefix() {
        let content = r#"{
            "packages": [
                {"name": "monolog/monolog", "version": "v2.3.5"}
            ],
            "packages-dev": [
                {"name": "phpunit/phpunit", "version": "9.5.10"}
            ]
        }"#;
        let records = ComposerLockParser::new(false).parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].version, "2.3.5");
        assert_eq!(records[1].name, "phpunit/phpunit");

        let no_dev = ComposerLockParser::new(true).parse(content).unwrap();
        assert_eq!(no_dev.len(), 1);
    }
}
