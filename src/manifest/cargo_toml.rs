//! Cargo manifest and lockfile parsers
//!
//! Handles:
//! - Cargo.toml `dependencies`, `build-dependencies` and
//!   `dev-dependencies`, both the plain string form and the inline table
//!   form `{ version = "1.0" }`
//! - Cargo.lock `[[package]]` resolved pins

use toml::{Table, Value};

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

/// Parser for Cargo.toml files
pub struct CargoTomlParser {
    skip_dev: bool,
}

impl CargoTomlParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn collect(
        root: &Table,
        section: &str,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(deps) = root.get(section).and_then(|d| d.as_table()) else {
            return;
        };
        for (name, value) in deps {
            let raw = match value {
                Value::String(spec) => spec.as_str(),
                // inline tables carry the requirement under `version`;
                // pure git or path dependencies have none
                Value::Table(table) => table
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
                _ => continue,
            };
            let version = normalize::normalize(Ecosystem::Cargo, raw);
            out.extend(builder.build(name, &version));
        }
    }
}

impl ManifestParser for CargoTomlParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error("Cargo.toml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Cargo);
        let mut records = Vec::new();
        Self::collect(&root, "dependencies", &builder, &mut records);
        Self::collect(&root, "build-dependencies", &builder, &mut records);
        if !self.skip_dev {
            Self::collect(&root, "dev-dependencies", &builder, &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }
}

/// Parser for Cargo.lock files
pub struct CargoLockParser;

impl ManifestParser for CargoLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error("Cargo.lock", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Cargo);
        let mut records = Vec::new();
        if let Some(packages) = root.get("package").and_then(|p| p.as_array()) {
            for package in packages {
                let name = package.get("name").and_then(|n| n.as_str()).unwrap_or("");
                let version = package
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                if !version.is_empty() {
                    records.extend(builder.build(name, version));
                }
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }
}
