//! Dart pubspec parsers
//!
//! Handles:
//! - pubspec.yaml `dependencies` and `dev_dependencies` maps; sdk, path and
//!   git tables carry no registry version
//! - pubspec.lock `packages:` pins with their `dependency` kind

use serde_yaml::Value;

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

fn collect_section(
    builder: &RecordBuilder,
    section: Option<&Value>,
    out: &mut Vec<DependencyRecord>,
) {
    let Some(map) = section.and_then(Value::as_mapping) else {
        return;
    };
    for (key, info) in map {
        let Some(name) = key.as_str() else {
            continue;
        };
        let raw = match info {
            Value::String(raw) => raw.as_str(),
            // hosted tables pin a version; sdk/path/git tables do not
            Value::Mapping(fields) => fields
                .get(Value::from("version"))
                .and_then(Value::as_str)
                .unwrap_or(""),
            _ => "",
        };
        let version = normalize::normalize(Ecosystem::Pub, raw);
        out.extend(builder.build(name, &version));
    }
}

/// Parser for pubspec.yaml files
pub struct PubspecYamlParser {
    skip_dev: bool,
}

impl PubspecYamlParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }
}

impl ManifestParser for PubspecYamlParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error("pubspec.yaml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pub);
        let mut records = Vec::new();
        collect_section(&builder, root.get("dependencies"), &mut records);
        if !self.skip_dev {
            collect_section(&builder, root.get("dev_dependencies"), &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pub
    }
}

/// Parser for pubspec.lock files
pub struct PubspecLockParser {
    skip_dev: bool,
}

impl PubspecLockParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }
}

impl ManifestParser for PubspecLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error("pubspec.lock", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pub);
        let mut records = Vec::new();
        let Some(packages) = root.get("packages").and_then(Value::as_mapping) else {
            return Ok(records);
        };
        for (key, info) in packages {
            let Some(name) = key.as_str() else {
                continue;
            };
            let kind = info
                .get("dependency")
                .and_then(Value::as_str)
                .unwrap_or("");
            if self.skip_dev && kind == "direct dev" {
                continue;
            }
            let version = info.get("version").and_then(Value::as_str).unwrap_or("");
            records.extend(builder.build(name, version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pub
    }
}
