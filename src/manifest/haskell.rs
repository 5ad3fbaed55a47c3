//! Haskell manifest parsers
//!
//! Handles:
//! - package.yaml `dependencies` lists (hpack projects)
//! - .cabal `build-depends:` fields in the library section

use serde_yaml::Value;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

fn build_entry(builder: &RecordBuilder, name: &str, raw: &str) -> Option<DependencyRecord> {
    let version = normalize::normalize(Ecosystem::Hackage, raw);
    builder.build(name, &version)
}

/// Collect records from one `dependencies` value, which hpack allows as
/// either a list of `"name range"` strings or a name to range mapping
fn collect_dependencies(builder: &RecordBuilder, value: &Value, out: &mut Vec<DependencyRecord>) {
    match value {
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::String(entry) => {
                        let (name, raw) = match entry.split_once(' ') {
                            Some((name, raw)) => (name, raw.trim()),
                            None => (entry.as_str(), ""),
                        };
                        out.extend(build_entry(builder, name, raw));
                    }
                    Value::Mapping(map) => {
                        let name = map
                            .get(Value::from("name"))
                            .and_then(Value::as_str)
                            .unwrap_or("");
                        let raw = map
                            .get(Value::from("version"))
                            .and_then(Value::as_str)
                            .unwrap_or("");
                        if !name.is_empty() {
                            out.extend(build_entry(builder, name, raw));
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Mapping(map) => {
            for (key, info) in map {
                let Some(name) = key.as_str() else {
                    continue;
                };
                let raw = match info {
                    Value::String(raw) => raw.as_str(),
                    Value::Mapping(fields) => fields
                        .get(Value::from("version"))
                        .and_then(Value::as_str)
                        .unwrap_or(""),
                    _ => "",
                };
                out.extend(build_entry(builder, name, raw));
            }
        }
        _ => {}
    }
}

/// Parser for package.yaml files
pub struct PackageYamlParser;

impl ManifestParser for PackageYamlParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error("package.yaml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Hackage);
        let mut records = Vec::new();
        if let Some(deps) = root.get("dependencies") {
            collect_dependencies(&builder, deps, &mut records);
        }
        if let Some(deps) = root.get("library").and_then(|l| l.get("dependencies")) {
            collect_dependencies(&builder, deps, &mut records);
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hackage
    }
}

/// Parser for .cabal files
pub struct CabalParser;

/// True for lines that start a new field or conditional, ending any
/// running build-depends block
fn ends_depends_block(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains(": ")
        || lower.ends_with(':')
        || lower.starts_with("if")
        || lower.starts_with("else")
        || lower.starts_with("elif")
}

/// True for section headers that end the library stanza
fn ends_library_stanza(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("executable")
        || lower.starts_with("test-suite")
        || lower.starts_with("benchmark")
        || lower.starts_with("foreign-library")
        || lower.starts_with("flag")
        || lower.starts_with("common")
        || lower.starts_with("source-repository")
        || lower.starts_with("custom-setup")
        || (lower.starts_with("library") && lower.contains(' '))
}

impl ManifestParser for CabalParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Hackage);
        let mut records = Vec::new();
        let mut in_library = false;
        let mut in_depends = false;
        let mut items: Vec<String> = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("--") {
                continue;
            }
            if !in_library {
                // only the public library stanza contributes dependencies
                if line == "library" || line == "Library" {
                    in_library = true;
                }
                continue;
            }
            if ends_library_stanza(line) {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(rest) = lower
                .starts_with("build-depends:")
                .then(|| line["build-depends:".len()..].trim())
            {
                in_depends = true;
                if rest.is_empty() {
                    continue;
                }
                items.extend(split_entries(rest));
                continue;
            }
            if in_depends {
                if ends_depends_block(line) {
                    in_depends = false;
                    continue;
                }
                items.extend(split_entries(line));
            }
        }
        for item in items {
            let (name, raw) = match item.split_once(' ') {
                Some((name, raw)) => (name, raw.trim()),
                None => (item.as_str(), ""),
            };
            records.extend(build_entry(&builder, name, raw));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hackage
    }
}

fn split_entries(line: &str) -> Vec<String> {
    line.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_yaml_string_entries() {
        let content = r#"
name: demo
dependencies:
  - base >=4.7 && <5
  - text
library:
  dependencies:
    - aeson ==1.2.*
"#;
        let records = PackageYamlParser.parse(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "base");
        assert_eq!(records[0].version, ">=4.7 && <5");
        assert_eq!(records[0].ecosystem, "hackage");
        assert_eq!(records[0].language, "Haskell");
        assert_eq!(records[1].name, "text");
        assert_eq!(records[1].version, "");
        assert_eq!(records[2].name, "aeson");
        assert_eq!(records[2].version, ">=1.2 && <1.3");
    }

    #[test]
    fn test_package_yaml_mapping_entries() {
        let content = r#"
dependencies:
  containers: ^>=0.6.2
  bytestring:
    version: ">=0.10"
"#;
        let records = PackageYamlParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "containers");
        assert_eq!(records[0].version, ">=0.6.2 && <0.7");
        assert_eq!(records[1].name, "bytestring");
        assert_eq!(records[1].version, ">=0.10");
    }

    #[test]
    fn test_cabal_library_build_depends() {
        let content = "\
name: demo\n\
version: 0.1.0\n\
\n\
library\n\
  hs-source-dirs: src\n\
  build-depends: base >=4.7 && <5,\n\
                 text,\n\
                 aeson ==1.5.*\n\
  default-language: Haskell2010\n\
\n\
test-suite demo-test\n\
  build-depends: hspec\n";
        let records = CabalParser.parse(content).unwrap();
        let pairs: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.name.as_str(), r.version.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("base", ">=4.7 && <5"),
                ("text", ""),
                ("aeson", ">=1.5 && <1.6"),
            ]
        );
    }

    #[test]
    fn test_cabal_conditional_ends_depends() {
        let content = "\
library\n\
  build-depends:\n\
    base >=4.7,\n\
    text\n\
  if flag(fast)\n\
    ghc-options: -O2\n";
        let records = CabalParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "text");
    }
}
