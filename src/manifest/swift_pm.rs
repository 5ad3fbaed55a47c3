//! Swift Package Manager parsers
//!
//! Handles:
//! - Package.swift `.package(url: ..., ...)` dependency entries
//! - Package.resolved pin lists (v1 `object.pins` and v2 `pins`)

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize::{up_to_next_major, up_to_next_minor};

static PACKAGE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.package\((?P<args>[^)]*\))").unwrap());

static URL_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url:\s*"(?P<url>[^"]+)""#).unwrap());

static EXACT_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.exact\(\s*"(?P<version>[0-9.]+)"\s*\)"#).unwrap());

static UP_TO_NEXT_MINOR_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.upToNextMinor\(from:\s*"(?P<version>[0-9.]+)"\s*\)"#).unwrap()
});

static UP_TO_NEXT_MAJOR_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.upToNextMajor\(from:\s*"(?P<version>[0-9.]+)"\s*\)"#).unwrap()
});

static FROM_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"from:\s*"(?P<version>[0-9.]+)""#).unwrap());

static RANGE_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?P<lower>[0-9.]+)"\s*\.\.[.<]\s*"(?P<upper>[0-9.]+)""#).unwrap()
});

/// Split a repository URL into (namespace, name); the scheme and any
/// `.git` suffix are dropped
fn split_repo_url(url: &str) -> (String, String) {
    let path = url.split("//").last().unwrap_or(url);
    match path.rsplit_once('/') {
        Some((namespace, last)) => {
            let name = last.split('.').next().unwrap_or(last);
            (namespace.to_string(), name.to_string())
        }
        None => (String::new(), path.to_string()),
    }
}

fn entry_version(args: &str) -> String {
    if let Some(caps) = EXACT_ARG.captures(args) {
        return caps["version"].to_string();
    }
    if let Some(caps) = UP_TO_NEXT_MINOR_ARG.captures(args) {
        return up_to_next_minor(&caps["version"]);
    }
    if let Some(caps) = UP_TO_NEXT_MAJOR_ARG.captures(args) {
        return up_to_next_major(&caps["version"]);
    }
    if let Some(caps) = FROM_ARG.captures(args) {
        return caps["version"].to_string();
    }
    if let Some(caps) = RANGE_ARG.captures(args) {
        return format!(">={}, <{}", &caps["lower"], &caps["upper"]);
    }
    String::new()
}

/// Parser for Package.swift files
pub struct PackageSwiftParser;

impl ManifestParser for PackageSwiftParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Swift);
        let mut records = Vec::new();
        for caps in PACKAGE_ENTRY.captures_iter(content) {
            let args = &caps["args"];
            // local path packages carry no url
            let Some(url) = URL_ARG.captures(args) else {
                continue;
            };
            let (namespace, name) = split_repo_url(&url["url"]);
            let version = entry_version(args);
            records.extend(builder.build_with_namespace(&namespace, &name, &version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Swift
    }
}

/// Parser for Package.resolved files
pub struct PackageResolvedParser;

impl ManifestParser for PackageResolvedParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("Package.resolved", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Swift);
        let mut records = Vec::new();
        let version = root.get("version").and_then(Value::as_u64).unwrap_or(0);
        let (pins, url_key) = match version {
            1 => (root.pointer("/object/pins"), "repositoryURL"),
            2 => (root.get("pins"), "location"),
            _ => (None, ""),
        };
        let Some(pins) = pins.and_then(Value::as_array) else {
            return Ok(records);
        };
        for pin in pins {
            let url = pin.get(url_key).and_then(Value::as_str).unwrap_or("");
            if url.is_empty() {
                continue;
            }
            let (namespace, name) = split_repo_url(url);
            let pinned = pin
                .pointer("/state/version")
                .and_then(Value::as_str)
                .unwrap_or("");
            records.extend(builder.build_with_namespace(&namespace, &name, pinned));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Swift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_swift_version_forms() {
        let content = r#"
// swift-tools-version:5.5
import PackageDescription

let package = Package(
    name: "Demo",
    dependencies: [
        .package(url: "https://github.com/apple/swift-log.git", from: "1.4.2"),
        .package(url: "https://github.com/Alamofire/Alamofire.git", .upToNextMajor(from: "5.4.0")),
        .package(url: "https://github.com/realm/SwiftLint", .exact("0.44.0")),
        .package(url: "https://github.com/vapor/vapor.git", "4.0.0"..<"5.0.0"),
        .package(path: "../LocalKit"),
    ]
)
"#;
        let records = PackageSwiftParser.parse(content).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].name, "swift-log");
        assert_eq!(records[0].namespace, "github.com/apple");
        assert_eq!(records[0].version, "1.4.2");
        assert_eq!(records[0].ecosystem, "swift");
        assert_eq!(records[0].language, "Swift");
        assert_eq!(records[1].name, "Alamofire");
        assert_eq!(records[1].version, ">=5.4.0, <6.0.0");
        assert_eq!(records[2].version, "0.44.0");
        assert_eq!(records[3].version, ">=4.0.0, <5.0.0");
    }

    #[test]
    fn test_package_resolved_v1() {
        let content = r#"{
  "version": 1,
  "object": {
    "pins": [
      {
        "package": "SwiftLog",
        "repositoryURL": "https://github.com/apple/swift-log.git",
        "state": { "version": "1.4.2", "revision": "abc" }
      }
    ]
  }
}"#;
        let records = PackageResolvedParser.parse(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "swift-log");
        assert_eq!(records[0].namespace, "github.com/apple");
        assert_eq!(records[0].version, "1.4.2");
    }

    #[test]
    fn test_package_resolved_v2() {
        let content = r#"{
  "version": 2,
  "pins": [
    {
      "identity": "alamofire",
      "location": "https://github.com/Alamofire/Alamofire.git",
      "state": { "version": "5.6.1" }
    }
  ]
}"#;
        let records = PackageResolvedParser.parse(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alamofire");
        assert_eq!(records[0].version, "5.6.1");
    }
}
