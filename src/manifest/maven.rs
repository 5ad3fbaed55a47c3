//! JVM build file parsers
//!
//! Handles:
//! - pom.xml `<dependencies>`, with `${property}` resolution against the
//!   same pom's `<properties>` block and `<dependencyManagement>` lookups
//! - build.sbt `"group" %% "artifact" % "version"` declarations
//! - build.gradle / build.gradle.kts `group:artifact:version` coordinates

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

#[derive(Debug, Deserialize)]
struct Pom {
    version: Option<String>,
    parent: Option<ParentRef>,
    properties: Option<HashMap<String, String>>,
    dependencies: Option<DependencyList>,
    #[serde(rename = "dependencyManagement")]
    dependency_management: Option<DependencyManagement>,
}

#[derive(Debug, Deserialize)]
struct ParentRef {
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DependencyManagement {
    dependencies: Option<DependencyList>,
}

#[derive(Debug, Deserialize)]
struct DependencyList {
    #[serde(rename = "dependency", default)]
    entries: Vec<PomDependency>,
}

#[derive(Debug, Deserialize)]
struct PomDependency {
    #[serde(rename = "groupId")]
    group_id: Option<String>,
    #[serde(rename = "artifactId")]
    artifact_id: Option<String>,
    version: Option<String>,
}

static PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

impl Pom {
    /// Substitute `${property}` references from the pom itself
    ///
    /// Unresolvable references collapse to an empty string, which leaves
    /// the version unconstrained.
    fn resolve(&self, value: &str) -> String {
        PROPERTY_REF
            .replace_all(value, |caps: &regex::Captures| {
                let key = &caps[1];
                if key == "project.version" || key == "version" {
                    return self
                        .version
                        .clone()
                        .or_else(|| self.parent.as_ref().and_then(|p| p.version.clone()))
                        .unwrap_or_default();
                }
                let key = key.strip_prefix("project.").unwrap_or(key);
                self.properties
                    .as_ref()
                    .and_then(|p| p.get(key).cloned())
                    .unwrap_or_default()
            })
            .trim()
            .to_string()
    }

    /// Look a version up in the dependencyManagement section
    fn managed_version(&self, group: &str, artifact: &str) -> Option<String> {
        let managed = self
            .dependency_management
            .as_ref()?
            .dependencies
            .as_ref()?;
        managed.entries.iter().find_map(|entry| {
            if entry.group_id.as_deref() == Some(group)
                && entry.artifact_id.as_deref() == Some(artifact)
            {
                entry.version.clone()
            } else {
                None
            }
        })
    }
}

/// Parser for pom.xml files
pub struct PomXmlParser;

impl ManifestParser for PomXmlParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let pom: Pom = quick_xml::de::from_str(content)
            .map_err(|e| ManifestError::xml_parse_error("pom.xml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Maven);
        let mut records = Vec::new();
        let Some(dependencies) = pom.dependencies.as_ref() else {
            return Ok(records);
        };
        for dep in &dependencies.entries {
            let group = pom.resolve(dep.group_id.as_deref().unwrap_or(""));
            let artifact = pom.resolve(dep.artifact_id.as_deref().unwrap_or(""));
            if group.is_empty() || artifact.is_empty() {
                continue;
            }
            let raw = match &dep.version {
                Some(version) => pom.resolve(version),
                None => pom
                    .managed_version(&group, &artifact)
                    .map(|v| pom.resolve(&v))
                    .unwrap_or_default(),
            };
            let version = normalize::normalize(Ecosystem::Maven, &raw);
            let name = format!("{group}/{artifact}");
            records.extend(builder.build_with_namespace(&group, &name, &version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }
}

static SBT_DEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?P<ns>.+?)"\s+(?P<pct>%{1,3})\s+"(?P<name>.+?)"\s+%\s+"(?P<version>.+?)""#)
        .unwrap()
});

static SCALA_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"scalaVersion\s*:?=\s*"(?P<version>[0-9.]+)""#).unwrap());

/// Version-scheme markers that appear in the version slot of an sbt triple
const SBT_VERSION_FILTER: &[&str] = &["early-semver", "semver-spec", "pvp", "always", "strict"];

/// Parser for build.sbt files
pub struct SbtParser;

impl SbtParser {
    /// The cross-build suffix appended to `%%` artifact names
    fn scala_suffix(content: &str) -> Option<String> {
        let caps = SCALA_VERSION.captures(content)?;
        let nums: Vec<&str> = caps["version"].split('.').collect();
        match nums.first() {
            Some(&"3") => Some("_3".to_string()),
            Some(&"2") if nums.len() >= 2 => Some(format!("_{}.{}", nums[0], nums[1])),
            _ => None,
        }
    }
}

impl ManifestParser for SbtParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Sbt);
        let suffix = Self::scala_suffix(content);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            for caps in SBT_DEP.captures_iter(line) {
                let group = &caps["ns"];
                let mut artifact = caps["name"].to_string();
                let raw = &caps["version"];
                if SBT_VERSION_FILTER.contains(&raw) {
                    continue;
                }
                if caps["pct"].len() > 1 {
                    if let Some(suffix) = &suffix {
                        artifact.push_str(suffix);
                    }
                }
                let version = normalize::normalize(Ecosystem::Sbt, raw);
                let name = format!("{group}/{artifact}");
                records.extend(builder.build_with_namespace(group, &name, &version));
            }
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Sbt
    }
}

static GRADLE_COORDINATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"](?P<ns>[\w.\-]+):(?P<name>[\w.\-]+):(?P<version>[^'"]+)['"]"#).unwrap()
});

static GRADLE_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"group\s*:\s*['"](?P<ns>[^'"]+)['"]\s*,\s*name\s*:\s*['"](?P<name>[^'"]+)['"]\s*,\s*version\s*:\s*['"](?P<version>[^'"]+)['"]"#,
    )
    .unwrap()
});

/// Parser for build.gradle and build.gradle.kts files
pub struct GradleFileParser;

impl ManifestParser for GradleFileParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Gradle);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let captured = GRADLE_COORDINATE
                .captures(line)
                .or_else(|| GRADLE_MAP.captures(line));
            if let Some(caps) = captured {
                let group = &caps["ns"];
                let artifact = &caps["name"];
                let version = normalize::normalize(Ecosystem::Gradle, &caps["version"]);
                let name = format!("{group}/{artifact}");
                records.extend(builder.build_with_namespace(group, &name, &version));
            }
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gradle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pom_dependencies_with_properties() {
        let content = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <version>2.0.0</version>
  <properties>
    <junit.version>4.13.2</junit.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>${junit.version}</version>
    </dependency>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>sibling</artifactId>
      <version>${project.version}</version>
    </dependency>
  </dependencies>
</project>"#;
        let records = PomXmlParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].namespace, "junit");
        assert_eq!(records[0].name, "junit/junit");
        assert_eq!(records[0].version, "4.13.2");
        assert_eq!(records[0].ecosystem, "maven");
        assert_eq!(records[0].language, "Java");
        assert_eq!(records[1].version, "2.0.0");
    }

    #[test]
    fn test_pom_interval_and_managed_versions() {
        let content = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.slf4j</groupId>
        <artifactId>slf4j-api</artifactId>
        <version>1.7.32</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>[1.0,2.0]</version>
    </dependency>
  </dependencies>
</project>"#;
        let records = PomXmlParser.parse(content).unwrap();
        assert_eq!(records[0].version, "1.7.32");
        assert_eq!(records[1].version, ">=1.0, <=2.0");
    }

    #[test]
    fn test_pom_unresolved_property_is_unconstrained() {
        let content = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>widget</artifactId>
      <version>${undefined.version}</version>
    </dependency>
  </dependencies>
</project>"#;
        let records = PomXmlParser.parse(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].version, "");
    }

    #[test]
    fn test_sbt_cross_built_dependencies() {
        let content = r#"
scalaVersion := "2.13.8"

libraryDependencies += "org.typelevel" %% "cats-core" % "2.7.0"
libraryDependencies += "org.slf4j" % "slf4j-api" % "1.7.36"
// commented += "ignored" % "dep" % "1.0"
"#;
        let records = SbtParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "org.typelevel/cats-core_2.13");
        assert_eq!(records[0].ecosystem, "maven");
        assert_eq!(records[0].language, "Scala");
        assert_eq!(records[1].name, "org.slf4j/slf4j-api");
    }

    #[test]
    fn test_sbt_version_scheme_markers_skipped() {
        let content = r#"ThisBuild / versionScheme := Some("early-semver")
libraryDependencies += "com.example" %% "lib" % "early-semver"
"#;
        let records = SbtParser.parse(content).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_gradle_coordinates() {
        let content = r#"
dependencies {
    implementation 'org.springframework:spring-core:5.3.9.RELEASE'
    testImplementation group: 'junit', name: 'junit', version: '4.13'
    implementation 'com.squareup.okhttp3:okhttp:4.+'
}
"#;
        let records = GradleFileParser.parse(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "org.springframework/spring-core");
        assert_eq!(records[0].version, "5.3.9.RELEASE");
        assert_eq!(records[0].language, "Java");
        assert_eq!(records[1].name, "junit/junit");
        assert_eq!(records[2].version, ">=4.0, <5.0");
    }
}
