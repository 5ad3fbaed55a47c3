//! Python manifest and lockfile parsers
//!
//! Handles:
//! - requirements.txt (PEP 508 requirement lines)
//! - Pipfile (`[packages]`, `[dev-packages]`) and Pipfile.lock
//! - pyproject.toml: PEP 621 requirement lists plus the poetry dependency
//!   tables with their caret/tilde shorthands
//! - poetry.lock `[[package]]` pins with their `category` marker
//! - environment.yml conda specs, with the interpreter toolchain filtered

use serde_json::Value;

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

/// Conda packages that belong to the interpreter toolchain, not the project
const DEFAULT_LIBRARY_NAMES: &[&str] = &[
    "ca-certificates",
    "certifi",
    "cffi",
    "cryptography",
    "libcxx",
    "libffi",
    "ncurses",
    "openssl",
    "pip",
    "python",
    "readline",
    "setuptools",
    "sqlite",
    "tk",
    "wheel",
    "xz",
    "zlib",
    "jupyter",
];

fn is_default_library(name: &str) -> bool {
    DEFAULT_LIBRARY_NAMES.contains(&name) || name.contains("conda")
}

/// Split a PEP 508 requirement line into name and specifier list
///
/// Extras and environment markers are dropped. Returns None for option
/// lines, editable installs and URL requirements.
fn parse_requirement(line: &str) -> Option<(String, String)> {
    let line = line.split(" #").next().unwrap_or(line).trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    if line.contains("://") {
        return None;
    }
    let line = line.split(';').next().unwrap_or(line).trim();
    let split_at = line
        .find(|c| "<>=!~".contains(c))
        .unwrap_or(line.len());
    let (head, specs) = line.split_at(split_at);
    let name = head.split('[').next().unwrap_or(head).trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), specs.trim().to_string()))
}

fn build_requirement(builder: &RecordBuilder, line: &str) -> Option<DependencyRecord> {
    let (name, specs) = parse_requirement(line)?;
    let version = normalize::normalize(Ecosystem::Pypi, &specs);
    builder.build(&name, &version)
}

/// Parser for requirements.txt files
pub struct RequirementsTxtParser;

impl ManifestParser for RequirementsTxtParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Pypi);
        let mut records = Vec::new();
        let mut pending = String::new();
        for line in content.lines() {
            let line = line.trim();
            if let Some(head) = line.strip_suffix('\\') {
                pending.push_str(head);
                continue;
            }
            pending.push_str(line);
            records.extend(build_requirement(&builder, &pending));
            pending.clear();
        }
        if !pending.is_empty() {
            records.extend(build_requirement(&builder, &pending));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}

/// Parser for Pipfile files
pub struct PipfileParser {
    skip_dev: bool,
}

impl PipfileParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn collect(
        root: &toml::Table,
        section: &str,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(deps) = root.get(section).and_then(|d| d.as_table()) else {
            return;
        };
        for (name, value) in deps {
            let raw = match value {
                toml::Value::String(spec) => spec.as_str(),
                toml::Value::Table(table) => table
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
                _ => continue,
            };
            // `*` means any version in a Pipfile
            let raw = if raw == "*" { "" } else { raw };
            let version = normalize::normalize(Ecosystem::Pypi, raw);
            out.extend(builder.build(name, &version));
        }
    }
}

impl ManifestParser for PipfileParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: toml::Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error("Pipfile", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pypi);
        let mut records = Vec::new();
        Self::collect(&root, "packages", &builder, &mut records);
        if !self.skip_dev {
            Self::collect(&root, "dev-packages", &builder, &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}

/// Parser for Pipfile.lock files
pub struct PipfileLockParser {
    skip_dev: bool,
}

impl PipfileLockParser {
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
        for (name, info) in deps {
            let raw = info.get("version").and_then(|v| v.as_str()).unwrap_or("");
            let version = normalize::normalize(Ecosystem::Pypi, raw);
            out.extend(builder.build(name, &version));
        }
    }
}

impl ManifestParser for PipfileLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("Pipfile.lock", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pypi);
        let mut records = Vec::new();
        Self::collect(&root, "default", &builder, &mut records);
        if !self.skip_dev {
            Self::collect(&root, "develop", &builder, &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}

/// Parser for pyproject.toml files
pub struct PyprojectTomlParser {
    skip_dev: bool,
}

impl PyprojectTomlParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn collect_list(
        list: Option<&toml::Value>,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(list) = list.and_then(|l| l.as_array()) else {
            return;
        };
        for entry in list {
            if let Some(line) = entry.as_str() {
                out.extend(build_requirement(builder, line));
            }
        }
    }

    /// Collects one poetry dependency table
    ///
    /// Poetry specs add caret and tilde shorthands on top of PEP 440;
    /// those two go through the semver-style expansion. The `python` key
    /// pins the interpreter, not a package.
    fn collect_poetry(
        table: Option<&toml::Value>,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(deps) = table.and_then(|t| t.as_table()) else {
            return;
        };
        for (name, value) in deps {
            if name.eq_ignore_ascii_case("python") {
                continue;
            }
            let raw = match value {
                toml::Value::String(spec) => spec.as_str(),
                // tables carry the spec under `version`; git and path
                // dependencies have none
                toml::Value::Table(table) => table
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
                _ => continue,
            };
            let raw = if raw == "*" { "" } else { raw };
            let version = if raw.starts_with('^') || raw.starts_with('~') {
                normalize::normalize(Ecosystem::Npm, raw)
            } else {
                normalize::normalize(Ecosystem::Pypi, raw)
            };
            out.extend(builder.build(name, &version));
        }
    }
}

impl ManifestParser for PyprojectTomlParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: toml::Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error("pyproject.toml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pypi);
        let mut records = Vec::new();

        let project = root.get("project");
        Self::collect_list(
            root.get("build-system").and_then(|b| b.get("requires")),
            &builder,
            &mut records,
        );
        Self::collect_list(
            project.and_then(|p| p.get("dependencies")),
            &builder,
            &mut records,
        );
        if let Some(extras) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(|o| o.as_table())
        {
            for list in extras.values() {
                Self::collect_list(Some(list), &builder, &mut records);
            }
        }

        let poetry = root.get("tool").and_then(|t| t.get("poetry"));
        if let Some(poetry) = poetry {
            Self::collect_poetry(poetry.get("dependencies"), &builder, &mut records);
            if !self.skip_dev {
                Self::collect_poetry(poetry.get("dev-dependencies"), &builder, &mut records);
                // named groups (dev, test, docs, ...) hold tooling deps
                if let Some(groups) = poetry.get("group").and_then(|g| g.as_table()) {
                    for group in groups.values() {
                        Self::collect_poetry(group.get("dependencies"), &builder, &mut records);
                    }
                }
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}

/// Parser for poetry.lock files
pub struct PoetryLockParser {
    skip_dev: bool,
}

impl PoetryLockParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }
}

impl ManifestParser for PoetryLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: toml::Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error("poetry.lock", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pypi);
        let mut records = Vec::new();
        if let Some(packages) = root.get("package").and_then(|p| p.as_array()) {
            for package in packages {
                let category = package
                    .get("category")
                    .and_then(|c| c.as_str())
                    .unwrap_or("main");
                if self.skip_dev && category == "dev" {
                    continue;
                }
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
        Ecosystem::Pypi
    }
}

/// Parser for conda environment.yml files
pub struct CondaEnvParser;

impl CondaEnvParser {
    /// Rewrite a conda spec into a PEP 508 requirement line
    ///
    /// `zstd=1.4.5=h41d2c2f_0` drops the build hash and turns the single
    /// `=` into `==`.
    fn conda_spec_to_requirement(spec: &str) -> String {
        let spec = match spec.matches('=').count() {
            n if n >= 2 && !spec.contains("==") => {
                spec.rsplit_once('=').map(|(head, _)| head).unwrap_or(spec)
            }
            _ => spec,
        };
        if spec.contains('=')
            && !spec.contains("==")
            && !spec.contains(">=")
            && !spec.contains("<=")
            && !spec.contains("!=")
        {
            spec.replacen('=', "==", 1)
        } else {
            spec.to_string()
        }
    }
}

impl ManifestParser for CondaEnvParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error("environment.yml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Pypi);
        let mut records = Vec::new();
        let Some(deps) = root.get("dependencies").and_then(|d| d.as_sequence()) else {
            return Ok(records);
        };
        for dep in deps {
            match dep {
                serde_yaml::Value::String(spec) => {
                    let line = Self::conda_spec_to_requirement(spec);
                    records.extend(build_requirement(&builder, &line));
                }
                // nested `pip:` lists hold plain requirement lines
                serde_yaml::Value::Mapping(map) => {
                    if let Some(lines) = map.get("pip").and_then(|p| p.as_sequence()) {
                        for line in lines {
                            if let Some(line) = line.as_str() {
                                records.extend(build_requirement(&builder, line));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        records.retain(|r| !is_default_library(&r.name));
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}
