//! npm manifest and lockfile parsers
//!
//! Handles:
//! - package.json (`dependencies`, `devDependencies`, ranges normalized)
//! - package-lock.json (top-level and one level of nested resolved pins)
//! - yarn.lock v1 (blank-line separated entry blocks)
//! - pnpm-lock.yaml (`packages` map keys carry name and version)

use serde_json::Value;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

/// Returns false for specifiers that do not name a registry range
///
/// Git URLs, dist tags (`latest`), workspace and file references all carry
/// letters before any pre-release dash. Wildcard `x` components are the one
/// alphabetic form a registry range may use.
fn is_registry_range(spec: &str) -> bool {
    let head = spec.split('-').next().unwrap_or(spec);
    head.chars()
        .all(|c| !c.is_ascii_alphabetic() || c == 'x' || c == 'X')
}

/// Parser for package.json files
pub struct PackageJsonParser {
    skip_dev: bool,
}

impl PackageJsonParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn collect(
        &self,
        root: &Value,
        section: &str,
        builder: &RecordBuilder,
        out: &mut Vec<DependencyRecord>,
    ) {
        let Some(deps) = root.get(section).and_then(|d| d.as_object()) else {
            return;
        };
        for (name, spec) in deps {
            let Some(spec) = spec.as_str() else {
                continue;
            };
            if !is_registry_range(spec) {
                continue;
            }
            let version = normalize::normalize(Ecosystem::Npm, spec);
            out.extend(builder.build(name, &version));
        }
    }
}

impl ManifestParser for PackageJsonParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("package.json", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Npm);
        let mut records = Vec::new();
        self.collect(&root, "dependencies", &builder, &mut records);
        if !self.skip_dev {
            self.collect(&root, "devDependencies", &builder, &mut records);
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
}

/// Parser for package-lock.json files
pub struct PackageLockParser {
    skip_dev: bool,
}

impl PackageLockParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    fn push(
        entry_name: &str,
        info: &Value,
        builder: &RecordBuilder,
        runtime: &mut Vec<DependencyRecord>,
        dev: &mut Vec<DependencyRecord>,
    ) {
        let Some(version) = info.get("version").and_then(|v| v.as_str()) else {
            return;
        };
        // git and tarball resolutions are not registry versions
        if !is_registry_range(version) {
            return;
        }
        let is_dev = info.get("dev").and_then(|d| d.as_bool()).unwrap_or(false);
        let target = if is_dev { dev } else { runtime };
        target.extend(builder.build(entry_name, version));
    }
}

impl ManifestParser for PackageLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("package-lock.json", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Npm);
        let mut runtime = Vec::new();
        let mut dev = Vec::new();
        if let Some(deps) = root.get("dependencies").and_then(|d| d.as_object()) {
            for (name, info) in deps {
                Self::push(name, info, &builder, &mut runtime, &mut dev);
                // one level of nested resolutions
                if let Some(nested) = info.get("dependencies").and_then(|d| d.as_object()) {
                    for (sub_name, sub_info) in nested {
                        Self::push(sub_name, sub_info, &builder, &mut runtime, &mut dev);
                    }
                }
            }
        }
        if !self.skip_dev {
            runtime.append(&mut dev);
        }
        Ok(dedup_records(runtime))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
}

/// Parser for yarn.lock v1 files
pub struct YarnLockParser;

impl YarnLockParser {
    /// Pull the package name out of an entry header line
    ///
    /// `"@babel/core@^7.0.0", "@babel/core@^7.1.0":` keeps the scope,
    /// `lodash@^4.17.15:` splits at the requirement `@`.
    fn entry_name(header: &str) -> Option<String> {
        let first = header.split(',').next()?;
        let pieces: Vec<&str> = first.split('@').collect();
        if pieces.len() > 2 {
            Some(format!("@{}", pieces[1]))
        } else {
            Some(pieces.first()?.trim_matches('"').to_string())
        }
    }
}

impl ManifestParser for YarnLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Npm);
        let mut records = Vec::new();
        let mut name = String::new();
        let mut version = String::new();
        for line in content.lines() {
            let text = line.trim();
            if text.is_empty() {
                if !name.is_empty() && !version.is_empty() {
                    records.extend(builder.build(&name, &version));
                }
                name.clear();
                version.clear();
                continue;
            }
            if text.starts_with('#') {
                continue;
            }
            if text.ends_with(':') && text != "dependencies:" {
                if let Some(parsed) = Self::entry_name(text.trim_end_matches(':')) {
                    name = parsed;
                }
            } else if text.starts_with("version") {
                if let Some(value) = text.split(' ').next_back() {
                    version = value.trim_matches('"').to_string();
                }
            }
        }
        if !name.is_empty() && !version.is_empty() {
            records.extend(builder.build(&name, &version));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
}

/// Parser for pnpm-lock.yaml files
pub struct PnpmLockParser {
    skip_dev: bool,
}

impl PnpmLockParser {
    pub fn new(skip_dev: bool) -> Self {
        Self { skip_dev }
    }

    /// Split a `packages` map key into name and version
    ///
    /// `/@babel/core/7.12.3` and `/lodash/4.17.20_peerhash` use the path
    /// form; workspace tarballs use `file:packages/name@version`.
    fn split_key(key: &str) -> Option<(String, String)> {
        let info = key.trim_start_matches('/');
        if let Some(rest) = info.strip_prefix("file:packages/") {
            let rest = rest.split('+').next()?;
            let (name, version) = rest.rsplit_once('@')?;
            return Some((name.to_string(), version.to_string()));
        }
        let (name, version) = info.rsplit_once('/')?;
        let version = version.split('_').next()?;
        Some((name.to_string(), version.to_string()))
    }
}

impl ManifestParser for PnpmLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error("pnpm-lock.yaml", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Npm);
        let mut runtime = Vec::new();
        let mut dev = Vec::new();
        if let Some(packages) = root.get("packages").and_then(|p| p.as_mapping()) {
            for (key, info) in packages {
                let Some(key) = key.as_str() else {
                    continue;
                };
                let Some((name, version)) = Self::split_key(key) else {
                    continue;
                };
                let is_dev = info.get("dev").and_then(|d| d.as_bool()).unwrap_or(false);
                let target = if is_dev { &mut dev } else { &mut runtime };
                target.extend(builder.build(&name, &version));
            }
        }
        if !self.skip_dev {
            runtime.append(&mut dev);
        }
        Ok(dedup_records(runtime))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
}
