//! NuGet manifest parsers
//!
//! Handles:
//! - packages.config `<package id version>` pins (kept verbatim)
//! - .nuspec metadata and `<dependency>` entries, flat or grouped
//! - .csproj `<PackageReference>` items, attribute or child version

use serde::Deserialize;

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

#[derive(Debug, Deserialize)]
struct PackagesConfig {
    #[serde(rename = "package", default)]
    packages: Vec<PackageEntry>,
}

#[derive(Debug, Deserialize)]
struct PackageEntry {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@version")]
    version: Option<String>,
}

/// Parser for packages.config files
pub struct PackagesConfigParser;

impl ManifestParser for PackagesConfigParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let config: PackagesConfig = quick_xml::de::from_str(content)
            .map_err(|e| ManifestError::xml_parse_error("packages.config", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Nuget);
        let mut records = Vec::new();
        for package in &config.packages {
            let Some(id) = package.id.as_deref() else {
                continue;
            };
            let version = package.version.as_deref().unwrap_or("");
            records.extend(builder.build(id, version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Nuget
    }
}

#[derive(Debug, Deserialize)]
struct Nuspec {
    metadata: Option<NuspecMetadata>,
}

#[derive(Debug, Deserialize)]
struct NuspecMetadata {
    id: Option<String>,
    version: Option<String>,
    dependencies: Option<NuspecDependencies>,
}

#[derive(Debug, Deserialize)]
struct NuspecDependencies {
    #[serde(rename = "dependency", default)]
    entries: Vec<DependencyAttr>,
    #[serde(rename = "group", default)]
    groups: Vec<NuspecGroup>,
}

#[derive(Debug, Deserialize)]
struct NuspecGroup {
    #[serde(rename = "dependency", default)]
    entries: Vec<DependencyAttr>,
}

#[derive(Debug, Deserialize)]
struct DependencyAttr {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@version")]
    version: Option<String>,
}

/// Parser for .nuspec files
pub struct NuspecParser;

impl NuspecParser {
    fn push(builder: &RecordBuilder, entry: &DependencyAttr, out: &mut Vec<DependencyRecord>) {
        let Some(id) = entry.id.as_deref() else {
            return;
        };
        let raw = entry.version.as_deref().unwrap_or("");
        let version = normalize::normalize(Ecosystem::Nuget, raw);
        out.extend(builder.build(id, &version));
    }
}

impl ManifestParser for NuspecParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let nuspec: Nuspec = quick_xml::de::from_str(content)
            .map_err(|e| ManifestError::xml_parse_error("nuspec", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Nuget);
        let mut records = Vec::new();
        let Some(metadata) = nuspec.metadata.as_ref() else {
            return Ok(records);
        };
        // the nuspec also describes the package it ships
        if let Some(id) = metadata.id.as_deref() {
            let version = metadata.version.as_deref().unwrap_or("");
            records.extend(builder.build(id, version));
        }
        if let Some(dependencies) = metadata.dependencies.as_ref() {
            for entry in &dependencies.entries {
                Self::push(&builder, entry, &mut records);
            }
            for group in &dependencies.groups {
                for entry in &group.entries {
                    Self::push(&builder, entry, &mut records);
                }
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Nuget
    }
}

#[derive(Debug, Deserialize)]
struct Csproj {
    #[serde(rename = "ItemGroup", default)]
    item_groups: Vec<ItemGroup>,
}

#[derive(Debug, Deserialize)]
struct ItemGroup {
    #[serde(rename = "PackageReference", default)]
    references: Vec<PackageReference>,
}

#[derive(Debug, Deserialize)]
struct PackageReference {
    #[serde(rename = "@Include")]
    include: Option<String>,
    #[serde(rename = "@Version")]
    version_attr: Option<String>,
    #[serde(rename = "Version")]
    version_child: Option<String>,
}

/// Parser for .csproj files
pub struct CsprojParser;

impl ManifestParser for CsprojParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let csproj: Csproj = quick_xml::de::from_str(content)
            .map_err(|e| ManifestError::xml_parse_error("csproj", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Nuget);
        let mut records = Vec::new();
        for group in &csproj.item_groups {
            for reference in &group.references {
                let Some(include) = reference.include.as_deref() else {
                    continue;
                };
                let raw = reference
                    .version_attr
                    .as_deref()
                    .or(reference.version_child.as_deref())
                    .unwrap_or("");
                let version = normalize::normalize(Ecosystem::Nuget, raw);
                records.extend(builder.build(include, &version));
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Nuget
    }
}
