//! Ruby manifest and lockfile parsers
//!
//! Handles:
//! - Gemfile `gem` declarations with requirement lists
//! - .gemspec `add_dependency` family declarations
//! - Gemfile.lock `specs:` sections (pinned gems and their sub-deps)

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());

/// True for quoted strings that are version requirements, not options
fn is_requirement(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit())
        || text.starts_with("~>")
        || text.starts_with('>')
        || text.starts_with('<')
        || text.starts_with('=')
        || text.starts_with("!=")
}

/// Extract a record from a declaration line's quoted strings
fn build_declaration(builder: &RecordBuilder, line: &str) -> Option<DependencyRecord> {
    let mut quoted = QUOTED.captures_iter(line).map(|c| c[1].to_string());
    let name = quoted.next()?;
    let requirements: Vec<String> = quoted.filter(|q| is_requirement(q)).collect();
    let version = if requirements.is_empty() {
        String::new()
    } else {
        normalize::normalize(Ecosystem::Gem, &requirements.join(", "))
    };
    builder.build(&name, &version)
}

/// Parser for Gemfile files
pub struct GemfileParser;

impl ManifestParser for GemfileParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Gem);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with("gem ") || line.starts_with("gem(") {
                records.extend(build_declaration(&builder, line));
            }
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gem
    }
}

/// Parser for .gemspec files
pub struct GemspecParser;

impl ManifestParser for GemspecParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Gem);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.contains("add_dependency")
                || line.contains("add_runtime_dependency")
                || line.contains("add_development_dependency")
            {
                records.extend(build_declaration(&builder, line));
            }
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gem
    }
}

/// Parser for Gemfile.lock files
pub struct GemfileLockParser;

impl GemfileLockParser {
    /// Split `name (version)` into its parts, dropping any `-platform`
    /// suffix inside the parens
    fn name_version(text: &str) -> (String, String) {
        match text.split_once(" (") {
            Some((name, rest)) => {
                let version = rest
                    .trim_end_matches(')')
                    .split('-')
                    .next()
                    .unwrap_or("")
                    .to_string();
                (name.to_string(), version)
            }
            None => (text.trim().to_string(), String::new()),
        }
    }
}

impl ManifestParser for GemfileLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        // first-seen order with version backfill: a sub-dep line may
        // appear before the spec line that pins it
        let mut order: Vec<String> = Vec::new();
        let mut versions: HashMap<String, String> = HashMap::new();
        let mut in_specs = false;
        for line in content.lines() {
            if line.trim().is_empty() {
                in_specs = false;
                continue;
            }
            if line == "  specs:" {
                in_specs = true;
                continue;
            }
            if !in_specs {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            let (name, version) = Self::name_version(line.trim());
            if name.is_empty() || name == "bundler" {
                continue;
            }
            match indent {
                4 | 6 => {
                    let entry = versions.entry(name.clone()).or_insert_with(|| {
                        order.push(name.clone());
                        String::new()
                    });
                    if entry.is_empty() && indent == 4 {
                        *entry = version;
                    }
                }
                _ => {}
            }
        }

        let builder = RecordBuilder::new(Ecosystem::Gem);
        let mut records = Vec::new();
        for name in order {
            let version = versions.get(&name).cloned().unwrap_or_default();
            records.extend(builder.build(&name, &version));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemfile_declarations() {
        let content = "source 'https://rubygems.org'\n\n\
gem 'rails', '~> 6.1'\n\
gem 'pg', '>= 0.18', '< 2.0'\n\
gem 'puma', require: false\n";
        let records = GemfileParser.parse(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "rails");
        assert_eq!(records[0].version, ">=6.1.0, <6.2.0");
        assert_eq!(records[0].language, "Ruby");
        assert_eq!(records[1].version, ">=0.18, <2.0");
        assert_eq!(records[2].version, "");
    }

    #[test]
    fn test_gemspec_declarations() {
        let content = "Gem::Specification.new do |spec|\n\
  spec.add_dependency 'thor', '~> 1.0'\n\
  spec.add_development_dependency 'rspec', '= 3.10.0'\n\
end\n";
        let records = GemspecParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "thor");
        assert_eq!(records[0].version, ">=1.0.0, <1.1.0");
        assert_eq!(records[1].version, "3.10.0");
    }

    #[test]
    fn test_gemfile_lock_specs() {
        // pin lines sit at indent 4, their requirements at indent 6
        let content = "GEM
  remote: https://rubygems.org/
  specs:
    actioncable (6.1.4)
      actionpack (= 6.1.4)
      nio4r (~> 2.0)
    actionpack (6.1.4)
    nokogiri (1.11.7-x86_64-linux)

PLATFORMS
  x86_64-linux

DEPENDENCIES
  actioncable
";
        let records = GemfileLockParser.parse(content).unwrap();
        let pairs: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.name.as_str(), r.version.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("actioncable", "6.1.4"),
                ("actionpack", "6.1.4"),
                ("nio4r", ""),
                ("nokogiri", "1.11.7"),
            ]
        );
    }
}
