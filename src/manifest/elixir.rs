//! BEAM ecosystem parsers
//!
//! Handles:
//! - mix.exs `defp deps do [...]` blocks, hex and git tuples
//! - mix.lock `{:hex, ...}` and `{:git, ...}` entries
//! - rebar.config `{deps, [...]}` lists (records carry the Erlang language)

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

static DEPS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)defp deps do\s*\[(.*?)\]\s*end").unwrap());

static DEP_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*:(?P<name>\w+)\s*,\s*(?:"(?P<req>[^"]+)")?"#).unwrap()
});

static GIT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"git(?:hub)?:\s*"(?P<url>[^"]+)""#).unwrap());

static GIT_PIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:tag|ref|branch):\s*"v?(?P<version>[0-9.]+)""#).unwrap());

/// Drop the scheme and final segment of a repository URL
fn repo_namespace(url: &str) -> String {
    let path = url.split("//").last().unwrap_or(url);
    match path.rsplit_once('/') {
        Some((namespace, _)) => namespace.to_string(),
        None => String::new(),
    }
}

/// Parser for mix.exs files
pub struct MixExsParser;

impl ManifestParser for MixExsParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Hex);
        let mut records = Vec::new();
        let Some(block) = DEPS_BLOCK.captures(content) else {
            return Ok(records);
        };
        let block = &block[1];
        // tuples are matched one at a time so git options can be read
        // from the remainder of the entry
        for caps in DEP_TUPLE.captures_iter(block) {
            let name = &caps["name"];
            // git option tuples match the dep pattern too, skip them
            if name == "git" || name == "github" {
                continue;
            }
            let entry_start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let tail = &block[entry_start..];
            let entry = match tail.find("},") {
                Some(end) => &tail[..end],
                None => tail,
            };
            match caps.name("req") {
                Some(req) => {
                    let version = normalize::normalize(Ecosystem::Hex, req.as_str());
                    records.extend(builder.build(name, &version));
                }
                None => {
                    let namespace = GIT_URL
                        .captures(entry)
                        .map(|c| repo_namespace(&c["url"]))
                        .unwrap_or_default();
                    let version = GIT_PIN
                        .captures(entry)
                        .map(|c| c["version"].to_string())
                        .unwrap_or_default();
                    records.extend(builder.build_with_namespace(&namespace, name, &version));
                }
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hex
    }
}

/// Parser for mix.lock files
pub struct MixLockParser;

impl ManifestParser for MixLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Hex);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            let Some(tuple) = line.split_once('{').map(|(_, rest)| rest) else {
                continue;
            };
            let fields: Vec<&str> = tuple.split(',').map(|f| f.trim()).collect();
            if fields.len() < 3 {
                continue;
            }
            if fields[0] == ":hex" {
                let name = fields[1].trim_start_matches(':');
                let version = fields[2].trim_matches('"');
                records.extend(builder.build(name, version));
            } else if fields[0] == ":git" {
                let url = fields[1].trim_matches('"');
                let namespace = repo_namespace(url);
                let name = url
                    .rsplit('/')
                    .next()
                    .unwrap_or("")
                    .trim_end_matches(".git");
                let version = GIT_PIN
                    .captures(line)
                    .map(|c| c["version"].to_string())
                    .unwrap_or_default();
                records.extend(builder.build_with_namespace(&namespace, name, &version));
            }
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hex
    }
}

static REBAR_DEPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{deps,\s*\[(.*?)\]\s*\}\s*\.").unwrap());

static REBAR_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*'?(?P<name>[a-z]\w*)'?\s*,\s*"(?P<req>[^"]*)""#).unwrap()
});

/// Parser for rebar.config files
pub struct RebarConfigParser;

impl ManifestParser for RebarConfigParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Hex).with_language("Erlang");
        let mut records = Vec::new();
        // comment lines start with %
        let stripped: String = content
            .lines()
            .filter(|l| !l.trim_start().starts_with('%'))
            .collect::<Vec<_>>()
            .join("\n");
        let Some(block) = REBAR_DEPS.captures(&stripped) else {
            return Ok(records);
        };
        for caps in REBAR_TUPLE.captures_iter(&block[1]) {
            let name = &caps["name"];
            if name == "git" || name == "branch" || name == "tag" || name == "ref" {
                continue;
            }
            let req = caps["req"].trim_start_matches('v');
            // `".*"` marks a source dependency with no registry version
            let version = if req.contains(".*") {
                String::new()
            } else {
                normalize::normalize(Ecosystem::Hex, req)
            };
            records.extend(builder.build(name, &version));
        }
        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_exs_hex_and_git_deps() {
        let content = r#"
defmodule Demo.MixProject do
  defp deps do
    [
      {:phoenix, "~> 1.6"},
      {:jason, "~> 1.2", only: :test},
      {:dns_erlang, git: "https://github.com/dnsimple/dns_erlang", tag: "1.1.0"}
    ]
  end
end
"#;
        let records = MixExsParser.parse(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "phoenix");
        assert_eq!(records[0].version, ">=1.6, <2.0");
        assert_eq!(records[0].ecosystem, "hex");
        assert_eq!(records[0].language, "Elixir");
        assert_eq!(records[2].name, "dns_erlang");
        assert_eq!(records[2].namespace, "github.com/dnsimple");
        assert_eq!(records[2].version, "1.1.0");
    }

    #[test]
    fn test_mix_lock_entries() {
        let content = r#"%{
  "phoenix": {:hex, :phoenix, "1.6.2", "hash", [:mix], [], "hexpm"},
  "dns": {:git, "https://github.com/dnsimple/dns_erlang.git", "abc123", [tag: "1.1.0"]},
}
"#;
        let records = MixLockParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "phoenix");
        assert_eq!(records[0].version, "1.6.2");
        assert_eq!(records[1].name, "dns_erlang");
        assert_eq!(records[1].namespace, "github.com/dnsimple");
        assert_eq!(records[1].version, "1.1.0");
    }

    #[test]
    fn test_rebar_config_deps() {
        let content = r#"
% build config
{erl_opts, [debug_info]}.
{deps, [
    {lager, "3.9.2"},
    {dns_erlang, ".*", {git, "https://github.com/dnsimple/dns_erlang.git", {branch, "main"}}}
]}.
"#;
        let records = RebarConfigParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "lager");
        assert_eq!(records[0].version, "3.9.2");
        assert_eq!(records[0].language, "Erlang");
        assert_eq!(records[1].name, "dns_erlang");
        assert_eq!(records[1].version, "");
    }
}
