//! Leiningen project.clj parser
//!
//! `:dependencies [[org.clojure/clojure "1.11.1"] ...]` vectors. Versions
//! are exact pins, kept verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;

static DEP_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[\s*(?P<name>[A-Za-z0-9._/-]+)\s+"(?P<version>[^"]*)""#).unwrap()
});

/// Slice out the vector following `:dependencies`, bracket-balanced
fn dependencies_block(content: &str) -> Option<&str> {
    let start = content.find(":dependencies")?;
    let rest = &content[start..];
    let open = rest.find('[')?;
    let mut depth = 0usize;
    for (idx, ch) in rest[open..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[open..open + idx + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parser for project.clj files
pub struct ProjectCljParser;

impl ManifestParser for ProjectCljParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Clojars);
        let mut records = Vec::new();
        let Some(block) = dependencies_block(content) else {
            return Ok(records);
        };
        for caps in DEP_TUPLE.captures_iter(block) {
            records.extend(builder.build(&caps["name"], &caps["version"]));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Clojars
    }
}
