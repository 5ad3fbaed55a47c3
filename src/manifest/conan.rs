//! Conan lockfile parser
//!
//! conan.lock `graph_lock.nodes` entries with `"ref": "name/1.2.3@user/channel"`.
//! The root node has no ref and is skipped.

use serde_json::Value;

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;

/// Parser for conan.lock files
pub struct ConanLockParser;

impl ManifestParser for ConanLockParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("conan.lock", e.to_string()))?;
        let builder = RecordBuilder::new(Ecosystem::Conan);
        let mut records = Vec::new();
        let Some(nodes) = root
            .pointer("/graph_lock/nodes")
            .and_then(Value::as_object)
        else {
            return Ok(records);
        };
        for node in nodes.values() {
            let Some(reference) = node.get("ref").and_then(Value::as_str) else {
                continue;
            };
            let (name, version) = match reference.split_once('/') {
                Some((name, rest)) => {
                    let version = rest.split('@').next().unwrap_or("");
                    (name, version)
                }
                None => (reference, ""),
            };
            records.extend(builder.build(name, version));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Conan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conan_lock_nodes() {
        let content = r#"{
  "graph_lock": {
    "nodes": {
      "0": { "options": "", "path": "conanfile.txt" },
      "1": { "ref": "zlib/1.2.11@", "options": "shared=False" },
      "2": { "ref": "boost/1.76.0@user/stable" }
    }
  },
  "version": "0.4"
}"#;
        let records = ConanLockParser.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "zlib");
        assert_eq!(records[0].version, "1.2.11");
        assert_eq!(records[0].ecosystem, "conan");
        assert_eq!(records[0].language, "C/C++");
        assert_eq!(records[1].name, "boost");
        assert_eq!(records[1].version, "1.76.0");
    }
}
