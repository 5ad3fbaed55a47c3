//! Perl cpanfile parser
//!
//! `requires 'Module::Name', '1.23';` declarations, also in the fat-comma
//! form `requires 'Module::Name' => '1.23';`. A missing requirement means
//! any version.

use crate::domain::{dedup_records, DependencyRecord, Ecosystem, RecordBuilder};
use crate::error::ManifestError;
use crate::manifest::ManifestParser;
use crate::normalize;

fn unquote(text: &str) -> String {
    text.trim().replace(['\'', '"'], "")
}

/// Parser for cpanfile files
pub struct CpanfileParser;

impl ManifestParser for CpanfileParser {
    fn parse(&self, content: &str) -> Result<Vec<DependencyRecord>, ManifestError> {
        let builder = RecordBuilder::new(Ecosystem::Cpan);
        let mut records = Vec::new();
        for line in content.lines() {
            let line = line
                .trim()
                .split('#')
                .next()
                .unwrap_or("")
                .trim()
                .trim_end_matches(';');
            let Some(rest) = line.strip_prefix("requires") else {
                continue;
            };
            let (name, raw) = if let Some((name, version)) = rest.split_once("=>") {
                (unquote(name), unquote(version))
            } else if let Some((name, version)) = rest.split_once(',') {
                (unquote(name), unquote(version))
            } else {
                // no requirement means any version
                (unquote(rest), "0".to_string())
            };
            let version = normalize::normalize(Ecosystem::Cpan, &raw);
            records.extend(builder.build(&name, &version));
        }
        Ok(dedup_records(records))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cpan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpanfile_requires() {
        let content = "requires 'Plack', '1.0018';\n\
requires 'JSON::XS' => '2.0';\n\
requires 'Try::Tiny';  # error handling\n\
on 'test' => sub {\n    requires 'Test::More', '0.98';\n};\n";
        let records = CpanfileParser.parse(content).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].name, "Plack");
        assert_eq!(records[0].namespace, "");
        assert_eq!(records[0].version, "1.0018");
        assert_eq!(records[0].ecosystem, "cpan");
        assert_eq!(records[0].language, "Perl");
        assert_eq!(records[1].namespace, "JSON");
        assert_eq!(records[1].name, "XS");
        assert_eq!(records[1].version, "2.0");
        assert_eq!(records[2].name, "Tiny");
        assert_eq!(records[2].version, "all");
        assert_eq!(records[3].name, "More");
    }

    #[test]
    fn test_cpanfile_v_prefix_and_dedup() {
        let content = "requires 'perl', 'v5.10.1';\nrequires 'perl', 'v5.10.1';\n";
        let records = CpanfileParser.parse(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "perl");
        assert_eq!(records[0].version, "5.10.1");
    }
}
