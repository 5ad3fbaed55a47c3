//! Single-purpose normalizers: CRAN, CPAN, Go modules, Swift PM, and the
//! exact-pin ecosystems whose lockfiles never carry ranges

use crate::domain::{Ecosystem, VersionTuple};
use crate::error::NormalizeError;
use crate::normalize::{RangeNormalizer, ALL};

/// R/CRAN comparator list normalizer (`>= 2.10`, `>= 1.0, < 2.0`)
pub struct CranNormalizer;

impl RangeNormalizer for CranNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut out = Vec::new();
        for token in raw.split(',') {
            let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
            if token.is_empty() {
                continue;
            }
            if let Some(rest) = token.strip_prefix("==") {
                out.push(rest.to_string());
            } else {
                out.push(token);
            }
        }
        if out.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(out.join(", "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cran
    }
}

/// Perl/CPAN requirement normalizer
///
/// `requires 'Plack', '0'` means any version; versions may carry a leading
/// `v` (`v5.10.1`) which is dropped.
pub struct CpanNormalizer;

impl RangeNormalizer for CpanNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let raw = raw.trim();
        if raw == "0" || raw == ALL {
            return Ok(ALL.to_string());
        }
        let mut out = Vec::new();
        for token in raw.split(',') {
            let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
            if token.is_empty() {
                continue;
            }
            if let Some(rest) = token.strip_prefix("==") {
                out.push(rest.trim_start_matches('v').to_string());
            } else if token.starts_with('>') || token.starts_with('<') || token.starts_with("!=") {
                out.push(token);
            } else {
                out.push(token.trim_start_matches('v').to_string());
            }
        }
        if out.is_empty() {
            return Err(NormalizeError::malformed(raw));
        }
        Ok(out.join(", "))
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cpan
    }
}

/// Go module version normalizer: strips the `v` prefix, nothing else
pub struct GolangNormalizer;

impl RangeNormalizer for GolangNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        Ok(raw.trim().trim_start_matches('v').to_string())
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Golang
    }
}

/// Swift PM range normalizer
///
/// The extractor lowers `.upToNextMajor(from:)` and friends through the
/// helpers below; this normalizer handles the literal range operators that
/// appear inline (`"1.2.3"..."2.0.0"`, `"1.2.3"..<"2.0.0"`).
pub struct SwiftNormalizer;

impl RangeNormalizer for SwiftNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let cleaned = raw.trim().replace('"', "");
        if let Some((lo, hi)) = cleaned.split_once("..<") {
            return Ok(format!(">={}, <{}", lo.trim(), hi.trim()));
        }
        if let Some((lo, hi)) = cleaned.split_once("...") {
            return Ok(format!(">={}, <{}", lo.trim(), hi.trim()));
        }
        Ok(cleaned)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Swift
    }
}

/// `.upToNextMajor(from: "1.2.3")`
pub fn up_to_next_major(version: &str) -> String {
    match VersionTuple::parse(version) {
        Ok(tuple) if tuple.len() == 3 => {
            let mut upper = tuple.clone();
            upper.increment_at(0);
            format!(">={tuple}, <{upper}")
        }
        _ => format!(">={version}"),
    }
}

/// `.upToNextMinor(from: "1.2.3")`
pub fn up_to_next_minor(version: &str) -> String {
    match VersionTuple::parse(version) {
        Ok(tuple) if tuple.len() == 3 => {
            let mut upper = tuple.clone();
            upper.increment_at(1);
            format!(">={tuple}, <{upper}")
        }
        _ => format!(">={version}"),
    }
}

/// Passthrough normalizer for lockfile-only ecosystems (Leiningen, Conan)
pub struct ExactNormalizer {
    ecosystem: Ecosystem,
}

impl ExactNormalizer {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self { ecosystem }
    }
}

impl RangeNormalizer for ExactNormalizer {
    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        Ok(raw.trim().to_string())
    }

    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cran_comparators() {
        assert_eq!(CranNormalizer.normalize(">= 2.10").unwrap(), ">=2.10");
        assert_eq!(
            CranNormalizer.normalize(">= 1.0, < 2.0").unwrap(),
            ">=1.0, <2.0"
        );
        assert_eq!(CranNormalizer.normalize("== 1.4").unwrap(), "1.4");
    }

    #[test]
    fn test_cpan_zero_means_any() {
        assert_eq!(CpanNormalizer.normalize("0").unwrap(), "all");
    }

    #[test]
    fn test_cpan_v_prefix_dropped() {
        assert_eq!(CpanNormalizer.normalize("v5.10.1").unwrap(), "5.10.1");
        assert_eq!(CpanNormalizer.normalize("== v1.2").unwrap(), "1.2");
        assert_eq!(CpanNormalizer.normalize(">= 1.3, < 2.0").unwrap(), ">=1.3, <2.0");
    }

    #[test]
    fn test_golang_strips_v() {
        assert_eq!(GolangNormalizer.normalize("v1.9.1").unwrap(), "1.9.1");
        assert_eq!(GolangNormalizer.normalize("1.9.1").unwrap(), "1.9.1");
        assert_eq!(
            GolangNormalizer.normalize("v0.0.0-20190603091049-60506f45cf65").unwrap(),
            "0.0.0-20190603091049-60506f45cf65"
        );
    }

    #[test]
    fn test_swift_range_operators() {
        assert_eq!(
            SwiftNormalizer.normalize("\"1.2.3\"...\"2.0.0\"").unwrap(),
            ">=1.2.3, <2.0.0"
        );
        assert_eq!(
            SwiftNormalizer.normalize("\"1.2.3\"..<\"2.0.0\"").unwrap(),
            ">=1.2.3, <2.0.0"
        );
        assert_eq!(SwiftNormalizer.normalize("1.2.3").unwrap(), "1.2.3");
    }

    #[test]
    fn test_swift_up_to_next_major() {
        assert_eq!(up_to_next_major("1.2.3"), ">=1.2.3, <2.0.0");
        assert_eq!(up_to_next_major("1.2"), ">=1.2");
    }

    #[test]
    fn test_swift_up_to_next_minor() {
        assert_eq!(up_to_next_minor("1.2.3"), ">=1.2.3, <1.3.0");
        assert_eq!(up_to_next_minor("1.2"), ">=1.2");
    }

    #[test]
    fn test_exact_passthrough() {
        let conan = ExactNormalizer::new(Ecosystem::Conan);
        assert_eq!(conan.normalize("1.12.0").unwrap(), "1.12.0");
        assert_eq!(conan.ecosystem(), Ecosystem::Conan);
    }

    #[test]
    fn test_idempotence_on_canonical_output() {
        for raw in [">= 2.10", "0", "v1.2.3"] {
            let cran_once = CranNormalizer.normalize(raw).unwrap();
            assert_eq!(CranNormalizer.normalize(&cran_once).unwrap(), cran_once);
        }
    }
}
