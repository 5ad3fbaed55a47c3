//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with manifest/lockfile parsing
//! - NormalizeError: Issues with version-range normalization
//!
//! NormalizeError never aborts a scan: the normalization entry point
//! downgrades a failed range to an unconstrained record and logs it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to manifest and lockfile parsing
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error (package.json, composer.json, package-lock.json, ...)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// TOML parsing error (Cargo.toml, pyproject.toml, Pipfile)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// YAML parsing error (pubspec.yaml, environment.yml, pnpm-lock.yaml)
    #[error("failed to parse YAML in {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// XML parsing error (pom.xml, *.nuspec, *.csproj, packages.config)
    #[error("failed to parse XML in {path}: {message}")]
    XmlParseError { path: PathBuf, message: String },

    /// Line-oriented format error (go.mod, Gemfile, cpanfile, *.cabal, ...)
    #[error("failed to parse {path}: {message}")]
    SyntaxError { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::XmlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new SyntaxError
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::SyntaxError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while normalizing a single version range
///
/// These never cross the per-dependency boundary: the record is kept with an
/// empty (unconstrained) version instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A range token does not match any recognized grammar for its ecosystem
    #[error("malformed version token: '{token}'")]
    MalformedVersionToken { token: String },

    /// Arithmetic was requested on a component that is not a base-10 integer
    #[error("non-numeric version component: '{component}'")]
    NonNumericComponent { component: String },
}

impl NormalizeError {
    /// Creates a new MalformedVersionToken error
    pub fn malformed(token: impl Into<String>) -> Self {
        NormalizeError::MalformedVersionToken {
            token: token.into(),
        }
    }

    /// Creates a new NonNumericComponent error
    pub fn non_numeric(component: impl Into<String>) -> Self {
        NormalizeError::NonNumericComponent {
            component: component.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_read() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ManifestError::read_error("/path/to/Gemfile", io);
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read manifest file"));
        assert!(msg.contains("Gemfile"));
    }

    #[test]
    fn test_manifest_error_json_parse() {
        let err = ManifestError::json_parse_error("/path/to/package.json", "unexpected token");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_manifest_error_toml_parse() {
        let err = ManifestError::toml_parse_error("/path/to/Cargo.toml", "invalid key");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse TOML"));
        assert!(msg.contains("invalid key"));
    }

    #[test]
    fn test_manifest_error_yaml_parse() {
        let err = ManifestError::yaml_parse_error("/path/to/pubspec.yaml", "bad indent");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse YAML"));
        assert!(msg.contains("pubspec.yaml"));
    }

    #[test]
    fn test_manifest_error_xml_parse() {
        let err = ManifestError::xml_parse_error("/path/to/pom.xml", "unclosed tag");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse XML"));
        assert!(msg.contains("unclosed tag"));
    }

    #[test]
    fn test_normalize_error_malformed() {
        let err = NormalizeError::malformed("(1.0)");
        let msg = format!("{}", err);
        assert!(msg.contains("malformed version token"));
        assert!(msg.contains("(1.0)"));
    }

    #[test]
    fn test_normalize_error_non_numeric() {
        let err = NormalizeError::non_numeric("beta");
        let msg = format!("{}", err);
        assert!(msg.contains("non-numeric version component"));
        assert!(msg.contains("beta"));
    }

    #[test]
    fn test_normalize_error_is_comparable() {
        assert_eq!(
            NormalizeError::malformed("x"),
            NormalizeError::malformed("x")
        );
        assert_ne!(
            NormalizeError::malformed("x"),
            NormalizeError::non_numeric("x")
        );
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::syntax_error("/test", "dangling entry");
        let debug = format!("{:?}", err);
        assert!(debug.contains("SyntaxError"));
    }
}
