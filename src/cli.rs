//! CLI argument parsing module for depscan

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::domain::Ecosystem;

/// Parse an ecosystem label from the command line
fn parse_ecosystem(s: &str) -> Result<Ecosystem, String> {
    Ecosystem::from_label(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown ecosystem: {}", s))
}

/// Multi-ecosystem dependency scanner
#[derive(Parser, Debug, Clone)]
#[command(name = "depscan", version, about = "Multi-ecosystem dependency scanner")]
pub struct CliArgs {
    /// Target directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Skip development dependencies where the format marks them
    #[arg(long)]
    pub skip_dev: bool,

    // Ecosystem filter
    /// Scan only the given ecosystems (can be specified multiple times)
    #[arg(long, value_parser = parse_ecosystem, action = ArgAction::Append)]
    pub ecosystem: Vec<Ecosystem>,

    // One-shot normalization
    /// Normalize one range and exit: --normalize <ECOSYSTEM> <RANGE>
    #[arg(long, num_args = 2, value_names = ["ECOSYSTEM", "RANGE"])]
    pub normalize: Option<Vec<String>>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Check if any ecosystem filter is specified
    pub fn has_ecosystem_filter(&self) -> bool {
        !self.ecosystem.is_empty()
    }

    /// Check if records from an ecosystem should be kept
    pub fn should_process_ecosystem(&self, ecosystem: Ecosystem) -> bool {
        if self.ecosystem.is_empty() {
            return true;
        }
        self.ecosystem
            .iter()
            .any(|e| e.label() == ecosystem.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["depscan"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.skip_dev);
        assert!(args.ecosystem.is_empty());
        assert!(args.normalize.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["depscan", "/some/path"]);
        assert_eq!(args.path, PathBuf::from("/some/path"));
    }

    #[test]
    fn test_skip_dev_flag() {
        let args = CliArgs::parse_from(["depscan", "--skip-dev"]);
        assert!(args.skip_dev);
    }

    #[test]
    fn test_ecosystem_filter_multiple() {
        let args = CliArgs::parse_from(["depscan", "--ecosystem", "npm", "--ecosystem", "cargo"]);
        assert_eq!(args.ecosystem, vec![Ecosystem::Npm, Ecosystem::Cargo]);
        assert!(args.has_ecosystem_filter());
    }

    #[test]
    fn test_ecosystem_filter_rejects_unknown() {
        assert!(CliArgs::try_parse_from(["depscan", "--ecosystem", "brew"]).is_err());
    }

    #[test]
    fn test_should_process_ecosystem() {
        let args = CliArgs::parse_from(["depscan"]);
        assert!(args.should_process_ecosystem(Ecosystem::Npm));

        let args = CliArgs::parse_from(["depscan", "--ecosystem", "npm"]);
        assert!(args.should_process_ecosystem(Ecosystem::Npm));
        assert!(!args.should_process_ecosystem(Ecosystem::Cargo));
    }

    #[test]
    fn test_ecosystem_filter_shares_maven_label() {
        // gradle records carry the maven label, the filter follows it
        let args = CliArgs::parse_from(["depscan", "--ecosystem", "maven"]);
        assert!(args.should_process_ecosystem(Ecosystem::Gradle));
    }

    #[test]
    fn test_normalize_takes_two_values() {
        let args = CliArgs::parse_from(["depscan", "--normalize", "npm", "^1.2.3"]);
        let pair = args.normalize.unwrap();
        assert_eq!(pair, vec!["npm", "^1.2.3"]);
    }

    #[test]
    fn test_json_output() {
        let args = CliArgs::parse_from(["depscan", "--json"]);
        assert!(args.json);
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["depscan", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["depscan", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "depscan",
            "/path/to/project",
            "--skip-dev",
            "--ecosystem",
            "pypi",
            "--json",
            "--verbose",
        ]);
        assert_eq!(args.path, PathBuf::from("/path/to/project"));
        assert!(args.skip_dev);
        assert_eq!(args.ecosystem, vec![Ecosystem::Pypi]);
        assert!(args.json);
        assert!(args.verbose);
    }
}
