//! depscan - Multi-ecosystem dependency scanner CLI tool
//!
//! This tool walks a source tree, parses every manifest and lockfile it
//! recognizes, and reports the declared dependencies with their version
//! ranges normalized into one canonical grammar.

use clap::Parser;
use depscan::cli::CliArgs;
use depscan::domain::Ecosystem;
use depscan::normalize;
use depscan::output::{create_formatter, OutputConfig};
use depscan::progress::ScanProgress;
use depscan::scanner::Scanner;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "depscan=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // One-shot normalization mode
    if let Some(pair) = &args.normalize {
        let ecosystem = Ecosystem::from_label(&pair[0].to_ascii_lowercase())
            .ok_or_else(|| anyhow::anyhow!("unknown ecosystem: {}", pair[0]))?;
        let canonical = normalize::normalizer_for(ecosystem)
            .normalize(&pair[1])
            .map_err(|e| anyhow::anyhow!("cannot normalize {:?}: {}", pair[1], e))?;
        println!("{}", canonical);
        return Ok(ExitCode::SUCCESS);
    }

    if args.verbose {
        eprintln!("depscan v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    // progress goes to stderr, so it stays out of piped output
    let progress = ScanProgress::new(!args.quiet && !args.json);

    let scanner = Scanner::new(args.skip_dev).with_ecosystems(args.ecosystem.clone());
    let report = scanner.run_with_progress(&args.path, &progress).await;
    progress.finish();

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        // partial success, some files could not be parsed
        Ok(ExitCode::from(2))
    }
}
