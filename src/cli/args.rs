//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// cruiser - validate and report on JavaScript/TypeScript module dependencies
#[derive(Parser, Debug, Default)]
#[command(name = "cruiser")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cruise JavaScript/TypeScript module dependencies and validate them against rules")]
#[command(long_about = "cruiser parses every JavaScript and TypeScript source under a directory, \
builds the graph of module dependencies (ES modules, CommonJS, AMD and TypeScript type-only imports), \
and validates modules and dependencies against a rule set of forbidden and allowed patterns.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Cruise the current directory
    cruiser

    # Cruise a specific directory and validate against a rule set
    cruiser --path ./my-project --rules .cruiser-rules.json

    # Exclude directories (can specify multiple patterns)
    cruiser --exclude node_modules --exclude '**/*.spec.ts'

    # Only cruise src, and treat vendored code as a black box
    cruiser --include-only '^src/' --do-not-follow '^src/vendor/'

Extraction:
    # Only look at ES modules and CommonJS
    cruiser --module-systems es6,cjs

    # Drop type-only imports
    cruiser --no-ts-pre-compilation-deps

    # Treat other functions as require
    cruiser --exotic-require want --exotic-require window.require

Output Options:
    # Full report as JSON
    cruiser --output json --output-file report.json

    # One CSV row per violation
    cruiser --output csv

Configuration:
    # Use a specific configuration file
    cruiser --config ./cruiser.toml

    # Create a default configuration file
    cruiser --init
")]
pub struct Args {
    /// Directory to cruise
    #[arg(short, long, value_name = "PATH", help = "Directory to cruise (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Rule set to validate against
    #[arg(short, long, value_name = "FILE", help = "Rule set file to validate against (.json, otherwise TOML)")]
    pub rules: Option<PathBuf>,

    /// Exclude paths matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns or directory names to exclude (can be specified multiple times)")]
    pub exclude: Vec<String>,

    /// Maximum depth for directory traversal
    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth to traverse (files directly in the base directory are at depth 1)")]
    pub max_depth: Option<usize>,

    /// Modules not to follow
    #[arg(long, value_name = "REGEX", help = "Regex over module ids; matching modules are not parsed and only appear as unfollowed leaves")]
    pub do_not_follow: Option<String>,

    /// Modules to include
    #[arg(long, value_name = "REGEX", help = "Regex over module ids; only matching modules and the dependencies between them are cruised")]
    pub include_only: Option<String>,

    /// Module systems to extract
    #[arg(long, value_name = "SYSTEMS", value_delimiter = ',', help = "Module systems to extract, comma separated: es6, cjs, amd, tsType")]
    pub module_systems: Vec<String>,

    /// Leave out type-only dependencies
    #[arg(long, help = "Leave out dependencies that only exist before TypeScript compilation")]
    pub no_ts_pre_compilation_deps: bool,

    /// Functions that behave like require
    #[arg(long = "exotic-require", value_name = "NAME", help = "Function name that behaves like require (can be specified multiple times)")]
    pub exotic_require_strings: Vec<String>,

    /// Skip rule validation
    #[arg(long, help = "Report the dependency graph without validating it")]
    pub no_validate: bool,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, help = "Output format: 'text' for humans, 'json' for the full report, 'csv' for one row per violation")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Suppress non-essential output (only show results)")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show detailed progress and debug logging")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .cruiser.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Disable parallel processing
    #[arg(long, help = "Disable parallel processing")]
    pub no_parallel: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments)")]
    pub no_progress: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.cruiser.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per violation
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "cruiser",
            "--path",
            "./project",
            "--rules",
            "rules.json",
            "--module-systems",
            "es6,cjs",
            "--exotic-require",
            "want",
            "--exotic-require",
            "window.require",
            "--no-ts-pre-compilation-deps",
            "-o",
            "json",
            "-e",
            "node_modules",
        ])
        .unwrap();

        assert_eq!(args.path, Some(PathBuf::from("./project")));
        assert_eq!(args.rules, Some(PathBuf::from("rules.json")));
        assert_eq!(args.module_systems, vec!["es6", "cjs"]);
        assert_eq!(args.exotic_require_strings, vec!["want", "window.require"]);
        assert!(args.no_ts_pre_compilation_deps);
        assert_eq!(args.output, Some(OutputFormat::Json));
        assert_eq!(args.exclude, vec!["node_modules"]);
    }

    #[test]
    fn test_defaults_leave_settings_to_config() {
        let args = Args::try_parse_from(["cruiser"]).unwrap();
        assert!(args.output.is_none());
        assert!(args.module_systems.is_empty());
        assert!(!args.init);
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        assert!(Args::try_parse_from(["cruiser", "--output", "xml"]).is_err());
    }
}
