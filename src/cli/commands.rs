//! Command implementations

use super::Args;
use crate::config::{self, cli::CliConfig, DEFAULT_CONFIG_FILE};
use crate::core::Cruiser;
use crate::error::{CruiseError, ErrorSeverity, Result};
use crate::logger::init_logger;
use crate::models::verdict::CruiseResult;
use crate::output::{create_formatter, create_progress_callback, create_writer, ProgressReporter};
use std::path::Path;
use std::sync::Arc;

/// How a command finished when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to complain about
    Clean,
    /// The cruise found error-severity violations
    Violations,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Clean => 0,
            Outcome::Violations => 1,
        }
    }
}

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Cruise a directory and report on it
    Cruise(Args),
    /// Write a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            Command::Init
        } else {
            Command::Cruise(args)
        }
    }

    /// Execute the command
    pub fn execute(self) -> Result<Outcome> {
        match self {
            Command::Cruise(args) => cruise(args),
            Command::Init => init(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Run the command and turn the outcome into a process exit code
    pub fn run(self) -> i32 {
        match self.execute() {
            Ok(outcome) => outcome.exit_code(),
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                exit_code_for(&err)
            }
        }
    }
}

/// Exit code for a failed command
pub fn exit_code_for(err: &CruiseError) -> i32 {
    match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

fn cruise(args: Args) -> Result<Outcome> {
    init_logger(args.verbose, args.quiet, args.no_colors);

    let cli_config = CliConfig::from_args(&args);
    let settings = config::load_config(cli_config.into_args())?;
    let rules = config::load_optional_rule_set(settings.rules_file.as_deref())?;
    tracing::debug!(
        base_dir = %settings.base_dir.display(),
        forbidden = rules.forbidden.len(),
        allowed = rules.allowed.len(),
        "configuration loaded"
    );

    let cruiser = Cruiser::new(settings, rules);
    let settings = cruiser.settings();

    let reporter = Arc::new(ProgressReporter::new(
        settings.show_progress && !settings.quiet,
        settings.verbose,
    ));
    reporter.start(0, &format!("Cruising {}", settings.base_dir.display()));
    let result = cruiser.cruise_with_progress(create_progress_callback(reporter.clone()));
    reporter.finish("cruise complete");
    let result = result?;

    write_report(&result, &cruiser)?;

    if result.summary.has_errors() {
        Ok(Outcome::Violations)
    } else {
        Ok(Outcome::Clean)
    }
}

fn write_report(result: &CruiseResult, cruiser: &Cruiser) -> Result<()> {
    let settings = cruiser.settings();
    let formatter = create_formatter(settings.output_format, settings.use_colors, settings.verbose, settings.quiet);
    let writer = create_writer(settings.output_file.as_ref());

    writer.write(&formatter.format(result)?)?;

    if settings.output_file.is_some() && !settings.quiet {
        eprintln!("Report written to {}", writer.destination());
    }
    Ok(())
}

/// Write the default configuration template unless the file already exists
pub fn init(config_path: &Path) -> Result<Outcome> {
    if config_path.exists() {
        println!("Configuration file already exists at: {}", config_path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(Outcome::Clean);
    }

    config::create_default_config(config_path)?;

    println!("Created default configuration file at: {}", config_path.display());
    println!("\nEdit it to set the directory to cruise, the rule set, excludes and output.");
    Ok(Outcome::Clean)
}
