//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};
use crate::models::dependency::ModuleSystem;

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments relevant to settings
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub do_not_follow: Option<String>,
    pub include_only: Option<String>,
    pub module_systems: Option<Vec<String>>,
    pub no_ts_pre_compilation_deps: bool,
    pub exotic_require_strings: Option<Vec<String>>,
    pub no_validate: bool,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_parallel: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed Args
    pub fn from_args(args: &Args) -> Self {
        let cli_args = CliArgs {
            path: args.path.clone(),
            rules: args.rules.clone(),
            exclude: non_empty(&args.exclude),
            max_depth: args.max_depth,
            do_not_follow: args.do_not_follow.clone(),
            include_only: args.include_only.clone(),
            module_systems: non_empty(&args.module_systems),
            no_ts_pre_compilation_deps: args.no_ts_pre_compilation_deps,
            exotic_require_strings: non_empty(&args.exotic_require_strings),
            no_validate: args.no_validate,
            output_format: args.output.map(|format| match format {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
                CliOutputFormat::Csv => OutputFormat::Csv,
            }),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_parallel: args.no_parallel,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        };

        Self::new(cli_args)
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }

    pub fn into_args(self) -> CliArgs {
        self.args
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let flag = |set: bool, value: bool| if set { Some(value) } else { None };

        let module_systems = args
            .module_systems
            .as_ref()
            .map(|names| names.iter().map(|name| name.parse::<ModuleSystem>()).collect::<Result<Vec<_>>>())
            .transpose()?;

        Ok(PartialSettings {
            extends: None,
            base_dir: args.path.clone(),
            exclude_patterns: args.exclude.clone(),
            max_depth: args.max_depth,
            do_not_follow: args.do_not_follow.clone(),
            include_only: args.include_only.clone(),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            parallel: flag(args.no_parallel, false),
            quiet: flag(args.quiet, true),
            verbose: flag(args.verbose, true),
            use_colors: flag(args.no_colors, false),
            show_progress: flag(args.no_progress, false),
            module_systems,
            ts_pre_compilation_deps: flag(args.no_ts_pre_compilation_deps, false),
            exotic_require_strings: args.exotic_require_strings.clone(),
            rules_file: args.rules.clone(),
            validate: flag(args.no_validate, false),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
