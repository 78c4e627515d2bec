//! Configuration-related data structures

use super::dependency::ModuleSystem;
use crate::error::CruiseError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for a cruise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory to cruise; module ids are relative to it
    pub base_dir: PathBuf,

    /// Glob patterns (or plain directory names) to leave out of discovery
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to traverse
    pub max_depth: Option<usize>,

    /// Regex over module ids; matching files are not extracted and only
    /// show up as unfollowed leaves when something depends on them
    pub do_not_follow: Option<String>,

    /// Regex over module ids; only matching modules and edges are cruised
    pub include_only: Option<String>,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to use parallel processing
    pub parallel: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,

    /// Dialects to extract dependencies for
    pub module_systems: Vec<ModuleSystem>,

    /// Whether to keep dependencies that only exist before TypeScript compilation
    pub ts_pre_compilation_deps: bool,

    /// Function names that behave like `require` (`want`, `window.require`)
    pub exotic_require_strings: Vec<String>,

    /// Rule set to validate against
    pub rules_file: Option<PathBuf>,

    /// Whether to validate against the rule set at all
    pub validate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            exclude_patterns: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "dist".to_string(),
                "build".to_string(),
                "coverage".to_string(),
            ],
            max_depth: None,
            do_not_follow: None,
            include_only: None,
            output_format: OutputFormat::Text,
            output_file: None,
            parallel: true,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
            module_systems: vec![
                ModuleSystem::Es6,
                ModuleSystem::Cjs,
                ModuleSystem::Amd,
                ModuleSystem::TsType,
            ],
            ts_pre_compilation_deps: true,
            exotic_require_strings: Vec::new(),
            rules_file: None,
            validate: true,
        }
    }
}

impl Settings {
    /// Module systems the extractors will actually run for
    pub fn effective_module_systems(&self) -> Vec<ModuleSystem> {
        let mut systems: Vec<ModuleSystem> = self
            .module_systems
            .iter()
            .copied()
            .filter(|system| self.ts_pre_compilation_deps || *system != ModuleSystem::TsType)
            .collect();

        if !self.exotic_require_strings.is_empty() && !systems.contains(&ModuleSystem::ExoticRequire) {
            systems.push(ModuleSystem::ExoticRequire);
        }
        systems.dedup();
        systems
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per violation
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = CruiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(CruiseError::invalid_output_format(s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    /// Configuration file this one is layered on; only read from files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<PathBuf>,
    pub base_dir: Option<PathBuf>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub do_not_follow: Option<String>,
    pub include_only: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub parallel: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
    pub module_systems: Option<Vec<ModuleSystem>>,
    pub ts_pre_compilation_deps: Option<bool>,
    pub exotic_require_strings: Option<Vec<String>>,
    pub rules_file: Option<PathBuf>,
    pub validate: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        take!(
            base_dir,
            exclude_patterns,
            max_depth,
            do_not_follow,
            include_only,
            output_format,
            output_file,
            parallel,
            quiet,
            verbose,
            use_colors,
            show_progress,
            module_systems,
            ts_pre_compilation_deps,
            exotic_require_strings,
            rules_file,
            validate,
        );
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(base_dir) = &self.base_dir {
            settings.base_dir = base_dir.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(do_not_follow) = &self.do_not_follow {
            settings.do_not_follow = Some(do_not_follow.clone());
        }
        if let Some(include_only) = &self.include_only {
            settings.include_only = Some(include_only.clone());
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }
        if let Some(module_systems) = &self.module_systems {
            settings.module_systems = module_systems.clone();
        }
        if let Some(ts_pre_compilation_deps) = self.ts_pre_compilation_deps {
            settings.ts_pre_compilation_deps = ts_pre_compilation_deps;
        }
        if let Some(exotic_require_strings) = &self.exotic_require_strings {
            settings.exotic_require_strings = exotic_require_strings.clone();
        }
        if let Some(rules_file) = &self.rules_file {
            settings.rules_file = Some(rules_file.clone());
        }
        if let Some(validate) = self.validate {
            settings.validate = validate;
        }

        settings
    }
}
