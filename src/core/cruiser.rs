//! The cruise pipeline
//!
//! Discovery walks the base directory for source files, extraction parses
//! each one in parallel, and the graph builder is the barrier after which
//! analysis and validation only ever see a closed graph.

use super::analyzer::analyze;
use super::graph_builder::build_graph;
use super::parallel::{map_items_with_progress, ProgressUpdate};
use super::validator::validate_graph;
use crate::error::{handle_error, CruiseError, Result};
use crate::models::config::Settings;
use crate::models::dependency::RawDependency;
use crate::models::rules::RuleSet;
use crate::models::verdict::{CruiseIssue, CruiseResult, OptionsUsed};
use crate::parsers::extractors::ExtractOptions;
use crate::parsers::source_parser::{is_source_file, SourceParser};
use crate::utils::path_resolver::PathResolver;
use glob::Pattern;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

/// Runs a cruise over one base directory with one rule set
pub struct Cruiser {
    settings: Settings,
    rules: RuleSet,
}

impl Cruiser {
    pub fn new(settings: Settings, rules: RuleSet) -> Self {
        Self { settings, rules }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Cruise the configured directory
    pub fn cruise(&self) -> Result<CruiseResult> {
        self.cruise_with_progress(|_| {})
    }

    /// Cruise the configured directory, reporting extraction progress
    pub fn cruise_with_progress<P>(&self, progress: P) -> Result<CruiseResult>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let start_time = Instant::now();

        let base_dir = fs::canonicalize(&self.settings.base_dir)
            .map_err(|_| CruiseError::invalid_path(&self.settings.base_dir))?;
        if !base_dir.is_dir() {
            return Err(CruiseError::invalid_path(&self.settings.base_dir));
        }

        let parser = SourceParser::new(
            self.settings.effective_module_systems(),
            ExtractOptions::with_exotic_require_strings(self.settings.exotic_require_strings.clone()),
        )?;
        let resolver = PathResolver::new(&base_dir);
        let excludes = compile_exclude_patterns(&self.settings.exclude_patterns)?;

        let do_not_follow = compile_module_filter("do_not_follow", self.settings.do_not_follow.as_deref())?;
        let include_only = compile_module_filter("include_only", self.settings.include_only.as_deref())?;

        let mut issues = Vec::new();
        let files: Vec<PathBuf> = discover_files(&base_dir, &excludes, self.settings.max_depth, &mut issues)
            .into_iter()
            .filter(|path| {
                let id = resolver.module_id(path);
                include_only.as_ref().map_or(true, |include| include.is_match(&id))
                    && !do_not_follow.as_ref().is_some_and(|skip| skip.is_match(&id))
            })
            .collect();
        tracing::info!(files = files.len(), base_dir = %base_dir.display(), "discovered source files");

        let extractions = map_items_with_progress(
            &files,
            self.settings.parallel,
            |path| (path.clone(), parser.extract_file(path)),
            progress,
        );

        let mut per_file: BTreeMap<String, Vec<RawDependency>> = BTreeMap::new();
        for (path, extraction) in extractions {
            match extraction {
                Ok(extraction) => {
                    if extraction.panicked {
                        issues.push(CruiseIssue::warning(&path, "file could not be parsed"));
                    } else if !extraction.parse_errors.is_empty() {
                        issues.push(CruiseIssue::warning(
                            &path,
                            format!("{} parse error(s); dependencies may be incomplete", extraction.parse_errors.len()),
                        ));
                    }
                    per_file.insert(resolver.module_id(&path), extraction.dependencies);
                }
                Err(err) => {
                    let issue = CruiseIssue::from_error(&path, &err);
                    if let Some(critical) = handle_error(err) {
                        return Err(critical);
                    }
                    issues.push(issue);
                }
            }
        }

        let mut graph = build_graph(&per_file, &resolver, include_only.as_ref());
        analyze(&mut graph, &self.rules, self.settings.parallel);
        validate_graph(&mut graph, &self.rules, self.settings.validate, self.settings.parallel);

        let mut result = CruiseResult::new(graph.into_modules(), self.options_used(base_dir));
        result.issues = issues;
        result.duration = start_time.elapsed();

        tracing::info!(
            modules = result.summary.total_cruised,
            dependencies = result.summary.total_dependencies_cruised,
            errors = result.summary.error,
            warnings = result.summary.warn,
            elapsed_ms = result.duration.as_millis() as u64,
            "cruise finished"
        );

        Ok(result)
    }

    fn options_used(&self, base_dir: PathBuf) -> OptionsUsed {
        OptionsUsed {
            base_dir,
            module_systems: self.settings.effective_module_systems(),
            ts_pre_compilation_deps: self.settings.ts_pre_compilation_deps,
            exotic_require_strings: self.settings.exotic_require_strings.clone(),
            exclude: self.settings.exclude_patterns.clone(),
            max_depth: self.settings.max_depth,
            do_not_follow: self.settings.do_not_follow.clone(),
            include_only: self.settings.include_only.clone(),
            rules_file: self.settings.rules_file.clone(),
            validate: self.settings.validate,
        }
    }
}

/// Compile exclude patterns into glob patterns
pub fn compile_exclude_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| Pattern::new(pattern).map_err(CruiseError::from))
        .collect()
}

/// Compile an optional regex over module ids
pub fn compile_module_filter(field: &str, pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|pattern| {
            Regex::new(pattern)
                .map_err(|e| CruiseError::config_error(format!("Invalid {} regex '{}': {}", field, pattern, e)))
        })
        .transpose()
}

/// An entry is excluded when a pattern matches its file name or its path
/// relative to the base directory
pub fn is_excluded(relative: &Path, patterns: &[Pattern]) -> bool {
    let file_name = relative.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    let relative = relative.to_string_lossy().replace('\\', "/");

    patterns
        .iter()
        .any(|pattern| pattern.matches(&file_name) || pattern.matches(&relative))
}

/// Source files under `base_dir`, sorted. Unreadable entries become issues.
/// With `max_depth`, files directly in `base_dir` are at depth 1.
fn discover_files(
    base_dir: &Path,
    excludes: &[Pattern],
    max_depth: Option<usize>,
    issues: &mut Vec<CruiseIssue>,
) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(base_dir).sort_by_file_name();
    if let Some(max_depth) = max_depth {
        walker = walker.max_depth(max_depth);
    }

    let keep = |entry: &DirEntry| {
        entry.depth() == 0
            || entry
                .path()
                .strip_prefix(base_dir)
                .map_or(true, |relative| !is_excluded(relative, excludes))
    };

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(keep) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_source_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| base_dir.to_path_buf());
                let error = match err.io_error().map(|io| io.kind()) {
                    Some(std::io::ErrorKind::PermissionDenied) => CruiseError::permission_denied(&path),
                    _ => CruiseError::directory_traversal_error(&path, err.to_string()),
                };
                tracing::warn!(path = %path.display(), error = %error, "could not read entry");
                issues.push(CruiseIssue::from_error(path, &error));
            }
        }
    }

    files
}
