//! Validation verdicts and the cruise result

use super::dependency::ModuleSystem;
use super::module_graph::Module;
use super::rules::Severity;
use crate::error::{CruiseError, ErrorSeverity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A rule a module or dependency ran afoul of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub name: String,
    pub severity: Severity,
}

impl RuleViolation {
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
        }
    }
}

/// Outcome of validating one module or one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub rules: Vec<RuleViolation>,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            valid: true,
            rules: Vec::new(),
        }
    }

    /// Build a verdict from matched rules in match order. The sort is stable,
    /// so within one severity the match order survives.
    pub fn from_violations(mut rules: Vec<RuleViolation>) -> Self {
        rules.sort_by_key(|rule| rule.severity);
        Self {
            valid: rules.is_empty(),
            rules,
        }
    }
}

/// One entry of the summary's violation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub from: String,
    pub to: String,
    pub rule: RuleViolation,
}

/// Options the cruise ran with, echoed into the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsUsed {
    pub base_dir: PathBuf,
    pub module_systems: Vec<ModuleSystem>,
    pub ts_pre_compilation_deps: bool,
    pub exotic_require_strings: Vec<String>,
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_follow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_only: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
    pub validate: bool,
}

/// Totals over a cruise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub violations: Vec<Violation>,
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub ignore: usize,
    pub total_cruised: usize,
    pub total_dependencies_cruised: usize,
    pub options_used: OptionsUsed,
}

impl Summary {
    /// Collect violations and counts from validated modules
    pub fn from_modules(modules: &[Module], options_used: OptionsUsed) -> Self {
        let mut summary = Summary {
            total_cruised: modules.len(),
            total_dependencies_cruised: modules.iter().map(|m| m.dependencies.len()).sum(),
            options_used,
            ..Default::default()
        };

        for module in modules {
            for rule in &module.rules {
                summary.record(&module.source, &module.source, rule);
            }
            for dependency in &module.dependencies {
                for rule in &dependency.rules {
                    summary.record(&dependency.from, &dependency.resolved, rule);
                }
            }
        }

        summary
    }

    fn record(&mut self, from: &str, to: &str, rule: &RuleViolation) {
        match rule.severity {
            Severity::Error => self.error += 1,
            Severity::Warn => self.warn += 1,
            Severity::Info => self.info += 1,
            Severity::Ignore => {
                self.ignore += 1;
                return;
            }
        }
        self.violations.push(Violation {
            from: from.to_string(),
            to: to.to_string(),
            rule: rule.clone(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.error > 0
    }
}

/// A file the cruise could not fully process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CruiseIssue {
    pub path: PathBuf,
    pub message: String,
    pub severity: IssueSeverity,
}

impl CruiseIssue {
    pub fn from_error(path: impl Into<PathBuf>, error: &CruiseError) -> Self {
        Self {
            path: path.into(),
            message: error.user_message(),
            severity: IssueSeverity::from(error.severity()),
        }
    }

    pub fn warning(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

/// Serializable mirror of `ErrorSeverity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Warning,
    Error,
    Critical,
}

impl From<ErrorSeverity> for IssueSeverity {
    fn from(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Warning => IssueSeverity::Warning,
            ErrorSeverity::Error => IssueSeverity::Error,
            ErrorSeverity::Critical => IssueSeverity::Critical,
        }
    }
}

/// Everything a cruise produces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CruiseResult {
    pub modules: Vec<Module>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<CruiseIssue>,
    pub cruised_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip)]
    pub duration: Duration,
}

impl CruiseResult {
    pub fn new(modules: Vec<Module>, options_used: OptionsUsed) -> Self {
        let summary = Summary::from_modules(&modules, options_used);
        Self {
            modules,
            summary,
            issues: Vec::new(),
            cruised_at: chrono::Utc::now(),
            duration: Duration::ZERO,
        }
    }

    /// Modules that broke at least one rule (ignore-level included)
    pub fn invalid_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| !m.valid)
    }
}
