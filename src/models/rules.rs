//! Rule set data structures
//!
//! Rules come in two shapes: the serde-facing configuration (`RuleConfig`,
//! `RuleSetConfig`), which mirrors what users write in their rule files, and
//! the compiled form (`Rule`, `RuleSet`) with regexes built and each rule
//! classified as module-only or edge-level exactly once.

use super::dependency::DependencyType;
use crate::error::{CruiseError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Name used for rules that don't declare one
pub const UNNAMED_RULE: &str = "unnamed";

/// Name of the synthetic violation for dependencies outside the allowed list
pub const NOT_IN_ALLOWED: &str = "not-in-allowed";

/// How bad a rule violation is. Ordered most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warn,
    Info,
    Ignore,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
            Severity::Ignore => write!(f, "ignore"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warn" => Ok(Severity::Warn),
            "info" => Ok(Severity::Info),
            "ignore" => Ok(Severity::Ignore),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

/// A path regex, written either as one string or as a list of alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathPattern {
    One(String),
    Any(Vec<String>),
}

impl PathPattern {
    fn as_regex_source(&self) -> String {
        match self {
            PathPattern::One(pattern) => pattern.clone(),
            PathPattern::Any(patterns) => patterns.join("|"),
        }
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        PathPattern::One(pattern.to_string())
    }
}

/// Predicates on the "from" side of a rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FromMatcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_not: Option<PathPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphan: Option<bool>,
}

/// Predicates on the "to" side of a rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToMatcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_not: Option<PathPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_types: Option<Vec<DependencyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_types_not: Option<Vec<DependencyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circular: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub could_not_resolve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_module: Option<bool>,
}

impl ToMatcher {
    /// Whether any predicate that only makes sense on a single edge is set
    fn has_edge_predicates(&self) -> bool {
        self.dependency_types.is_some()
            || self.dependency_types_not.is_some()
            || self.dynamic.is_some()
            || self.circular.is_some()
            || self.could_not_resolve.is_some()
            || self.core_module.is_some()
    }
}

/// A rule as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default = "default_rule_name")]
    pub name: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub from: FromMatcher,
    #[serde(default)]
    pub to: ToMatcher,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_rule_name() -> String {
    UNNAMED_RULE.to_string()
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            name: default_rule_name(),
            severity: Severity::default(),
            from: FromMatcher::default(),
            to: ToMatcher::default(),
            comment: None,
        }
    }
}

/// A rule set as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub forbidden: Vec<RuleConfig>,
    #[serde(default)]
    pub allowed: Vec<RuleConfig>,
    #[serde(default)]
    pub allowed_severity: Severity,
}

impl RuleSetConfig {
    /// Compile regexes and classify every rule
    pub fn compile(&self) -> Result<RuleSet> {
        RuleSet::compile(self)
    }
}

/// Compiled `path` / `pathNot` pair
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    path: Option<Regex>,
    path_not: Option<Regex>,
}

impl PathFilter {
    fn compile(
        rule: &str,
        side: &str,
        path: Option<&PathPattern>,
        path_not: Option<&PathPattern>,
    ) -> Result<Self> {
        let build = |pattern: Option<&PathPattern>, field: &str| -> Result<Option<Regex>> {
            pattern
                .map(|p| {
                    Regex::new(&p.as_regex_source()).map_err(|e| {
                        CruiseError::malformed_rule(rule, format!("{}.{} is not a valid regex: {}", side, field, e))
                    })
                })
                .transpose()
        };

        Ok(Self {
            path: build(path, "path")?,
            path_not: build(path_not, "pathNot")?,
        })
    }

    /// `path` matches (or is absent)
    pub fn matches_path(&self, source: &str) -> bool {
        self.path.as_ref().map_or(true, |re| re.is_match(source))
    }

    /// `pathNot` does not match (or is absent)
    pub fn matches_path_not(&self, source: &str) -> bool {
        self.path_not.as_ref().map_or(true, |re| !re.is_match(source))
    }

    /// Both filters are satisfied
    pub fn matches(&self, source: &str) -> bool {
        self.matches_path(source) && self.matches_path_not(source)
    }
}

/// Compiled "from" side
#[derive(Debug, Clone, Default)]
pub struct FromPredicates {
    pub paths: PathFilter,
    pub orphan: Option<bool>,
}

/// Compiled "to" side
#[derive(Debug, Clone, Default)]
pub struct ToPredicates {
    pub paths: PathFilter,
    pub reachable: Option<bool>,
    pub dependency_types: Option<BTreeSet<DependencyType>>,
    pub dependency_types_not: Option<BTreeSet<DependencyType>>,
    pub dynamic: Option<bool>,
    pub circular: Option<bool>,
    pub could_not_resolve: Option<bool>,
    pub core_module: Option<bool>,
}

/// What a rule can be evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Needs whole-graph facts (orphan, reachable): checked per module
    Module,
    /// Checked per dependency edge
    Dependency,
}

/// A validated, compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub severity: Severity,
    pub comment: Option<String>,
    pub from: FromPredicates,
    pub to: ToPredicates,
    scope: RuleScope,
}

impl Rule {
    /// Validate and compile one configured rule
    pub fn compile(config: &RuleConfig) -> Result<Self> {
        let name = config.name.as_str();

        if config.from.orphan.is_some() && config.to.has_edge_predicates() {
            return Err(CruiseError::malformed_rule(
                name,
                "from.orphan cannot be combined with dependency predicates in 'to'",
            ));
        }
        if config.to.reachable.is_some() && config.to.has_edge_predicates() {
            return Err(CruiseError::malformed_rule(
                name,
                "to.reachable cannot be combined with dependency predicates in 'to'",
            ));
        }

        let scope = if config.from.orphan.is_some() || config.to.reachable.is_some() {
            RuleScope::Module
        } else {
            RuleScope::Dependency
        };

        let to_set = |types: &Option<Vec<DependencyType>>| {
            types.as_ref().map(|t| t.iter().copied().collect::<BTreeSet<_>>())
        };

        Ok(Self {
            name: config.name.clone(),
            severity: config.severity,
            comment: config.comment.clone(),
            from: FromPredicates {
                paths: PathFilter::compile(name, "from", config.from.path.as_ref(), config.from.path_not.as_ref())?,
                orphan: config.from.orphan,
            },
            to: ToPredicates {
                paths: PathFilter::compile(name, "to", config.to.path.as_ref(), config.to.path_not.as_ref())?,
                reachable: config.to.reachable,
                dependency_types: to_set(&config.to.dependency_types),
                dependency_types_not: to_set(&config.to.dependency_types_not),
                dynamic: config.to.dynamic,
                circular: config.to.circular,
                could_not_resolve: config.to.could_not_resolve,
                core_module: config.to.core_module,
            },
            scope,
        })
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    /// Declares `from.orphan` or `to.reachable`
    pub fn is_module_only(&self) -> bool {
        self.scope == RuleScope::Module
    }

    /// Declares `to.reachable`, so the analyzer must compute reachability for it
    pub fn is_reachability_rule(&self) -> bool {
        self.to.reachable.is_some()
    }
}

/// A compiled rule set
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub forbidden: Vec<Rule>,
    pub allowed: Vec<Rule>,
    pub allowed_severity: Severity,
}

impl RuleSet {
    /// Compile a configured rule set
    pub fn compile(config: &RuleSetConfig) -> Result<Self> {
        let forbidden = config.forbidden.iter().map(Rule::compile).collect::<Result<Vec<_>>>()?;
        let allowed = config.allowed.iter().map(Rule::compile).collect::<Result<Vec<_>>>()?;

        // reachable/reaches entries are keyed by rule name
        let mut seen = HashSet::new();
        for rule in forbidden.iter().chain(allowed.iter()).filter(|r| r.is_reachability_rule()) {
            if !seen.insert(rule.name.as_str()) {
                return Err(CruiseError::malformed_rule(
                    &rule.name,
                    "rules with to.reachable must have unique names",
                ));
            }
        }

        Ok(Self {
            forbidden,
            allowed,
            allowed_severity: config.allowed_severity,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty() && self.allowed.is_empty()
    }

    /// Every rule (forbidden and allowed) that needs reachability data
    pub fn reachability_rules(&self) -> impl Iterator<Item = &Rule> {
        self.forbidden
            .iter()
            .chain(self.allowed.iter())
            .filter(|rule| rule.is_reachability_rule())
    }
}
