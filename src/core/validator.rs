//! Rule validation for modules and dependencies
//!
//! Module-only rules are checked once per module, everything else once per
//! dependency edge. In both cases the allowed list is consulted first (a
//! miss yields a `not-in-allowed` violation), then every forbidden rule of
//! the same scope. Results are concatenated and ordered by severity.

use super::matcher::{matches_dependency_rule, matches_module_rule};
use super::parallel::map_items;
use crate::models::module_graph::{Dependency, Module, ModuleGraph};
use crate::models::rules::{Rule, RuleSet, NOT_IN_ALLOWED};
use crate::models::verdict::{RuleViolation, Verdict};

/// Validate one module against the module-only rules
pub fn validate_module(validate: bool, rules: &RuleSet, module: &Module) -> Verdict {
    if !validate {
        return Verdict::valid();
    }

    collect(rules, Rule::is_module_only, |rule| matches_module_rule(rule, module))
}

/// Validate one dependency of `from` against the edge-level rules
pub fn validate_dependency(validate: bool, rules: &RuleSet, from: &Module, dependency: &Dependency) -> Verdict {
    if !validate {
        return Verdict::valid();
    }

    collect(
        rules,
        |rule| !rule.is_module_only(),
        |rule| matches_dependency_rule(rule, from, dependency),
    )
}

fn collect<S, M>(rules: &RuleSet, in_scope: S, matches: M) -> Verdict
where
    S: Fn(&Rule) -> bool,
    M: Fn(&Rule) -> bool,
{
    let mut violations = Vec::new();

    let mut allowed = rules.allowed.iter().filter(|rule| in_scope(rule)).peekable();
    if allowed.peek().is_some() && !allowed.any(|rule| matches(rule)) {
        violations.push(RuleViolation::new(NOT_IN_ALLOWED, rules.allowed_severity));
    }

    violations.extend(
        rules
            .forbidden
            .iter()
            .filter(|rule| in_scope(rule) && matches(rule))
            .map(|rule| RuleViolation::new(rule.name.clone(), rule.severity)),
    );

    Verdict::from_violations(violations)
}

/// Verdicts for one module and each of its dependencies, in edge order
struct ModuleVerdicts {
    module: Verdict,
    dependencies: Vec<Verdict>,
}

/// Validate every module and dependency of an analyzed graph and record the
/// verdicts on it
pub fn validate_graph(graph: &mut ModuleGraph, rules: &RuleSet, validate: bool, parallel: bool) {
    let verdicts = map_items(graph.modules(), parallel, |module| ModuleVerdicts {
        module: validate_module(validate, rules, module),
        dependencies: module
            .dependencies
            .iter()
            .map(|dependency| validate_dependency(validate, rules, module, dependency))
            .collect(),
    });

    let mut invalid = 0usize;
    for (module, verdicts) in graph.modules_mut().iter_mut().zip(verdicts) {
        for (dependency, verdict) in module.dependencies.iter_mut().zip(verdicts.dependencies) {
            invalid += usize::from(!verdict.valid);
            dependency.apply_verdict(verdict);
        }
        invalid += usize::from(!verdicts.module.valid);
        module.apply_verdict(verdicts.module);
    }

    tracing::debug!(invalid, "validation finished");
}
