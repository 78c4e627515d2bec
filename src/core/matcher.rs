//! Rule matching against modules and dependencies
//!
//! Module-only rules (`from.orphan`, `to.reachable`) are matched against a
//! whole module using the analyzer's annotations; every other rule is matched
//! against one dependency edge at a time.

use crate::models::module_graph::{Dependency, Module};
use crate::models::rules::Rule;

/// `from.orphan` is set and agrees with the module, and the module passes
/// both the "from" and the "to" path filters. With `to.reachable` set the
/// orphan flag only selects roots.
pub fn matches_orphan_rule(rule: &Rule, module: &Module) -> bool {
    if rule.is_reachability_rule() {
        return false;
    }
    match rule.from.orphan {
        Some(orphan) => {
            orphan == module.orphan
                && rule.from.paths.matches(&module.source)
                && rule.to.paths.matches(&module.source)
        }
        None => false,
    }
}

/// `to.reachable` is set and the module's reachability for this rule equals it
pub fn matches_reachable_rule(rule: &Rule, module: &Module) -> bool {
    let Some(wanted) = rule.to.reachable else {
        return false;
    };

    module
        .reachable_for(&rule.name)
        .is_some_and(|entry| entry.value == wanted)
        && rule.to.paths.matches(&module.source)
}

/// `to.reachable` is true and the module reaches something passing the "to"
/// path filters for this rule
pub fn matches_reaches_rule(rule: &Rule, module: &Module) -> bool {
    if rule.to.reachable != Some(true) {
        return false;
    }

    module.reaches_for(&rule.name).is_some_and(|entry| {
        entry
            .modules
            .iter()
            .any(|reached| rule.to.paths.matches(&reached.source))
    })
}

/// Any of the module-level predicates holds
pub fn matches_module_rule(rule: &Rule, module: &Module) -> bool {
    matches_orphan_rule(rule, module) || matches_reachable_rule(rule, module) || matches_reaches_rule(rule, module)
}

/// Every predicate the rule declares holds for this edge
pub fn matches_dependency_rule(rule: &Rule, from: &Module, dependency: &Dependency) -> bool {
    let to = &rule.to;

    rule.from.paths.matches(&from.source)
        && to.paths.matches(&dependency.resolved)
        && to
            .dependency_types
            .as_ref()
            .map_or(true, |types| !types.is_disjoint(&dependency.dependency_types))
        && to
            .dependency_types_not
            .as_ref()
            .map_or(true, |types| types.is_disjoint(&dependency.dependency_types))
        && to.dynamic.map_or(true, |dynamic| dynamic == dependency.dynamic)
        && to.circular.map_or(true, |circular| circular == dependency.circular)
        && to
            .could_not_resolve
            .map_or(true, |could_not_resolve| could_not_resolve == dependency.could_not_resolve)
        && to.core_module.map_or(true, |core_module| core_module == dependency.core_module)
}
