//! Module graph data structures
//!
//! Modules live in an arena (`Vec<Module>` plus an id index); dependencies
//! point at their target by id only, so the graph has no owning cycles.

use super::dependency::{DependencyType, ModuleSystem};
use super::verdict::{RuleViolation, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Reachability of a module for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachableEntry {
    pub as_defined_in_rule: String,
    pub value: bool,
}

/// A module reached from a rule root, with the shortest path to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachedModule {
    pub source: String,
    /// Sources along the path, root excluded, target included
    pub via: Vec<String>,
}

/// Everything a root module reaches for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachesEntry {
    pub as_defined_in_rule: String,
    pub modules: Vec<ReachedModule>,
}

/// A dependency edge, owned by the module it starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub from: String,
    /// Target module id, `None` when the reference could not be resolved
    pub to: Option<String>,
    /// The first reference text that produced this edge
    pub module_name: String,
    /// Resolved id, or the raw reference when resolution failed
    pub resolved: String,
    pub module_system: ModuleSystem,
    pub dependency_types: BTreeSet<DependencyType>,
    /// The exotic require string the edge was declared through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotic_require: Option<String>,
    pub dynamic: bool,
    pub circular: bool,
    pub core_module: bool,
    pub could_not_resolve: bool,
    pub valid: bool,
    pub rules: Vec<RuleViolation>,
}

impl Dependency {
    pub fn apply_verdict(&mut self, verdict: Verdict) {
        self.valid = verdict.valid;
        self.rules = verdict.rules;
    }
}

/// A node in the module graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    /// Path rules match against
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_system: Option<ModuleSystem>,
    pub core_module: bool,
    /// Whether the module's own source was extracted
    pub followed: bool,
    pub dependencies: Vec<Dependency>,
    pub orphan: bool,
    pub reachable: Vec<ReachableEntry>,
    pub reaches: Vec<ReachesEntry>,
    pub valid: bool,
    pub rules: Vec<RuleViolation>,
}

impl Module {
    /// A module whose source will be extracted
    pub fn followed(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            source: id.clone(),
            id,
            module_system: None,
            core_module: false,
            followed: true,
            dependencies: Vec::new(),
            orphan: false,
            reachable: Vec::new(),
            reaches: Vec::new(),
            valid: true,
            rules: Vec::new(),
        }
    }

    /// A module only ever seen as a resolution target
    pub fn leaf(id: impl Into<String>, core_module: bool) -> Self {
        Self {
            core_module,
            followed: false,
            ..Self::followed(id)
        }
    }

    pub fn reachable_for(&self, rule_name: &str) -> Option<&ReachableEntry> {
        self.reachable.iter().find(|entry| entry.as_defined_in_rule == rule_name)
    }

    pub fn reaches_for(&self, rule_name: &str) -> Option<&ReachesEntry> {
        self.reaches.iter().find(|entry| entry.as_defined_in_rule == rule_name)
    }

    /// Reset everything the analyzer derives
    pub fn clear_derived(&mut self) {
        self.orphan = false;
        self.reachable.clear();
        self.reaches.clear();
        for dependency in &mut self.dependencies {
            dependency.circular = false;
        }
    }

    pub fn apply_verdict(&mut self, verdict: Verdict) {
        self.valid = verdict.valid;
        self.rules = verdict.rules;
    }
}

/// Arena of modules keyed by id
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    index: HashMap<String, usize>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module, returning its arena index. An id that is already
    /// present keeps its existing module.
    pub fn add_module(&mut self, module: Module) -> usize {
        if let Some(&idx) = self.index.get(&module.id) {
            return idx;
        }
        let idx = self.modules.len();
        self.index.insert(module.id.clone(), idx);
        self.modules.push(module);
        idx
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.index_of(id).map(|idx| &self.modules[idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Module> {
        match self.index_of(id) {
            Some(idx) => Some(&mut self.modules[idx]),
            None => None,
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut [Module] {
        &mut self.modules
    }

    pub fn into_modules(self) -> Vec<Module> {
        self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Total number of dependency edges, unresolved ones included
    pub fn dependency_count(&self) -> usize {
        self.modules.iter().map(|m| m.dependencies.len()).sum()
    }

    /// Arena indices of the resolved targets of the module at `idx`
    pub fn successors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.modules[idx]
            .dependencies
            .iter()
            .filter_map(|dep| dep.to.as_deref())
            .filter_map(|to| self.index_of(to))
    }

    /// Re-sort modules by id and rebuild the index
    pub fn sort_by_id(&mut self) {
        self.modules.sort_by(|a, b| a.id.cmp(&b.id));
        self.index = self
            .modules
            .iter()
            .enumerate()
            .map(|(idx, module)| (module.id.clone(), idx))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_module_is_idempotent() {
        let mut graph = ModuleGraph::new();
        let first = graph.add_module(Module::followed("src/a.js"));
        let second = graph.add_module(Module::leaf("src/a.js", false));

        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
        assert!(graph.get("src/a.js").unwrap().followed);
    }

    #[test]
    fn test_sort_by_id_rebuilds_index() {
        let mut graph = ModuleGraph::new();
        graph.add_module(Module::followed("src/z.js"));
        graph.add_module(Module::followed("src/a.js"));
        graph.sort_by_id();

        assert_eq!(graph.modules()[0].id, "src/a.js");
        assert_eq!(graph.index_of("src/a.js"), Some(0));
        assert_eq!(graph.index_of("src/z.js"), Some(1));
    }

    #[test]
    fn test_module_serializes_camel_case() {
        let module = Module::leaf("fs", true);
        let json = serde_json::to_value(&module).unwrap();

        assert_eq!(json["coreModule"], true);
        assert_eq!(json["followed"], false);
        assert!(json.get("moduleSystem").is_none());
    }
}
