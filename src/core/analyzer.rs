//! Derived graph properties: orphans, circular edges and per-rule reachability
//!
//! Analysis runs on a closed graph. Each phase reads the topology, computes
//! its results (reachability in parallel, one task per rule) and only then
//! writes them back from a single thread. Derived fields are cleared first,
//! so analyzing the same graph twice yields the same annotations.

use super::parallel::map_items;
use crate::models::module_graph::{ModuleGraph, ReachableEntry, ReachedModule, ReachesEntry};
use crate::models::rules::{Rule, RuleSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;

/// Annotate `graph` with everything the rule matcher needs
pub fn analyze(graph: &mut ModuleGraph, rules: &RuleSet, parallel: bool) {
    for module in graph.modules_mut() {
        module.clear_derived();
    }

    let topology = Topology::new(graph);
    mark_orphans(graph, &topology);
    mark_circular(graph, &topology);

    let reachability_rules: Vec<&Rule> = rules.reachability_rules().collect();
    if reachability_rules.is_empty() {
        return;
    }

    let results = {
        let graph: &ModuleGraph = graph;
        map_items(&reachability_rules, parallel, |rule| compute_reachability(graph, &topology, rule))
    };
    for result in results {
        result.apply(graph);
    }
}

/// Resolved-edge adjacency by arena index
struct Topology {
    successors: Vec<Vec<usize>>,
    incoming: Vec<usize>,
}

impl Topology {
    fn new(graph: &ModuleGraph) -> Self {
        let mut successors = vec![Vec::new(); graph.len()];
        let mut incoming = vec![0usize; graph.len()];

        for (idx, targets) in successors.iter_mut().enumerate() {
            for target in graph.successors(idx) {
                incoming[target] += 1;
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }

        Self { successors, incoming }
    }
}

/// A module is an orphan when nothing depends on it and it depends on nothing
fn mark_orphans(graph: &mut ModuleGraph, topology: &Topology) {
    for (idx, module) in graph.modules_mut().iter_mut().enumerate() {
        module.orphan = topology.incoming[idx] == 0 && module.dependencies.is_empty();
    }
}

/// An edge is circular when its target can reach back to its source
fn mark_circular(graph: &mut ModuleGraph, topology: &Topology) {
    let mut digraph: DiGraph<(), ()> = DiGraph::with_capacity(graph.len(), 0);
    let nodes: Vec<NodeIndex> = (0..graph.len()).map(|_| digraph.add_node(())).collect();
    for (from, targets) in topology.successors.iter().enumerate() {
        for &to in targets {
            digraph.add_edge(nodes[from], nodes[to], ());
        }
    }

    let mut component = vec![0usize; graph.len()];
    let mut component_size = Vec::new();
    for (component_id, scc) in tarjan_scc(&digraph).into_iter().enumerate() {
        component_size.push(scc.len());
        for node in scc {
            component[node.index()] = component_id;
        }
    }

    let index_of: Vec<Vec<Option<usize>>> = graph
        .modules()
        .iter()
        .map(|module| {
            module
                .dependencies
                .iter()
                .map(|dep| dep.to.as_deref().and_then(|to| graph.index_of(to)))
                .collect()
        })
        .collect();

    for (from, module) in graph.modules_mut().iter_mut().enumerate() {
        for (dependency, to) in module.dependencies.iter_mut().zip(&index_of[from]) {
            dependency.circular = match *to {
                Some(to) if to == from => true,
                Some(to) => component[to] == component[from] && component_size[component[from]] > 1,
                None => false,
            };
        }
    }
}

/// Reachability facts for one rule, computed against a read-only graph
struct ReachabilityResult {
    rule_name: String,
    roots: Vec<(usize, Vec<ReachedModule>)>,
    targets: Vec<(usize, bool)>,
}

impl ReachabilityResult {
    fn apply(self, graph: &mut ModuleGraph) {
        let modules = graph.modules_mut();

        for (idx, reached) in self.roots {
            modules[idx].reachable.push(ReachableEntry {
                as_defined_in_rule: self.rule_name.clone(),
                value: !reached.is_empty(),
            });
            if !reached.is_empty() {
                modules[idx].reaches.push(ReachesEntry {
                    as_defined_in_rule: self.rule_name.clone(),
                    modules: reached,
                });
            }
        }

        for (idx, value) in self.targets {
            modules[idx].reachable.push(ReachableEntry {
                as_defined_in_rule: self.rule_name.clone(),
                value,
            });
        }
    }
}

fn is_root(rule: &Rule, source: &str, orphan: bool) -> bool {
    rule.from.paths.matches(source) && rule.from.orphan.map_or(true, |wanted| wanted == orphan)
}

fn compute_reachability(graph: &ModuleGraph, topology: &Topology, rule: &Rule) -> ReachabilityResult {
    let modules = graph.modules();
    let mut reached_by_any = vec![false; modules.len()];
    let mut roots = Vec::new();

    for (root, module) in modules.iter().enumerate() {
        if !is_root(rule, &module.source, module.orphan) {
            continue;
        }

        let parents = breadth_first(topology, root);
        let mut reached = Vec::new();
        for (idx, parent) in parents.iter().enumerate() {
            if parent.is_none() {
                continue;
            }
            reached_by_any[idx] = true;
            if rule.to.paths.matches(&modules[idx].source) {
                reached.push(ReachedModule {
                    source: modules[idx].source.clone(),
                    via: via_path(graph, &parents, root, idx),
                });
            }
        }
        roots.push((root, reached));
    }

    // `reachable: true` rules surface through `reaches` on the root only
    let targets = if rule.to.reachable == Some(false) {
        modules
            .iter()
            .enumerate()
            .filter(|(idx, module)| {
                rule.to.paths.matches(&module.source) && !roots.iter().any(|(root, _)| root == idx)
            })
            .map(|(idx, _)| (idx, reached_by_any[idx]))
            .collect()
    } else {
        Vec::new()
    };

    ReachabilityResult {
        rule_name: rule.name.clone(),
        roots,
        targets,
    }
}

/// BFS from `root` over resolved edges. Returns, per module, the module it
/// was first reached from; `None` means unreached. The root itself only gets
/// a parent when a cycle leads back to it.
fn breadth_first(topology: &Topology, root: usize) -> Vec<Option<usize>> {
    let mut parents: Vec<Option<usize>> = vec![None; topology.successors.len()];
    let mut queue = VecDeque::new();
    let mut expanded = vec![false; topology.successors.len()];

    queue.push_back(root);
    while let Some(current) = queue.pop_front() {
        if expanded[current] {
            continue;
        }
        expanded[current] = true;

        for &next in &topology.successors[current] {
            if parents[next].is_none() {
                parents[next] = Some(current);
                queue.push_back(next);
            }
        }
    }

    parents
}

/// Sources on the shortest path from `root` to `target`, root excluded
fn via_path(graph: &ModuleGraph, parents: &[Option<usize>], root: usize, target: usize) -> Vec<String> {
    let modules = graph.modules();
    let mut path = vec![modules[target].source.clone()];
    let mut current = target;

    while let Some(parent) = parents[current] {
        if parent == root {
            break;
        }
        path.push(modules[parent].source.clone());
        current = parent;
        if path.len() > modules.len() {
            break;
        }
    }

    path.reverse();
    path
}
