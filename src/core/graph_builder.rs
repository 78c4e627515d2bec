//! Module graph construction from extracted dependencies

use crate::models::dependency::{DependencyType, RawDependency};
use crate::models::module_graph::{Dependency, Module, ModuleGraph};
use crate::utils::path_resolver::{ModuleResolver, ResolvedReference};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Accumulates modules and their resolved dependencies.
/// [`GraphBuilder::build`] closes the graph for analysis.
pub struct GraphBuilder<'r> {
    resolver: &'r dyn ModuleResolver,
    include_only: Option<&'r Regex>,
    graph: ModuleGraph,
}

impl<'r> GraphBuilder<'r> {
    pub fn new(resolver: &'r dyn ModuleResolver) -> Self {
        Self {
            resolver,
            include_only: None,
            graph: ModuleGraph::new(),
        }
    }

    /// Drop edges whose resolved id does not match `include_only`
    pub fn with_include_only(mut self, include_only: Option<&'r Regex>) -> Self {
        self.include_only = include_only;
        self
    }

    /// Add a cruised module with the dependencies extracted from it.
    /// Adding an id that is already followed is a no-op; an id previously
    /// seen only as a dependency target becomes followed.
    pub fn add_module(&mut self, id: &str, raw_dependencies: &[RawDependency]) {
        if self.graph.get(id).is_some_and(|module| module.followed) {
            tracing::debug!(module = id, "module already in graph");
            return;
        }

        let dependencies = self.resolve_dependencies(id, raw_dependencies);

        for dependency in &dependencies {
            if let Some(to) = &dependency.to {
                if self.graph.index_of(to).is_none() {
                    self.graph.add_module(Module::leaf(to.clone(), dependency.core_module));
                }
            }
        }

        let idx = self.graph.add_module(Module::followed(id));
        let module = &mut self.graph.modules_mut()[idx];
        module.followed = true;
        module.core_module = false;
        module.module_system = raw_dependencies.first().map(|raw| raw.module_system);
        module.dependencies = dependencies;
    }

    /// Resolve each raw dependency once and merge edges to the same target
    fn resolve_dependencies(&self, from: &str, raw_dependencies: &[RawDependency]) -> Vec<Dependency> {
        let mut dependencies: Vec<Dependency> = Vec::new();
        let mut by_target: HashMap<String, usize> = HashMap::new();

        for raw in raw_dependencies {
            let resolution = self.resolver.resolve(&raw.module_name, from);
            let target = resolution
                .resolved
                .clone()
                .filter(|_| !resolution.could_not_resolve)
                .unwrap_or_else(|| raw.module_name.clone());

            if self.include_only.is_some_and(|include| !include.is_match(&target)) {
                tracing::trace!(from, target = %target, "dependency outside includeOnly");
                continue;
            }

            match by_target.get(&target) {
                Some(&existing) => {
                    let dependency = &mut dependencies[existing];
                    dependency.dependency_types.extend(raw.dependency_types.iter().copied());
                    dependency.dynamic |= raw.dynamic;
                    if dependency.exotic_require.is_none() {
                        dependency.exotic_require = raw.exotic_require.clone();
                    }
                }
                None => {
                    by_target.insert(target.clone(), dependencies.len());
                    dependencies.push(new_dependency(from, raw, &resolution, target));
                }
            }
        }

        dependencies
    }

    /// Close the graph: modules ordered by id, edges in first-appearance order
    pub fn build(mut self) -> ModuleGraph {
        self.graph.sort_by_id();
        tracing::debug!(
            modules = self.graph.len(),
            dependencies = self.graph.dependency_count(),
            "module graph built"
        );
        self.graph
    }
}

fn new_dependency(from: &str, raw: &RawDependency, resolution: &ResolvedReference, target: String) -> Dependency {
    let could_not_resolve = resolution.could_not_resolve || resolution.resolved.is_none();

    let mut dependency_types = raw.dependency_types.clone();
    dependency_types.insert(resolution_type(resolution, &target, could_not_resolve));

    Dependency {
        from: from.to_string(),
        to: if could_not_resolve { None } else { Some(target.clone()) },
        module_name: raw.module_name.clone(),
        resolved: target,
        module_system: raw.module_system,
        dependency_types,
        exotic_require: raw.exotic_require.clone(),
        dynamic: raw.dynamic,
        circular: false,
        core_module: resolution.core_module,
        could_not_resolve,
        valid: true,
        rules: Vec::new(),
    }
}

fn resolution_type(resolution: &ResolvedReference, target: &str, could_not_resolve: bool) -> DependencyType {
    if could_not_resolve {
        DependencyType::Unknown
    } else if resolution.core_module {
        DependencyType::Core
    } else if target.starts_with("node_modules/") || target.contains("/node_modules/") {
        DependencyType::Npm
    } else {
        DependencyType::Local
    }
}

/// Build a closed graph from per-file extraction results
pub fn build_graph(
    per_file: &BTreeMap<String, Vec<RawDependency>>,
    resolver: &dyn ModuleResolver,
    include_only: Option<&Regex>,
) -> ModuleGraph {
    let mut builder = GraphBuilder::new(resolver).with_include_only(include_only);
    for (id, raw_dependencies) in per_file {
        builder.add_module(id, raw_dependencies);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dependency::ModuleSystem;
    use crate::utils::path_resolver::is_core_module;

    /// Resolves `./x` to `x.js` when `x.js` is in the known set
    fn fixture_resolver(known: &'static [&'static str]) -> impl ModuleResolver {
        move |reference: &str, _from: &str| {
            if is_core_module(reference) {
                return ResolvedReference::core(reference);
            }
            if let Some(stripped) = reference.strip_prefix("./") {
                let id = format!("{}.js", stripped);
                if known.contains(&id.as_str()) {
                    return ResolvedReference::module(id);
                }
            }
            if reference == "lodash" {
                return ResolvedReference::module("node_modules/lodash/lodash.js");
            }
            ResolvedReference::unresolved()
        }
    }

    #[test]
    fn test_edges_to_same_target_merge() {
        let resolver = fixture_resolver(&["a.js", "b.js"]);
        let mut per_file = BTreeMap::new();
        per_file.insert(
            "a.js".to_string(),
            vec![
                RawDependency::new("./b", ModuleSystem::Es6).with_type(DependencyType::ReExport),
                RawDependency::new("./b", ModuleSystem::Cjs),
                RawDependency::new("./b", ModuleSystem::Es6).dynamic(),
            ],
        );
        per_file.insert("b.js".to_string(), vec![]);

        let graph = build_graph(&per_file, &resolver, None);
        let a = graph.get("a.js").unwrap();

        assert_eq!(a.dependencies.len(), 1);
        let edge = &a.dependencies[0];
        assert_eq!(edge.to.as_deref(), Some("b.js"));
        assert_eq!(edge.module_system, ModuleSystem::Es6);
        assert!(edge.dynamic);
        assert!(edge.dependency_types.contains(&DependencyType::ReExport));
        assert!(edge.dependency_types.contains(&DependencyType::DynamicImport));
        assert!(edge.dependency_types.contains(&DependencyType::Local));
    }

    #[test]
    fn test_exotic_require_carried_to_edge() {
        let resolver = fixture_resolver(&["a.js", "b.js"]);
        let mut builder = GraphBuilder::new(&resolver);
        builder.add_module(
            "a.js",
            &[
                RawDependency::new("./b", ModuleSystem::Es6),
                RawDependency::new("./b", ModuleSystem::ExoticRequire).with_exotic_require("want"),
            ],
        );
        let graph = builder.build();

        let edge = &graph.get("a.js").unwrap().dependencies[0];
        assert_eq!(edge.exotic_require.as_deref(), Some("want"));
        assert!(edge.dependency_types.contains(&DependencyType::ExoticRequire));
    }

    #[test]
    fn test_include_only_drops_outside_edges() {
        let resolver = fixture_resolver(&["a.js", "b.js"]);
        let include = Regex::new("^[ab]\\.js$").unwrap();
        let mut per_file = BTreeMap::new();
        per_file.insert(
            "a.js".to_string(),
            vec![
                RawDependency::new("./b", ModuleSystem::Es6),
                RawDependency::new("fs", ModuleSystem::Cjs),
                RawDependency::new("lodash", ModuleSystem::Es6),
            ],
        );

        let graph = build_graph(&per_file, &resolver, Some(&include));
        let a = graph.get("a.js").unwrap();

        assert_eq!(a.dependencies.len(), 1);
        assert_eq!(a.dependencies[0].resolved, "b.js");
        assert!(graph.get("fs").is_none());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_unresolved_edges_merge_by_name() {
        let resolver = fixture_resolver(&["a.js"]);
        let mut builder = GraphBuilder::new(&resolver);
        builder.add_module(
            "a.js",
            &[
                RawDependency::new("./ghost", ModuleSystem::Es6),
                RawDependency::new("./ghost", ModuleSystem::Cjs),
                RawDependency::new("./other-ghost", ModuleSystem::Es6),
            ],
        );
        let graph = builder.build();

        let a = graph.get("a.js").unwrap();
        assert_eq!(a.dependencies.len(), 2);
        assert!(a.dependencies.iter().all(|d| d.could_not_resolve && d.to.is_none()));
        assert_eq!(a.dependencies[0].resolved, "./ghost");
        assert!(a.dependencies[0].dependency_types.contains(&DependencyType::Unknown));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_targets_become_leaf_modules() {
        let resolver = fixture_resolver(&["a.js"]);
        let mut builder = GraphBuilder::new(&resolver);
        builder.add_module(
            "a.js",
            &[
                RawDependency::new("fs", ModuleSystem::Cjs),
                RawDependency::new("lodash", ModuleSystem::Es6),
            ],
        );
        let graph = builder.build();

        let fs = graph.get("fs").unwrap();
        assert!(fs.core_module);
        assert!(!fs.followed);

        let lodash = graph.get("node_modules/lodash/lodash.js").unwrap();
        assert!(!lodash.followed);
        assert!(!lodash.core_module);

        let a = graph.get("a.js").unwrap();
        assert!(a.dependencies[0].dependency_types.contains(&DependencyType::Core));
        assert!(a.dependencies[1].dependency_types.contains(&DependencyType::Npm));
    }

    #[test]
    fn test_adding_module_twice_is_noop() {
        let resolver = fixture_resolver(&["a.js", "b.js"]);
        let mut builder = GraphBuilder::new(&resolver);
        builder.add_module("a.js", &[RawDependency::new("./b", ModuleSystem::Es6)]);
        builder.add_module("a.js", &[]);
        let graph = builder.build();

        assert_eq!(graph.get("a.js").unwrap().dependencies.len(), 1);
    }

    #[test]
    fn test_leaf_upgraded_when_followed_later() {
        let resolver = fixture_resolver(&["a.js", "b.js"]);
        let mut builder = GraphBuilder::new(&resolver);
        builder.add_module("a.js", &[RawDependency::new("./b", ModuleSystem::Es6)]);
        assert!(!builder.graph.get("b.js").unwrap().followed);

        builder.add_module("b.js", &[RawDependency::new("./a", ModuleSystem::Es6)]);
        let graph = builder.build();

        let b = graph.get("b.js").unwrap();
        assert!(b.followed);
        assert_eq!(b.dependencies.len(), 1);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_modules_sorted_by_id() {
        let resolver = fixture_resolver(&["a.js", "b.js", "c.js"]);
        let mut builder = GraphBuilder::new(&resolver);
        builder.add_module("c.js", &[]);
        builder.add_module("a.js", &[]);
        builder.add_module("b.js", &[]);
        let graph = builder.build();

        let ids: Vec<_> = graph.modules().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a.js", "b.js", "c.js"]);
    }
}
