//! Data models shared across the crate

pub mod config;
pub mod dependency;
pub mod module_graph;
pub mod rules;
pub mod verdict;

pub use config::{OutputFormat, PartialSettings, Settings};
pub use dependency::{DependencyType, ModuleSystem, RawDependency};
pub use module_graph::{Dependency, Module, ModuleGraph, ReachableEntry, ReachedModule, ReachesEntry};
pub use rules::{Rule, RuleConfig, RuleScope, RuleSet, RuleSetConfig, Severity};
pub use verdict::{CruiseIssue, CruiseResult, OptionsUsed, RuleViolation, Summary, Verdict, Violation};
