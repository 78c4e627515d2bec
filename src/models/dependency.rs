//! Raw dependency records produced by the extractors

use crate::error::{CruiseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Module-declaration dialect a dependency was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleSystem {
    /// `import` / `export ... from` / `import()`
    #[serde(rename = "es6")]
    Es6,
    /// CommonJS `require()`
    #[serde(rename = "cjs")]
    Cjs,
    /// AMD `define([...])` / `require([...])`
    #[serde(rename = "amd")]
    Amd,
    /// TypeScript type-only imports and re-exports
    #[serde(rename = "tsType")]
    TsType,
    /// Calls to a configured require look-alike (`want`, `window.require`)
    #[serde(rename = "exoticRequire")]
    ExoticRequire,
}

impl ModuleSystem {
    /// All dialects, in the order extractors run by default
    pub const ALL: [ModuleSystem; 5] = [
        ModuleSystem::Es6,
        ModuleSystem::Cjs,
        ModuleSystem::Amd,
        ModuleSystem::TsType,
        ModuleSystem::ExoticRequire,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleSystem::Es6 => "es6",
            ModuleSystem::Cjs => "cjs",
            ModuleSystem::Amd => "amd",
            ModuleSystem::TsType => "tsType",
            ModuleSystem::ExoticRequire => "exoticRequire",
        }
    }
}

impl fmt::Display for ModuleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleSystem {
    type Err = CruiseError;

    fn from_str(s: &str) -> Result<Self> {
        ModuleSystem::ALL
            .iter()
            .copied()
            .find(|system| system.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CruiseError::unknown_module_system(s))
    }
}

/// Tag classifying how a dependency was declared or what it resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    /// Resolved to a file inside the cruised tree
    Local,
    /// Resolved into a `node_modules` package
    Npm,
    /// A runtime built-in (`fs`, `node:path`)
    Core,
    /// Could not be resolved
    Unknown,
    /// Only exists before TypeScript compilation
    TypeOnly,
    /// Loaded through `import()`
    DynamicImport,
    /// `export ... from`
    ReExport,
    /// Loaded through a configured exotic require
    ExoticRequire,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyType::Local => "local",
            DependencyType::Npm => "npm",
            DependencyType::Core => "core",
            DependencyType::Unknown => "unknown",
            DependencyType::TypeOnly => "type-only",
            DependencyType::DynamicImport => "dynamic-import",
            DependencyType::ReExport => "re-export",
            DependencyType::ExoticRequire => "exotic-require",
        };
        f.write_str(name)
    }
}

/// One dependency declaration as found in a source unit, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    /// The reference exactly as written (`./utils`, `lodash/fp`, `fs`)
    pub module_name: String,
    pub module_system: ModuleSystem,
    pub dynamic: bool,
    pub dependency_types: BTreeSet<DependencyType>,
    /// The exotic require string that matched, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotic_require: Option<String>,
}

impl RawDependency {
    /// A plain static dependency with no declaration tags
    pub fn new(module_name: impl Into<String>, module_system: ModuleSystem) -> Self {
        Self {
            module_name: module_name.into(),
            module_system,
            dynamic: false,
            dependency_types: BTreeSet::new(),
            exotic_require: None,
        }
    }

    /// Mark as loaded at runtime through `import()`
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self.dependency_types.insert(DependencyType::DynamicImport);
        self
    }

    /// Add a declaration tag
    pub fn with_type(mut self, dependency_type: DependencyType) -> Self {
        self.dependency_types.insert(dependency_type);
        self
    }

    /// Record the exotic require string that produced this dependency
    pub fn with_exotic_require(mut self, name: impl Into<String>) -> Self {
        self.exotic_require = Some(name.into());
        self.dependency_types.insert(DependencyType::ExoticRequire);
        self
    }
}
