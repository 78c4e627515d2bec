//! End-to-end cruises over small projects

use super::common::{cruise, module, settings_for, write};
use cruiser::models::dependency::{DependencyType, ModuleSystem};
use cruiser::{CruiseError, Cruiser, RuleSet, Settings};
use tempfile::tempdir;

fn create_mixed_project(base: &std::path::Path) {
    write(
        base,
        "src/index.ts",
        r#"
import { helper } from './util';
import type { Options } from './types';
const fs = require('fs');
const lazy = () => import('./lazy');
export { helper };
"#,
    );
    write(base, "src/util.js", "module.exports.helper = () => require('./missing');");
    write(base, "src/types.ts", "export interface Options { depth: number }");
    write(base, "src/lazy.js", "export default 1;");
    write(base, "src/legacy.js", "define(['./util', 'require'], function (util) { return util; });");
    write(base, "src/lonely.js", "const answer = 42;");
    write(base, "README.md", "not a source file");
}

#[test]
fn test_cruise_mixed_module_systems() {
    let dir = tempdir().unwrap();
    create_mixed_project(dir.path());

    let result = cruise(settings_for(dir.path()), RuleSet::default());
    let ids: Vec<&str> = result.modules.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "fs",
            "src/index.ts",
            "src/lazy.js",
            "src/legacy.js",
            "src/lonely.js",
            "src/types.ts",
            "src/util.js",
        ]
    );

    let index = module(&result, "src/index.ts");
    let to = |target: &str| {
        index
            .dependencies
            .iter()
            .find(|d| d.resolved == target)
            .unwrap_or_else(|| panic!("no edge to {target}"))
    };

    assert!(to("src/util.js").dependency_types.contains(&DependencyType::Local));
    assert_eq!(to("src/types.ts").module_system, ModuleSystem::TsType);
    assert!(to("src/types.ts").dependency_types.contains(&DependencyType::TypeOnly));
    assert!(to("fs").core_module);
    assert!(to("src/lazy.js").dynamic);

    let util = module(&result, "src/util.js");
    assert!(util.dependencies[0].could_not_resolve);
    assert_eq!(util.dependencies[0].to, None);

    let legacy = module(&result, "src/legacy.js");
    assert_eq!(legacy.dependencies.len(), 1);
    assert_eq!(legacy.dependencies[0].module_system, ModuleSystem::Amd);

    assert!(module(&result, "src/lonely.js").orphan);
    assert!(!module(&result, "src/lazy.js").orphan);
    assert!(!module(&result, "fs").followed);
}

#[test]
fn test_restricted_module_systems() {
    let dir = tempdir().unwrap();
    create_mixed_project(dir.path());

    let settings = Settings {
        module_systems: vec![ModuleSystem::Cjs],
        ..settings_for(dir.path())
    };
    let result = cruise(settings, RuleSet::default());

    let index = module(&result, "src/index.ts");
    assert_eq!(index.dependencies.len(), 1);
    assert_eq!(index.dependencies[0].resolved, "fs");
    assert!(module(&result, "src/legacy.js").dependencies.is_empty());
}

#[test]
fn test_without_pre_compilation_deps() {
    let dir = tempdir().unwrap();
    create_mixed_project(dir.path());

    let settings = Settings {
        ts_pre_compilation_deps: false,
        ..settings_for(dir.path())
    };
    let result = cruise(settings, RuleSet::default());

    let index = module(&result, "src/index.ts");
    assert!(index.dependencies.iter().all(|d| d.module_system != ModuleSystem::TsType));
    assert!(module(&result, "src/types.ts").orphan);
}

#[test]
fn test_exotic_require_strings() {
    let dir = tempdir().unwrap();
    write(dir.path(), "main.js", "const dep = want('./dep');");
    write(dir.path(), "dep.js", "");

    let plain = cruise(settings_for(dir.path()), RuleSet::default());
    assert!(module(&plain, "main.js").dependencies.is_empty());

    let settings = Settings {
        exotic_require_strings: vec!["want".to_string()],
        ..settings_for(dir.path())
    };
    let exotic = cruise(settings, RuleSet::default());
    let dependency = &module(&exotic, "main.js").dependencies[0];
    assert_eq!(dependency.resolved, "dep.js");
    assert!(dependency.dependency_types.contains(&DependencyType::ExoticRequire));
    assert_eq!(dependency.exotic_require.as_deref(), Some("want"));

    let json = serde_json::to_value(&exotic.modules).unwrap();
    assert!(json.to_string().contains("\"exoticRequire\":\"want\""));
}

#[test]
fn test_excludes_and_depth() {
    let dir = tempdir().unwrap();
    write(dir.path(), "index.js", "require('./lib/a');");
    write(dir.path(), "lib/a.js", "require('./deep/b');");
    write(dir.path(), "lib/deep/b.js", "");
    write(dir.path(), "node_modules/pkg/index.js", "");
    write(dir.path(), "index.spec.js", "require('./index');");

    let settings = Settings {
        exclude_patterns: vec!["node_modules".to_string(), "*.spec.js".to_string()],
        max_depth: Some(2),
        ..settings_for(dir.path())
    };
    let result = cruise(settings, RuleSet::default());

    let followed: Vec<&str> = result
        .modules
        .iter()
        .filter(|m| m.followed)
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(followed, vec!["index.js", "lib/a.js"]);
    // still resolved as a target, just never extracted
    assert!(!module(&result, "lib/deep/b.js").followed);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let dir = tempdir().unwrap();
    create_mixed_project(dir.path());

    let parallel = cruise(settings_for(dir.path()), RuleSet::default());
    let sequential = cruise(
        Settings {
            parallel: false,
            ..settings_for(dir.path())
        },
        RuleSet::default(),
    );

    assert_eq!(parallel.modules, sequential.modules);
}

#[test]
fn test_unparseable_file_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "good.js", "require('./bad');");
    write(dir.path(), "bad.js", "function ( {{{");

    let result = cruise(settings_for(dir.path()), RuleSet::default());

    assert_eq!(result.summary.total_cruised, 2);
    assert!(result.issues.iter().any(|issue| issue.path.ends_with("bad.js")));
}

#[test]
fn test_missing_base_dir() {
    let dir = tempdir().unwrap();
    let settings = settings_for(&dir.path().join("nope"));

    let err = Cruiser::new(settings, RuleSet::default()).cruise().unwrap_err();
    assert!(matches!(err, CruiseError::InvalidPath { .. }));
}
