use super::*;
use crate::models::dependency::DependencyType;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

fn run(systems: &[ModuleSystem], source: &str, options: &ExtractOptions) -> Vec<RawDependency> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
    assert!(ret.errors.is_empty(), "fixture failed to parse: {:?}", ret.errors);
    extract_all(systems, &ret.program, options).unwrap()
}

fn names(deps: &[RawDependency]) -> Vec<&str> {
    deps.iter().map(|d| d.module_name.as_str()).collect()
}

#[test]
fn test_es6_imports_and_reexports_in_source_order() {
    let deps = run(
        &[ModuleSystem::Es6],
        r#"
        import a from './a';
        import './side-effect';
        export { b } from './b';
        export * from './c';
        export const local = 1;
        const lazy = () => import('./lazy');
        "#,
        &ExtractOptions::default(),
    );

    assert_eq!(names(&deps), vec!["./a", "./side-effect", "./b", "./c", "./lazy"]);
    assert!(deps.iter().all(|d| d.module_system == ModuleSystem::Es6));
    assert!(deps[2].dependency_types.contains(&DependencyType::ReExport));
    assert!(deps[3].dependency_types.contains(&DependencyType::ReExport));
    assert!(deps[4].dynamic);
    assert!(deps[4].dependency_types.contains(&DependencyType::DynamicImport));
    assert!(!deps[0].dynamic);
}

#[test]
fn test_es6_skips_type_only_and_computed_imports() {
    let deps = run(
        &[ModuleSystem::Es6],
        r#"
        import type { T } from './types';
        export type { U } from './more-types';
        const name = './x';
        import(name);
        import(`./tpl-${name}`);
        import(`./plain-template`);
        "#,
        &ExtractOptions::default(),
    );

    assert_eq!(names(&deps), vec!["./plain-template"]);
}

#[test]
fn test_ts_type_extractor() {
    let deps = run(
        &[ModuleSystem::TsType],
        r#"
        import type { T } from './types';
        export type { U } from './more-types';
        import value from './value';
        "#,
        &ExtractOptions::default(),
    );

    assert_eq!(names(&deps), vec!["./types", "./more-types"]);
    assert!(deps.iter().all(|d| d.dependency_types.contains(&DependencyType::TypeOnly)));
    assert!(deps[1].dependency_types.contains(&DependencyType::ReExport));
}

#[test]
fn test_cjs_requires() {
    let deps = run(
        &[ModuleSystem::Cjs],
        r#"
        const fs = require('fs');
        const tpl = require(`./tpl`);
        const dynamic = require(someVariable);
        const twoArgs = require('./a', './b');
        import legacy = require('./legacy');
        function nested() { return require('./nested'); }
        "#,
        &ExtractOptions::default(),
    );

    assert_eq!(names(&deps), vec!["fs", "./tpl", "./legacy", "./nested"]);
    assert!(deps.iter().all(|d| d.module_system == ModuleSystem::Cjs));
}

#[test]
fn test_amd_define_and_wrapper() {
    let deps = run(
        &[ModuleSystem::Amd],
        r#"
        define(['./a', 'require', 'exports', 'lib/b'], function (a, require) {
            var c = require('./c');
        });
        require(['./d'], function (d) {});
        var notAmd = require('./cjs-only');
        "#,
        &ExtractOptions::default(),
    );

    assert_eq!(names(&deps), vec!["./a", "lib/b", "./c", "./d"]);
    assert!(deps.iter().all(|d| d.module_system == ModuleSystem::Amd));
}

#[test]
fn test_exotic_require_strings() {
    let options = ExtractOptions::with_exotic_require_strings(vec!["want".to_string(), "window.require".to_string()]);
    let deps = run(
        &[ModuleSystem::ExoticRequire],
        r#"
        const a = want('./a');
        const b = window.require('./b');
        const c = require('./c');
        const d = other.want('./d');
        "#,
        &options,
    );

    assert_eq!(names(&deps), vec!["./a", "./b"]);
    assert_eq!(deps[0].exotic_require.as_deref(), Some("want"));
    assert_eq!(deps[1].exotic_require.as_deref(), Some("window.require"));
    assert!(deps[1].dependency_types.contains(&DependencyType::ExoticRequire));
}

#[test]
fn test_exotic_without_strings_finds_nothing() {
    let deps = run(&[ModuleSystem::ExoticRequire], "want('./a');", &ExtractOptions::default());
    assert!(deps.is_empty());
}

#[test]
fn test_extractors_append_without_touching_earlier_entries() {
    let source = r#"
        import a from './a';
        const b = require('./b');
    "#;
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::ts()).parse();

    let mut out = vec![RawDependency::new("preexisting", ModuleSystem::Amd)];
    extract(ModuleSystem::Es6, &ret.program, &ExtractOptions::default(), &mut out).unwrap();
    extract(ModuleSystem::Cjs, &ret.program, &ExtractOptions::default(), &mut out).unwrap();

    assert_eq!(names(&out), vec!["preexisting", "./a", "./b"]);
    assert_eq!(out[0].module_system, ModuleSystem::Amd);
}

#[test]
fn test_every_module_system_is_registered() {
    for system in ModuleSystem::ALL {
        assert!(extractor_for(system).is_ok(), "{} has no extractor", system);
    }
}

#[test]
fn test_callee_name_for_member_chains() {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, "a.b.c('./x');", SourceType::mjs()).parse();
    let deps = extract_all(
        &[ModuleSystem::ExoticRequire],
        &ret.program,
        &ExtractOptions::with_exotic_require_strings(vec!["a.b.c".to_string()]),
    )
    .unwrap();
    assert_eq!(names(&deps), vec!["./x"]);
}
