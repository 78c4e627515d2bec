use super::ExtractOptions;
use crate::models::dependency::{DependencyType, ModuleSystem, RawDependency};
use oxc_ast::ast::{
    ExportAllDeclaration, ExportNamedDeclaration, ImportDeclaration, Program, TSImportEqualsDeclaration,
    TSModuleReference,
};
use oxc_ast_visit::{walk, Visit};

/// Declarations that only exist before TypeScript compilation:
/// `import type`, `export type ... from`, `import type x = require()`
pub(super) fn extract(program: &Program<'_>, _options: &ExtractOptions, out: &mut Vec<RawDependency>) {
    let mut collector = TypeOnlyCollector { out };
    collector.visit_program(program);
}

struct TypeOnlyCollector<'o> {
    out: &'o mut Vec<RawDependency>,
}

impl TypeOnlyCollector<'_> {
    fn push(&mut self, module_name: &str, re_export: bool) {
        if module_name.is_empty() {
            return;
        }
        let mut dependency =
            RawDependency::new(module_name, ModuleSystem::TsType).with_type(DependencyType::TypeOnly);
        if re_export {
            dependency = dependency.with_type(DependencyType::ReExport);
        }
        self.out.push(dependency);
    }
}

impl<'a> Visit<'a> for TypeOnlyCollector<'_> {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        if decl.import_kind.is_type() {
            self.push(decl.source.value.as_str(), false);
        }
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        if decl.export_kind.is_type() {
            self.push(decl.source.value.as_str(), true);
        }
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            if decl.export_kind.is_type() {
                self.push(source.value.as_str(), true);
            }
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_ts_import_equals_declaration(&mut self, decl: &TSImportEqualsDeclaration<'a>) {
        if !decl.import_kind.is_type() {
            return;
        }
        if let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference {
            self.push(reference.expression.value.as_str(), false);
        }
    }
}
