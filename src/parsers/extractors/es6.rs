use super::{expression_string, ExtractOptions};
use crate::models::dependency::{DependencyType, ModuleSystem, RawDependency};
use oxc_ast::ast::{
    ExportAllDeclaration, ExportNamedDeclaration, ImportDeclaration, ImportExpression, Program,
};
use oxc_ast_visit::{walk, Visit};

/// `import`, `export ... from` and `import()`
pub(super) fn extract(program: &Program<'_>, _options: &ExtractOptions, out: &mut Vec<RawDependency>) {
    let mut collector = Es6Collector { out };
    collector.visit_program(program);
}

struct Es6Collector<'o> {
    out: &'o mut Vec<RawDependency>,
}

impl Es6Collector<'_> {
    fn push(&mut self, module_name: &str, re_export: bool) {
        if module_name.is_empty() {
            return;
        }
        let mut dependency = RawDependency::new(module_name, ModuleSystem::Es6);
        if re_export {
            dependency = dependency.with_type(DependencyType::ReExport);
        }
        self.out.push(dependency);
    }
}

impl<'a> Visit<'a> for Es6Collector<'_> {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        // type-only imports are erased by the compiler
        if !decl.import_kind.is_type() {
            self.push(decl.source.value.as_str(), false);
        }
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        if !decl.export_kind.is_type() {
            self.push(decl.source.value.as_str(), true);
        }
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            if !decl.export_kind.is_type() {
                self.push(source.value.as_str(), true);
            }
        }
        // exported declarations can still contain import() calls
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Some(module_name) = expression_string(&expr.source).filter(|name| !name.is_empty()) {
            self.out.push(RawDependency::new(module_name, ModuleSystem::Es6).dynamic());
        }
        walk::walk_import_expression(self, expr);
    }
}
