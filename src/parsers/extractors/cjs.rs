use super::{single_string_argument, ExtractOptions};
use crate::models::dependency::{ModuleSystem, RawDependency};
use oxc_ast::ast::{CallExpression, Expression, Program, TSImportEqualsDeclaration, TSModuleReference};
use oxc_ast_visit::{walk, Visit};

/// `require("x")` and `import x = require("x")`
pub(super) fn extract(program: &Program<'_>, _options: &ExtractOptions, out: &mut Vec<RawDependency>) {
    let mut collector = CommonJsCollector { out };
    collector.visit_program(program);
}

struct CommonJsCollector<'o> {
    out: &'o mut Vec<RawDependency>,
}

impl<'a> Visit<'a> for CommonJsCollector<'_> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(ident) = &call.callee {
            if ident.name.as_str() == "require" {
                if let Some(module_name) = single_string_argument(&call.arguments) {
                    self.out.push(RawDependency::new(module_name, ModuleSystem::Cjs));
                }
            }
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_ts_import_equals_declaration(&mut self, decl: &TSImportEqualsDeclaration<'a>) {
        if decl.import_kind.is_type() {
            return;
        }
        if let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference {
            let module_name = reference.expression.value.as_str();
            if !module_name.is_empty() {
                self.out.push(RawDependency::new(module_name, ModuleSystem::Cjs));
            }
        }
    }
}
